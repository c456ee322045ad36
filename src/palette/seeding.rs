// Farthest-point centroid seeding
//
// The first seed is chosen by the caller (uniformly at random or a fixed
// index). Each further seed is the point whose squared distance to its
// nearest already-chosen seed is largest; ties keep the earliest point, and
// when every point already coincides with a seed, point 0 is chosen.
// Given the first index the result is fully deterministic.

use rand::Rng;

use super::color::Rgb;

/// Pick the first seed uniformly from `0..len`
///
/// # Panics
/// Panics if `len` is 0
pub fn random_first_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..len)
}

/// Choose `k` seed point indices starting from `first`
///
/// `points` must be non-empty and `first` a valid index into it.
pub fn farthest_point_seeds(points: &[Rgb], k: usize, first: usize) -> Vec<usize> {
    let mut seeds = Vec::with_capacity(k);
    if k == 0 {
        return seeds;
    }
    seeds.push(first);

    // Distance from each point to its nearest chosen seed
    let first_color = points[first];
    let mut nearest: Vec<u32> = points
        .iter()
        .map(|p| p.distance_squared(first_color))
        .collect();

    while seeds.len() < k {
        let mut farthest = 0;
        let mut max_distance = 0;
        for (index, &distance) in nearest.iter().enumerate() {
            if distance > max_distance {
                max_distance = distance;
                farthest = index;
            }
        }
        seeds.push(farthest);

        let seed_color = points[farthest];
        for (distance, point) in nearest.iter_mut().zip(points) {
            *distance = (*distance).min(point.distance_squared(seed_color));
        }
    }
    seeds
}
