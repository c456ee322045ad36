// Dominant-color quantizer - farthest-point seeded Lloyd k-means over RGB
//
// Per call the quantizer owns flat arenas indexed by cluster id (centroids,
// sizes, channel sums) and by point id (assignments); nothing is reallocated
// between iterations.
//
// Iteration stops at the cap or once every cluster's point count equals the
// previous iteration's. Counts matching does not imply assignments matching,
// so after the loop one more assignment pass runs against the final
// centroids: reported assignments and sizes are always nearest-centroid.

use rand::Rng;
use serde::Serialize;

use super::color::{Rgb, Rgba};
use super::seeding::{farthest_point_seeds, random_first_index};
use crate::config::PaletteConfig;
use crate::debug::pipeline_tracer;
use crate::error::{ErrorCode, PaletteError};

pub const DEFAULT_CLUSTER_COUNT: usize = 4;
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// One palette color with the number of points it represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub color: Rgba,
    /// Points assigned to this color after the final pass
    pub population: usize,
    /// Cluster index the color came from
    pub cluster: usize,
}

/// Dominant colors ordered by population, largest first
///
/// Equal populations keep cluster index order (seed order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn colors(&self) -> Vec<Rgba> {
        self.entries.iter().map(|entry| entry.color).collect()
    }

    pub fn get(&self, index: usize) -> Option<Rgba> {
        self.entries.get(index).map(|entry| entry.color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Full result of one quantization call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantizeOutcome {
    pub palette: Palette,
    /// Final centroids in cluster index order
    pub centroids: Vec<Rgb>,
    /// Nearest-centroid cluster index per point
    pub assignments: Vec<usize>,
    /// Points per cluster, cluster index order
    pub cluster_sizes: Vec<usize>,
    /// Seed point indices, cluster index order
    pub seeds: Vec<usize>,
    /// Lloyd passes run (not counting the final assignment pass)
    pub iterations: usize,
    /// Whether the size-based stopping rule fired before the cap
    pub converged: bool,
    /// Times a cluster received no points and held its centroid
    pub empty_cluster_events: usize,
}

/// Reusable quantizer parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorQuantizer {
    cluster_count: usize,
    max_iterations: usize,
}

impl Default for ColorQuantizer {
    fn default() -> Self {
        Self {
            cluster_count: DEFAULT_CLUSTER_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ColorQuantizer {
    /// # Errors
    /// `InvalidClusterCount` if `k == 0`, `InvalidIterationCap` if
    /// `max_iterations == 0`
    pub fn new(k: usize, max_iterations: usize) -> Result<Self, PaletteError> {
        if k == 0 {
            return Err(PaletteError::InvalidClusterCount { k });
        }
        if max_iterations == 0 {
            return Err(PaletteError::InvalidIterationCap { max_iterations });
        }
        Ok(Self {
            cluster_count: k,
            max_iterations,
        })
    }

    pub fn from_config(config: &PaletteConfig) -> Result<Self, PaletteError> {
        Self::new(config.cluster_count, config.max_iterations)
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Quantize with a randomly chosen first seed
    ///
    /// # Errors
    /// `DegenerateColorInput` if `points` is empty
    pub fn quantize<R: Rng + ?Sized>(
        &self,
        points: &[Rgb],
        rng: &mut R,
    ) -> Result<QuantizeOutcome, PaletteError> {
        if points.is_empty() {
            return Err(PaletteError::DegenerateColorInput);
        }
        let first = random_first_index(points.len(), rng);
        self.quantize_from_seed(points, first)
    }

    /// Quantize with a caller-chosen first seed; fully deterministic
    ///
    /// # Errors
    /// `DegenerateColorInput` if `points` is empty, `SeedOutOfRange` if
    /// `first` is not a point index
    pub fn quantize_from_seed(
        &self,
        points: &[Rgb],
        first: usize,
    ) -> Result<QuantizeOutcome, PaletteError> {
        if points.is_empty() {
            return Err(PaletteError::DegenerateColorInput);
        }
        if first >= points.len() {
            return Err(PaletteError::SeedOutOfRange {
                index: first,
                len: points.len(),
            });
        }

        let k = self.cluster_count;
        let seeds = farthest_point_seeds(points, k, first);
        pipeline_tracer::trace_seeded(points.len(), &seeds);

        let mut centroids: Vec<Rgb> = seeds.iter().map(|&index| points[index]).collect();
        let mut assignments = vec![0usize; points.len()];
        let mut sizes = vec![0usize; k];
        let mut previous_sizes = vec![0usize; k];
        let mut sums = vec![[0u64; 3]; k];

        let mut iterations = 0;
        let mut converged = false;
        let mut empty_cluster_events = 0;

        while iterations < self.max_iterations {
            assign(points, &centroids, &mut assignments, &mut sizes, &mut sums);

            let mut empty_this_pass = 0;
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let size = sizes[cluster] as u64;
                if size == 0 {
                    empty_this_pass += 1;
                    let event = PaletteError::EmptyCluster {
                        cluster,
                        iteration: iterations,
                    };
                    log::debug!(
                        "[ColorQuantizer] code={} {}",
                        event.code(),
                        event.message()
                    );
                    continue;
                }
                let [r, g, b] = sums[cluster];
                *centroid = Rgb::new((r / size) as u8, (g / size) as u8, (b / size) as u8);
            }
            empty_cluster_events += empty_this_pass;
            iterations += 1;
            pipeline_tracer::trace_lloyd_iteration(iterations, &sizes, empty_this_pass);

            if sizes == previous_sizes {
                converged = true;
                break;
            }
            previous_sizes.copy_from_slice(&sizes);
        }

        assign(points, &centroids, &mut assignments, &mut sizes, &mut sums);

        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));
        let palette = Palette {
            entries: order
                .iter()
                .map(|&cluster| PaletteEntry {
                    color: centroids[cluster].opaque(),
                    population: sizes[cluster],
                    cluster,
                })
                .collect(),
        };

        pipeline_tracer::trace_palette_ready(palette.len(), iterations, converged);
        log::debug!(
            "[ColorQuantizer] {} points, k={}, {} iterations, converged={}, empty events={}",
            points.len(),
            k,
            iterations,
            converged,
            empty_cluster_events
        );

        Ok(QuantizeOutcome {
            palette,
            centroids,
            assignments,
            cluster_sizes: sizes,
            seeds,
            iterations,
            converged,
            empty_cluster_events,
        })
    }
}

/// Nearest-centroid assignment; ties go to the lowest cluster index
fn assign(
    points: &[Rgb],
    centroids: &[Rgb],
    assignments: &mut [usize],
    sizes: &mut [usize],
    sums: &mut [[u64; 3]],
) {
    sizes.fill(0);
    sums.fill([0; 3]);
    for (point, slot) in points.iter().zip(assignments.iter_mut()) {
        let mut best = 0;
        let mut best_distance = u32::MAX;
        for (cluster, centroid) in centroids.iter().enumerate() {
            let distance = point.distance_squared(*centroid);
            if distance < best_distance {
                best_distance = distance;
                best = cluster;
            }
        }
        *slot = best;
        sizes[best] += 1;
        let sum = &mut sums[best];
        sum[0] += point.r as u64;
        sum[1] += point.g as u64;
        sum[2] += point.b as u64;
    }
}

/// Extract `k` dominant colors with default iteration cap and a random first seed
pub fn quantize(points: &[Rgb], k: usize) -> Result<Palette, PaletteError> {
    let quantizer = ColorQuantizer::new(k, DEFAULT_MAX_ITERATIONS)?;
    Ok(quantizer.quantize(points, &mut rand::thread_rng())?.palette)
}

#[cfg(test)]
mod tests;
