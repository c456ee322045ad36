use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);

fn random_points(count: usize, seed: u64) -> Vec<Rgb> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Rgb::new(rng.gen(), rng.gen(), rng.gen()))
        .collect()
}

#[test]
fn test_red_blue_scenario() {
    let points = [RED, RED, BLUE, BLUE];
    let quantizer = ColorQuantizer::new(2, 50).unwrap();

    let outcome = quantizer.quantize_from_seed(&points, 0).unwrap();
    assert_eq!(outcome.seeds, vec![0, 2]);
    assert_eq!(outcome.centroids, vec![RED, BLUE]);
    assert_eq!(outcome.assignments, vec![0, 0, 1, 1]);
    assert_eq!(outcome.cluster_sizes, vec![2, 2]);
    assert!(outcome.converged);
    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.empty_cluster_events, 0);
    // Equal populations keep seed order
    assert_eq!(outcome.palette.colors(), vec![RED.opaque(), BLUE.opaque()]);

    let outcome = quantizer.quantize_from_seed(&points, 3).unwrap();
    assert_eq!(outcome.palette.colors(), vec![BLUE.opaque(), RED.opaque()]);
}

#[test]
fn test_palette_sorted_by_population() {
    let mut points = vec![RED; 6];
    points.extend([BLUE; 2]);
    let quantizer = ColorQuantizer::new(2, 50).unwrap();

    // Seed on blue so cluster 0 is the smaller one
    let outcome = quantizer.quantize_from_seed(&points, 7).unwrap();
    assert_eq!(outcome.cluster_sizes, vec![2, 6]);
    let entries = outcome.palette.entries();
    assert_eq!(entries[0].color, RED.opaque());
    assert_eq!(entries[0].population, 6);
    assert_eq!(entries[0].cluster, 1);
    assert_eq!(entries[1].color, BLUE.opaque());
    assert!(entries.iter().all(|entry| entry.color.a == 255));
}

#[test]
fn test_mean_is_truncated() {
    let points = [Rgb::new(0, 0, 0), Rgb::new(1, 1, 1), Rgb::new(10, 10, 10)];
    let outcome = ColorQuantizer::new(1, 50)
        .unwrap()
        .quantize_from_seed(&points, 0)
        .unwrap();
    assert_eq!(outcome.centroids, vec![Rgb::new(3, 3, 3)]);
    assert!(outcome.converged);
}

#[test]
fn test_deterministic_given_first_seed() {
    let points = random_points(400, 11);
    let quantizer = ColorQuantizer::new(5, 50).unwrap();

    let a = quantizer.quantize_from_seed(&points, 17).unwrap();
    let b = quantizer.quantize_from_seed(&points, 17).unwrap();
    assert_eq!(a, b);

    let c = quantizer
        .quantize(&points, &mut StdRng::seed_from_u64(99))
        .unwrap();
    let d = quantizer
        .quantize(&points, &mut StdRng::seed_from_u64(99))
        .unwrap();
    assert_eq!(c.centroids, d.centroids);
    assert_eq!(c.seeds[0], d.seeds[0]);
}

#[test]
fn test_coverage_and_local_optimality() {
    let quantizer = ColorQuantizer::new(6, 50).unwrap();
    for seed in 0..5 {
        let points = random_points(300, seed);
        let outcome = quantizer
            .quantize(&points, &mut StdRng::seed_from_u64(seed))
            .unwrap();

        assert!(outcome.iterations <= 50);
        assert_eq!(outcome.assignments.len(), points.len());
        assert_eq!(outcome.cluster_sizes.iter().sum::<usize>(), points.len());
        assert_eq!(outcome.palette.len(), 6);

        for (point, &cluster) in points.iter().zip(&outcome.assignments) {
            assert!(cluster < 6);
            let own = point.distance_squared(outcome.centroids[cluster]);
            for other in &outcome.centroids {
                assert!(own <= point.distance_squared(*other));
            }
        }

        let populations: Vec<usize> = outcome
            .palette
            .entries()
            .iter()
            .map(|entry| entry.population)
            .collect();
        assert!(populations.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}

#[test]
fn test_more_clusters_than_distinct_colors() {
    let points = [RED, RED, BLUE];
    let outcome = ColorQuantizer::new(3, 50)
        .unwrap()
        .quantize_from_seed(&points, 0)
        .unwrap();

    // Third seed duplicates point 0; ties go to cluster 0 so cluster 2 stays empty
    assert_eq!(outcome.seeds, vec![0, 2, 0]);
    assert_eq!(outcome.cluster_sizes, vec![2, 1, 0]);
    assert_eq!(outcome.centroids[2], RED);
    assert!(outcome.empty_cluster_events >= 1);
    assert_eq!(outcome.palette.len(), 3);
}

#[test]
fn test_iteration_cap() {
    let points = random_points(200, 3);
    let outcome = ColorQuantizer::new(4, 1)
        .unwrap()
        .quantize_from_seed(&points, 0)
        .unwrap();
    assert_eq!(outcome.iterations, 1);
    assert!(!outcome.converged);
}

#[test]
fn test_invalid_inputs() {
    assert_eq!(
        ColorQuantizer::new(0, 50),
        Err(PaletteError::InvalidClusterCount { k: 0 })
    );
    assert_eq!(
        ColorQuantizer::new(4, 0),
        Err(PaletteError::InvalidIterationCap { max_iterations: 0 })
    );

    let quantizer = ColorQuantizer::default();
    assert_eq!(
        quantizer.quantize_from_seed(&[], 0),
        Err(PaletteError::DegenerateColorInput)
    );
    assert_eq!(
        quantizer.quantize(&[], &mut StdRng::seed_from_u64(1)),
        Err(PaletteError::DegenerateColorInput)
    );
    assert_eq!(
        quantizer.quantize_from_seed(&[RED], 1),
        Err(PaletteError::SeedOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(quantize(&[RED], 0), Err(PaletteError::InvalidClusterCount { k: 0 }));
}

#[test]
fn test_from_config() {
    let config = PaletteConfig {
        cluster_count: 3,
        max_iterations: 10,
        ..PaletteConfig::default()
    };
    let quantizer = ColorQuantizer::from_config(&config).unwrap();
    assert_eq!(quantizer.cluster_count(), 3);
    assert_eq!(quantizer.max_iterations(), 10);
}

#[test]
fn test_quantize_convenience() {
    let palette = quantize(&[RED, BLUE, RED], 2).unwrap();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette.get(0), Some(RED.opaque()));
}
