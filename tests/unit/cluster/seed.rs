use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn distinct_points_are_all_chosen_when_k_matches() {
    let rows = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
    ];
    let mut rng = StdRng::seed_from_u64(7);
    let mut seeds = kmeans_plus_plus(&rows, 4, 10_000, &mut rng);
    seeds.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        seeds,
        vec![
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
        ]
    );
}

#[test]
fn identical_points_fall_back_to_uniform_draws() {
    let rows = vec![[0.5, 0.5, 0.5]; 10];
    let mut rng = StdRng::seed_from_u64(1);
    let seeds = kmeans_plus_plus(&rows, 3, 10_000, &mut rng);
    assert_eq!(seeds, vec![[0.5, 0.5, 0.5]; 3]);
}

#[test]
fn subsample_cap_still_returns_k_seeds_from_the_data() {
    let rows: Vec<[f32; 3]> = (0..500).map(|i| [i as f32 / 500.0, 0.0, 0.0]).collect();
    let mut rng = StdRng::seed_from_u64(3);
    let seeds = kmeans_plus_plus(&rows, 8, 50, &mut rng);
    assert_eq!(seeds.len(), 8);
    for s in &seeds {
        assert!(rows.contains(s));
    }
}

#[test]
fn same_seed_same_centroids() {
    let rows: Vec<[f32; 3]> = (0..300)
        .map(|i| [(i % 17) as f32 / 17.0, (i % 5) as f32 / 5.0, 0.25])
        .collect();
    let a = kmeans_plus_plus(&rows, 6, 100, &mut StdRng::seed_from_u64(42));
    let b = kmeans_plus_plus(&rows, 6, 100, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn weighted_pick_skips_zero_weights() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..50 {
        let i = weighted_pick(&[0.0, 2.0, 0.0, 1.0], 3.0, &mut rng);
        assert!(i == 1 || i == 3);
    }
}
