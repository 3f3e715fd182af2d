use rand::Rng;

use crate::foundation::math::dist_sq3;

/// k-means++ seeding over a bounded random subsample of `rows`.
///
/// The first centroid is drawn uniformly; each further centroid is drawn with probability
/// proportional to its squared distance to the nearest centroid chosen so far. When every
/// candidate already coincides with a centroid the draw falls back to uniform, so `k` centroids
/// are always returned (possibly with duplicates).
///
/// Expects `1 <= k <= rows.len()`.
pub(crate) fn kmeans_plus_plus<R: Rng + ?Sized>(
    rows: &[[f32; 3]],
    k: usize,
    sample_cap: usize,
    rng: &mut R,
) -> Vec<[f32; 3]> {
    let n = rows.len();
    let take = n.min(sample_cap.max(k));
    let candidates: Vec<[f32; 3]> = if take == n {
        rows.to_vec()
    } else {
        rand::seq::index::sample(rng, n, take)
            .into_iter()
            .map(|i| rows[i])
            .collect()
    };

    let mut centroids = Vec::with_capacity(k);
    let first = candidates[rng.random_range(0..candidates.len())];
    centroids.push(first);

    let mut nearest_d2: Vec<f64> = candidates
        .iter()
        .map(|&c| f64::from(dist_sq3(c, first)))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest_d2.iter().sum();
        let idx = if total > 0.0 {
            weighted_pick(&nearest_d2, total, rng)
        } else {
            rng.random_range(0..candidates.len())
        };

        let next = candidates[idx];
        centroids.push(next);
        for (d, &c) in nearest_d2.iter_mut().zip(&candidates) {
            let nd = f64::from(dist_sq3(c, next));
            if nd < *d {
                *d = nd;
            }
        }
    }

    centroids
}

fn weighted_pick<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let mut threshold = rng.random::<f64>() * total;
    let mut last_positive = 0usize;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        last_positive = i;
        threshold -= w;
        if threshold < 0.0 {
            return i;
        }
    }
    // Float round-off can leave a sliver of threshold after the last weight.
    last_positive
}

#[cfg(test)]
#[path = "../../tests/unit/cluster/seed.rs"]
mod tests;
