use rand::Rng;
use rayon::prelude::*;

use crate::cluster::seed::kmeans_plus_plus;
use crate::foundation::error::{ChromaError, ChromaResult};
use crate::foundation::math::dist_sq3;
use crate::raster::samples::SampleMatrix;
use crate::session::cooperative::Cooperative;

/// Options for [`KMeans`].
///
/// Iteration policy: at most `max_iterations` assignment/update rounds. The loop exits early once
/// a round leaves every assignment unchanged, since no later round could move a centroid.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KMeansOpts {
    /// Upper bound on assignment/update rounds.
    pub max_iterations: u32,
    /// Samples processed between cooperative checkpoints.
    pub chunk_size: usize,
    /// Size cap of the random subsample used for k-means++ seeding.
    pub seed_sample_cap: usize,
    /// Run the assignment step of each chunk on a rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for KMeansOpts {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            chunk_size: 5_000,
            seed_sample_cap: 10_000,
            parallel: false,
            threads: None,
        }
    }
}

impl KMeansOpts {
    /// Reject option values that would make a run meaningless.
    pub fn validate(&self) -> ChromaResult<()> {
        if self.max_iterations == 0 {
            return Err(ChromaError::invalid_config(
                "kmeans max_iterations must be >= 1",
            ));
        }
        if self.chunk_size == 0 {
            return Err(ChromaError::invalid_config("kmeans chunk_size must be >= 1"));
        }
        if self.seed_sample_cap == 0 {
            return Err(ChromaError::invalid_config(
                "kmeans seed_sample_cap must be >= 1",
            ));
        }
        if self.threads == Some(0) {
            return Err(ChromaError::invalid_config(
                "kmeans 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Centroids and per-sample assignments for one cluster level.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansState {
    centroids: Vec<[f32; 3]>,
    assignments: Vec<u32>,
    rounds: u32,
    converged: bool,
}

impl KMeansState {
    #[cfg(test)]
    pub(crate) fn from_parts(centroids: Vec<[f32; 3]>, assignments: Vec<u32>) -> Self {
        Self {
            centroids,
            assignments,
            rounds: 0,
            converged: false,
        }
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Centroid colors, normalized RGB.
    pub fn centroids(&self) -> &[[f32; 3]] {
        &self.centroids
    }

    /// Cluster index of every sample, in sample order.
    pub fn assignments(&self) -> &[u32] {
        &self.assignments
    }

    /// Assignment/update rounds actually run.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// `true` when the loop stopped at an assignment fixed point rather than the round cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of samples assigned to each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.centroids.len()];
        for &a in &self.assignments {
            sizes[a as usize] += 1;
        }
        sizes
    }

    /// Mean squared distance from each sample to its assigned centroid.
    pub fn inertia(&self, samples: &SampleMatrix) -> f64 {
        let rows = samples.rows();
        if rows.is_empty() {
            return 0.0;
        }
        let total: f64 = rows
            .iter()
            .zip(&self.assignments)
            .map(|(&s, &a)| f64::from(dist_sq3(s, self.centroids[a as usize])))
            .sum();
        total / rows.len() as f64
    }
}

/// Lloyd-style k-means over RGB samples with k-means++ seeding.
pub struct KMeans {
    opts: KMeansOpts,
    pool: Option<rayon::ThreadPool>,
}

impl KMeans {
    /// Validate `opts` and, in parallel mode, build the dedicated worker pool.
    pub fn new(opts: KMeansOpts) -> ChromaResult<Self> {
        opts.validate()?;
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        Ok(Self { opts, pool })
    }

    /// Cluster `samples` into `k` colors.
    ///
    /// Randomness only enters through seeding, so a seeded `rng` makes the result reproducible.
    /// The scheduler is polled after every chunk of `chunk_size` samples.
    #[tracing::instrument(skip(self, samples, rng, coop), fields(sample_count = samples.len()))]
    pub fn run<R: Rng + ?Sized>(
        &self,
        samples: &SampleMatrix,
        k: u32,
        rng: &mut R,
        coop: &mut Cooperative<'_>,
    ) -> ChromaResult<KMeansState> {
        let rows = samples.rows();
        if k == 0 || k as usize > rows.len() {
            return Err(ChromaError::invalid_config(format!(
                "k must be within [1, {}], got {k}",
                rows.len()
            )));
        }

        let mut centroids = kmeans_plus_plus(rows, k as usize, self.opts.seed_sample_cap, rng);
        let mut assignments = vec![0u32; rows.len()];
        let mut rounds = 0u32;
        let mut converged = false;

        for round in 0..self.opts.max_iterations {
            let changed = self.assign(rows, &centroids, &mut assignments, coop)?;
            rounds += 1;
            if round > 0 && !changed {
                converged = true;
                break;
            }
            update_centroids(rows, &assignments, &mut centroids);
        }

        if !converged {
            // The last round ended with an update; re-assign so labels match the final centroids.
            self.assign(rows, &centroids, &mut assignments, coop)?;
        }

        tracing::debug!(k, rounds, converged, "kmeans level done");
        Ok(KMeansState {
            centroids,
            assignments,
            rounds,
            converged,
        })
    }

    fn assign(
        &self,
        rows: &[[f32; 3]],
        centroids: &[[f32; 3]],
        assignments: &mut [u32],
        coop: &mut Cooperative<'_>,
    ) -> ChromaResult<bool> {
        let cs = self.opts.chunk_size;
        let mut changed = false;
        for (chunk_rows, chunk_labels) in rows.chunks(cs).zip(assignments.chunks_mut(cs)) {
            let chunk_changed = match self.pool.as_ref() {
                Some(pool) => pool.install(|| {
                    chunk_rows
                        .par_iter()
                        .zip(chunk_labels.par_iter_mut())
                        .map(|(&s, label)| relabel(s, centroids, label))
                        .reduce(|| false, |a, b| a || b)
                }),
                None => {
                    let mut any = false;
                    for (&s, label) in chunk_rows.iter().zip(chunk_labels.iter_mut()) {
                        any |= relabel(s, centroids, label);
                    }
                    any
                }
            };
            changed |= chunk_changed;
            coop.checkpoint()?;
        }
        Ok(changed)
    }
}

#[inline]
fn relabel(sample: [f32; 3], centroids: &[[f32; 3]], label: &mut u32) -> bool {
    let best = nearest_centroid(sample, centroids);
    let changed = *label != best;
    *label = best;
    changed
}

/// Index of the closest centroid; ties resolve to the lowest index.
#[inline]
pub(crate) fn nearest_centroid(sample: [f32; 3], centroids: &[[f32; 3]]) -> u32 {
    let mut best = 0u32;
    let mut best_d2 = f32::INFINITY;
    for (i, &c) in centroids.iter().enumerate() {
        let d2 = dist_sq3(sample, c);
        if d2 < best_d2 {
            best_d2 = d2;
            best = i as u32;
        }
    }
    best
}

/// Move every non-empty cluster's centroid to the mean of its samples.
///
/// Empty clusters keep their previous position.
pub(crate) fn update_centroids(
    rows: &[[f32; 3]],
    assignments: &[u32],
    centroids: &mut [[f32; 3]],
) {
    let mut sums = vec![[0.0f64; 3]; centroids.len()];
    let mut counts = vec![0u64; centroids.len()];
    for (s, &a) in rows.iter().zip(assignments) {
        let a = a as usize;
        counts[a] += 1;
        sums[a][0] += f64::from(s[0]);
        sums[a][1] += f64::from(s[1]);
        sums[a][2] += f64::from(s[2]);
    }
    for ((c, sum), &n) in centroids.iter_mut().zip(&sums).zip(&counts) {
        if n == 0 {
            continue;
        }
        let n = n as f64;
        *c = [
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ];
    }
}

fn build_thread_pool(threads: Option<usize>) -> ChromaResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        ChromaError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/cluster/kmeans.rs"]
mod tests;
