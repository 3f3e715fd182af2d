use crate::foundation::error::{ChromaError, ChromaResult};

/// Smallest cluster count produced by the schedule.
pub const MIN_CLUSTERS: u32 = 2;
/// Largest cluster count produced by the schedule.
pub const MAX_CLUSTERS: u32 = 64;

/// Cluster count for step `step_index` of a `steps`-step schedule, before de-duplication.
///
/// Values are spaced logarithmically between [`MIN_CLUSTERS`] and [`MAX_CLUSTERS`]. The same
/// formula labels frames ("N clusters") on the host side.
pub fn level_at(step_index: u32, steps: u32) -> ChromaResult<u32> {
    if steps < 2 {
        return Err(ChromaError::invalid_config(format!(
            "steps must be >= 2, got {steps}"
        )));
    }
    if step_index >= steps {
        return Err(ChromaError::invalid_config(format!(
            "step index {step_index} out of range for {steps} steps"
        )));
    }

    let progress = f64::from(step_index) / f64::from(steps - 1);
    let min_log = f64::from(MIN_CLUSTERS).ln();
    let max_log = f64::from(MAX_CLUSTERS).ln();
    let value = (min_log + (max_log - min_log) * progress).exp();
    Ok((value.round() as u32).max(MIN_CLUSTERS))
}

/// Strictly increasing, de-duplicated cluster counts for a requested number of steps.
///
/// The result may be shorter than `steps`: neighbouring steps that round to the same k collapse
/// into one level, and at most `MAX_CLUSTERS - MIN_CLUSTERS + 1` distinct levels exist. Callers
/// must not assume one level per requested step.
pub fn cluster_levels(steps: u32) -> ChromaResult<Vec<u32>> {
    if steps < 2 {
        return Err(ChromaError::invalid_config(format!(
            "steps must be >= 2, got {steps}"
        )));
    }
    let mut out = Vec::<u32>::with_capacity(steps.min(MAX_CLUSTERS) as usize);
    for i in 0..steps {
        let k = level_at(i, steps)?;
        if !out.contains(&k) {
            out.push(k);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/cluster/levels.rs"]
mod tests;
