//! Store metrics.
//!
//! Metrics go through the `metrics` facade. Nothing is exported unless the
//! host application installs a recorder; without one every call is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Total actions reduced, including fed-back ones
pub const ACTIONS_TOTAL: &str = "store.actions.total";
/// Total non-empty effects returned by reducers
pub const EFFECTS_TOTAL: &str = "store.effects.total";
/// `send` calls aborted by the feedback guard
pub const FEEDBACK_LIMIT_TOTAL: &str = "store.feedback_limit.total";
/// Time spent inside `Reducer::reduce`
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Register metric descriptions with the installed recorder.
///
/// Call once after installing a recorder. Safe to call without one.
pub fn describe_store_metrics() {
    describe_counter!(
        ACTIONS_TOTAL,
        "Total number of actions reduced by stores"
    );
    describe_counter!(
        EFFECTS_TOTAL,
        "Total number of non-empty effects returned by reducers"
    );
    describe_counter!(
        FEEDBACK_LIMIT_TOTAL,
        "Total number of sends aborted by the feedback action limit"
    );
    describe_histogram!(
        REDUCER_DURATION,
        "Time taken to execute a single reduce call"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one reduce call and the effects it produced.
    pub fn record_reduce(duration: Duration, effect_count: usize) {
        counter!(ACTIONS_TOTAL).increment(1);
        if effect_count > 0 {
            counter!(EFFECTS_TOTAL).increment(effect_count as u64);
        }
        histogram!(REDUCER_DURATION).record(duration.as_secs_f64());
    }

    /// Record a send rejected by the feedback guard.
    pub fn record_feedback_limit() {
        counter!(FEEDBACK_LIMIT_TOTAL).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        describe_store_metrics();
        StoreMetrics::record_reduce(Duration::from_micros(3), 0);
        StoreMetrics::record_reduce(Duration::from_micros(3), 2);
        StoreMetrics::record_feedback_limit();
    }
}
