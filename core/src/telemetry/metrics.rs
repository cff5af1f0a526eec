use serde::Serialize;
use std::sync::Mutex;

/// Refresh counters for one provider.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub published: usize,
    pub failed: usize,
    pub superseded: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_published(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.published += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn record_superseded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.superseded += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent() {
        let recorder = MetricsRecorder::new();
        recorder.record_published();
        recorder.record_published();
        recorder.record_failed();
        assert_eq!(
            recorder.snapshot(),
            Metrics {
                published: 2,
                failed: 1,
                superseded: 0,
            }
        );
    }
}
