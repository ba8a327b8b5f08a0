use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default simulated response windows per registry, in milliseconds.
pub const TIER_LATENCY_MS: (u64, u64) = (250, 400);
pub const CREDENTIAL_LATENCY_MS: (u64, u64) = (300, 500);
pub const ENROLLMENT_LATENCY_MS: (u64, u64) = (280, 450);

/// Pluggable delay applied before every registry lookup.
///
/// The caller blocks for the full delay; there is no timeout or cancellation.
pub trait LatencyProvider: Send + Sync {
    fn wait(&self);
}

/// No delay at all. The choice for deterministic tests and the demo runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLatency;

impl LatencyProvider for NoLatency {
    fn wait(&self) {}
}

/// Sleeps for a uniformly random duration in `[min_ms, max_ms]`, emulating a
/// remote registry round-trip.
#[derive(Debug, Clone, Copy)]
pub struct UniformLatency {
    min_ms: u64,
    max_ms: u64,
}

impl UniformLatency {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        let max_ms = max_ms.max(min_ms);
        Self { min_ms, max_ms }
    }

    pub fn from_range(range: (u64, u64)) -> Self {
        Self::new(range.0, range.1)
    }
}

impl LatencyProvider for UniformLatency {
    fn wait(&self) {
        let delay = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        thread::sleep(Duration::from_millis(delay));
    }
}

/// Select the latency strategy for one registry based on the simulation flag.
pub fn provider_for(simulate: bool, range: (u64, u64)) -> Arc<dyn LatencyProvider> {
    if simulate {
        Arc::new(UniformLatency::from_range(range))
    } else {
        Arc::new(NoLatency)
    }
}
