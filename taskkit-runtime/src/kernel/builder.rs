use super::host::ThreadKernel;
use std::time::Instant;
use tracing::info;

/// Builder for [`ThreadKernel`].
///
/// Defaults describe an ESP32-class part: 1 kHz tick, 25 priority levels and
/// two cores.
pub struct ThreadKernelBuilder {
    pub(crate) tick_rate_hz: u32,
    pub(crate) max_priorities: u32,
    pub(crate) cores: u8,
}

impl Default for ThreadKernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadKernelBuilder {
    pub fn new() -> Self {
        Self {
            tick_rate_hz: 1000,
            max_priorities: 25,
            cores: 2,
        }
    }

    /// A zero rate is bumped to 1 Hz.
    pub fn tick_rate_hz(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz.max(1);
        self
    }

    pub fn max_priorities(mut self, max_priorities: u32) -> Self {
        self.max_priorities = max_priorities;
        self
    }

    /// Number of pinnable cores; a single-core build passes 1.
    pub fn cores(mut self, cores: u8) -> Self {
        self.cores = cores;
        self
    }

    pub fn build(self) -> ThreadKernel {
        info!(
            target: crate::LOG_TAG,
            tick_rate_hz = self.tick_rate_hz,
            max_priorities = self.max_priorities,
            cores = self.cores,
            "Building host kernel"
        );

        ThreadKernel {
            epoch: Instant::now(),
            tick_rate_hz: self.tick_rate_hz,
            max_priorities: self.max_priorities,
            cores: self.cores,
            next_id: Default::default(),
        }
    }
}
