use std::time::Duration;

use tracing::trace;

/// Quiet-period timer for search input. Every keystroke calls `trigger`,
/// which supersedes any wait already in flight; after `settle` the caller
/// only re-renders when its generation is still the latest. There is no
/// cancellation of the sleeping future itself, superseded waits simply
/// report false.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    generation: u64,
}

impl Debouncer {
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet: Duration::from_millis(quiet_ms),
            generation: 0,
        }
    }

    /// Register a new input event and get the generation to wait on.
    pub fn trigger(&mut self) -> u64 {
        self.generation += 1;
        trace!(generation = self.generation, "debounce trigger");
        self.generation
    }

    /// Sleep out the quiet period; true when `generation` is still the
    /// newest trigger, meaning the input settled.
    pub async fn settle(&self, generation: u64) -> bool {
        tokio::time::sleep(self.quiet).await;
        generation == self.generation
    }
}
