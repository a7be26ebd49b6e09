/// Run/pause/reset state machine for a stopwatch.
///
/// Elapsed time is recomputed from the run segment's anchor on every
/// sample instead of being incremented by the tick period, so late or
/// skipped ticks never accumulate into drift.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerEngine {
    elapsed_ms: u64,
    running: bool,
    anchor_ms: Option<u64>,
    base_elapsed_ms: u64,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a run segment anchored at `now_ms`. Returns false if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.anchor_ms = Some(now_ms);
        self.base_elapsed_ms = self.elapsed_ms;
        self.running = true;
        true
    }

    /// Freeze at the last sampled value. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.anchor_ms = None;
        self.running = false;
        true
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.base_elapsed_ms = 0;
        self.anchor_ms = None;
        self.running = false;
    }

    /// Recompute elapsed time from the anchor. Ignored while not running.
    pub fn sample(&mut self, now_ms: u64) -> u64 {
        if let Some(anchor) = self.anchor_ms {
            let computed = now_ms.saturating_sub(anchor) + self.base_elapsed_ms;
            // A clock step backwards must not rewind the display
            self.elapsed_ms = self.elapsed_ms.max(computed);
        }
        self.elapsed_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn anchor_ms(&self) -> Option<u64> {
        self.anchor_ms
    }
}
