use crate::engine::TimerEngine;
use crate::host::{Clock, Ticker};
use crate::laps::{LapEntry, LapId, LapLedger};
use crate::TICK_PERIOD_MS;

/// Timer engine and lap ledger bound to a host clock and ticker.
///
/// The host calls [`Stopwatch::tick`] each time the ticker fires. The
/// engine and the ledger are independent: resetting keeps the laps and
/// clearing the laps keeps the timer.
pub struct Stopwatch<C: Clock, T: Ticker> {
    clock: C,
    ticker: T,
    engine: TimerEngine,
    laps: LapLedger,
}

impl<C: Clock, T: Ticker> Stopwatch<C, T> {
    pub fn new(clock: C, ticker: T) -> Self {
        Self {
            clock,
            ticker,
            engine: TimerEngine::new(),
            laps: LapLedger::new(),
        }
    }

    pub fn start(&mut self) {
        if self.engine.is_running() {
            return;
        }
        // Never leave two schedules armed
        self.ticker.cancel();
        self.engine.start(self.clock.now_ms());
        self.ticker.arm(TICK_PERIOD_MS);
    }

    pub fn pause(&mut self) {
        if self.engine.pause() {
            self.ticker.cancel();
        }
    }

    /// Stop and zero the timer. Laps are kept.
    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.engine.reset();
    }

    /// Periodic callback body. Returns the freshly sampled elapsed time.
    pub fn tick(&mut self) -> u64 {
        if !self.engine.is_running() {
            return self.engine.elapsed_ms();
        }
        self.engine.sample(self.clock.now_ms())
    }

    pub fn current_elapsed(&self) -> u64 {
        self.engine.elapsed_ms()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Whether a lap makes sense right now: the timer is running or has
    /// accumulated time. The ledger itself accepts laps at any time.
    pub fn lap_allowed(&self) -> bool {
        self.engine.is_running() || self.engine.elapsed_ms() != 0
    }

    /// Capture the current elapsed time as a new lap.
    pub fn record_lap(&mut self) -> LapId {
        let elapsed = self.engine.elapsed_ms();
        self.laps.record(elapsed)
    }

    pub fn record_lap_at(&mut self, elapsed_ms: u64) -> LapId {
        self.laps.record(elapsed_ms)
    }

    pub fn clear_laps(&mut self) {
        self.laps.clear();
    }

    pub fn remove_lap(&mut self, id: LapId) -> bool {
        self.laps.remove(id)
    }

    pub fn entries(&self) -> &[LapEntry] {
        self.laps.entries()
    }

    pub fn laps(&self) -> &LapLedger {
        &self.laps
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }
}
