/// Source of "now" in milliseconds. Only differences between readings
/// are meaningful.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Host facility for a single repeating callback.
///
/// `arm` replaces any previous schedule. After `cancel` returns, the host
/// must not deliver another tick from an earlier `arm`.
pub trait Ticker {
    fn arm(&mut self, period_ms: u64);
    fn cancel(&mut self);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
