//! Pure stopwatch logic with no platform dependencies.
//! Testable on host; the host supplies a clock and a periodic ticker.

mod engine;
mod host;
mod laps;
mod stopwatch;

pub use engine::TimerEngine;
pub use host::{Clock, Ticker};
pub use laps::{LapEntry, LapId, LapLedger};
pub use stopwatch::Stopwatch;

/// Sampling period of a running stopwatch, in milliseconds.
pub const TICK_PERIOD_MS: u64 = 10;

/// Format milliseconds as "MM:SS.CC" (centiseconds).
///
/// Minutes are not wrapped into hours: 100 minutes renders as "100:00.00".
pub fn format_elapsed(ms: u64) -> String {
    let m = ms / 60_000;
    let s = (ms % 60_000) / 1000;
    let cs = (ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00.00");
        assert_eq!(format_elapsed(61_500), "01:01.50");
        assert_eq!(format_elapsed(12_340), "00:12.34");
        assert_eq!(format_elapsed(999), "00:00.99");
        assert_eq!(format_elapsed(59_999), "00:59.99");
    }

    #[test]
    fn test_format_minutes_widen() {
        assert_eq!(format_elapsed(3_600_000), "60:00.00");
        assert_eq!(format_elapsed(5_999_990), "99:59.99");
        assert_eq!(format_elapsed(6_000_000), "100:00.00");
    }

    #[test]
    fn test_format_truncates_sub_centisecond() {
        // 9 ms is below one centisecond
        assert_eq!(format_elapsed(9), "00:00.00");
        assert_eq!(format_elapsed(10), "00:00.01");
    }

    proptest! {
        #[test]
        fn format_fields_recompose(ms in 0u64..10_000_000_000) {
            let text = format_elapsed(ms);
            let (mins, rest) = text.split_once(':').expect("minutes separator");
            let (secs, centis) = rest.split_once('.').expect("centis separator");
            prop_assert!(mins.len() >= 2);
            prop_assert_eq!(secs.len(), 2);
            prop_assert_eq!(centis.len(), 2);

            let mins: u64 = mins.parse().unwrap();
            let secs: u64 = secs.parse().unwrap();
            let centis: u64 = centis.parse().unwrap();
            prop_assert!(secs < 60);
            prop_assert_eq!(mins * 60_000 + secs * 1000 + centis * 10, ms - ms % 10);
        }
    }
}
