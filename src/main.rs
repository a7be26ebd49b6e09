mod clock;
mod config;
mod error;
mod input;
mod logger;
mod pump;
mod ui;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::mpsc;

use num_traits::FromPrimitive;
use timer_core::{Clock, Stopwatch};

use crate::clock::HostClock;
use crate::config::{AppConfig, USAGE};
use crate::error::AppError;
use crate::input::Command;
use crate::pump::Pump;

const APP_NAME: &str = "Stopwatch";

#[derive(Debug, PartialEq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum AppOp {
    /// arg1 = `Command`, arg2 = command argument
    Command = 0,
    /// arg1 = pump generation
    Pump,
    Quit,
}

/// Fixed-shape message passed between threads and the main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar {
    pub id: usize,
    pub arg1: usize,
    pub arg2: usize,
}

impl Scalar {
    pub fn new(id: usize, arg1: usize, arg2: usize) -> Self {
        Self { id, arg1, arg2 }
    }
}

struct StopwatchApp<C: Clock, W: Write> {
    stopwatch: Stopwatch<C, Pump>,
    out: W,
    config: AppConfig,
    help_visible: bool,
    // Redraw bucket (elapsed / redraw_ms) last drawn while running
    drawn_bucket: Option<u64>,
}

impl<C: Clock, W: Write> StopwatchApp<C, W> {
    fn new(stopwatch: Stopwatch<C, Pump>, out: W, config: AppConfig) -> Self {
        Self {
            stopwatch,
            out,
            config,
            help_visible: false,
            drawn_bucket: None,
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        if self.config.clear_screen {
            ui::clear_screen(&mut self.out)?;
        }
        if self.help_visible {
            return ui::draw_help(&mut self.out);
        }
        let frame = ui::Frame {
            elapsed_ms: self.stopwatch.current_elapsed(),
            running: self.stopwatch.is_running(),
            lap_allowed: self.stopwatch.lap_allowed(),
            laps: self.stopwatch.entries(),
        };
        ui::draw_stopwatch(&mut self.out, &frame)
    }

    fn handle_pump(&mut self, generation: usize) -> io::Result<()> {
        if !self.stopwatch.ticker().accepts(generation) {
            log::trace!("dropping stale pump {}", generation);
            return Ok(());
        }
        let elapsed = self.stopwatch.tick();
        let bucket = elapsed / self.config.redraw_ms.max(1);
        if self.drawn_bucket != Some(bucket) && !self.help_visible {
            self.drawn_bucket = Some(bucket);
            self.redraw()?;
        }
        Ok(())
    }

    /// Returns false when the app should quit.
    fn handle_command(&mut self, cmd: Command, arg: usize) -> io::Result<bool> {
        // Help screen: any command dismisses it
        if self.help_visible && cmd != Command::Quit {
            self.help_visible = false;
            self.redraw()?;
            return Ok(true);
        }

        match cmd {
            Command::Toggle => {
                if self.stopwatch.is_running() {
                    self.stopwatch.pause();
                    log::info!("paused at {}", timer_core::format_elapsed(self.stopwatch.current_elapsed()));
                } else {
                    self.stopwatch.start();
                    log::info!("started");
                }
            }
            Command::Lap => {
                if self.stopwatch.lap_allowed() {
                    // Take a fresh sample so the lap is not up to a tick stale
                    self.stopwatch.tick();
                    let id = self.stopwatch.record_lap();
                    log::debug!("recorded {}", id);
                } else {
                    log::debug!("lap ignored: timer has not run");
                }
            }
            Command::Reset => {
                self.stopwatch.reset();
                self.drawn_bucket = None;
                log::info!("reset");
            }
            Command::ClearLaps => {
                self.stopwatch.clear_laps();
                log::info!("laps cleared");
            }
            Command::DeleteLap => {
                let id = self
                    .stopwatch
                    .laps()
                    .find_by_sequence(arg as u32)
                    .map(|lap| lap.id);
                match id {
                    Some(id) => {
                        self.stopwatch.remove_lap(id);
                        log::debug!("removed {}", id);
                    }
                    None => log::warn!("no lap {}", arg),
                }
            }
            Command::Help => self.help_visible = true,
            Command::Quit => return Ok(false),
        }
        self.redraw()?;
        Ok(true)
    }

    fn shutdown(&mut self) {
        log::debug!("shutting down, pump armed: {}", self.stopwatch.ticker().is_armed());
        self.stopwatch.reset();
        self.stopwatch.ticker_mut().shutdown();
    }
}

fn run(config: AppConfig) -> Result<(), AppError> {
    let (main_conn, main_rx) = mpsc::channel();

    let pump = Pump::spawn(main_conn.clone())?;
    input::spawn_stdin_reader(main_conn.clone())?;

    let stopwatch = Stopwatch::new(HostClock::new(), pump);
    let mut app = StopwatchApp::new(stopwatch, io::stdout(), config);
    app.redraw()?;

    let result = loop {
        let msg = match main_rx.recv() {
            Ok(msg) => msg,
            Err(_) => break Err(AppError::Disconnected),
        };
        let step = match FromPrimitive::from_usize(msg.id) {
            Some(AppOp::Command) => match Command::from_usize(msg.arg1) {
                Some(cmd) => app.handle_command(cmd, msg.arg2),
                None => {
                    log::error!("unknown command: {}", msg.arg1);
                    Ok(true)
                }
            },
            Some(AppOp::Pump) => app.handle_pump(msg.arg1).map(|_| true),
            Some(AppOp::Quit) => Ok(false),
            None => {
                log::error!("unknown opcode: {:?}", msg);
                Ok(true)
            }
        };
        match step {
            Ok(true) => {}
            Ok(false) => break Ok(()),
            Err(e) => break Err(AppError::from(e)),
        }
    };

    // Clean up
    app.shutdown();
    result
}

fn main() -> ExitCode {
    let config = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::FAILURE;
        }
    };
    if config.show_usage {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }
    if let Err(e) = logger::init(config.log_level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    log::info!("{} PID is {}", APP_NAME, std::process::id());

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::mpsc::Receiver;

    #[derive(Clone, Default)]
    struct TestClock(Rc<Cell<u64>>);

    impl TestClock {
        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl Clock for TestClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    fn app() -> (StopwatchApp<TestClock, Vec<u8>>, TestClock, Receiver<Scalar>) {
        let clock = TestClock::default();
        let (tx, rx) = mpsc::channel();
        let stopwatch = Stopwatch::new(clock.clone(), Pump::with_conn(tx));
        let config = AppConfig {
            clear_screen: false,
            ..AppConfig::default()
        };
        (StopwatchApp::new(stopwatch, Vec::new(), config), clock, rx)
    }

    /// Generation of the most recent pump `Start` sent to the ticker.
    fn armed_generation(rx: &Receiver<Scalar>) -> usize {
        rx.try_iter()
            .filter(|m| m.id == pump::PumpOp::Start as usize)
            .last()
            .map(|m| m.arg2)
            .expect("pump was armed")
    }

    #[test]
    fn test_toggle_runs_and_pauses() {
        let (mut app, clock, rx) = app();
        assert!(app.handle_command(Command::Toggle, 0).unwrap());
        assert!(app.stopwatch.is_running());
        let gen = armed_generation(&rx);

        clock.advance(1_230);
        app.handle_pump(gen).unwrap();
        assert_eq!(app.stopwatch.current_elapsed(), 1_230);

        app.handle_command(Command::Toggle, 0).unwrap();
        assert!(!app.stopwatch.is_running());
        let text = String::from_utf8(app.out.clone()).unwrap();
        assert!(text.contains("00:01.23   PAUSED"));
    }

    #[test]
    fn test_stale_pump_after_pause_is_dropped() {
        let (mut app, clock, rx) = app();
        app.handle_command(Command::Toggle, 0).unwrap();
        let gen = armed_generation(&rx);
        clock.advance(500);
        app.handle_pump(gen).unwrap();

        app.handle_command(Command::Toggle, 0).unwrap();
        clock.advance(500);
        // Tick that was already queued when pause returned
        app.handle_pump(gen).unwrap();
        assert_eq!(app.stopwatch.current_elapsed(), 500);

        // Resume: the old generation stays dead
        app.handle_command(Command::Toggle, 0).unwrap();
        let resumed = armed_generation(&rx);
        assert_ne!(gen, resumed);
        clock.advance(100);
        app.handle_pump(gen).unwrap();
        assert_eq!(app.stopwatch.current_elapsed(), 500);
        app.handle_pump(resumed).unwrap();
        assert_eq!(app.stopwatch.current_elapsed(), 600);
    }

    #[test]
    fn test_lap_ignored_before_first_run() {
        let (mut app, _clock, _rx) = app();
        app.handle_command(Command::Lap, 0).unwrap();
        assert!(app.stopwatch.entries().is_empty());
    }

    #[test]
    fn test_lap_and_delete_by_number() {
        let (mut app, clock, _rx) = app();
        app.handle_command(Command::Toggle, 0).unwrap();
        clock.advance(1_000);
        app.handle_command(Command::Lap, 0).unwrap();
        clock.advance(1_000);
        app.handle_command(Command::Lap, 0).unwrap();

        let entries = app.stopwatch.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].captured_ms, 2_000);
        assert_eq!(entries[1].captured_ms, 1_000);

        app.handle_command(Command::DeleteLap, 1).unwrap();
        assert_eq!(app.stopwatch.entries().len(), 1);
        assert_eq!(app.stopwatch.entries()[0].sequence, 2);

        // Unknown lap number is ignored
        app.handle_command(Command::DeleteLap, 9).unwrap();
        assert_eq!(app.stopwatch.entries().len(), 1);
    }

    #[test]
    fn test_reset_keeps_laps() {
        let (mut app, clock, _rx) = app();
        app.handle_command(Command::Toggle, 0).unwrap();
        clock.advance(800);
        app.handle_command(Command::Lap, 0).unwrap();
        app.handle_command(Command::Reset, 0).unwrap();

        assert_eq!(app.stopwatch.current_elapsed(), 0);
        assert!(!app.stopwatch.is_running());
        assert!(!app.stopwatch.ticker().is_armed());
        assert_eq!(app.stopwatch.entries().len(), 1);

        app.handle_command(Command::ClearLaps, 0).unwrap();
        assert!(app.stopwatch.entries().is_empty());
    }

    #[test]
    fn test_help_dismissed_by_next_command() {
        let (mut app, _clock, _rx) = app();
        app.handle_command(Command::Help, 0).unwrap();
        assert!(app.help_visible);

        // The dismissing command is not executed
        app.handle_command(Command::Toggle, 0).unwrap();
        assert!(!app.help_visible);
        assert!(!app.stopwatch.is_running());

        assert!(!app.handle_command(Command::Quit, 0).unwrap());
    }

    #[test]
    fn test_pump_redraw_is_throttled() {
        let (mut app, clock, rx) = app();
        app.handle_command(Command::Toggle, 0).unwrap();
        let gen = armed_generation(&rx);
        app.out.clear();

        for _ in 0..10 {
            clock.advance(10);
            app.handle_pump(gen).unwrap();
        }
        // 10..=100 ms spans two 100 ms buckets
        let text = String::from_utf8(app.out.clone()).unwrap();
        assert_eq!(text.matches("STOPWATCH").count(), 2);
    }
}
