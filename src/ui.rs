use std::io::{self, Write};

use timer_core::{format_elapsed, LapEntry};

const HELP_TEXT: &str = "\
STOPWATCH HELP

  s / Enter   Start or pause
  l           Record lap
  r           Reset timer (laps are kept)
  c           Clear all laps
  d <n>       Delete lap n
  h           This help
  q           Quit";

/// What the screen shows; borrowed from the app on every redraw.
pub struct Frame<'a> {
    pub elapsed_ms: u64,
    pub running: bool,
    pub lap_allowed: bool,
    pub laps: &'a [LapEntry],
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[2J\x1b[H")
}

pub fn draw_stopwatch<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    let status = if frame.running {
        "RUNNING"
    } else if frame.elapsed_ms > 0 {
        "PAUSED"
    } else {
        "STOPPED"
    };
    writeln!(out, "STOPWATCH")?;
    writeln!(out)?;
    writeln!(out, "  {}   {}", format_elapsed(frame.elapsed_ms), status)?;
    writeln!(out)?;

    // Lap list (most recent first)
    for lap in frame.laps {
        writeln!(out, "  Lap {:2}  {}", lap.sequence, format_elapsed(lap.captured_ms))?;
    }
    if !frame.laps.is_empty() {
        writeln!(out)?;
    }

    let toggle = if frame.running { "s pause" } else { "s start" };
    let lap = if frame.lap_allowed { "l lap" } else { "-" };
    writeln!(out, "{}  {}  r reset  c clear  d <n> delete  h help  q quit", toggle, lap)?;
    out.flush()
}

pub fn draw_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", HELP_TEXT)?;
    writeln!(out)?;
    writeln!(out, "Any command dismisses this screen.")?;
    out.flush()
}
