use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use num_traits::ToPrimitive;

use crate::error::CommandError;
use crate::{AppOp, Scalar};

/// Operations the user can request. Carried in `arg1` of an
/// `AppOp::Command` message; `DeleteLap` puts the lap number in `arg2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum Command {
    Toggle = 0,
    Lap,
    Reset,
    ClearLaps,
    DeleteLap,
    Help,
    Quit,
}

impl Command {
    pub fn scalar(self, arg: usize) -> Scalar {
        Scalar::new(
            AppOp::Command.to_usize().unwrap_or(usize::MAX),
            self.to_usize().unwrap_or(usize::MAX),
            arg,
        )
    }
}

/// Parse one input line into a command message.
pub fn parse_line(line: &str) -> Result<Scalar, CommandError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        // Bare Enter toggles, like the play/pause button
        return Ok(Command::Toggle.scalar(0));
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "s" | "start" | "pause" | "stop" | "space" => Command::Toggle,
        "l" | "lap" => Command::Lap,
        "r" | "reset" => Command::Reset,
        "c" | "clear" => Command::ClearLaps,
        "d" | "del" | "delete" => {
            let n = words.next().ok_or(CommandError::MissingLapNumber)?;
            let n = n
                .trim_start_matches('#')
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| CommandError::BadLapNumber(n.to_string()))?;
            return Ok(Command::DeleteLap.scalar(n as usize));
        }
        "h" | "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(cmd.scalar(0))
}

/// Forward parsed lines from `reader` to the main loop until EOF, then
/// ask the main loop to quit.
pub fn read_commands<R: BufRead>(reader: R, main_conn: &Sender<Scalar>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("input read failed: {}", e);
                break;
            }
        };
        match parse_line(&line) {
            Ok(msg) => {
                if main_conn.send(msg).is_err() {
                    return;
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }
    main_conn
        .send(Scalar::new(AppOp::Quit.to_usize().unwrap_or(usize::MAX), 0, 0))
        .ok();
}

pub fn spawn_stdin_reader(main_conn: Sender<Scalar>) -> io::Result<()> {
    thread::Builder::new()
        .name("input".into())
        .spawn(move || read_commands(io::stdin().lock(), &main_conn))?;
    Ok(())
}
