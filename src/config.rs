use log::LevelFilter;

use crate::error::AppError;

const DEFAULT_REDRAW_MS: u64 = 100;

pub const USAGE: &str = "\
usage: stopwatch [options]

  --redraw-ms <n>   redraw at most every n ms while running (default 100)
  --no-clear        append frames instead of clearing the screen
  -v, --verbose     debug logging
  -q, --quiet       warnings and errors only
  -h, --help        show this text";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub redraw_ms: u64,
    pub clear_screen: bool,
    pub log_level: LevelFilter,
    pub show_usage: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redraw_ms: DEFAULT_REDRAW_MS,
            clear_screen: true,
            log_level: LevelFilter::Info,
            show_usage: false,
        }
    }
}

impl AppConfig {
    pub fn from_args<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--redraw-ms" => {
                    let value = args.next().ok_or_else(|| invalid(&arg, "missing value"))?;
                    config.redraw_ms = value
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| invalid(&arg, &e.to_string()))?;
                }
                "--no-clear" => config.clear_screen = false,
                "-v" | "--verbose" => config.log_level = LevelFilter::Debug,
                "-q" | "--quiet" => config.log_level = LevelFilter::Warn,
                "-h" | "--help" => config.show_usage = true,
                _ => return Err(invalid(&arg, "unrecognized option")),
            }
        }
        Ok(config)
    }
}

fn invalid(flag: &str, reason: &str) -> AppError {
    AppError::InvalidArgument {
        flag: flag.to_string(),
        reason: reason.to_string(),
    }
}
