//! Progress reporting and verbosity.
//!
//! [`Notifier`] reports the user-facing progress of a sync, one line per stage.
//! [`VerbosityLevel`] maps the CLI's `-v` count onto an `env_logger` filter and
//! decides where those lines go:
//! - [`VerbosityLevel::Quiet`] → plain lines on the notifier's writer, logs at warn and above.
//! - [`VerbosityLevel::Info`]/[`VerbosityLevel::Debug`]/[`VerbosityLevel::Trace`] → lines become
//!   info-level log records next to the other text logs.

use log::{info, LevelFilter};
use std::cell::RefCell;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerbosityLevel {
    Quiet = 0, // Plain progress lines, no text logs
    Info = 1,  // Text logs at info level
    Debug = 2, // Text logs at debug level
    Trace = 3, // Text logs at trace level
}

impl From<u8> for VerbosityLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Info,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

impl VerbosityLevel {
    pub fn to_log_level(self) -> LevelFilter {
        match self {
            VerbosityLevel::Quiet => LevelFilter::Warn,
            VerbosityLevel::Info => LevelFilter::Info,
            VerbosityLevel::Debug => LevelFilter::Debug,
            VerbosityLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub struct Notifier {
    verbosity: VerbosityLevel,
    out: RefCell<Box<dyn Write>>,
}

impl Notifier {
    /// Notifier printing to standard output.
    pub fn new(verbosity_level: u8) -> Self {
        Self::with_writer(verbosity_level, io::stdout())
    }

    pub fn with_writer(verbosity_level: u8, out: impl Write + 'static) -> Self {
        Self {
            verbosity: VerbosityLevel::from(verbosity_level),
            out: RefCell::new(Box::new(out)),
        }
    }

    /// Discards progress lines.
    pub fn silent() -> Self {
        Self::with_writer(0, io::sink())
    }

    /// Reports one progress line.
    pub fn step(&self, message: &str) {
        match self.verbosity {
            VerbosityLevel::Quiet => {
                let mut out = self.out.borrow_mut();
                // A closed stdout must not abort a sync halfway through.
                let _ = writeln!(out, "{}", message).and_then(|_| out.flush());
            }
            _ => info!("{}", message),
        }
    }

    pub fn verbosity_level(&self) -> VerbosityLevel {
        self.verbosity
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(0)
    }
}
