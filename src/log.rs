use std::{io::IsTerminal, str::FromStr, sync::OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Default)]
pub struct Logger;

pub trait AsLogger {
    fn as_logger(&self) -> &Logger;
}

impl<T: AsLogger> AsLogger for &T {
    fn as_logger(&self) -> &Logger {
        <T as AsLogger>::as_logger(*self)
    }
}

impl AsLogger for Logger {
    fn as_logger(&self) -> &Logger {
        self
    }
}

impl Logger {
    pub fn log(&self, level: Level, fmt: std::fmt::Arguments, module_path: &'static str) {
        const CRATE_MODULE_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), "::");

        let module_rel = module_path
            .strip_prefix(CRATE_MODULE_PREFIX)
            .unwrap_or(module_path);

        let filter = ENV_LOG_FILTER.get_or_init(|| parse_log_env_var().unwrap_or_default());
        if !filter.filter(level) {
            return;
        }

        log_default(level, fmt, module_rel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum LevelFilter {
    Level(Level),
    None,
}

impl LevelFilter {
    fn filter(self, level: Level) -> bool {
        match self {
            LevelFilter::Level(filter) => level >= filter,
            LevelFilter::None => false,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "trace" => Self::Level(Level::Trace),
            "debug" => Self::Level(Level::Debug),
            "info" => Self::Level(Level::Info),
            "warn" => Self::Level(Level::Warn),
            "error" => Self::Level(Level::Error),
            "none" => Self::None,
            _ => return Err(()),
        })
    }
}

struct LogFilter {
    top_level: LevelFilter,
}

impl LogFilter {
    fn filter(&self, level: Level) -> bool {
        self.top_level.filter(level)
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            #[cfg(not(debug_assertions))]
            top_level: LevelFilter::Level(Level::Warn),
            #[cfg(debug_assertions)]
            top_level: LevelFilter::Level(Level::Debug),
        }
    }
}

fn parse_log_env_var() -> Option<LogFilter> {
    let text = std::env::var("WEBVTT_LOG").ok()?;

    Some(LogFilter {
        top_level: text.parse().ok()?,
    })
}

static ENV_LOG_FILTER: OnceLock<LogFilter> = OnceLock::new();

fn log_default(level: Level, fmt: std::fmt::Arguments, module_path: &'static str) {
    let level_str = if std::io::stderr().is_terminal() {
        match level {
            Level::Trace => "\x1b[1;37mtrace\x1b[0m",
            Level::Debug => "\x1b[1;35mdebug\x1b[0m",
            Level::Info => "\x1b[1;34m info\x1b[0m",
            Level::Warn => "\x1b[1;33m warn\x1b[0m",
            Level::Error => "\x1b[1;31merror\x1b[0m",
        }
    } else {
        match level {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => " info",
            Level::Warn => " warn",
            Level::Error => "error",
        }
    };

    let module_space = if module_path.is_empty() { "" } else { " " };
    eprintln!("[webvtt {level_str}{module_space}{module_path}] {fmt}");
}

macro_rules! log {
    ($logger: expr, $level: expr, $($fmt: tt)*) => {
        $crate::log::AsLogger::as_logger(&$logger).log($level, format_args!($($fmt)*), module_path!())
    };
    (@mkmacro $dollar: tt, $name: ident, $level: ident) => {
        #[allow(unused_macros)]
        #[clippy::format_args]
        macro_rules! $name {
            ($dollar logger: expr, $dollar ($dollar rest: tt)*) => {
                $crate::log::log!($dollar logger, $crate::log::Level::$level, $dollar ($dollar rest)*)
            }
        }
    }
}

pub(crate) use log;

log!(@mkmacro $, trace, Trace);
log!(@mkmacro $, debug, Debug);
log!(@mkmacro $, warning, Warn);
log!(@mkmacro $, info, Info);
log!(@mkmacro $, error, Error);

#[rustfmt::skip]
#[allow(unused_imports, clippy::single_component_path_imports)]
pub(crate) use {trace, debug, warning, info, error};
