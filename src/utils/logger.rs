use chrono::Local;
use serde::Deserialize;
use std::fmt::Arguments;
use std::sync::atomic::{AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

pub struct Logger;

impl Logger {
    /// Drops every message below `level` from now on.
    pub fn set_level(level: LogLevel) {
        MIN_LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(level: LogLevel) -> bool {
        level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
    }

    pub fn info(args: Arguments) {
        if Logger::enabled(LogLevel::Info) {
            let local = Local::now().format("%d/%m/%Y %H:%M:%S");
            println!("[INFO ] [{local}] {args}");
        }
    }

    pub fn debug(args: Arguments) {
        if Logger::enabled(LogLevel::Debug) {
            let local = Local::now().format("%d/%m/%Y %H:%M:%S");
            println!("[DEBUG] [{local}] {args}");
        }
    }

    pub fn warn(args: Arguments) {
        if Logger::enabled(LogLevel::Warn) {
            let local = Local::now().format("%d/%m/%Y %H:%M:%S");
            eprintln!("[WARN ] [{local}] {args}");
        }
    }

    pub fn error(args: Arguments) {
        let local = Local::now().format("%d/%m/%Y %H:%M:%S");
        eprintln!("[ERROR] [{local}] {args}");
    }
}

#[macro_export]
macro_rules! logger {
    (INFO, $($arg:tt)*) => {
        $crate::utils::logger::Logger::info(format_args!($($arg)*))
    };
    (DEBUG, $($arg:tt)*) => {
        $crate::utils::logger::Logger::debug(format_args!($($arg)*))
    };
    (WARN, $($arg:tt)*) => {
        $crate::utils::logger::Logger::warn(format_args!($($arg)*))
    };
    (ERROR, $($arg:tt)*) => {
        $crate::utils::logger::Logger::error(format_args!($($arg)*))
    };
}
