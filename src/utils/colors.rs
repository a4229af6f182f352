//! ANSI color helper utilities for terminal output.

use crate::core::risk::LoadLevel;
use crate::models::alert::AlertKind;
use crate::models::ticket::TicketStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Workload alerts in yellow, at-risk alerts in red.
pub fn color_for_alert(kind: AlertKind) -> &'static str {
    if kind.is_workload() { YELLOW } else { RED }
}

pub fn color_for_status(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::ToDo => RESET,
        TicketStatus::InProgress => CYAN,
        TicketStatus::DoneLike => GREEN,
        TicketStatus::Other => MAGENTA,
    }
}

pub fn color_for_load(level: LoadLevel) -> &'static str {
    match level {
        LoadLevel::Overloaded => RED,
        LoadLevel::HighLoad => YELLOW,
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
