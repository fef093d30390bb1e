//! Screen state shared by overlapping runs.
//!
//! Each run takes a [`RunTicket`] before it starts. Only the most recently
//! issued ticket may change what is shown, so a slow earlier run cannot
//! overwrite a newer result.

use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};
use tracing::debug;

use crate::{
    LookupError,
    model::SunReport,
    render::{self, Notice},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Idle,
    Report(String),
    Error(String),
}

impl Screen {
    pub fn text(&self) -> &str {
        match self {
            Screen::Idle => "",
            Screen::Report(text) | Screen::Error(text) => text.as_str(),
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    latest: AtomicU64,
    screen: Mutex<Screen>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self { latest: AtomicU64::new(0), screen: Mutex::new(Screen::Idle) }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RunTicket {
        RunTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Replace the screen if `ticket` is still the latest run. Returns whether it was shown.
    pub fn present(&self, ticket: RunTicket, screen: Screen) -> bool {
        let mut current = self.screen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.is_current(ticket) {
            debug!(run = ticket.0, "discarding stale result");
            return false;
        }
        *current = screen;
        true
    }

    /// Present the outcome of a run. Alerts are handed back to the caller
    /// instead of touching the screen.
    pub fn present_outcome(
        &self,
        ticket: RunTicket,
        outcome: &Result<SunReport, LookupError>,
    ) -> Option<String> {
        match outcome {
            Ok(report) => {
                self.present(ticket, Screen::Report(render::render_report(report)));
                None
            }
            Err(err) => match render::notice_for(err) {
                Notice::Alert(message) => self.is_current(ticket).then_some(message),
                Notice::DashboardError(message) => {
                    self.present(ticket, Screen::Error(render::render_error(&message)));
                    None
                }
            },
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}
