//! Voting window timing.
//!
//! The window comes from the off-chain proposal (its `start` and `end`
//! payload fields), not from the registry. All instants are seconds since
//! the unix epoch.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingWindow {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl VotingWindow {
    pub fn new(start: u64, end: u64) -> Self {
        VotingWindow {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unknown() -> Self {
        VotingWindow::default()
    }

    /// Both bounds are available.
    pub fn is_known(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn has_started(&self, now: u64) -> bool {
        matches!(self.start, Some(start) if now >= start)
    }

    /// The end instant itself still belongs to the window.
    pub fn has_ended(&self, now: u64) -> bool {
        matches!(self.end, Some(end) if now > end)
    }

    pub fn timing(&self, now: u64) -> WindowTiming {
        if !self.is_known() {
            WindowTiming::Unknown
        } else if !self.has_started(now) {
            WindowTiming::NotStarted
        } else if !self.has_ended(now) {
            WindowTiming::Open
        } else {
            WindowTiming::Ended
        }
    }
}

/// Where `now` sits relative to a voting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTiming {
    Unknown,
    NotStarted,
    Open,
    Ended,
}

/// Source of the current time, in seconds since the unix epoch.
pub trait Clock {
    fn now(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A clock stuck at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}
