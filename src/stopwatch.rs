use chrono::Utc;
use serde::Serialize;

use crate::error::{invalid, Result};

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Formats a duration as `HH:MM:SS.cc` (hundredths of a second)
///
/// # Examples
///
/// ```
/// use toolshed::stopwatch::format_time;
///
/// assert_eq!(format_time(3_723_456), "01:02:03.45");
/// ```
pub fn format_time(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let hundredths = (milliseconds % 1000) / 10;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, hundredths)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchAction {
    Start,
    Pause,
    Reset,
    /// Records the elapsed time; ignored while paused
    Lap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stopwatch {
    /// Time accumulated before the current run
    accumulated: u64,
    started_at: Option<u64>,
    /// Lap times, newest first
    laps: Vec<u64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(mut self, action: StopwatchAction, now: u64) -> Self {
        match action {
            StopwatchAction::Start => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
            }
            StopwatchAction::Pause => {
                if self.started_at.is_some() {
                    self.accumulated = self.elapsed(now);
                    self.started_at = None;
                }
            }
            StopwatchAction::Reset => self = Stopwatch::default(),
            StopwatchAction::Lap => {
                if self.is_running() {
                    let elapsed = self.elapsed(now);
                    self.laps.insert(0, elapsed);
                }
            }
        }
        self
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: u64) -> u64 {
        self.accumulated + self.started_at.map_or(0, |start| now.saturating_sub(start))
    }

    pub fn laps(&self) -> &[u64] {
        &self.laps
    }
}

pub const MAX_HOURS: u64 = 99;
pub const MAX_MINUTES: u64 = 59;
pub const MAX_SECONDS: u64 = 59;

/// A countdown timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    duration: u64,
    end_at: Option<u64>,
    /// Remaining time frozen by `stop`
    remaining_when_stopped: u64,
}

impl Countdown {
    /// Starts a countdown of the given length
    ///
    /// # Errors
    /// `ValidationError` if a field is out of range (hours 0-99, minutes and
    /// seconds 0-59) or the total duration is zero
    pub fn start(hours: u64, minutes: u64, seconds: u64, now: u64) -> Result<Self> {
        for (value, max, unit) in [
            (hours, MAX_HOURS, "hours"),
            (minutes, MAX_MINUTES, "minutes"),
            (seconds, MAX_SECONDS, "seconds"),
        ] {
            if value > max {
                return Err(invalid(format!("{} must be between 0 and {}", unit, max)));
            }
        }
        let total_seconds = hours * 3600 + minutes * 60 + seconds;
        if total_seconds == 0 {
            return Err(invalid("please set a valid time"));
        }
        let duration = total_seconds * 1000;
        Ok(Countdown {
            duration,
            end_at: Some(now.saturating_add(duration)),
            remaining_when_stopped: duration,
        })
    }

    pub fn stop(mut self, now: u64) -> Self {
        self.remaining_when_stopped = self.remaining(now);
        self.end_at = None;
        self
    }

    /// Resumes a stopped countdown
    pub fn resume(mut self, now: u64) -> Self {
        if self.end_at.is_none() {
            self.end_at = Some(now.saturating_add(self.remaining_when_stopped));
        }
        self
    }

    pub fn is_running(&self) -> bool {
        self.end_at.is_some()
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining(&self, now: u64) -> u64 {
        match self.end_at {
            Some(end) => end.saturating_sub(now),
            None => self.remaining_when_stopped,
        }
    }

    pub fn finished(&self, now: u64) -> bool {
        self.remaining(now) == 0
    }
}
