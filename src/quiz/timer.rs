//! Countdown scheduling on a virtual clock.
//!
//! Nothing here sleeps. A [`Scheduler`] only orders delayed events; whoever
//! owns it moves the clock forward and handles the events that come due.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::error::SessionError;

/// Length of one countdown step.
pub const TICK: Duration = Duration::from_secs(1);

/// Pause between the countdown reaching zero and the automatic advance.
pub const GRACE: Duration = Duration::from_millis(500);

/// Seconds the feedback stays up before moving to the next question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceDelay(u64);

impl AdvanceDelay {
    pub const MIN: u64 = 2;
    pub const MAX: u64 = 15;

    pub fn secs(self) -> u64 {
        self.0
    }
}

impl Default for AdvanceDelay {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u64> for AdvanceDelay {
    type Error = SessionError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(SessionError::InvalidDelay {
                got: secs,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }
}

impl fmt::Display for AdvanceDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Handle for cancelling a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One second of the countdown has passed.
    Tick,
    /// The grace delay is over, move on.
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    /// Quiz run that armed the timer.
    pub generation: u64,
    pub kind: TimerKind,
}

pub trait Scheduler {
    /// Current position of the clock.
    fn now(&self) -> Duration;

    fn schedule_after(&mut self, delay: Duration, event: TimerEvent) -> TimerToken;

    /// Returns false if the token already fired or was cancelled.
    fn cancel(&mut self, token: TimerToken) -> bool;

    fn next_deadline(&self) -> Option<Duration>;

    /// Removes the earliest event due at or before `until` and moves the
    /// clock to its deadline.
    fn pop_due(&mut self, until: Duration) -> Option<(TimerToken, TimerEvent)>;

    /// Moves the clock forward. Never moves it back.
    fn advance_to(&mut self, now: Duration);
}

/// Single-threaded [`Scheduler`] backed by an ordered queue.
///
/// Events with the same deadline fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerToken), TimerEvent>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_after(&mut self, delay: Duration, event: TimerEvent) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now + delay, token), event);
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        let key = self.queue.keys().find(|(_, t)| *t == token).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    fn pop_due(&mut self, until: Duration) -> Option<(TimerToken, TimerEvent)> {
        let (&(deadline, token), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        let event = self.queue.remove(&(deadline, token))?;
        self.now = self.now.max(deadline);
        Some((token, event))
    }

    fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}
