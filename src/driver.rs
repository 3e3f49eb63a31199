//! Drives a session's countdown from real time.

use std::time::Duration;

use tokio::time::Instant;

use crate::quiz::{Scheduler, Session, SessionEvent};

/// Feeds wall-clock time into a [`Session`].
///
/// The session clock only moves when [`Pacer::sync`] or [`Pacer::wait`] runs,
/// so call `sync` before handing the session any input.
#[derive(Debug)]
pub struct Pacer {
    synced_at: Instant,
}

impl Pacer {
    pub fn new() -> Self {
        Self {
            synced_at: Instant::now(),
        }
    }

    /// Applies the time passed since the last sync.
    pub fn sync<S: Scheduler>(&mut self, session: &mut Session<S>) -> Vec<SessionEvent> {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.synced_at);
        self.synced_at = now;
        session.elapse(elapsed)
    }

    /// Sleeps until the session's next timer is due and fires it.
    ///
    /// Never returns while no timer is pending. Safe to drop mid-sleep, for
    /// example as a branch of `tokio::select!`.
    pub async fn wait<S: Scheduler>(&mut self, session: &mut Session<S>) -> Vec<SessionEvent> {
        loop {
            let Some(delay) = session.until_next_timer() else {
                return std::future::pending().await;
            };
            tokio::time::sleep_until(self.synced_at + delay).await;

            let events = self.sync(session);
            if !events.is_empty() {
                return events;
            }
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets a session run on its own until its timers are exhausted.
pub async fn run_timers<S: Scheduler>(session: &mut Session<S>) -> Vec<SessionEvent> {
    let mut pacer = Pacer::new();
    let mut events = Vec::new();
    while session.until_next_timer().is_some() {
        events.extend(pacer.wait(session).await);
    }
    events
}

/// Sleeps for `duration` while keeping the session clock in step.
pub async fn idle_for<S: Scheduler>(
    pacer: &mut Pacer,
    session: &mut Session<S>,
    duration: Duration,
) -> Vec<SessionEvent> {
    tokio::time::sleep(duration).await;
    pacer.sync(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{AdvanceDelay, Phase, Question};

    fn single_question() -> Vec<Question> {
        vec![Question::new(
            "Capital of France?",
            vec!["Paris".into(), "London".into(), "Berlin".into(), "Madrid".into()],
        )]
    }

    #[tokio::test(start_paused = true)]
    async fn wait_follows_the_countdown() {
        let mut session = Session::with_seed(AdvanceDelay::try_from(2).unwrap(), 5);
        session.start(&single_question()).unwrap();
        let mut pacer = Pacer::new();
        session.select_answer(0).unwrap();

        let started = Instant::now();
        assert_eq!(
            pacer.wait(&mut session).await,
            vec![SessionEvent::Tick { remaining: 1 }]
        );
        assert_eq!(started.elapsed(), Duration::from_secs(1));

        assert_eq!(
            pacer.wait(&mut session).await,
            vec![SessionEvent::Tick { remaining: 0 }]
        );
        let events = pacer.wait(&mut session).await;
        assert!(matches!(events.as_slice(), [SessionEvent::Completed { total: 1, .. }]));
        assert_eq!(started.elapsed(), Duration::from_millis(2500));
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_loses_no_time() {
        let mut session = Session::with_seed(AdvanceDelay::default(), 5);
        session.start(&single_question()).unwrap();
        let mut pacer = Pacer::new();
        session.select_answer(0).unwrap();

        let timeout = tokio::time::timeout(Duration::from_millis(700), pacer.wait(&mut session)).await;
        assert!(timeout.is_err());

        assert!(pacer.sync(&mut session).is_empty());
        assert_eq!(session.until_next_timer(), Some(Duration::from_millis(300)));
    }

    #[tokio::test(start_paused = true)]
    async fn run_timers_finishes_a_single_question_quiz() {
        let mut session = Session::with_seed(AdvanceDelay::default(), 5);
        session.start(&single_question()).unwrap();
        session.select_answer(0).unwrap();

        let events = run_timers(&mut session).await;
        assert_eq!(events.len(), 4);
        assert!(session.is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_time_after_reset_is_harmless() {
        let mut session = Session::with_seed(AdvanceDelay::default(), 5);
        session.start(&single_question()).unwrap();
        let mut pacer = Pacer::new();
        session.select_answer(0).unwrap();
        session.reset();

        assert!(idle_for(&mut pacer, &mut session, Duration::from_secs(30))
            .await
            .is_empty());
        assert_eq!(session.phase(), Phase::Idle);
    }
}
