//! The quiz-in-progress state machine.
//!
//! A [`Session`] is idle until [`Session::start`] seeds it with questions, runs
//! until the last question has been answered and advanced past, and then stays
//! completed until it is started again or reset. All countdown timers are
//! owned here and cancelled whenever the run they belong to is replaced.

use std::time::Duration;

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::error::SessionError;
use super::shuffle::shuffled;
use super::timer::{AdvanceDelay, Scheduler, TimerEvent, TimerKind, TimerQueue, TimerToken, GRACE, TICK};
use super::{present, PresentedQuestion, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// Outcome of [`Session::select_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Answered { correct: bool, correct_index: usize },
    /// Feedback is already showing, or there is no question to answer.
    Ignored,
}

/// Something a host may want to show as the clock moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick { remaining: u64 },
    Advanced { index: usize },
    Completed { score: usize, total: usize },
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub index: usize,
    pub total: usize,
    pub question: Option<PresentedQuestion>,
    pub selected: Option<usize>,
    pub awaiting_advance: bool,
    pub score: usize,
    pub remaining_secs: u64,
}

pub struct Session<S: Scheduler = TimerQueue> {
    questions: Vec<PresentedQuestion>,
    current: usize,
    selected: Option<usize>,
    awaiting_advance: bool,
    score: usize,
    completed: bool,
    remaining_secs: u64,
    delay: AdvanceDelay,
    generation: u64,
    active_timer: Option<TimerToken>,
    scheduler: S,
    rng: StdRng,
}

impl Session<TimerQueue> {
    pub fn new(delay: AdvanceDelay) -> Self {
        Self::with_scheduler(delay, TimerQueue::new(), StdRng::from_entropy())
    }

    /// A session whose shuffles are reproducible.
    pub fn with_seed(delay: AdvanceDelay, seed: u64) -> Self {
        Self::with_scheduler(delay, TimerQueue::new(), StdRng::seed_from_u64(seed))
    }
}

impl Default for Session<TimerQueue> {
    fn default() -> Self {
        Self::new(AdvanceDelay::default())
    }
}

impl<S: Scheduler> Session<S> {
    pub fn with_scheduler(delay: AdvanceDelay, scheduler: S, rng: StdRng) -> Self {
        Self {
            questions: Vec::new(),
            current: 0,
            selected: None,
            awaiting_advance: false,
            score: 0,
            completed: false,
            remaining_secs: 0,
            delay,
            generation: 0,
            active_timer: None,
            scheduler,
            rng,
        }
    }

    /// Shuffles `questions` and each question's answers, and opens the first one.
    ///
    /// Any previous run is discarded, including its pending timer.
    pub fn start(&mut self, questions: &[Question]) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }

        self.cancel_timer();
        self.generation += 1;

        let order = shuffled(questions, &mut self.rng);
        self.questions = order
            .iter()
            .map(|question| present(question, &mut self.rng))
            .collect();
        self.current = 0;
        self.selected = None;
        self.awaiting_advance = false;
        self.score = 0;
        self.completed = false;

        info!(
            "Quiz started with {} questions (run {})",
            self.questions.len(),
            self.generation
        );
        Ok(())
    }

    /// Records the answer for the current question and starts the countdown.
    ///
    /// Only the first selection per question counts.
    pub fn select_answer(&mut self, index: usize) -> Result<Selection, SessionError> {
        if self.awaiting_advance || self.phase() != Phase::Running {
            debug!("Ignoring answer {} while not accepting input", index);
            return Ok(Selection::Ignored);
        }

        let question = &self.questions[self.current];
        if index >= question.answers.len() {
            let len = question.answers.len();
            error!(
                "Answer index {} out of range for question {} with {} answers",
                index, self.current, len
            );
            return Err(SessionError::InvalidAnswerIndex { index, len });
        }

        let correct = question.is_correct(index);
        let correct_index = question.correct_index;
        self.selected = Some(index);
        self.awaiting_advance = true;
        if correct {
            self.score += 1;
        }

        self.remaining_secs = self.delay.secs();
        self.arm(TICK, TimerKind::Tick);

        debug!(
            "Question {} answered with {} ({}), score {}",
            self.current,
            index,
            if correct { "correct" } else { "wrong" },
            self.score
        );
        Ok(Selection::Answered {
            correct,
            correct_index,
        })
    }

    /// Moves past the answered question, completing the run after the last one.
    ///
    /// Does nothing unless an answer is currently being shown.
    pub fn advance(&mut self) -> Option<SessionEvent> {
        if !self.awaiting_advance || self.phase() != Phase::Running {
            return None;
        }

        self.cancel_timer();

        if self.current + 1 == self.questions.len() {
            self.completed = true;
            info!("Quiz completed: {}/{}", self.score, self.questions.len());
            return Some(SessionEvent::Completed {
                score: self.score,
                total: self.questions.len(),
            });
        }

        self.current += 1;
        self.selected = None;
        self.awaiting_advance = false;
        debug!("Advanced to question {}", self.current);
        Some(SessionEvent::Advanced {
            index: self.current,
        })
    }

    /// Drops the current run and returns to idle.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        self.questions.clear();
        self.current = 0;
        self.selected = None;
        self.awaiting_advance = false;
        self.score = 0;
        self.completed = false;
        debug!("Session reset");
    }

    /// Lets `elapsed` pass on the session clock and handles every timer that
    /// comes due, in order.
    pub fn elapse(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let until = self.scheduler.now() + elapsed;
        let mut events = Vec::new();

        while let Some((token, event)) = self.scheduler.pop_due(until) {
            if self.active_timer != Some(token) || event.generation != self.generation {
                debug!("Dropping stale timer {:?}", event);
                continue;
            }
            self.active_timer = None;

            match event.kind {
                TimerKind::Tick => {
                    self.remaining_secs = self.remaining_secs.saturating_sub(1);
                    events.push(SessionEvent::Tick {
                        remaining: self.remaining_secs,
                    });
                    if self.remaining_secs > 0 {
                        self.arm(TICK, TimerKind::Tick);
                    } else if self.awaiting_advance {
                        self.arm(GRACE, TimerKind::Advance);
                    }
                }
                TimerKind::Advance => events.extend(self.advance()),
            }
        }

        self.scheduler.advance_to(until);
        events
    }

    /// Time left until the next timer fires, if one is pending.
    pub fn until_next_timer(&self) -> Option<Duration> {
        self.scheduler
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.scheduler.now()))
    }

    pub fn set_delay(&mut self, delay: AdvanceDelay) {
        self.delay = delay;
    }

    pub fn delay(&self) -> AdvanceDelay {
        self.delay
    }

    pub fn phase(&self) -> Phase {
        if self.questions.is_empty() {
            Phase::Idle
        } else if self.completed {
            Phase::Completed
        } else {
            Phase::Running
        }
    }

    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        match self.phase() {
            Phase::Idle => None,
            _ => self.questions.get(self.current),
        }
    }

    pub fn questions(&self) -> &[PresentedQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn awaiting_advance(&self) -> bool {
        self.awaiting_advance
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Score as a rounded percentage of the question count.
    pub fn percentage(&self) -> Option<u32> {
        if self.questions.is_empty() {
            return None;
        }
        let ratio = self.score as f64 / self.questions.len() as f64;
        Some((ratio * 100.0).round() as u32)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase(),
            index: self.current,
            total: self.questions.len(),
            question: self.current_question().cloned(),
            selected: self.selected,
            awaiting_advance: self.awaiting_advance,
            score: self.score,
            remaining_secs: self.remaining_secs,
        }
    }

    fn arm(&mut self, delay: Duration, kind: TimerKind) {
        let event = TimerEvent {
            generation: self.generation,
            kind,
        };
        self.active_timer = Some(self.scheduler.schedule_after(delay, event));
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.active_timer.take() {
            self.scheduler.cancel(token);
        }
        self.remaining_secs = 0;
    }
}
