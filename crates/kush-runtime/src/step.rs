#![forbid(unsafe_code)]

//! Host-driven stepping for a [`Model`].
//!
//! The host pushes events, moves the clock, and calls [`StepProgram::step`];
//! each step drains due timers and queued events, runs every resulting
//! command, and returns the effects produced in order. Nothing runs between
//! steps.
//!
//! # Example
//! ```
//! use core::time::Duration;
//! use kush_runtime::{Cmd, Model, StepProgram};
//!
//! struct Blink;
//!
//! impl Model for Blink {
//!     type Message = &'static str;
//!     type Effect = &'static str;
//!
//!     fn update(&mut self, msg: &'static str) -> Cmd<&'static str, &'static str> {
//!         match msg {
//!             "on" => Cmd::batch(vec![
//!                 Cmd::effect("lit"),
//!                 Cmd::after(Duration::from_secs(3), "off"),
//!             ]),
//!             _ => Cmd::effect("dark"),
//!         }
//!     }
//! }
//!
//! let mut program = StepProgram::new(Blink);
//! program.push_event("on");
//! assert_eq!(program.step().effects, vec!["lit"]);
//! program.advance_time(Duration::from_secs(3));
//! assert_eq!(program.step().effects, vec!["dark"]);
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use crate::clock::{DeterministicClock, TimerQueue};
use crate::program::{Cmd, Model};

/// Upper bound on messages handled in one step. A model that keeps feeding
/// itself messages past this point has the remainder deferred to the next
/// step.
const MAX_MESSAGES_PER_STEP: usize = 4096;

/// What one step produced.
#[derive(Debug)]
pub struct StepResult<E> {
    /// Effects in emission order.
    pub effects: Vec<E>,
    /// Messages handled, including timer deliveries and follow-ups.
    pub processed: usize,
    /// Lines emitted through [`Cmd::Log`].
    pub logs: Vec<String>,
}

impl<E> Default for StepResult<E> {
    fn default() -> Self {
        Self {
            effects: Vec::new(),
            processed: 0,
            logs: Vec::new(),
        }
    }
}

impl<E> StepResult<E> {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.processed == 0 && self.effects.is_empty()
    }
}

/// Event queue, deterministic clock, and timers around a model.
pub struct StepProgram<M: Model> {
    model: M,
    clock: DeterministicClock,
    queue: VecDeque<M::Message>,
    timers: TimerQueue<M::Message>,
    initialized: bool,
}

impl<M: Model> StepProgram<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            clock: DeterministicClock::new(),
            queue: VecDeque::new(),
            timers: TimerQueue::new(),
            initialized: false,
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run [`Model::init`]. Later calls return an idle result.
    pub fn init(&mut self) -> StepResult<M::Effect> {
        let mut result = StepResult::default();
        if self.initialized {
            return result;
        }
        self.initialized = true;
        let cmd = self.model.init();
        let mut follow_ups = Vec::new();
        self.execute(cmd, &mut result, &mut follow_ups);
        self.requeue_front(follow_ups);
        self.drain(&mut result);
        result
    }

    pub fn push_event(&mut self, msg: M::Message) {
        self.queue.push_back(msg);
    }

    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the clock to an absolute time. Moving backwards is ignored.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Earliest pending timer deadline, for hosts that sleep between steps.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Deliver due timers and queued events.
    ///
    /// Initializes the model first if the host has not.
    pub fn step(&mut self) -> StepResult<M::Effect> {
        let mut result = if self.initialized {
            StepResult::default()
        } else {
            self.init()
        };

        let due = self.timers.drain_due(self.clock.now());
        if !due.is_empty() {
            tracing::trace!(target: "kush.step", count = due.len(), "timers due");
        }
        // Timers fire ahead of input that arrived after their deadline.
        for msg in due.into_iter().rev() {
            self.queue.push_front(msg);
        }

        self.drain(&mut result);
        result
    }

    fn drain(&mut self, result: &mut StepResult<M::Effect>) {
        let mut handled = 0;
        while let Some(msg) = self.queue.pop_front() {
            if handled == MAX_MESSAGES_PER_STEP {
                self.queue.push_front(msg);
                tracing::warn!(
                    target: "kush.step",
                    deferred = self.queue.len(),
                    "message budget exhausted, deferring to next step"
                );
                break;
            }
            handled += 1;
            let cmd = self.model.update(msg);
            let mut follow_ups = Vec::new();
            self.execute(cmd, result, &mut follow_ups);
            self.requeue_front(follow_ups);
        }
        result.processed += handled;
    }

    fn execute(
        &mut self,
        cmd: Cmd<M::Message, M::Effect>,
        result: &mut StepResult<M::Effect>,
        follow_ups: &mut Vec<M::Message>,
    ) {
        let now = self.clock.now();
        let timers = &mut self.timers;
        cmd.for_each_leaf(&mut |leaf| match leaf {
            Cmd::Effect(effect) => result.effects.push(effect),
            Cmd::Msg(msg) => follow_ups.push(msg),
            Cmd::After(delay, msg) => timers.schedule(now.saturating_add(delay), msg),
            Cmd::Log(line) => {
                tracing::info!(target: "kush.step", "{line}");
                result.logs.push(line);
            }
            Cmd::None | Cmd::Batch(_) => {}
        });
    }

    fn requeue_front(&mut self, follow_ups: Vec<M::Message>) {
        for msg in follow_ups.into_iter().rev() {
            self.queue.push_front(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every message; `"echo:x"` re-dispatches `"x"` immediately,
    /// `"later:x"` schedules `"x"` one second out.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl Model for Recorder {
        type Message = String;
        type Effect = String;

        fn init(&mut self) -> Cmd<String, String> {
            Cmd::effect("ready".to_string())
        }

        fn update(&mut self, msg: String) -> Cmd<String, String> {
            self.seen.push(msg.clone());
            if let Some(rest) = msg.strip_prefix("echo:") {
                return Cmd::batch(vec![Cmd::msg(rest.to_string()), Cmd::log(format!("echoed {rest}"))]);
            }
            if let Some(rest) = msg.strip_prefix("later:") {
                return Cmd::after(Duration::from_secs(1), rest.to_string());
            }
            Cmd::effect(msg)
        }
    }

    #[test]
    fn first_step_initializes() {
        let mut program = StepProgram::new(Recorder::default());
        assert!(!program.is_initialized());
        program.push_event("a".into());
        let result = program.step();
        assert_eq!(result.effects, vec!["ready".to_string(), "a".to_string()]);
        assert!(program.init().is_idle());
    }

    #[test]
    fn follow_up_messages_jump_the_queue() {
        let mut program = StepProgram::new(Recorder::default());
        program.init();
        program.push_event("echo:b".into());
        program.push_event("c".into());
        let result = program.step();
        assert_eq!(result.effects, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(result.processed, 3);
        assert_eq!(result.logs, vec!["echoed b".to_string()]);
        assert_eq!(program.model().seen, vec!["echo:b", "b", "c"]);
    }

    #[test]
    fn timers_wait_for_host_time() {
        let mut program = StepProgram::new(Recorder::default());
        program.init();
        program.push_event("later:tick".into());
        assert!(program.step().effects.is_empty());
        assert_eq!(program.next_deadline(), Some(Duration::from_secs(1)));

        program.advance_time(Duration::from_millis(999));
        assert!(program.step().effects.is_empty());

        program.advance_time(Duration::from_millis(1));
        program.push_event("input".into());
        let result = program.step();
        assert_eq!(result.effects, vec!["tick".to_string(), "input".to_string()]);
        assert_eq!(program.pending_timers(), 0);
    }

    #[test]
    fn set_time_cannot_rewind_timers() {
        let mut program = StepProgram::new(Recorder::default());
        program.init();
        program.set_time(Duration::from_secs(5));
        program.push_event("later:x".into());
        program.step();
        program.set_time(Duration::from_secs(1));
        assert_eq!(program.now(), Duration::from_secs(5));
        program.set_time(Duration::from_secs(6));
        assert_eq!(program.step().effects, vec!["x".to_string()]);
    }
}
