#![forbid(unsafe_code)]

//! Elm-style model contract.
//!
//! A [`Model`] owns page state and reacts to messages by returning a
//! [`Cmd`]: effects for the host, follow-up messages, or messages scheduled
//! for later. The model itself never performs I/O.

use core::time::Duration;

/// Application state and behaviour.
pub trait Model {
    /// Input messages (page events plus internal follow-ups).
    type Message;
    /// Instructions for the host.
    type Effect;

    /// Called once before the first message.
    fn init(&mut self) -> Cmd<Self::Message, Self::Effect> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message, Self::Effect>;
}

/// Work requested by a model.
#[derive(Debug)]
pub enum Cmd<M, E> {
    /// No operation.
    None,
    /// Several commands, executed in order.
    Batch(Vec<Cmd<M, E>>),
    /// Deliver a message before any queued input.
    Msg(M),
    /// Deliver a message once the host clock has advanced by the duration.
    After(Duration, M),
    /// Hand an effect to the host.
    Effect(E),
    /// Hand a log line to the host (`StepResult::logs`), also traced on
    /// `kush.step`.
    Log(String),
}

impl<M, E> Cmd<M, E> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn after(delay: Duration, m: M) -> Self {
        Self::After(delay, m)
    }

    #[inline]
    pub fn effect(e: E) -> Self {
        Self::Effect(e)
    }

    #[inline]
    pub fn log(line: impl Into<String>) -> Self {
        Self::Log(line.into())
    }

    /// Combine commands, dropping no-ops and unwrapping singletons.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Depth-first visit of the leaf commands, in execution order.
    pub fn for_each_leaf(self, f: &mut impl FnMut(Self)) {
        match self {
            Self::None => {}
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }

    /// All effects in execution order, discarding everything else.
    pub fn into_effects(self) -> Vec<E> {
        let mut out = Vec::new();
        self.for_each_leaf(&mut |cmd| {
            if let Self::Effect(e) = cmd {
                out.push(e);
            }
        });
        out
    }
}
