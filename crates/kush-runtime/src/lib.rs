#![forbid(unsafe_code)]

//! Kush page runtime.
//!
//! Turns page events into typed effects. The host (browser glue or the CLI)
//! pushes [`PageEvent`]s, advances time explicitly, and applies the
//! [`Effect`]s the page model emits; nothing here blocks, spawns threads, or
//! reads the wall clock.
//!
//! # Key Components
//!
//! - [`Model`] / [`Cmd`] - Elm-style state machine contract
//! - [`StepProgram`] - host-driven event queue, deterministic clock, timers
//! - [`PageModel`] - the storefront page: filter, search, nav tracking,
//!   theme, likes, orders, contact form
//! - [`StoreConfig`] - policy-as-data configuration with validation

pub mod clock;
pub mod config;
pub mod effect;
pub mod event;
pub mod http;
pub mod page;
pub mod program;
pub mod step;

pub use clock::{DeterministicClock, TimerQueue};
pub use config::{ConfigError, StoreConfig};
pub use effect::{Control, Effect, FocusTarget, Notice, NoticeId, NoticeKind};
pub use event::PageEvent;
pub use http::{HttpFailure, HttpMethod, HttpRequest, HttpResponse, RequestId};
pub use page::PageModel;
pub use program::{Cmd, Model};
pub use step::{StepProgram, StepResult};
