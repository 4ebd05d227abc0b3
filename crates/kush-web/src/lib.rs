#![forbid(unsafe_code)]

//! Browser runner for the Kush storefront page.
//!
//! This crate provides `PageRunner`, a `wasm-bindgen`-exported struct
//! (wasm32 only) wrapping
//! `kush_runtime::StepProgram<PageModel<_>>` for host-driven execution:
//!
//! - **Host-driven I/O**: the page script pushes DOM events as JSON and
//!   performs the effects (class toggles, scrolling, `fetch`) itself.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The runner core and event parser are plain Rust and are tested natively.

pub mod input_parser;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PageRunner, markup};

pub use input_parser::{InputParseError, parse_page_event};
pub use runner_core::{DynStorage, RunnerCore, RunnerStep};
