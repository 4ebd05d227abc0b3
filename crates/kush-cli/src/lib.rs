#![forbid(unsafe_code)]

//! `kush`: the storefront page logic as a command-line tool.
//!
//! The CLI is a native host for `kush-runtime`: it reads page snapshots
//! from files, performs request effects with a blocking `reqwest` client,
//! and prints effects and results as JSON on stdout.

pub mod cli;
pub mod error;
pub mod logging;
pub mod order;
pub mod query;
pub mod remote;
pub mod replay;
pub mod session;
pub mod transport;
pub mod util;

pub use cli::{Cli, Commands, run, run_from_env, run_with_output};
pub use error::{CliError, Result};
pub use session::Session;
pub use transport::Transport;
