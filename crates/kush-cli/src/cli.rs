#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::logging;
use crate::order::{OrderLinkArgs, run_order_link};
use crate::query::{FilterArgs, SearchArgs, TrackArgs, run_filter, run_search, run_track};
use crate::remote::{ContactArgs, LikeArgs, run_contact, run_like};
use crate::replay::{ReplayArgs, run_replay};
use crate::util::{load_config, write_json_line};

#[derive(Debug, Parser)]
#[command(
    name = "kush",
    about = "Kush storefront page logic from the command line",
    version
)]
pub struct Cli {
    /// Store configuration file (TOML, or JSON with a `.json` extension).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which product cards a quick-filter query keeps visible.
    Filter(FilterArgs),

    /// Search category and item names.
    Search(SearchArgs),

    /// Report the active section for a scroll position.
    Track(TrackArgs),

    /// Build a WhatsApp order link.
    #[command(name = "order-link")]
    OrderLink(OrderLinkArgs),

    /// Submit the contact form.
    Contact(ContactArgs),

    /// Record a like on the storefront.
    Like(LikeArgs),

    /// Replay a JSON-lines file of page events and print the effects.
    Replay(ReplayArgs),

    /// Validate the configuration and print the effective values.
    #[command(name = "check-config")]
    CheckConfig,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Filter(args) => run_filter(args, out),
        Commands::Search(args) => run_search(args, out),
        Commands::Track(args) => run_track(args, &config, out),
        Commands::OrderLink(args) => run_order_link(args, config, out),
        Commands::Contact(args) => run_contact(args, config, out),
        Commands::Like(args) => run_like(args, config, out),
        Commands::Replay(args) => run_replay(args, config, out),
        Commands::CheckConfig => write_json_line(out, &config),
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, run_with_output};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["kush", "track", "page.json", "--scroll-y", "-5", "--config", "store.toml"])
            .expect("parse");
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("store.toml")));
        let Commands::Track(args) = cli.command else {
            panic!("expected track");
        };
        assert_eq!(args.scroll_y, -5.0);
    }

    #[test]
    fn check_config_prints_defaults() {
        let cli = Cli::try_parse_from(["kush", "check-config"]).expect("parse");
        let mut out = Vec::new();
        run_with_output(cli, &mut out).expect("defaults are valid");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["order"]["number"], "250785440056");
        assert_eq!(value["timing"]["notice_ms"], 3000);
    }

    #[test]
    fn missing_config_file_is_a_usage_error() {
        let cli = Cli::try_parse_from(["kush", "--config", "/nonexistent/kush.toml", "check-config"])
            .expect("parse");
        let err = run_with_output(cli, &mut Vec::new()).expect_err("missing file");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn order_link_dispatches() {
        let cli = Cli::try_parse_from(["kush", "order-link", "--product", "Wrap Dress", "--status", "available", "--url-only"])
            .expect("parse");
        let mut out = Vec::new();
        run_with_output(cli, &mut out).expect("order link");
        let url = String::from_utf8(out).expect("utf8");
        assert!(url.contains("Wrap%20Dress"));
        assert!(url.contains("Status%3A%20Available"));
    }
}
