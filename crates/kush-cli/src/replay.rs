#![forbid(unsafe_code)]

//! Replay a recorded page session.
//!
//! The events file holds one host-encoded page event per line, in the same
//! JSON shape the browser glue sends. Blank lines and `#` comments are
//! skipped. Every resulting effect is written as one JSON line.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use kush_core::{FileStorage, MemoryStorage, StorageBackend};
use kush_runtime::StoreConfig;
use kush_web::parse_page_event;

use crate::error::{CliError, Result};
use crate::session::Session;
use crate::transport::Transport;
use crate::util::write_json_line;

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// JSON-lines file of page events.
    pub events: PathBuf,

    /// Persist preferences in this JSON file instead of memory.
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Origin the relative endpoints resolve against.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Leave pending notices and highlights unexpired at the end.
    #[arg(long)]
    pub no_settle: bool,
}

pub fn run_replay(args: ReplayArgs, config: StoreConfig, out: &mut dyn Write) -> Result<()> {
    let transport = Transport::new(args.base_url.as_deref())?;
    match &args.storage {
        Some(path) => replay(&args, Session::new(config, FileStorage::new(path), transport), out),
        None => replay(&args, Session::new(config, MemoryStorage::new(), transport), out),
    }
}

fn replay<S: StorageBackend>(args: &ReplayArgs, mut session: Session<S>, out: &mut dyn Write) -> Result<()> {
    let content = std::fs::read_to_string(&args.events)?;
    let mut dispatched = 0_usize;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = parse_page_event(line).map_err(|source| event_error(&args.events, index + 1, source))?;
        let Some(event) = event else {
            tracing::warn!(target: "kush.cli", line = index + 1, "event kind has no page meaning; skipped");
            continue;
        };
        for effect in session.dispatch(event) {
            write_json_line(out, &effect)?;
        }
        dispatched += 1;
    }

    if !args.no_settle {
        for effect in session.settle() {
            write_json_line(out, &effect)?;
        }
    }
    tracing::info!(target: "kush.cli", events = dispatched, "replay finished");
    Ok(())
}

fn event_error(path: &Path, line: usize, source: kush_web::InputParseError) -> CliError {
    CliError::Event {
        path: path.to_path_buf(),
        line,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kush_core::prefs::{LIKES_KEY, THEME_KEY};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const EVENTS: &str = r##"# a short visit
{"kind":"loaded","prefers_dark":false,"page":{"cards":[{"title":"Red Dress","labels":["Model A"]}]}}
{"kind":"filter","query":"dress"}

{"kind":"preloader_hidden"}
{"kind":"theme_toggle"}
{"kind":"vote","product":"Model A","vote":"like"}
{"kind":"search","query":"nothing"}
{"kind":"unload"}
"##;

    fn args(dir: &Path, events: &str) -> ReplayArgs {
        let path = dir.join("events.jsonl");
        std::fs::write(&path, events).expect("write events");
        ReplayArgs {
            events: path,
            storage: Some(dir.join("prefs.json")),
            base_url: None,
            no_settle: false,
        }
    }

    fn effect_names(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).expect("json line");
                value["effect"].as_str().expect("tag").to_string()
            })
            .collect()
    }

    #[test]
    fn replays_and_persists() {
        let dir = tempdir().expect("tempdir");
        let args = args(dir.path(), EVENTS);
        let mut out = Vec::new();
        run_replay(args, StoreConfig::default(), &mut out).expect("replay");

        assert_eq!(
            effect_names(&out),
            vec![
                "apply_theme",
                "set_active_nav",
                "set_card_visibility",
                "apply_theme",
                "show_like_counts",
                "show_notice",
                "dismiss_notice",
            ]
        );

        let storage = FileStorage::new(dir.path().join("prefs.json"));
        assert_eq!(storage.load(THEME_KEY).expect("theme").as_deref(), Some("dark"));
        assert_eq!(
            storage.load(LIKES_KEY).expect("likes").as_deref(),
            Some(r#"{"Model A":{"likes":1,"dislikes":0}}"#)
        );
    }

    #[test]
    fn bad_line_is_located() {
        let dir = tempdir().expect("tempdir");
        let args = args(dir.path(), "{\"kind\":\"theme_toggle\"}\n{\"kind\":\"scroll\"}\n");
        let err = run_replay(args, StoreConfig::default(), &mut Vec::new()).expect_err("missing field");
        assert!(err.to_string().ends_with("events.jsonl:2: missing required field: scroll_y"), "{err}");
    }
}
