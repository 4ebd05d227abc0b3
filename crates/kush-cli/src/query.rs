#![forbid(unsafe_code)]

//! Read-only questions about a page snapshot: which cards a filter keeps,
//! what a search finds, which section is current.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use kush_core::filter::visible_count;
use kush_core::tracker::{active_entries, current_index, scroll_target_with_offset};
use kush_core::{Visibility, filter_cards, resolve_anchor, search};
use kush_runtime::StoreConfig;
use serde::Serialize;
use serde_json::json;

use crate::error::{CliError, Result};
use crate::util::{read_page, write_json_line};

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Page snapshot JSON file.
    pub page: PathBuf,

    /// Filter text; empty shows every card.
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Page snapshot JSON file.
    pub page: PathBuf,

    #[arg(default_value = "")]
    pub query: String,

    /// Exit with status 1 when nothing matches.
    #[arg(long)]
    pub fail_on_miss: bool,
}

#[derive(Debug, Clone, Args)]
pub struct TrackArgs {
    /// Page snapshot JSON file.
    pub page: PathBuf,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub scroll_y: f64,

    /// Override the header height recorded in the snapshot.
    #[arg(long)]
    pub header_height: Option<f64>,

    /// Also report where a click on this nav href would scroll to.
    #[arg(long)]
    pub click: Option<String>,
}

#[derive(Debug, Serialize)]
struct CardDecision<'a> {
    title: &'a str,
    visibility: Visibility,
}

pub fn run_filter(args: FilterArgs, out: &mut dyn Write) -> Result<()> {
    let page = read_page(&args.page)?;
    let decisions = filter_cards(&args.query, &page.cards);
    let cards: Vec<CardDecision<'_>> = page
        .cards
        .iter()
        .zip(&decisions)
        .map(|(card, &visibility)| CardDecision {
            title: &card.title,
            visibility,
        })
        .collect();
    write_json_line(
        out,
        &json!({
            "query": args.query,
            "visible": visible_count(&decisions),
            "total": decisions.len(),
            "cards": cards,
        }),
    )
}

pub fn run_search(args: SearchArgs, out: &mut dyn Write) -> Result<()> {
    let page = read_page(&args.page)?;
    let outcome = search(&args.query, &page.categories, &page.items);
    write_json_line(
        out,
        &json!({
            "result": outcome,
            "message": outcome.message(),
        }),
    )?;
    if args.fail_on_miss && outcome.count() == 0 {
        return Err(CliError::exit(1, outcome.message()));
    }
    Ok(())
}

pub fn run_track(args: TrackArgs, config: &StoreConfig, out: &mut dyn Write) -> Result<()> {
    if !args.scroll_y.is_finite() {
        return Err(CliError::invalid("--scroll-y must be a finite number"));
    }
    let page = read_page(&args.page)?;
    let header_height = args.header_height.unwrap_or(page.header_height);
    let margin = config.tracker.margin;

    let index = current_index(args.scroll_y, header_height, margin, &page.sections);
    let current = index.and_then(|i| page.sections.get(i));
    let active = active_entries(&page.nav, current);

    let scroll_to = match args.click.as_deref() {
        None => None,
        Some(href) => {
            let section = resolve_anchor(href)
                .and_then(|anchor| page.section(anchor))
                .ok_or_else(|| CliError::invalid(format!("{href:?} does not name a tracked section")))?;
            Some(scroll_target_with_offset(
                section,
                header_height,
                config.tracker.click_offset,
            ))
        }
    };

    let nav: Vec<_> = page
        .nav
        .iter()
        .zip(&active)
        .map(|(entry, active)| json!({ "href": entry.href, "active": active }))
        .collect();
    write_json_line(
        out,
        &json!({
            "trigger_line": args.scroll_y + header_height + margin,
            "section": current.map(|s| s.identifier.as_str()),
            "nav": nav,
            "scroll_to": scroll_to,
        }),
    )
}
