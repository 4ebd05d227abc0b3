#![forbid(unsafe_code)]

//! Href → anchor resolution and section-list construction.

use std::collections::HashMap;

use crate::model::{NavEntry, Section};

/// Extract the anchor name from an href.
///
/// The anchor is everything after the last `#`, so both `#about` and
/// `/store/#about` resolve to `about`. Hrefs without a `#`, or with nothing
/// after it, are not anchor links.
#[must_use]
pub fn resolve_anchor(href: &str) -> Option<&str> {
    let (_, fragment) = href.rsplit_once('#')?;
    if fragment.is_empty() { None } else { Some(fragment) }
}

/// Build the tracked section list from nav entries and the page's anchors.
///
/// `anchors` maps element ids to their offset from the document top. Each
/// entry whose href resolves to a present anchor contributes one section, in
/// nav order. The entries' `anchor` fields are filled in along the way, so
/// entries that stay `None` are exactly the untracked ones.
pub fn build_sections(entries: &mut [NavEntry], anchors: &HashMap<String, f64>) -> Vec<Section> {
    let mut sections = Vec::new();
    for entry in entries.iter_mut() {
        entry.anchor = None;
        let Some(anchor) = resolve_anchor(&entry.href) else {
            continue;
        };
        let Some(&offset) = anchors.get(anchor) else {
            continue;
        };
        entry.anchor = Some(anchor.to_string());
        sections.push(Section::new(anchor, offset));
    }
    sections
}
