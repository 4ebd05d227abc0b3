#![forbid(unsafe_code)]

//! Active-section tracking for the main navigation.
//!
//! The current section is the last section, in **nav order**, whose top is at
//! or above the trigger line (`scroll_y + header_height + margin`). When nav
//! order and vertical order disagree the result follows nav order: with
//! sections `[A@0, B@500, C@200]` and a trigger line of 250 the current
//! section is `C`, not `B`.

use crate::model::{NavEntry, Section};

/// Distance below the header at which a section counts as reached.
pub const DEFAULT_TRIGGER_MARGIN: f64 = 20.0;

/// Extra clearance under the header when scrolling to a clicked section.
pub const NAV_CLICK_OFFSET: f64 = 12.0;

/// Select the current section.
///
/// Returns `None` only when `sections` is empty; otherwise the first section
/// is the fallback, so some section is always current.
#[must_use]
pub fn current_section(scroll_y: f64, header_height: f64, sections: &[Section]) -> Option<&Section> {
    current_section_with_margin(scroll_y, header_height, DEFAULT_TRIGGER_MARGIN, sections)
}

/// [`current_section`] with an explicit trigger margin.
#[must_use]
pub fn current_section_with_margin(
    scroll_y: f64,
    header_height: f64,
    margin: f64,
    sections: &[Section],
) -> Option<&Section> {
    let trigger = scroll_y + header_height + margin;
    let mut current = sections.first()?;
    for section in sections {
        if section.offset <= trigger {
            current = section;
        }
    }
    Some(current)
}

/// Index form of [`current_section_with_margin`].
#[must_use]
pub fn current_index(scroll_y: f64, header_height: f64, margin: f64, sections: &[Section]) -> Option<usize> {
    let trigger = scroll_y + header_height + margin;
    if sections.is_empty() {
        return None;
    }
    let mut current = 0;
    for (index, section) in sections.iter().enumerate() {
        if section.offset <= trigger {
            current = index;
        }
    }
    Some(current)
}

/// Active flag per nav entry.
///
/// An entry is active when its resolved anchor names the current section.
/// With no current section nothing is active.
#[must_use]
pub fn active_entries(entries: &[NavEntry], current: Option<&Section>) -> Vec<bool> {
    entries
        .iter()
        .map(|entry| match (current, entry.anchor.as_deref()) {
            (Some(section), Some(anchor)) => anchor == section.identifier,
            _ => false,
        })
        .collect()
}

/// Scroll offset that brings `section` just below the fixed header.
#[must_use]
pub fn scroll_target(section: &Section, header_height: f64) -> f64 {
    scroll_target_with_offset(section, header_height, NAV_CLICK_OFFSET)
}

/// [`scroll_target`] with an explicit clearance.
#[must_use]
pub fn scroll_target_with_offset(section: &Section, header_height: f64, clearance: f64) -> f64 {
    (section.offset - (header_height + clearance)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sections(layout: &[(&str, f64)]) -> Vec<Section> {
        layout.iter().map(|(id, off)| Section::new(*id, *off)).collect()
    }

    fn tracked(href: &str, anchor: &str) -> NavEntry {
        NavEntry {
            href: href.to_string(),
            anchor: Some(anchor.to_string()),
        }
    }

    #[test]
    fn nav_order_wins_over_vertical_order() {
        let list = sections(&[("A", 0.0), ("B", 500.0), ("C", 200.0)]);
        // trigger = 150 + 80 + 20 = 250
        let current = current_section(150.0, 80.0, &list).expect("non-empty");
        assert_eq!(current.identifier, "C");
        assert_eq!(current_index(150.0, 80.0, DEFAULT_TRIGGER_MARGIN, &list), Some(2));
    }

    #[test]
    fn first_section_is_fallback() {
        let list = sections(&[("hero", 400.0), ("faq", 900.0)]);
        let current = current_section(0.0, 60.0, &list).expect("non-empty");
        assert_eq!(current.identifier, "hero");
    }

    #[test]
    fn boundary_is_inclusive() {
        let list = sections(&[("home", 0.0), ("about", 300.0)]);
        // trigger = 220 + 60 + 20 = 300
        assert_eq!(current_section(220.0, 60.0, &list).unwrap().identifier, "about");
        assert_eq!(current_section(219.0, 60.0, &list).unwrap().identifier, "home");
    }

    #[test]
    fn empty_sections_yield_none() {
        assert_eq!(current_section(1000.0, 60.0, &[]), None);
        assert_eq!(current_index(1000.0, 60.0, 20.0, &[]), None);
    }

    #[test]
    fn tracking_is_idempotent() {
        let list = sections(&[("home", 0.0), ("collections", 640.0), ("faq", 1800.0)]);
        let first = current_section(700.0, 64.0, &list).cloned();
        let second = current_section(700.0, 64.0, &list).cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn active_entries_mark_only_matching_anchor() {
        let entries = vec![
            tracked("#home", "home"),
            NavEntry::new("/contact"),
            tracked("/store/#faq", "faq"),
        ];
        let faq = Section::new("faq", 900.0);
        assert_eq!(active_entries(&entries, Some(&faq)), vec![false, false, true]);
        assert_eq!(active_entries(&entries, None), vec![false, false, false]);
    }

    #[test]
    fn scroll_target_clears_header() {
        let section = Section::new("faq", 900.0);
        assert_eq!(scroll_target(&section, 68.0), 820.0);
        assert_eq!(scroll_target(&Section::new("home", 10.0), 68.0), 0.0);
    }
}
