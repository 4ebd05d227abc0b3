#![no_main]

use kush_core::filter::visible_count;
use kush_core::{PageSnapshot, SearchOutcome, active_entries, current_section, filter_cards, search};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First line is the query, the rest the page snapshot JSON.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 8192 {
        return;
    }
    let (query, json) = text.split_once('\n').unwrap_or((text, "{}"));
    let Ok(page) = PageSnapshot::from_json(json) else {
        return;
    };

    let decisions = filter_cards(query, &page.cards);
    assert_eq!(decisions.len(), page.cards.len());
    if query.trim().is_empty() {
        assert_eq!(visible_count(&decisions), decisions.len());
    }
    assert_eq!(filter_cards(query, &page.cards), decisions);

    match search(query, &page.categories, &page.items) {
        SearchOutcome::NoQuery => assert!(query.trim().is_empty()),
        SearchOutcome::Found { matches, .. } => {
            assert!(!matches.is_empty());
            assert!(matches.len() <= page.categories.len() + page.items.len());
        }
        SearchOutcome::NotFound { .. } => assert!(!query.trim().is_empty()),
    }

    let current = current_section(0.0, page.header_height, &page.sections);
    assert_eq!(current.is_some(), !page.sections.is_empty());
    let active = active_entries(&page.nav, current);
    assert_eq!(active.len(), page.nav.len());
});
