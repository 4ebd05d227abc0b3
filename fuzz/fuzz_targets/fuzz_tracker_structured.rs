#![no_main]

use arbitrary::Arbitrary;
use kush_core::{Section, current_section};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct TrackerInput {
    scroll_y: f64,
    header_height: f64,
    offsets: Vec<f64>,
}

fuzz_target!(|input: TrackerInput| {
    if input.offsets.len() > 256 {
        return;
    }
    let sections: Vec<Section> = input
        .offsets
        .iter()
        .enumerate()
        .map(|(i, offset)| Section::new(format!("s{i}"), *offset))
        .collect();

    let first = current_section(input.scroll_y, input.header_height, &sections);
    let second = current_section(input.scroll_y, input.header_height, &sections);
    assert_eq!(first, second, "tracker must be idempotent");

    let Some(current) = first else {
        assert!(sections.is_empty());
        return;
    };
    // Either the fallback, or the last section in order whose offset
    // reaches the trigger line.
    let trigger = input.scroll_y + input.header_height + kush_core::DEFAULT_TRIGGER_MARGIN;
    let expected = sections
        .iter()
        .rev()
        .find(|section| section.offset <= trigger)
        .unwrap_or(&sections[0]);
    assert_eq!(current.identifier, expected.identifier);
});
