#![no_main]

use kush_web::parse_page_event;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 8192 {
        return;
    }
    // Any host input must parse or fail cleanly, never panic.
    let _ = parse_page_event(text);
});
