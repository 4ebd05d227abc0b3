//! Browser-only checks for the `localStorage` backend.
//!
//! Run with `wasm-pack test --headless --chrome crates/kush-web`.

#![cfg(target_arch = "wasm32")]

use kush_web::PageRunner;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn theme_toggle_round_trips_through_local_storage() {
    let mut runner = PageRunner::new(None).expect("default config");
    runner.init();
    assert!(runner.push_event(r#"{"kind":"loaded","prefers_dark":false,"page":{}}"#));
    assert!(runner.push_event(r#"{"kind":"theme_toggle"}"#));
    runner.step();

    let mut reloaded = PageRunner::new(None).expect("default config");
    assert!(reloaded.push_event(r#"{"kind":"loaded","prefers_dark":false,"page":{}}"#));
    let step = reloaded.step();
    let effects = js_sys::Reflect::get(&step, &"effects".into()).expect("effects");
    let first = js_sys::Reflect::get(&effects, &0.into()).expect("first effect");
    let theme = js_sys::Reflect::get(&first, &"theme".into()).expect("theme");
    assert_eq!(theme.as_string().as_deref(), Some("dark"));
}

#[wasm_bindgen_test]
fn invalid_config_throws() {
    assert!(PageRunner::new(Some(r#"{"order":{"number":"+1 555"}}"#.into())).is_err());
}

#[wasm_bindgen_test]
fn markup_names_reach_the_glue() {
    let names = kush_web::markup();
    let input = js_sys::Reflect::get(&names, &"searchInput".into()).expect("searchInput");
    assert_eq!(input.as_string().as_deref(), Some("siteSearch"));
}
