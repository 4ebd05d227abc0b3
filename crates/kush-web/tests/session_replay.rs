//! Replays a recorded browser session (one JSON event per line) through the
//! runner core and checks the effects the page script would apply.

use kush_core::MemoryStorage;
use kush_runtime::StoreConfig;
use kush_web::RunnerCore;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const SESSION: &str = r##"
{"kind":"loaded","prefers_dark":true,"csrf_token":"tok","page":{"cards":[{"title":"Red Dress","labels":["Model A"]},{"title":"Blue Top","labels":["Model B"]}],"categories":[{"id":1,"name":"Silk Collection"}],"items":[{"id":7,"name":"Silk Scarf","status":"sold","anchor":"item-7"}],"nav":[{"href":"#home"},{"href":"#collections"},{"href":"/contact"}],"anchors":[{"id":"home","offset":0},{"id":"collections","offset":700}],"header_height":80}}
{"kind":"scroll","scroll_y":650}
{"kind":"nav_click","href":"#home"}
{"kind":"filter","query":"model b"}
{"kind":"remote_like","product_id":7}
{"kind":"remote_like","product_id":7}
{"kind":"preloader_hidden"}
{"kind":"http_response","id":1,"status":200,"body":"{\"likes\":5}"}
"##;

fn replay(core: &mut RunnerCore) -> Vec<Value> {
    let mut accepted = 0;
    for line in SESSION.lines().filter(|l| !l.trim().is_empty()) {
        if core.push_event_json(line) {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 7);
    let step = core.step();
    assert_eq!(step.processed, 7);
    serde_json::from_str(&step.effects_json()).expect("effects json")
}

#[test]
fn recorded_session_effects() {
    let mut core = RunnerCore::new(StoreConfig::default(), Box::new(MemoryStorage::new()));
    let effects = replay(&mut core);
    assert_eq!(
        effects,
        vec![
            json!({ "effect": "apply_theme", "theme": "dark" }),
            json!({ "effect": "set_active_nav", "active": [true, false, false] }),
            json!({ "effect": "set_active_nav", "active": [false, true, false] }),
            json!({ "effect": "scroll_to", "top": 0.0 }),
            json!({ "effect": "set_card_visibility", "cards": ["hidden", "visible"] }),
            json!({
                "effect": "set_control_enabled",
                "control": { "control": "like", "id": 7 },
                "enabled": false
            }),
            json!({
                "effect": "http",
                "id": 1,
                "request": {
                    "method": "POST",
                    "url": "/clothes/7/like/",
                    "headers": [["X-CSRFToken", "tok"]],
                    "body": null
                }
            }),
            json!({
                "effect": "set_control_enabled",
                "control": { "control": "like", "id": 7 },
                "enabled": true
            }),
            json!({ "effect": "show_remote_likes", "product_id": 7, "likes": 5 }),
        ]
    );
}

#[test]
fn replay_is_deterministic() {
    let mut a = RunnerCore::new(StoreConfig::default(), Box::new(MemoryStorage::new()));
    let mut b = RunnerCore::new(StoreConfig::default(), Box::new(MemoryStorage::new()));
    assert_eq!(replay(&mut a), replay(&mut b));
}
