#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the page runner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly
//! types and provides a `localStorage`-backed [`StorageBackend`]. Only
//! compiled on `wasm32` targets.

use js_sys::{Array, Function, Object, Reflect};
use kush_core::{StorageBackend, StorageError, StorageResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::{DynStorage, RunnerCore};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_error(context: &str, err: &JsValue) -> StorageError {
    StorageError::Unavailable(format!("{context}: {err:?}"))
}

/// Browser `localStorage`, reached through `globalThis`.
///
/// Private browsing modes may throw on access; every failure becomes
/// [`StorageError::Unavailable`] and the page falls back to defaults.
struct LocalStorage {
    storage: JsValue,
}

impl LocalStorage {
    fn open() -> StorageResult<Self> {
        let storage = Reflect::get(&js_sys::global(), &"localStorage".into())
            .map_err(|e| js_error("localStorage", &e))?;
        if storage.is_undefined() || storage.is_null() {
            return Err(StorageError::Unavailable("localStorage missing".into()));
        }
        Ok(Self { storage })
    }

    fn method(&self, name: &str) -> StorageResult<Function> {
        Reflect::get(&self.storage, &name.into())
            .map_err(|e| js_error(name, &e))?
            .dyn_into::<Function>()
            .map_err(|e| js_error(name, &e))
    }
}

impl StorageBackend for LocalStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .method("getItem")?
            .call1(&self.storage, &JsValue::from_str(key))
            .map_err(|e| js_error("getItem", &e))?;
        Ok(value.as_string())
    }

    fn store(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.method("setItem")?
            .call2(&self.storage, &JsValue::from_str(key), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(|e| js_error("setItem", &e))
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.method("removeItem")?
            .call1(&self.storage, &JsValue::from_str(key))
            .map(|_| ())
            .map_err(|e| js_error("removeItem", &e))
    }
}

fn browser_storage() -> DynStorage {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            console_error(&format!("kush: {err}; preferences will not persist"));
            Box::new(kush_core::MemoryStorage::new())
        }
    }
}

/// Storefront page runner.
///
/// Host-driven: the page script pushes DOM events as JSON, advances time,
/// and applies the effects returned by `step()`.
#[wasm_bindgen]
pub struct PageRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Element ids, selectors and classes the glue reads and writes, as
/// `{ searchInput: "siteSearch", ... }`.
#[wasm_bindgen]
pub fn markup() -> JsValue {
    let obj = Object::new();
    for (key, value) in kush_core::dom::MARKUP {
        set_js(&obj, key, JsValue::from_str(value));
    }
    obj.into()
}

#[wasm_bindgen]
impl PageRunner {
    /// Create a runner. `config` is an optional JSON `StoreConfig`; invalid
    /// configuration throws.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<PageRunner, JsValue> {
        install_panic_hook();
        let inner = RunnerCore::from_config_json(config.as_deref(), browser_storage())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { inner })
    }

    /// Initialize the model. Safe to call more than once.
    pub fn init(&mut self) {
        self.inner.init();
    }

    /// Advance deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set deterministic clock to absolute milliseconds.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Parse a JSON-encoded page event and queue it.
    /// Returns `true` if accepted, `false` if unsupported/malformed.
    #[wasm_bindgen(js_name = pushEvent)]
    pub fn push_event(&mut self, json: &str) -> bool {
        self.inner.push_event_json(json)
    }

    /// Process due timers and queued events.
    /// Returns `{ processed: number, effects: object[] }`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        let obj = Object::new();
        set_js(&obj, "processed", JsValue::from_f64(result.processed as f64));
        let effects = js_sys::JSON::parse(&result.effects_json()).unwrap_or_else(|err| {
            console_error(&format!("kush: effect encoding failed: {err:?}"));
            Array::new().into()
        });
        set_js(&obj, "effects", effects);
        obj.into()
    }

    /// Milliseconds until the next timer, or `undefined` when idle.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner.next_deadline_ms()
    }

    /// Drain log lines as a JS array of strings.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let arr = Array::new();
        for line in self.inner.take_logs() {
            arr.push(&JsValue::from_str(&line));
        }
        arr
    }
}
