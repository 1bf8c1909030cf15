pub mod shared;
pub mod sync;
pub mod system;

#[cfg(test)]
mod test_support;

use leptos::task::spawn_local;
use shared::config::SyncConfig;
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    system::browser::context();
    system::listeners::install();
}

/// Replaces the markup conventions. Fields left out keep their defaults.
#[wasm_bindgen]
pub fn configure(config: JsValue) -> Result<(), JsValue> {
    let config: SyncConfig = if config.is_undefined() || config.is_null() {
        SyncConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|err| JsValue::from_str(&err.to_string()))?
    };
    system::browser::init(config);
    system::listeners::install();
    Ok(())
}

#[wasm_bindgen]
pub fn add_item(trigger: Element) {
    let ctx = system::browser::context();
    spawn_local(async move {
        _ = ctx.collection().add(&trigger).await;
    });
}

#[wasm_bindgen]
pub fn delete_item(trigger: Element) {
    let ctx = system::browser::context();
    spawn_local(async move {
        _ = ctx.collection().delete(&trigger).await;
    });
}

#[wasm_bindgen]
pub fn update_item(trigger: Element) {
    let ctx = system::browser::context();
    spawn_local(async move {
        _ = ctx.collection().update(&trigger).await;
    });
}

#[wasm_bindgen]
pub fn single_add(trigger: Element) {
    let ctx = system::browser::context();
    spawn_local(async move {
        _ = ctx.single_action().add(&trigger).await;
    });
}

#[wasm_bindgen]
pub fn single_update(trigger: Element) {
    let ctx = system::browser::context();
    spawn_local(async move {
        _ = ctx.single_action().update(&trigger).await;
    });
}

#[wasm_bindgen]
pub fn mark_card(trigger: Element) {
    let ctx = system::browser::context();
    spawn_local(async move {
        _ = ctx.single_action().mark(&trigger).await;
    });
}

/// True while any form on the page carries the unsaved mark.
#[wasm_bindgen]
pub fn has_unsaved_changes() -> bool {
    let ctx = system::browser::context();
    shared::dom::WebDom::root()
        .map(|root| ctx.tracker.has_unsaved(&ctx.dom, &root))
        .unwrap_or(false)
}
