//! Document-level listeners, installed once per page.
//!
//! Delegation at the document covers inputs and rows inserted after start-up.

use super::browser;
use crate::shared::dom::WebDom;
use crate::sync::navigation::link_target;
use std::cell::Cell;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BeforeUnloadEvent, Element, Event, EventTarget};

thread_local! {
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn listen<E>(target: &EventTarget, kinds: &[&str], handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    for kind in kinds {
        if let Err(err) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            log::error!("cannot listen to {}: {:?}", kind, err);
        }
    }
    // Lives as long as the page.
    closure.forget();
}

pub fn install() {
    if INSTALLED.with(|flag| flag.replace(true)) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    listen(&document, &["change", "input"], |event: Event| {
        if let Some(target) = target_element(&event) {
            let ctx = browser::context();
            if let Some(form) = ctx.tracker.observe_change(&ctx.dom, &target) {
                log::debug!("unsaved changes in form {:?}", form.id());
            }
        }
    });

    listen(&document, &["click"], |event: Event| {
        let Some(target) = target_element(&event) else {
            return;
        };
        let ctx = browser::context();
        let Some(url) = link_target(&ctx.dom, &target, &ctx.config.href_attr) else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_href(&url) {
                log::error!("navigation to {} failed: {:?}", url, err);
            }
        }
    });

    listen(&window, &["beforeunload"], |event: BeforeUnloadEvent| {
        let ctx = browser::context();
        let prompt = WebDom::root().and_then(|root| ctx.tracker.leave_prompt(&ctx.dom, &root));
        if let Some(prompt) = prompt {
            event.prevent_default();
            event.set_return_value(prompt);
        }
    });

    log::debug!("sync listeners installed");
}
