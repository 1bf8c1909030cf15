use super::Dom;
use crate::sync::scroll_reveal::{run_scroll, ScrollPlan};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement,
    HtmlTemplateElement, HtmlTextAreaElement, NodeList,
};

/// The live page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebDom;

impl WebDom {
    pub fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// The `<html>` element.
    pub fn root() -> Option<Element> {
        Self::document()?.document_element()
    }

    fn elements(list: NodeList) -> Vec<Element> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_all(node: &Element, selector: &str) -> Vec<Element> {
        match node.query_selector_all(selector) {
            Ok(list) => Self::elements(list),
            Err(err) => {
                log::warn!("query_selector_all({}) failed: {:?}", selector, err);
                Vec::new()
            }
        }
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            log::warn!("Failed to set {}: {:?}", name, err);
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            log::warn!("Failed to add class {}: {:?}", class, err);
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            log::warn!("Failed to remove class {}: {:?}", class, err);
        }
    }

    fn descendants(&self, node: &Element) -> Vec<Element> {
        Self::query_all(node, "*")
    }

    fn inputs(&self, root: &Element) -> Vec<Element> {
        Self::query_all(root, "input, select, textarea, button")
    }

    fn input_value(&self, node: &Element) -> Option<String> {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            return Some(select.value());
        }
        if let Some(textarea) = node.dyn_ref::<HtmlTextAreaElement>() {
            return Some(textarea.value());
        }
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            return Some(button.value());
        }
        None
    }

    fn append_html(&self, parent: &Element, html: &str) -> Vec<Element> {
        let Some(document) = Self::document() else {
            return Vec::new();
        };
        let template = match document
            .create_element("template")
            .map(|element| element.dyn_into::<HtmlTemplateElement>())
        {
            Ok(Ok(template)) => template,
            _ => {
                log::error!("Failed to create a <template> for the response fragment");
                return Vec::new();
            }
        };
        template.set_inner_html(html);
        let fragment = template.content();

        // Collect before appending: the fragment empties itself on insertion.
        let top_level = fragment.children();
        let inserted: Vec<Element> = (0..top_level.length())
            .filter_map(|i| top_level.item(i))
            .collect();

        if let Err(err) = parent.append_child(&fragment) {
            log::error!("Failed to append response fragment: {:?}", err);
            return Vec::new();
        }
        inserted
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn page_attribute(&self, name: &str) -> Option<String> {
        Self::document()?.head()?.get_attribute(name)
    }

    fn offset_top(&self, node: &Element) -> Option<f64> {
        if !node.is_connected() {
            return None;
        }
        let rect = node.get_bounding_client_rect();
        if rect.width() == 0.0 && rect.height() == 0.0 {
            return None;
        }
        Some(rect.top() + self.scroll_top())
    }

    fn scroll_top(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn set_scroll_top(&self, top: f64) {
        if let Some(window) = web_sys::window() {
            let x = window.scroll_x().unwrap_or(0.0);
            window.scroll_to_with_x_and_y(x, top);
        }
    }

    fn animate_scroll(&self, plan: ScrollPlan) {
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = run_scroll(&WebDom, plan, js_sys::Date::now, TimeoutFuture::new).await;
            log::debug!("scroll reveal to {} finished: {:?}", plan.to, outcome);
        });
    }
}
