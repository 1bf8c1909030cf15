//! Document abstraction the sync engine runs against.
//!
//! `WebDom` drives the live page through web-sys; `MemoryDom` is an
//! arena-backed document used by tests and, behind the `memory-dom` feature,
//! headless hosts. Both expose element handles only: text nodes are not
//! addressable.

#[cfg(any(test, feature = "memory-dom"))]
mod markup;
#[cfg(any(test, feature = "memory-dom"))]
pub mod memory;
pub mod web;

use crate::sync::scroll_reveal::ScrollPlan;
use std::fmt;

#[cfg(any(test, feature = "memory-dom"))]
pub use markup::{parse_fragment, Markup};
#[cfg(any(test, feature = "memory-dom"))]
pub use memory::{MemoryDom, NodeId};
pub use web::WebDom;

/// Elements whose value takes part in form serialization and dirty tracking.
pub const INPUT_TAGS: [&str; 4] = ["input", "select", "textarea", "button"];

pub trait Dom {
    type Node: Clone + PartialEq + fmt::Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Lowercase tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Every element below `node` in document order, `node` excluded.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Current value of an input-capable element, `None` for anything else.
    fn input_value(&self, node: &Self::Node) -> Option<String>;

    /// Parses `html` and appends the result to `parent`. Returns the inserted
    /// top-level elements.
    fn append_html(&self, parent: &Self::Node, html: &str) -> Vec<Self::Node>;

    fn remove(&self, node: &Self::Node);

    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Attribute of the page-level context element (`<head>`).
    fn page_attribute(&self, name: &str) -> Option<String>;

    /// Distance from the top of the document. `None` when the element is
    /// detached or has no box.
    fn offset_top(&self, node: &Self::Node) -> Option<f64>;

    fn scroll_top(&self) -> f64;

    fn set_scroll_top(&self, top: f64);

    /// Starts a smooth scroll. Implementations run it in the background.
    fn animate_scroll(&self, plan: ScrollPlan);

    // ========================================================================
    // Provided lookups
    // ========================================================================

    /// Nearest element, starting at `node` itself, for which `matches` holds.
    fn closest<F>(&self, node: &Self::Node, matches: F) -> Option<Self::Node>
    where
        F: Fn(&Self::Node) -> bool,
    {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if matches(&candidate) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    fn closest_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node> {
        self.closest(node, |candidate| self.has_class(candidate, class))
    }

    fn closest_tag(&self, node: &Self::Node, tag: &str) -> Option<Self::Node> {
        self.closest(node, |candidate| self.tag_name(candidate) == tag)
    }

    /// Attribute value, treating an empty value as absent.
    fn non_empty_attribute(&self, node: &Self::Node, name: &str) -> Option<String> {
        self.attribute(node, name)
            .filter(|value| !value.trim().is_empty())
    }

    fn is_input(&self, node: &Self::Node) -> bool {
        INPUT_TAGS.contains(&self.tag_name(node).as_str())
    }

    /// Input-capable descendants of `root` in document order.
    fn inputs(&self, root: &Self::Node) -> Vec<Self::Node> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.is_input(node))
            .collect()
    }

    fn last_child(&self, node: &Self::Node) -> Option<Self::Node> {
        self.children(node).pop()
    }
}
