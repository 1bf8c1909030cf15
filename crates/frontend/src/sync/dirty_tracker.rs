//! Per-form "unsaved changes" marker.
//!
//! The mark is a class on the `<form>` element, so the page can style it and
//! it survives any number of engine instances. Change events are expected to
//! arrive through one delegated listener at the document, which also covers
//! inputs inserted after start-up.

use crate::shared::dom::Dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Clean,
    Dirty,
}

/// Change counter kept on the form, so a save can tell whether the user kept
/// editing while its request was in flight.
pub const GENERATION_ATTR: &str = "data-change-generation";

/// Leave-page message. Must be non-empty: older browsers skip the prompt
/// for a falsy return value.
pub const LEAVE_PROMPT: &str = "You have unsaved changes.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyTracker {
    unsaved_class: String,
}

impl DirtyTracker {
    pub fn new(unsaved_class: impl Into<String>) -> Self {
        Self {
            unsaved_class: unsaved_class.into(),
        }
    }

    /// Handles a change event whose target is `target`. Returns the form that
    /// is now dirty, if the target was an input inside one.
    pub fn observe_change<D: Dom>(&self, dom: &D, target: &D::Node) -> Option<D::Node> {
        if !dom.is_input(target) {
            return None;
        }
        let form = dom.closest_tag(target, "form")?;
        let generation = self.generation(dom, &form) + 1;
        dom.set_attribute(&form, GENERATION_ATTR, &generation.to_string());
        if !dom.has_class(&form, &self.unsaved_class) {
            log::debug!("form marked unsaved");
            dom.add_class(&form, &self.unsaved_class);
        }
        Some(form)
    }

    /// Changes observed on `form` so far. Taken before a save is sent.
    pub fn generation<D: Dom>(&self, dom: &D, form: &D::Node) -> u64 {
        dom.attribute(form, GENERATION_ATTR)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    /// Called once the server confirmed a save of `form` taken at
    /// `generation`. Edits made after that keep the form dirty. Returns
    /// whether the form is clean now.
    pub fn mark_saved<D: Dom>(&self, dom: &D, form: &D::Node, generation: u64) -> bool {
        if self.generation(dom, form) != generation {
            log::debug!("form changed while saving, still unsaved");
            return false;
        }
        dom.remove_class(form, &self.unsaved_class);
        true
    }

    pub fn state<D: Dom>(&self, dom: &D, form: &D::Node) -> FormState {
        if dom.has_class(form, &self.unsaved_class) {
            FormState::Dirty
        } else {
            FormState::Clean
        }
    }

    pub fn is_dirty<D: Dom>(&self, dom: &D, form: &D::Node) -> bool {
        self.state(dom, form) == FormState::Dirty
    }

    /// Dirty forms below `root`.
    pub fn dirty_forms<D: Dom>(&self, dom: &D, root: &D::Node) -> Vec<D::Node> {
        dom.descendants(root)
            .into_iter()
            .filter(|node| dom.tag_name(node) == "form" && self.is_dirty(dom, node))
            .collect()
    }

    pub fn has_unsaved<D: Dom>(&self, dom: &D, root: &D::Node) -> bool {
        !self.dirty_forms(dom, root).is_empty()
    }

    /// Message for the `beforeunload` guard, `None` when nothing is unsaved.
    pub fn leave_prompt<D: Dom>(&self, dom: &D, root: &D::Node) -> Option<&'static str> {
        self.has_unsaved(dom, root).then_some(LEAVE_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::dom::MemoryDom;

    const PAGE: &str = r#"
        <form id="a"><input id="a-name" name="name"><span id="a-label">Name</span></form>
        <form id="b"><select id="b-kind" name="kind"><option>x</option></select></form>
        <input id="loose" name="loose">
    "#;

    #[test]
    fn test_change_marks_enclosing_form_only() {
        let dom = MemoryDom::from_html(PAGE);
        let tracker = DirtyTracker::new("unsaved");
        let a = dom.element_by_id("a").unwrap();
        let b = dom.element_by_id("b").unwrap();

        let input = dom.element_by_id("a-name").unwrap();
        dom.set_value(&input, "Hanyuu");
        assert_eq!(tracker.observe_change(&dom, &input), Some(a));

        assert_eq!(tracker.state(&dom, &a), FormState::Dirty);
        assert_eq!(tracker.state(&dom, &b), FormState::Clean);
        assert_eq!(tracker.dirty_forms(&dom, &dom.body()), vec![a]);
    }

    #[test]
    fn test_non_inputs_and_formless_inputs_are_ignored() {
        let dom = MemoryDom::from_html(PAGE);
        let tracker = DirtyTracker::new("unsaved");
        let label = dom.element_by_id("a-label").unwrap();
        let loose = dom.element_by_id("loose").unwrap();

        assert_eq!(tracker.observe_change(&dom, &label), None);
        assert_eq!(tracker.observe_change(&dom, &loose), None);
        assert!(!tracker.has_unsaved(&dom, &dom.body()));
    }

    #[test]
    fn test_mark_saved_returns_to_clean() {
        let dom = MemoryDom::from_html(PAGE);
        let tracker = DirtyTracker::new("unsaved");
        let kind = dom.element_by_id("b-kind").unwrap();
        let b = dom.element_by_id("b").unwrap();

        tracker.observe_change(&dom, &kind);
        tracker.observe_change(&dom, &kind);
        assert_eq!(dom.attribute(&b, "class").as_deref(), Some("unsaved"));
        assert_eq!(tracker.generation(&dom, &b), 2);

        assert!(tracker.mark_saved(&dom, &b, 2));
        assert_eq!(tracker.state(&dom, &b), FormState::Clean);
        assert!(!tracker.has_unsaved(&dom, &dom.body()));
    }

    #[test]
    fn test_inputs_inserted_later_are_covered() {
        let dom = MemoryDom::from_html(r#"<div id="list"></div>"#);
        let tracker = DirtyTracker::new("unsaved");
        let list = dom.element_by_id("list").unwrap();
        dom.append_html(&list, r#"<form id="new"><input id="new-title" name="title"></form>"#);

        let input = dom.element_by_id("new-title").unwrap();
        let form = tracker.observe_change(&dom, &input).unwrap();
        assert!(tracker.is_dirty(&dom, &form));
    }

    #[test]
    fn test_change_after_snapshot_keeps_form_dirty() {
        let dom = MemoryDom::from_html(PAGE);
        let tracker = DirtyTracker::new("unsaved");
        let input = dom.element_by_id("a-name").unwrap();
        let a = dom.element_by_id("a").unwrap();

        tracker.observe_change(&dom, &input);
        let sent = tracker.generation(&dom, &a);
        tracker.observe_change(&dom, &input);

        assert!(!tracker.mark_saved(&dom, &a, sent));
        assert_eq!(tracker.state(&dom, &a), FormState::Dirty);

        let latest = tracker.generation(&dom, &a);
        assert!(tracker.mark_saved(&dom, &a, latest));
        assert_eq!(tracker.state(&dom, &a), FormState::Clean);
    }

    #[test]
    fn test_leave_prompt_only_with_unsaved_forms() {
        let dom = MemoryDom::from_html(PAGE);
        let tracker = DirtyTracker::new("unsaved");
        assert_eq!(tracker.leave_prompt(&dom, &dom.body()), None);

        let input = dom.element_by_id("a-name").unwrap();
        tracker.observe_change(&dom, &input);
        let prompt = tracker.leave_prompt(&dom, &dom.body()).unwrap();
        assert!(!prompt.is_empty());
    }
}
