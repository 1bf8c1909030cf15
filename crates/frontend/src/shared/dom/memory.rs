use super::markup::{parse_fragment, Markup};
use super::Dom;
use crate::sync::scroll_reveal::ScrollPlan;
use std::cell::RefCell;
use std::rc::Rc;

/// Synthetic layout: every attached element occupies one row of this height,
/// in document order.
pub const ROW_HEIGHT: f64 = 40.0;

const ROOT: NodeId = NodeId(0);
const HEAD: NodeId = NodeId(1);
const BODY: NodeId = NodeId(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    /// Live value after a user edit; falls back to markup otherwise.
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<NodeData>,
    scroll_top: f64,
    scroll_plans: Vec<ScrollPlan>,
}

impl Tree {
    fn alloc(&mut self, tag: &str) -> NodeId {
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != child);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn build(&mut self, parent: NodeId, markup: &Markup) -> Option<NodeId> {
        match markup {
            Markup::Element {
                tag,
                attributes,
                children,
            } => {
                let id = self.alloc(tag);
                self.node_mut(id).attributes = attributes.clone();
                self.attach(parent, id);
                for child in children {
                    self.build(id, child);
                }
                Some(id)
            }
            Markup::Text(text) => {
                self.node_mut(parent).text.push_str(text);
                None
            }
        }
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let attributes = &mut self.node_mut(id).attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn classes(&self, id: NodeId) -> Vec<String> {
        self.attribute(id, "class")
            .map(|classes| classes.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    fn preorder(&self, from: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.node(from).children {
            out.push(child);
            self.preorder(child, out);
        }
    }

    fn ancestors_and_self(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.node(parent).parent;
        }
        chain
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors_and_self(id).last() == Some(&ROOT)
    }

    fn text_content(&self, id: NodeId) -> String {
        let mut text = self.node(id).text.clone();
        for &child in &self.node(id).children {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn option_value(&self, option: NodeId) -> String {
        self.attribute(option, "value")
            .map(str::to_string)
            .unwrap_or_else(|| self.text_content(option).trim().to_string())
    }
}

/// In-memory document: `<html>` with a `<head>` and a `<body>`.
///
/// Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let root = tree.alloc("html");
        let head = tree.alloc("head");
        let body = tree.alloc("body");
        tree.attach(root, head);
        tree.attach(root, body);
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// Document whose body holds `body_html`.
    pub fn from_html(body_html: &str) -> Self {
        let dom = Self::new();
        dom.append_html(&BODY, body_html);
        dom
    }

    pub fn head(&self) -> NodeId {
        HEAD
    }

    pub fn body(&self) -> NodeId {
        BODY
    }

    pub fn set_page_attribute(&self, name: &str, value: &str) {
        self.tree.borrow_mut().set_attribute(HEAD, name, value);
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().alloc(tag)
    }

    pub fn append_child(&self, parent: &NodeId, child: &NodeId) {
        self.tree.borrow_mut().attach(*parent, *child);
    }

    /// Simulates the user editing an input.
    pub fn set_value(&self, node: &NodeId, value: &str) {
        self.tree.borrow_mut().node_mut(*node).value = Some(value.to_string());
    }

    /// Attached element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find(|tree, node| tree.attribute(node, "id") == Some(id))
    }

    /// Attached elements carrying `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.filter(|tree, node| tree.classes(node).iter().any(|c| c == class))
    }

    /// Smooth scrolls requested so far.
    pub fn scroll_plans(&self) -> Vec<ScrollPlan> {
        self.tree.borrow().scroll_plans.clone()
    }

    fn filter<F>(&self, matches: F) -> Vec<NodeId>
    where
        F: Fn(&Tree, NodeId) -> bool,
    {
        let tree = self.tree.borrow();
        let mut order = Vec::new();
        tree.preorder(ROOT, &mut order);
        order.into_iter().filter(|id| matches(&tree, *id)).collect()
    }

    fn find<F>(&self, matches: F) -> Option<NodeId>
    where
        F: Fn(&Tree, NodeId) -> bool,
    {
        self.filter(matches).into_iter().next()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.borrow().node(*node).parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.tree.borrow().node(*node).children.clone()
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.tree.borrow().node(*node).tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .attribute(*node, &name.to_ascii_lowercase())
            .map(str::to_string)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.tree
            .borrow_mut()
            .set_attribute(*node, &name.to_ascii_lowercase(), value);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.tree.borrow().classes(*node).iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut tree = self.tree.borrow_mut();
        let mut classes = tree.classes(*node);
        if classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        tree.set_attribute(*node, "class", &classes.join(" "));
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut tree = self.tree.borrow_mut();
        let classes: Vec<String> = tree
            .classes(*node)
            .into_iter()
            .filter(|c| c != class)
            .collect();
        tree.set_attribute(*node, "class", &classes.join(" "));
    }

    fn descendants(&self, node: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.tree.borrow().preorder(*node, &mut out);
        out
    }

    fn input_value(&self, node: &NodeId) -> Option<String> {
        let tree = self.tree.borrow();
        let data = tree.node(*node);
        if let Some(value) = &data.value {
            return Some(value.clone());
        }
        match data.tag.as_str() {
            "input" | "button" => Some(tree.attribute(*node, "value").unwrap_or("").to_string()),
            "textarea" => Some(tree.text_content(*node)),
            "select" => {
                let mut options = Vec::new();
                tree.preorder(*node, &mut options);
                options.retain(|id| tree.node(*id).tag == "option");
                let chosen = options
                    .iter()
                    .find(|id| tree.attribute(**id, "selected").is_some())
                    .or_else(|| options.first());
                Some(chosen.map(|id| tree.option_value(*id)).unwrap_or_default())
            }
            _ => None,
        }
    }

    fn append_html(&self, parent: &NodeId, html: &str) -> Vec<NodeId> {
        let fragment = parse_fragment(html);
        let mut tree = self.tree.borrow_mut();
        fragment
            .iter()
            .filter_map(|markup| tree.build(*parent, markup))
            .collect()
    }

    fn remove(&self, node: &NodeId) {
        self.tree.borrow_mut().detach(*node);
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.tree.borrow().is_attached(*node)
    }

    fn page_attribute(&self, name: &str) -> Option<String> {
        self.attribute(&HEAD, name)
    }

    fn offset_top(&self, node: &NodeId) -> Option<f64> {
        let tree = self.tree.borrow();
        if !tree.is_attached(*node) {
            return None;
        }
        let hidden = tree
            .ancestors_and_self(*node)
            .iter()
            .any(|id| tree.attribute(*id, "hidden").is_some());
        if hidden {
            return None;
        }
        let mut order = Vec::new();
        tree.preorder(ROOT, &mut order);
        order
            .iter()
            .position(|id| id == node)
            .map(|index| index as f64 * ROW_HEIGHT)
    }

    fn scroll_top(&self) -> f64 {
        self.tree.borrow().scroll_top
    }

    fn set_scroll_top(&self, top: f64) {
        self.tree.borrow_mut().scroll_top = top.max(0.0);
    }

    /// No frames to wait for: records the plan and jumps to its end.
    fn animate_scroll(&self, plan: ScrollPlan) {
        let mut tree = self.tree.borrow_mut();
        tree.scroll_plans.push(plan);
        tree.scroll_top = plan.to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div id="list" class="editable-list" data-base-action="/sources">
            <div id="item" class="editable-list-item" data-id="4">
                <form id="form">
                    <input id="title" name="title" value="Opening">
                    <textarea name="notes">first take</textarea>
                    <select name="kind">
                        <option value="op">OP</option>
                        <option value="ed" selected>ED</option>
                    </select>
                    <span id="label">plain</span>
                </form>
            </div>
        </div>
    "#;

    #[test]
    fn test_from_html_builds_tree() {
        let dom = MemoryDom::from_html(PAGE);
        let list = dom.element_by_id("list").unwrap();
        let item = dom.element_by_id("item").unwrap();
        assert_eq!(dom.parent(&item), Some(list));
        assert_eq!(dom.parent(&list), Some(dom.body()));
        assert_eq!(dom.tag_name(&item), "div");
        assert_eq!(dom.attribute(&list, "data-base-action").as_deref(), Some("/sources"));
        assert_eq!(dom.elements_with_class("editable-list-item"), vec![item]);
    }

    #[test]
    fn test_input_values() {
        let dom = MemoryDom::from_html(PAGE);
        let form = dom.element_by_id("form").unwrap();
        let values: Vec<Option<String>> = dom
            .inputs(&form)
            .iter()
            .map(|node| dom.input_value(node))
            .collect();
        assert_eq!(
            values,
            vec![
                Some("Opening".to_string()),
                Some("first take".to_string()),
                Some("ed".to_string()),
            ]
        );
        let label = dom.element_by_id("label").unwrap();
        assert_eq!(dom.input_value(&label), None);
    }

    #[test]
    fn test_set_value_overrides_markup() {
        let dom = MemoryDom::from_html(PAGE);
        let title = dom.element_by_id("title").unwrap();
        dom.set_value(&title, "Ending");
        assert_eq!(dom.input_value(&title).as_deref(), Some("Ending"));
    }

    #[test]
    fn test_classes() {
        let dom = MemoryDom::from_html(PAGE);
        let form = dom.element_by_id("form").unwrap();
        dom.add_class(&form, "unsaved");
        dom.add_class(&form, "unsaved");
        assert_eq!(dom.attribute(&form, "class").as_deref(), Some("unsaved"));
        assert!(dom.has_class(&form, "unsaved"));
        dom.remove_class(&form, "unsaved");
        assert!(!dom.has_class(&form, "unsaved"));
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let dom = MemoryDom::from_html(PAGE);
        let item = dom.element_by_id("item").unwrap();
        let title = dom.element_by_id("title").unwrap();
        dom.remove(&item);
        assert!(!dom.is_attached(&item));
        assert!(!dom.is_attached(&title));
        assert_eq!(dom.element_by_id("item"), None);
        assert_eq!(dom.offset_top(&title), None);
    }

    #[test]
    fn test_append_html_returns_top_level_elements() {
        let dom = MemoryDom::from_html(PAGE);
        let list = dom.element_by_id("list").unwrap();
        let inserted = dom.append_html(&list, "<div data-id=\"5\"></div> text <div data-id=\"6\"></div>");
        assert_eq!(inserted.len(), 2);
        assert_eq!(dom.last_child(&list), Some(inserted[1]));
        assert!(dom.offset_top(&inserted[0]).unwrap() > 0.0);
    }

    #[test]
    fn test_hidden_elements_have_no_box() {
        let dom = MemoryDom::from_html("<div hidden><p id=\"inner\">x</p></div>");
        let inner = dom.element_by_id("inner").unwrap();
        assert_eq!(dom.offset_top(&inner), None);
    }

    #[test]
    fn test_page_attribute_lives_on_head() {
        let dom = MemoryDom::new();
        assert_eq!(dom.page_attribute("data-parent-id"), None);
        dom.set_page_attribute("data-parent-id", "42");
        assert_eq!(dom.page_attribute("data-parent-id").as_deref(), Some("42"));
    }

    #[test]
    fn test_built_elements() {
        let dom = MemoryDom::new();
        let form = dom.create_element("FORM");
        let input = dom.create_element("input");
        dom.set_attribute(&input, "name", "count");
        dom.append_child(&form, &input);
        assert!(!dom.is_attached(&form));
        dom.append_child(&dom.body(), &form);
        assert!(dom.is_attached(&input));
        assert_eq!(dom.closest_tag(&input, "form"), Some(form));
    }
}
