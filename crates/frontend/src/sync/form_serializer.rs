//! Turns the inputs of a form into a `Payload`.

use crate::shared::dom::Dom;
use contracts::shared::payload::{InputField, InputKind, Payload};

/// Input-capable descendants of `form`, in document order.
pub fn read_fields<D: Dom>(dom: &D, form: &D::Node) -> Vec<InputField> {
    dom.inputs(form)
        .iter()
        .map(|node| {
            let name = dom.attribute(node, "name");
            let kind = InputKind::from_type_attr(dom.attribute(node, "type").as_deref());
            let value = dom.input_value(node).unwrap_or_default();
            InputField::new(name.as_deref(), kind, value)
        })
        .collect()
}

/// Named inputs only; `number` and `range` values are coerced with
/// `contracts::shared::payload::coerce_numeric`.
pub fn serialize_form<D: Dom>(dom: &D, form: &D::Node) -> Payload {
    Payload::from_fields(&read_fields(dom, form))
}
