//! Click-to-navigate rows: any element carrying `data-href` acts as a link.

use crate::shared::dom::Dom;

/// URL of the nearest element around `target` with a non-empty `href_attr`.
pub fn link_target<D: Dom>(dom: &D, target: &D::Node, href_attr: &str) -> Option<String> {
    let link = dom.closest(target, |node| dom.non_empty_attribute(node, href_attr).is_some())?;
    dom.non_empty_attribute(&link, href_attr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::dom::MemoryDom;

    const PAGE: &str = r#"
        <table>
            <tr id="row" data-href="/anime/5">
                <td><span id="title">Mushishi</span></td>
                <td data-href="/studios/2"><span id="studio">Artland</span></td>
                <td data-href=""><span id="blank">-</span></td>
            </tr>
        </table>
        <p id="outside">no link</p>
    "#;

    #[test]
    fn test_link_target_nearest_wins() {
        let dom = MemoryDom::from_html(PAGE);
        let title = dom.element_by_id("title").unwrap();
        let studio = dom.element_by_id("studio").unwrap();
        assert_eq!(link_target(&dom, &title, "data-href").as_deref(), Some("/anime/5"));
        assert_eq!(link_target(&dom, &studio, "data-href").as_deref(), Some("/studios/2"));
    }

    #[test]
    fn test_link_target_skips_empty_and_missing() {
        let dom = MemoryDom::from_html(PAGE);
        let blank = dom.element_by_id("blank").unwrap();
        let outside = dom.element_by_id("outside").unwrap();
        assert_eq!(link_target(&dom, &blank, "data-href").as_deref(), Some("/anime/5"));
        assert_eq!(link_target(&dom, &outside, "data-href"), None);
    }
}
