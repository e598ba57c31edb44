//! Structural path labels for elements.
//!
//! Produces `#id` for elements with an id, otherwise a slash-separated
//! `tag[n]` path from `body` down, where `n` is the 1-based position among
//! same-tag siblings. Labels only; nothing relies on them surviving a reload.

use crate::host::DomHost;

/// Structural locator for `el`.
///
/// Returns an empty string for the root element itself.
pub fn element_path<H: DomHost>(host: &H, el: &H::Element) -> String {
    if let Some(id) = host.attribute(el, "id").filter(|id| !id.is_empty()) {
        return format!("#{id}");
    }

    let mut segments = Vec::new();
    let mut current = el.clone();
    // The root element has no parent element and is left out.
    while let Some(parent) = host.parent(&current) {
        let tag = host.tag_name(&current);
        let index = same_tag_index(host, &current, &tag);
        segments.push(format!("{tag}[{index}]"));
        current = parent;
    }
    segments.reverse();
    segments.join("/")
}

/// 1-based position of `el` among preceding siblings with the same tag.
fn same_tag_index<H: DomHost>(host: &H, el: &H::Element, tag: &str) -> usize {
    let mut index = 1;
    let mut sibling = host.previous_sibling(el);
    while let Some(s) = sibling {
        if host.tag_name(&s) == tag {
            index += 1;
        }
        sibling = host.previous_sibling(&s);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDom;

    #[test]
    fn test_sibling_paths_differ_in_last_index() {
        let mut dom = FakeDom::new();
        let body = dom.body();
        let list = dom.append(body, "ul");
        let first = dom.append(list, "li");
        let second = dom.append(list, "li");

        assert_eq!(element_path(&dom, &first), "body[1]/ul[1]/li[1]");
        assert_eq!(element_path(&dom, &second), "body[1]/ul[1]/li[2]");
    }

    #[test]
    fn test_index_counts_only_same_tag() {
        let mut dom = FakeDom::new();
        let body = dom.body();
        dom.append(body, "p");
        dom.append(body, "div");
        dom.append(body, "p");
        let second_div = dom.append(body, "div");

        assert_eq!(element_path(&dom, &second_div), "body[1]/div[2]");
    }

    #[test]
    fn test_id_short_circuits() {
        let mut dom = FakeDom::new();
        let body = dom.body();
        let section = dom.append(body, "section");
        let heading = dom.append(section, "h2");
        dom.set_attribute(&heading, "id", "pricing");

        assert_eq!(element_path(&dom, &heading), "#pricing");
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let mut dom = FakeDom::new();
        let body = dom.body();
        let p = dom.append(body, "p");
        dom.set_attribute(&p, "id", "");

        assert_eq!(element_path(&dom, &p), "body[1]/p[1]");
    }

    #[test]
    fn test_root_has_empty_path() {
        let dom = FakeDom::new();
        assert_eq!(element_path(&dom, &dom.root()), "");
    }
}
