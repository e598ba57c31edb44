//! In-memory document and parent link for unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::HostError;
use crate::host::{DomHost, Hook, ParentLink, Placement, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
    rect: Rect,
    /// Stylesheet says `display: none` until an inline style overrides it.
    hidden_by_sheet: bool,
}

/// Arena-backed element tree implementing `DomHost`.
///
/// Also records what the subsystems did to it: installed hooks, attach counts,
/// frame requests, focus calls and mode attribute writes.
#[derive(Debug)]
pub struct FakeDom {
    nodes: Vec<Node>,
    hooks: BTreeSet<Hook>,
    attach_calls: BTreeMap<Hook, usize>,
    pub frames_requested: usize,
    pub frame_pending: bool,
    pub ready_deferrals: usize,
    pub focused: Vec<NodeId>,
    pub root_writes: usize,
    pub viewport_width: f64,
    pub now: u64,
}

impl FakeDom {
    /// Document with `<html><head/><body/></html>`.
    pub fn new() -> Self {
        let mut dom = Self::loading();
        dom.finish_loading();
        dom
    }

    /// Document that has only parsed its root element so far.
    pub fn loading() -> Self {
        Self {
            nodes: vec![Node {
                tag: "html".into(),
                ..Default::default()
            }],
            hooks: BTreeSet::new(),
            attach_calls: BTreeMap::new(),
            frames_requested: 0,
            frame_pending: false,
            ready_deferrals: 0,
            focused: Vec::new(),
            root_writes: 0,
            viewport_width: 800.0,
            now: 1_700_000_000_000,
        }
    }

    pub fn finish_loading(&mut self) {
        if self.find_child(0, "head").is_none() {
            self.push_node(0, "head");
        }
        if self.find_child(0, "body").is_none() {
            self.push_node(0, "body");
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body(&self) -> NodeId {
        NodeId(self.find_child(0, "body").expect("document has no body"))
    }

    pub fn head(&self) -> NodeId {
        NodeId(self.find_child(0, "head").expect("document has no head"))
    }

    /// Append a new `<tag>` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        NodeId(self.push_node(parent.0, tag))
    }

    /// Detach `el` from its parent, as a host page script removing it would.
    pub fn remove(&mut self, el: NodeId) {
        self.unlink(el.0);
    }

    pub fn set_rect(&mut self, el: NodeId, rect: Rect) {
        self.nodes[el.0].rect = rect;
    }

    pub fn children(&self, el: NodeId) -> Vec<NodeId> {
        self.nodes[el.0].children.iter().copied().map(NodeId).collect()
    }

    pub fn has_class(&self, el: NodeId, class: &str) -> bool {
        self.nodes[el.0].classes.iter().any(|c| c == class)
    }

    pub fn style(&self, el: NodeId, property: &str) -> Option<&str> {
        self.nodes[el.0].styles.get(property).map(String::as_str)
    }

    pub fn text(&self, el: NodeId) -> &str {
        &self.nodes[el.0].text
    }

    pub fn is_attached(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }

    pub fn attached_hooks(&self) -> Vec<Hook> {
        self.hooks.iter().copied().collect()
    }

    pub fn attach_calls(&self, hook: Hook) -> usize {
        self.attach_calls.get(&hook).copied().unwrap_or(0)
    }

    /// Number of elements anywhere in the document matching `tag`.
    pub fn count_tag(&self, tag: &str) -> usize {
        self.descendants(0).filter(|&i| self.nodes[i].tag == tag).count()
    }

    /// Elements carrying `name`, connected or not.
    pub fn count_with_attribute(&self, name: &str) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.attrs.contains_key(name))
            .count()
    }

    fn push_node(&mut self, parent: usize, tag: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: tag.to_string(),
            parent: Some(parent),
            ..Default::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    fn find_child(&self, parent: usize, tag: &str) -> Option<usize> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].tag == tag)
    }

    fn unlink(&mut self, id: usize) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Pre-order walk below `from`, excluding `from` itself.
    fn descendants(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        let mut stack: Vec<usize> = self.nodes[from].children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.nodes[next].children.iter().rev().copied());
            Some(next)
        })
    }
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl DomHost for FakeDom {
    type Element = NodeId;

    fn has_head(&self) -> bool {
        self.find_child(0, "head").is_some()
    }

    fn has_body(&self) -> bool {
        self.find_child(0, "body").is_some()
    }

    fn defer_until_ready(&mut self) {
        self.ready_deferrals += 1;
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.nodes[0].attrs.get(name).cloned()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_writes += 1;
        self.nodes[0].attrs.insert(name.into(), value.into());
    }

    fn first_with_attribute(&self, name: &str) -> Option<NodeId> {
        self.descendants(0)
            .find(|&i| self.nodes[i].attrs.contains_key(name))
            .map(NodeId)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(0)
            .find(|&i| self.nodes[i].attrs.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    fn ensure_style(&mut self, id: &str, css: &str) -> bool {
        if self.element_by_id(id).is_some() {
            return true;
        }
        let Some(head) = self.find_child(0, "head") else {
            return false;
        };
        let style = self.push_node(head, "style");
        self.nodes[style].attrs.insert("id".into(), id.into());
        self.nodes[style].text = css.into();
        true
    }

    fn create_overlay(&mut self, id: &str) -> Option<NodeId> {
        let body = self.find_child(0, "body")?;
        let div = self.push_node(body, "div");
        self.nodes[div].attrs.insert("id".into(), id.into());
        self.nodes[div].hidden_by_sheet = true;
        Some(NodeId(div))
    }

    fn elements_by_tag(&self, tags: &[&str]) -> Vec<NodeId> {
        let Some(body) = self.find_child(0, "body") else {
            return Vec::new();
        };
        self.descendants(body)
            .filter(|&i| tags.contains(&self.nodes[i].tag.as_str()))
            .map(NodeId)
            .collect()
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn tag_name(&self, el: &NodeId) -> String {
        self.nodes[el.0].tag.clone()
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.nodes[el.0].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, el: &NodeId, name: &str, value: &str) {
        self.nodes[el.0].attrs.insert(name.into(), value.into());
    }

    fn remove_attribute(&mut self, el: &NodeId, name: &str) {
        self.nodes[el.0].attrs.remove(name);
    }

    fn add_class(&mut self, el: &NodeId, class: &str) {
        if !self.has_class(*el, class) {
            self.nodes[el.0].classes.push(class.into());
        }
    }

    fn remove_class(&mut self, el: &NodeId, class: &str) {
        self.nodes[el.0].classes.retain(|c| c != class);
    }

    fn set_text(&mut self, el: &NodeId, text: &str) {
        self.nodes[el.0].text = text.into();
    }

    fn set_style(&mut self, el: &NodeId, property: &str, value: &str) {
        self.nodes[el.0].styles.insert(property.into(), value.into());
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.nodes[el.0].parent.map(NodeId)
    }

    fn previous_sibling(&self, el: &NodeId) -> Option<NodeId> {
        let parent = self.nodes[el.0].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == el.0)?;
        pos.checked_sub(1).map(|p| NodeId(siblings[p]))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(node.0);
        while let Some(id) = current {
            if id == ancestor.0 {
                return true;
            }
            current = self.nodes[id].parent;
        }
        false
    }

    fn is_connected(&self, el: &NodeId) -> bool {
        self.contains(&NodeId(0), el)
    }

    /// Elements that are not rendered measure as an empty rect.
    fn bounding_rect(&self, el: &NodeId) -> Rect {
        let node = &self.nodes[el.0];
        let rendered = match node.styles.get("display").map(String::as_str) {
            Some("none") => false,
            Some(_) => true,
            None => !node.hidden_by_sheet,
        };
        if rendered { node.rect } else { Rect::default() }
    }

    fn move_adjacent(
        &mut self,
        el: &NodeId,
        reference: &NodeId,
        placement: Placement,
    ) -> Result<(), HostError> {
        if self.contains(el, reference) {
            return Err("cannot move a node into itself".into());
        }
        let parent = self.nodes[reference.0]
            .parent
            .ok_or_else(|| HostError::from("reference has no parent"))?;
        self.unlink(el.0);
        let pos = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == reference.0)
            .ok_or_else(|| HostError::from("reference not in parent"))?;
        let index = match placement {
            Placement::Before => pos,
            Placement::After => pos + 1,
        };
        self.nodes[parent].children.insert(index, el.0);
        self.nodes[el.0].parent = Some(parent);
        Ok(())
    }

    fn focus(&mut self, el: &NodeId) {
        self.focused.push(*el);
    }

    fn attach(&mut self, hook: Hook) {
        *self.attach_calls.entry(hook).or_default() += 1;
        self.hooks.insert(hook);
    }

    fn detach(&mut self, hook: Hook) {
        self.hooks.remove(&hook);
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
        self.frame_pending = true;
    }

    fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    fn now_millis(&self) -> u64 {
        self.now
    }
}

/// `ParentLink` that keeps every posted message.
#[derive(Debug, Default)]
pub struct RecordingLink {
    pub detached: bool,
    sent: RefCell<Vec<(Value, String)>>,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link for a top-level page with no parent frame.
    pub fn without_parent() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Value, String)> {
        self.sent.borrow().clone()
    }

    /// Sent messages of one envelope type.
    pub fn sent_of_type(&self, kind: &str) -> Vec<Value> {
        self.sent
            .borrow()
            .iter()
            .filter(|(msg, _)| msg["type"] == kind)
            .map(|(msg, _)| msg.clone())
            .collect()
    }
}

impl ParentLink for RecordingLink {
    fn has_parent(&self) -> bool {
        !self.detached
    }

    fn post(&self, message: &Value, target_origin: &str) -> Result<(), HostError> {
        self.sent
            .borrow_mut()
            .push((message.clone(), target_origin.to_string()));
        Ok(())
    }
}
