//! Capability interface over a grouped, tabbed tree of focusable elements.
//!
//! The navigator never holds on to nodes between calls; every query goes
//! through [`FocusTree`], so the tree may change freely between polls.

use std::fmt;

/// Handle of an element in a [`FocusTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of control a node is, as far as navigation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlKind {
    /// Entry of the tab strip.
    Tab,
    /// Numeric range control; LEFT/RIGHT step its value.
    Slider,
    Toggle,
    #[default]
    Button,
}

pub trait FocusTree {
    /// Node currently holding focus, if any.
    fn focused(&self) -> Option<NodeId>;

    /// Move focus to `node`. Returns false when the node refused focus.
    fn focus(&mut self, node: NodeId) -> bool;

    /// Node is enabled and may take focus.
    fn is_focusable(&self, node: NodeId) -> bool;

    /// Node and all of its ancestors are shown.
    fn is_visible(&self, node: NodeId) -> bool;

    /// Tab strip entries in strip order, hidden ones included.
    fn tab_strip(&self) -> Vec<NodeId>;

    /// The tab strip entry of the visible group.
    fn active_tab(&self) -> Option<NodeId>;

    /// The one tab group currently shown.
    fn visible_group(&self) -> Option<NodeId>;

    /// Tab group that owns a content node.
    fn group_of(&self, node: NodeId) -> Option<NodeId>;

    /// Containers of `group` in document order.
    fn containers(&self, group: NodeId) -> Vec<NodeId>;

    /// Container that owns `node`; `None` for content outside any container.
    fn container_of(&self, node: NodeId) -> Option<NodeId>;

    /// Controls of `container` in tab order.
    fn children(&self, container: NodeId) -> Vec<NodeId>;

    /// All controls of `group` in document order, inside containers or not.
    fn content(&self, group: NodeId) -> Vec<NodeId>;

    /// Containers sharing a group with `container`, itself included.
    fn sibling_containers(&self, container: NodeId) -> Vec<NodeId> {
        let Some(group) = self.group_of(container) else {
            return Vec::new();
        };
        self.containers(group)
    }

    /// Show the group registered under `key` and mark its tab active.
    fn activate_tab_group(&mut self, key: &str) -> bool;

    /// Perform the node's primary action (click).
    fn activate(&mut self, node: NodeId) -> bool;

    fn control_kind(&self, node: NodeId) -> ControlKind;

    /// Step a range control by `delta` increments. Returns false for nodes
    /// that are not range controls.
    fn step_value(&mut self, node: NodeId, delta: i32) -> bool;
}
