//! In-memory [`FocusTree`] for a tabbed settings dialog.

use crate::tree::{ControlKind, FocusTree, NodeId};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
enum Role {
    Tab { group: NodeId },
    Group { key: String, tab: NodeId },
    Container { group: NodeId },
    Control { group: NodeId, container: Option<NodeId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    min: i32,
    max: i32,
    step: i32,
    value: i32,
}

#[derive(Debug, Clone)]
struct Node {
    label: String,
    role: Role,
    kind: ControlKind,
    shown: bool,
    enabled: bool,
    range: Option<Range>,
    toggled: bool,
    activations: u32,
    children: Vec<NodeId>,
}

impl Node {
    fn new(label: impl Into<String>, role: Role, kind: ControlKind) -> Self {
        Self {
            label: label.into(),
            role,
            kind,
            shown: true,
            enabled: true,
            range: None,
            toggled: false,
            activations: 0,
            children: Vec::new(),
        }
    }
}

/// Arena-backed settings tree with a tab strip, groups, containers and
/// controls. The first group added is the visible one.
#[derive(Debug, Clone, Default)]
pub struct SettingsTree {
    nodes: Vec<Node>,
    tabs: Vec<NodeId>,
    groups: Vec<NodeId>,
    visible_group: Option<NodeId>,
    focused: Option<NodeId>,
}

impl SettingsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tab group and its tab strip entry. Returns the group.
    pub fn add_group(&mut self, key: impl Into<String>, title: impl Into<String>) -> NodeId {
        let key = key.into();
        let group = NodeId(self.nodes.len());
        let tab = NodeId(self.nodes.len() + 1);
        self.nodes.push(Node::new(
            key.clone(),
            Role::Group { key, tab },
            ControlKind::Button,
        ));
        self.nodes
            .push(Node::new(title, Role::Tab { group }, ControlKind::Tab));
        self.tabs.push(tab);
        self.groups.push(group);
        if self.visible_group.is_none() {
            self.visible_group = Some(group);
        }
        group
    }

    pub fn add_container(&mut self, group: NodeId, label: impl Into<String>) -> NodeId {
        let id = self.push(label, Role::Container { group }, ControlKind::Button);
        self.nodes[group.0].children.push(id);
        id
    }

    /// Add a control inside `container`.
    ///
    /// # Panics
    ///
    /// Panics if `container` was not returned by [`SettingsTree::add_container`].
    pub fn add_control(
        &mut self,
        container: NodeId,
        label: impl Into<String>,
        kind: ControlKind,
    ) -> NodeId {
        let group = match self.nodes[container.0].role {
            Role::Container { group } => group,
            _ => panic!("{container} is not a container"),
        };
        let id = self.push(
            label,
            Role::Control {
                group,
                container: Some(container),
            },
            kind,
        );
        self.nodes[container.0].children.push(id);
        self.nodes[group.0].children.push(id);
        id
    }

    /// Add a control directly under `group`, outside any container.
    pub fn add_loose_control(
        &mut self,
        group: NodeId,
        label: impl Into<String>,
        kind: ControlKind,
    ) -> NodeId {
        let id = self.push(
            label,
            Role::Control {
                group,
                container: None,
            },
            kind,
        );
        self.nodes[group.0].children.push(id);
        id
    }

    /// Add a slider with an integer range inside `container`.
    pub fn add_slider(
        &mut self,
        container: NodeId,
        label: impl Into<String>,
        min: i32,
        max: i32,
        step: i32,
        value: i32,
    ) -> NodeId {
        let id = self.add_control(container, label, ControlKind::Slider);
        let (min, max) = (min.min(max), min.max(max));
        self.nodes[id.0].range = Some(Range {
            min,
            max,
            step: step.max(1),
            value: value.clamp(min, max),
        });
        id
    }

    pub fn set_visible(&mut self, node: NodeId, shown: bool) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.shown = shown;
        }
    }

    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.enabled = enabled;
        }
    }

    pub fn label(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map(|n| n.label.as_str()).unwrap_or("")
    }

    /// Look a node up by label.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.label == label)
            .map(NodeId)
    }

    pub fn tab_of(&self, group: NodeId) -> Option<NodeId> {
        match self.nodes.get(group.0)?.role {
            Role::Group { tab, .. } => Some(tab),
            _ => None,
        }
    }

    pub fn value(&self, node: NodeId) -> Option<i32> {
        self.nodes.get(node.0)?.range.map(|r| r.value)
    }

    pub fn is_toggled(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.toggled)
    }

    pub fn activations(&self, node: NodeId) -> u32 {
        self.nodes.get(node.0).map_or(0, |n| n.activations)
    }

    /// Drop focus, e.g. when the dialog is dismissed.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    fn push(&mut self, label: impl Into<String>, role: Role, kind: ControlKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(label, role, kind));
        id
    }

    fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0)
    }

    fn show_group(&mut self, group: NodeId) -> bool {
        if !matches!(self.node(group).map(|n| &n.role), Some(Role::Group { .. })) {
            return false;
        }
        self.visible_group = Some(group);
        debug!(group = self.label(group), "tab group shown");
        true
    }
}

impl FocusTree for SettingsTree {
    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) || !self.is_visible(node) {
            return false;
        }
        self.focused = Some(node);
        true
    }

    fn is_focusable(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| {
            n.enabled && matches!(n.role, Role::Tab { .. } | Role::Control { .. })
        })
    }

    fn is_visible(&self, node: NodeId) -> bool {
        let Some(n) = self.node(node) else {
            return false;
        };
        if !n.shown {
            return false;
        }
        match &n.role {
            Role::Tab { .. } => true,
            Role::Group { .. } => self.visible_group == Some(node),
            Role::Container { group } => self.is_visible(*group),
            Role::Control { group, container } => match container {
                Some(container) => self.is_visible(*container),
                None => self.is_visible(*group),
            },
        }
    }

    fn tab_strip(&self) -> Vec<NodeId> {
        self.tabs.clone()
    }

    fn active_tab(&self) -> Option<NodeId> {
        self.tab_of(self.visible_group?)
    }

    fn visible_group(&self) -> Option<NodeId> {
        self.visible_group
    }

    fn group_of(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node)?.role {
            Role::Container { group } | Role::Control { group, .. } => Some(group),
            Role::Group { .. } => Some(node),
            Role::Tab { .. } => None,
        }
    }

    fn containers(&self, group: NodeId) -> Vec<NodeId> {
        self.node(group)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|child| matches!(self.nodes[child.0].role, Role::Container { .. }))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn container_of(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node)?.role {
            Role::Control { container, .. } => container,
            _ => None,
        }
    }

    fn children(&self, container: NodeId) -> Vec<NodeId> {
        match self.node(container) {
            Some(n) if matches!(n.role, Role::Container { .. }) => n.children.clone(),
            _ => Vec::new(),
        }
    }

    fn content(&self, group: NodeId) -> Vec<NodeId> {
        self.node(group)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|child| matches!(self.nodes[child.0].role, Role::Control { .. }))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn activate_tab_group(&mut self, key: &str) -> bool {
        let group = self.groups.iter().copied().find(|group| {
            matches!(&self.nodes[group.0].role, Role::Group { key: k, .. } if k == key)
        });
        match group {
            Some(group) => self.show_group(group),
            None => false,
        }
    }

    fn activate(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) || !self.is_visible(node) {
            return false;
        }
        self.nodes[node.0].activations += 1;
        let (role, kind) = {
            let n = &self.nodes[node.0];
            (n.role.clone(), n.kind)
        };
        match (role, kind) {
            (Role::Tab { group }, _) => self.show_group(group),
            (_, ControlKind::Toggle) => {
                let n = &mut self.nodes[node.0];
                n.toggled = !n.toggled;
                true
            }
            _ => true,
        }
    }

    fn control_kind(&self, node: NodeId) -> ControlKind {
        self.node(node).map(|n| n.kind).unwrap_or_default()
    }

    fn step_value(&mut self, node: NodeId, delta: i32) -> bool {
        let Some(range) = self.nodes.get_mut(node.0).and_then(|n| n.range.as_mut()) else {
            return false;
        };
        range.value = range
            .value
            .saturating_add(delta.saturating_mul(range.step))
            .clamp(range.min, range.max);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> (SettingsTree, NodeId, NodeId) {
        let mut tree = SettingsTree::new();
        let stream = tree.add_group("stream", "Stream");
        let device = tree.add_group("device", "Device");
        (tree, stream, device)
    }

    #[test]
    fn first_group_is_visible() {
        let (tree, stream, device) = two_groups();
        assert_eq!(tree.visible_group(), Some(stream));
        assert_eq!(tree.active_tab(), tree.tab_of(stream));
        assert!(!tree.is_visible(device));
        assert_eq!(tree.tab_strip().len(), 2);
    }

    #[test]
    fn hidden_group_content_cannot_take_focus() {
        let (mut tree, _, device) = two_groups();
        let container = tree.add_container(device, "Audio");
        let mute = tree.add_control(container, "Mute", ControlKind::Toggle);
        assert!(!tree.focus(mute));

        assert!(tree.activate_tab_group("device"));
        assert!(tree.focus(mute));
        assert_eq!(tree.focused(), Some(mute));
    }

    #[test]
    fn disabled_and_hidden_nodes_refuse_focus() {
        let (mut tree, stream, _) = two_groups();
        let container = tree.add_container(stream, "Video");
        let a = tree.add_control(container, "A", ControlKind::Button);
        let b = tree.add_control(container, "B", ControlKind::Button);
        tree.set_enabled(a, false);
        tree.set_visible(container, false);

        assert!(!tree.focus(a));
        assert!(!tree.focus(b));
        assert!(!tree.focus(container));
    }

    #[test]
    fn activating_a_tab_switches_group() {
        let (mut tree, _, device) = two_groups();
        let tab = tree.tab_of(device).unwrap();
        assert!(tree.activate(tab));
        assert_eq!(tree.visible_group(), Some(device));
        assert_eq!(tree.active_tab(), Some(tab));
    }

    #[test]
    fn slider_steps_are_clamped() {
        let (mut tree, stream, _) = two_groups();
        let container = tree.add_container(stream, "Audio");
        let volume = tree.add_slider(container, "Volume", 0, 100, 5, 95);

        assert!(tree.step_value(volume, 1));
        assert_eq!(tree.value(volume), Some(100));
        assert!(tree.step_value(volume, 1));
        assert_eq!(tree.value(volume), Some(100));
        assert!(tree.step_value(volume, -3));
        assert_eq!(tree.value(volume), Some(85));

        let toggle = tree.add_control(container, "Mute", ControlKind::Toggle);
        assert!(!tree.step_value(toggle, 1));
        assert!(tree.activate(toggle));
        assert!(tree.is_toggled(toggle));
    }

    #[test]
    fn slider_steps_saturate_at_integer_bounds() {
        let (mut tree, stream, _) = two_groups();
        let container = tree.add_container(stream, "Bitrate");
        let wide = tree.add_slider(container, "Wide", i32::MIN, i32::MAX, i32::MAX, 0);

        assert!(tree.step_value(wide, 3));
        assert_eq!(tree.value(wide), Some(i32::MAX));
        assert!(tree.step_value(wide, -3));
        assert_eq!(tree.value(wide), Some(-1));
        assert!(tree.step_value(wide, -3));
        assert_eq!(tree.value(wide), Some(i32::MIN));

        let reversed = tree.add_slider(container, "Reversed", 10, 0, 1, 20);
        assert_eq!(tree.value(reversed), Some(10));
    }

    #[test]
    fn content_lists_loose_and_contained_controls() {
        let (mut tree, stream, _) = two_groups();
        let loose = tree.add_loose_control(stream, "Reset", ControlKind::Button);
        let container = tree.add_container(stream, "Video");
        let quality = tree.add_control(container, "Quality", ControlKind::Button);

        assert_eq!(tree.content(stream), vec![loose, quality]);
        assert_eq!(tree.containers(stream), vec![container]);
        assert_eq!(tree.container_of(loose), None);
        assert_eq!(tree.sibling_containers(container), vec![container]);
        assert_eq!(tree.find("Quality"), Some(quality));
    }
}
