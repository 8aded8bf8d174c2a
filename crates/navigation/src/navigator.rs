//! Directional focus traversal over a [`FocusTree`].
//!
//! Focus is always in one of three regions: nowhere useful ([`FocusRegion::Outside`]),
//! on the tab strip, or on a content control of the visible group. Each
//! region has its own rules for the four directions; see [`move_focus`].

use crate::tree::{FocusTree, NodeId};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRegion {
    Outside,
    Tabs,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// RIGHT on the last control of a container jumps to the active tab.
    /// Off by default: RIGHT is clamped while LEFT past the first control
    /// always reaches the tab strip.
    pub wrap_right_to_tabs: bool,
}

/// Region the current focus belongs to.
pub fn region<T: FocusTree + ?Sized>(tree: &T) -> FocusRegion {
    let Some(focused) = tree.focused() else {
        return FocusRegion::Outside;
    };
    if !tree.is_visible(focused) {
        return FocusRegion::Outside;
    }
    if tree.tab_strip().contains(&focused) {
        return FocusRegion::Tabs;
    }
    match (tree.group_of(focused), tree.visible_group()) {
        (Some(group), Some(visible)) if group == visible => FocusRegion::Settings,
        _ => FocusRegion::Outside,
    }
}

/// Move focus one step in `direction`.
///
/// Returns the newly focused node, or `None` when nothing changed.
pub fn move_focus<T: FocusTree + ?Sized>(
    tree: &mut T,
    direction: Direction,
    config: &NavigatorConfig,
) -> Option<NodeId> {
    let from = tree.focused();
    let target = match region(tree) {
        FocusRegion::Outside => first_content(tree),
        FocusRegion::Tabs => from.and_then(|tab| move_in_tabs(tree, tab, direction)),
        FocusRegion::Settings => {
            from.and_then(|node| move_in_settings(tree, node, direction, config))
        }
    }?;

    if Some(target) == from {
        return None;
    }
    if !try_focus(tree, target) {
        debug!(%target, "focus target refused");
        return None;
    }
    debug!(from = ?from, to = %target, direction = direction.as_ref(), "focus moved");
    Some(target)
}

/// Focus the active tab strip entry.
pub fn focus_active_tab<T: FocusTree + ?Sized>(tree: &mut T) -> Option<NodeId> {
    let tab = tree.active_tab()?;
    try_focus(tree, tab).then_some(tab)
}

/// First focusable control of the visible group, in document order.
pub fn first_content<T: FocusTree + ?Sized>(tree: &T) -> Option<NodeId> {
    let group = tree.visible_group()?;
    tree.content(group)
        .into_iter()
        .find(|node| can_focus(tree, *node))
}

fn can_focus<T: FocusTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    tree.is_focusable(node) && tree.is_visible(node)
}

fn try_focus<T: FocusTree + ?Sized>(tree: &mut T, node: NodeId) -> bool {
    can_focus(tree, node) && tree.focus(node)
}

fn move_in_tabs<T: FocusTree + ?Sized>(
    tree: &T,
    current: NodeId,
    direction: Direction,
) -> Option<NodeId> {
    match direction {
        Direction::Left => None,
        Direction::Right => first_content(tree),
        Direction::Up | Direction::Down => {
            let tabs: Vec<NodeId> = tree
                .tab_strip()
                .into_iter()
                .filter(|tab| can_focus(tree, *tab))
                .collect();
            let len = tabs.len();
            let position = tabs.iter().position(|tab| *tab == current)?;
            let next = if direction == Direction::Down {
                (position + 1) % len
            } else {
                (position + len - 1) % len
            };
            Some(tabs[next])
        }
    }
}

fn move_in_settings<T: FocusTree + ?Sized>(
    tree: &T,
    current: NodeId,
    direction: Direction,
    config: &NavigatorConfig,
) -> Option<NodeId> {
    let Some(container) = tree.container_of(current) else {
        return first_content(tree);
    };

    match direction {
        Direction::Up | Direction::Down => {
            let containers = tree.sibling_containers(container);
            let len = containers.len();
            let position = containers.iter().position(|c| *c == container)?;
            // Circular walk; the current container comes last.
            (1..=len).find_map(|step| {
                let index = if direction == Direction::Down {
                    (position + step) % len
                } else {
                    (position + len - step % len) % len
                };
                last_focusable(tree, containers[index])
            })
        }
        Direction::Left | Direction::Right => {
            let nodes: Vec<NodeId> = tree
                .children(container)
                .into_iter()
                .filter(|node| can_focus(tree, *node))
                .collect();
            let Some(position) = nodes.iter().position(|node| *node == current) else {
                return nodes.first().copied().or_else(|| first_content(tree));
            };

            if direction == Direction::Left {
                match position.checked_sub(1) {
                    Some(previous) => Some(nodes[previous]),
                    None => tree.active_tab(),
                }
            } else if position + 1 < nodes.len() {
                Some(nodes[position + 1])
            } else if config.wrap_right_to_tabs {
                tree.active_tab()
            } else {
                None
            }
        }
    }
}

fn last_focusable<T: FocusTree + ?Sized>(tree: &T, container: NodeId) -> Option<NodeId> {
    if !tree.is_visible(container) {
        return None;
    }
    tree.children(container)
        .into_iter()
        .rev()
        .find(|node| can_focus(tree, *node))
}
