use bevy::prelude::*;

use super::{Direction, MenuError, MenuGraph, NodeId};
use crate::{config::MenuConfig, locale::LocaleContext, surface::NodeVisuals};

/// Each walk may apply its effect this many times per node in the graph.
pub(super) const WALK_VISITS_PER_NODE: usize = 4;

#[derive(Clone, Copy, Debug)]
enum WalkEffect<'a> {
    Show(&'a LocaleContext),
    Hide,
    Reload(&'a LocaleContext),
}

/// Visits left in one walk. Repeated visits are allowed, unbounded ones are not.
struct WalkBudget {
    remaining: usize,
    exhausted: bool,
    applied: Vec<bool>,
}

impl WalkBudget {
    fn for_graph(graph: &MenuGraph) -> Self {
        Self {
            remaining: graph.len() * WALK_VISITS_PER_NODE,
            exhausted: false,
            applied: vec![false; graph.len()],
        }
    }

    fn take(&mut self) -> bool {
        match self.remaining.checked_sub(1) {
            Some(remaining) => {
                self.remaining = remaining;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }
}

/// Where a node reached from `parent` by stepping `direction` is placed.
///
/// Y grows downward: stepping down moves the child one parent-height plus
/// the vertical gap below the parent.
pub fn layout_position(
    parent_position: Vec2,
    parent_size: Vec2,
    direction: Direction,
    config: &MenuConfig,
) -> Vec2 {
    let offset = match direction {
        Direction::Down => Vec2::new(0.0, parent_size.y + config.gap_vertical),
        Direction::Up => Vec2::new(0.0, -(parent_size.y + config.gap_vertical)),
        Direction::Right => Vec2::new(parent_size.x + config.gap_horizontal, 0.0),
        Direction::Left => Vec2::new(-(parent_size.x + config.gap_horizontal), 0.0),
    };
    parent_position + offset
}

impl MenuGraph {
    pub(super) fn show<S: NodeVisuals>(&self, entry: NodeId, locale: &LocaleContext, surface: &mut S) {
        self.start_walk(entry, WalkEffect::Show(locale), surface);
    }

    pub(super) fn hide<S: NodeVisuals>(&self, entry: NodeId, surface: &mut S) {
        self.start_walk(entry, WalkEffect::Hide, surface);
    }

    pub(super) fn refresh<S: NodeVisuals>(
        &self,
        entry: NodeId,
        locale: &LocaleContext,
        surface: &mut S,
    ) {
        self.start_walk(entry, WalkEffect::Reload(locale), surface);
    }

    fn start_walk<S: NodeVisuals>(&self, entry: NodeId, effect: WalkEffect<'_>, surface: &mut S) {
        let mut budget = WalkBudget::for_graph(self);
        self.walk(entry, None, effect, surface, 0, &mut budget);
        if budget.exhausted {
            warn!(
                "{}",
                MenuError::WalkBudgetExceeded {
                    menu: self.name.clone(),
                    visits: self.len() * WALK_VISITS_PER_NODE,
                }
            );
            let mut reached = vec![false; self.len()];
            self.sweep(entry, None, effect, surface, &mut reached, &budget.applied);
        }
    }

    /// Applies `effect` to `node`, then descends into every spatial neighbour
    /// except the one it came from. Nodes reachable along several paths are
    /// visited once per path, until the walk's budget runs out.
    fn walk<S: NodeVisuals>(
        &self,
        node: NodeId,
        came_from: Option<(NodeId, Direction)>,
        effect: WalkEffect<'_>,
        surface: &mut S,
        depth: usize,
        budget: &mut WalkBudget,
    ) {
        if budget.exhausted {
            return;
        }
        if depth >= self.nodes.len() {
            warn!(
                "{}",
                MenuError::CycleDepthExceeded {
                    node: self.nodes[node.index()].name().to_string(),
                    depth,
                }
            );
            return;
        }
        if !budget.take() {
            return;
        }

        self.apply_effect(node, came_from, effect, surface);
        budget.applied[node.index()] = true;

        let parent = came_from.map(|(parent, _)| parent);
        for direction in Direction::WALK_ORDER {
            let Some(next) = self.nodes[node.index()].link(direction) else {
                continue;
            };
            if Some(next) == parent {
                continue;
            }
            self.walk(
                next,
                Some((node, direction)),
                effect,
                surface,
                depth + 1,
                budget,
            );
        }
    }

    /// Single-visit pass over everything reachable from `node`, applying the
    /// effect only to nodes the budgeted walk never reached.
    fn sweep<S: NodeVisuals>(
        &self,
        node: NodeId,
        came_from: Option<(NodeId, Direction)>,
        effect: WalkEffect<'_>,
        surface: &mut S,
        reached: &mut [bool],
        applied: &[bool],
    ) {
        if reached[node.index()] {
            return;
        }
        reached[node.index()] = true;
        if !applied[node.index()] {
            self.apply_effect(node, came_from, effect, surface);
        }

        for direction in Direction::WALK_ORDER {
            if let Some(next) = self.nodes[node.index()].link(direction) {
                self.sweep(next, Some((node, direction)), effect, surface, reached, applied);
            }
        }
    }

    fn apply_effect<S: NodeVisuals>(
        &self,
        node: NodeId,
        came_from: Option<(NodeId, Direction)>,
        effect: WalkEffect<'_>,
        surface: &mut S,
    ) {
        let handle = self.handle(node);
        let menu_node = &self.nodes[node.index()];
        match effect {
            WalkEffect::Show(locale) => {
                surface.activate(handle);
                surface.set_display_text(handle, menu_node.display_text(locale));
                if let Some(icon) = menu_node.icon() {
                    surface.set_icon(handle, icon);
                }
                self.reposition(node, came_from, surface);
            }
            WalkEffect::Hide => surface.deactivate(handle),
            WalkEffect::Reload(locale) => {
                surface.set_display_text(handle, menu_node.display_text(locale));
            }
        }
    }

    fn reposition<S: NodeVisuals>(
        &self,
        node: NodeId,
        came_from: Option<(NodeId, Direction)>,
        surface: &mut S,
    ) {
        if !self.config.reposition {
            return;
        }

        let position = match came_from {
            None => self.config.offset,
            Some((parent, direction)) => {
                let parent = self.handle(parent);
                layout_position(
                    surface.position(parent),
                    surface.size(parent),
                    direction,
                    &self.config,
                )
            }
        };
        surface.set_position(self.handle(node), position);
    }
}
