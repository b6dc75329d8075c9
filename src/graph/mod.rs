//! Directional menu graph and its navigation stack.
//!
//! Nodes live in an arena owned by one [`MenuGraph`] and are addressed by
//! [`NodeId`]. Spatial links are always stored on both ends; the `in` link is
//! one-way. Opening a node pushes it on the stack and walks every node
//! reachable through spatial links from it.
use bevy::prelude::*;
use smallvec::SmallVec;

use crate::{
    config::MenuConfig,
    locale::LocaleContext,
    surface::{MenuSelection, NodeHandle, NodeVisuals},
};

mod direction;
mod error;
mod node;
mod walk;

pub use direction::Direction;
pub use error::MenuError;
pub use node::{ClickAction, ClickCallback, MenuCommand, MenuNode, NodeId};
pub use walk::layout_position;

/// Identifies a graph within a [`crate::MenuRegistry`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(u32);

impl MenuId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a navigation call did, for hosts that react to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuTransition {
    /// Node whose subtree was shown and selected.
    pub shown: Option<NodeId>,
    /// Nodes whose subtrees were hidden, in the order they were hidden.
    pub hidden: Vec<NodeId>,
    /// The stack emptied and the panel was hidden.
    pub closed: bool,
    /// Focus should move to another open menu; the graph left selection untouched.
    pub handoff_focus: bool,
}

#[derive(Debug)]
pub struct MenuGraph {
    id: MenuId,
    name: String,
    config: MenuConfig,
    button_prefix: String,
    nodes: Vec<MenuNode>,
    root: Option<NodeId>,
    stack: SmallVec<[NodeId; 4]>,
    panel_visible: bool,
}

impl MenuGraph {
    pub fn new(name: impl Into<String>, config: MenuConfig) -> Self {
        let name = name.into();
        let button_prefix = config.button_prefix(&name);
        Self {
            id: MenuId::default(),
            name,
            config,
            button_prefix,
            nodes: Vec::new(),
            root: None,
            stack: SmallVec::new(),
            panel_visible: false,
        }
    }

    pub fn id(&self) -> MenuId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: MenuId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn handle(&self, node: NodeId) -> NodeHandle {
        NodeHandle::new(self.id, node)
    }

    /// Adds a node named `"{prefix}{name}"` and returns a builder for it.
    pub fn create(&mut self, name: &str) -> NodeBuilder<'_> {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes
            .push(MenuNode::new(format!("{}{name}", self.button_prefix)));
        NodeBuilder { graph: self, id }
    }

    /// Reopens the builder for an existing node.
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeBuilder<'_>, MenuError> {
        self.check(id)?;
        Ok(NodeBuilder { graph: self, id })
    }

    pub fn node(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MenuNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::from_index(index), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks a node up by its full (prefixed) name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.name() == name)
            .map(|(id, _)| id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) -> Result<(), MenuError> {
        self.check(root)?;
        self.root = Some(root);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Node at the top of the navigation stack.
    pub fn current(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Links `from` to `to` along `direction` and `to` back to `from` along
    /// the opposite direction. Links the two nodes previously held on those
    /// sides are unlinked on both ends.
    pub fn connect(
        &mut self,
        from: NodeId,
        direction: Direction,
        to: NodeId,
    ) -> Result<(), MenuError> {
        self.check(from)?;
        self.check(to)?;
        let opposite = direction.opposite();

        if let Some(previous) = self.nodes[from.index()].link(direction) {
            if self.nodes[previous.index()].link(opposite) == Some(from) {
                self.nodes[previous.index()].set_link(opposite, None);
            }
        }
        if let Some(previous) = self.nodes[to.index()].link(opposite) {
            if self.nodes[previous.index()].link(direction) == Some(to) {
                self.nodes[previous.index()].set_link(direction, None);
            }
        }

        self.nodes[from.index()].set_link(direction, Some(to));
        self.nodes[to.index()].set_link(opposite, Some(from));
        Ok(())
    }

    pub fn open<S>(
        &mut self,
        entry: Option<NodeId>,
        locale: &LocaleContext,
        surface: &mut S,
    ) -> Result<MenuTransition, MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        if let Some(entry) = entry {
            self.check(entry)?;
        }

        let mut transition = MenuTransition::default();
        if let Some(top) = self.current() {
            self.hide(top, surface);
            transition.hidden.push(top);
        } else {
            self.set_panel_visible(true, surface);
        }

        let Some(entry) = entry.or(self.root) else {
            let error = MenuError::NoEntryNode {
                menu: self.name.clone(),
            };
            error!("{error}");
            return Err(error);
        };

        self.stack.push(entry);
        self.show(entry, locale, surface);
        surface.select(Some(self.handle(entry)));
        transition.shown = Some(entry);
        Ok(transition)
    }

    pub fn back<S>(&mut self, locale: &LocaleContext, surface: &mut S) -> MenuTransition
    where
        S: NodeVisuals + MenuSelection,
    {
        let Some(top) = self.stack.pop() else {
            surface.select(None);
            return MenuTransition::default();
        };

        self.hide(top, surface);
        match self.current() {
            Some(next) => {
                self.show(next, locale, surface);
                surface.select(Some(self.handle(next)));
                MenuTransition {
                    shown: Some(next),
                    hidden: vec![top],
                    ..MenuTransition::default()
                }
            }
            None => {
                let mut transition = self.close(surface);
                transition.hidden.insert(0, top);
                transition
            }
        }
    }

    pub fn close<S>(&mut self, surface: &mut S) -> MenuTransition
    where
        S: NodeVisuals + MenuSelection,
    {
        let mut transition = MenuTransition {
            closed: true,
            ..MenuTransition::default()
        };
        while let Some(node) = self.stack.pop() {
            self.hide(node, surface);
            transition.hidden.push(node);
        }
        self.set_panel_visible(false, surface);

        if self.config.select_any_on_close {
            transition.handoff_focus = true;
        } else {
            surface.select(None);
        }
        transition
    }

    /// Reapplies localized text to the subtree at the top of the stack.
    pub fn reload<S: NodeVisuals>(&self, locale: &LocaleContext, surface: &mut S) {
        if let Some(top) = self.current() {
            self.refresh(top, locale, surface);
        }
    }

    fn set_panel_visible<S: NodeVisuals>(&mut self, visible: bool, surface: &mut S) {
        self.panel_visible = visible;
        surface.set_panel_visible(self.id, visible);
    }

    pub(crate) fn check(&self, id: NodeId) -> Result<(), MenuError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(MenuError::UnknownNode {
                menu: self.name.clone(),
                node: id,
            })
        }
    }

    pub(crate) fn node_entry_mut(&mut self, id: NodeId) -> Result<&mut MenuNode, MenuError> {
        self.check(id)?;
        Ok(&mut self.nodes[id.index()])
    }
}

/// Fluent handle for configuring one node.
pub struct NodeBuilder<'a> {
    graph: &'a mut MenuGraph,
    id: NodeId,
}

impl NodeBuilder<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Text for the default locale, whichever locale that turns out to be.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.graph.nodes[self.id.index()]
            .text_mut()
            .set_default(text);
        self
    }

    pub fn localize(self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.graph.nodes[self.id.index()]
            .text_mut()
            .set(locale, text);
        self
    }

    pub fn with_icon(self, icon: Handle<Image>) -> Self {
        if self.graph.config.icon_slot {
            self.graph.nodes[self.id.index()].set_icon(icon);
        } else {
            warn!(
                "{}",
                MenuError::MissingIconSlot {
                    node: self.graph.nodes[self.id.index()].name().to_string(),
                }
            );
        }
        self
    }

    pub fn on_click(self, callback: impl FnMut() + Send + Sync + 'static) -> Self {
        self.graph.nodes[self.id.index()].set_action(ClickAction::Callback(Box::new(callback)));
        self
    }

    pub fn on_command(self, command: MenuCommand) -> Self {
        self.graph.nodes[self.id.index()].set_action(ClickAction::Command(command));
        self
    }

    pub fn on_up(self, other: NodeId) -> Self {
        self.link(Direction::Up, other)
    }

    pub fn on_down(self, other: NodeId) -> Self {
        self.link(Direction::Down, other)
    }

    pub fn on_left(self, other: NodeId) -> Self {
        self.link(Direction::Left, other)
    }

    pub fn on_right(self, other: NodeId) -> Self {
        self.link(Direction::Right, other)
    }

    /// Makes `other` the deeper level opened when this node is clicked.
    pub fn on_in(self, other: NodeId) -> Self {
        match self.graph.check(other) {
            Ok(()) => self.graph.nodes[self.id.index()].set_in_link(other),
            Err(error) => error!("{error}"),
        }
        self
    }

    fn link(self, direction: Direction, other: NodeId) -> Self {
        if let Err(error) = self.graph.connect(self.id, direction, other) {
            error!("{error}");
        }
        self
    }
}
