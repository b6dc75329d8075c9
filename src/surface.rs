//! Capabilities the navigation core drives but does not implement.
//!
//! The graph decides which buttons are visible, where they sit and what they
//! say; a surface turns that into whatever the host renders.
use bevy::prelude::*;

use crate::graph::{MenuId, NodeId};

/// A node addressed across menus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub menu: MenuId,
    pub node: NodeId,
}

impl NodeHandle {
    pub const fn new(menu: MenuId, node: NodeId) -> Self {
        Self { menu, node }
    }
}

pub trait NodeVisuals {
    fn activate(&mut self, node: NodeHandle);
    fn deactivate(&mut self, node: NodeHandle);
    fn set_position(&mut self, node: NodeHandle, position: Vec2);
    fn position(&self, node: NodeHandle) -> Vec2;
    fn size(&self, node: NodeHandle) -> Vec2;
    fn set_display_text(&mut self, node: NodeHandle, text: &str);
    fn set_icon(&mut self, node: NodeHandle, icon: &Handle<Image>);
    fn set_panel_visible(&mut self, menu: MenuId, visible: bool);
}

pub trait MenuSelection {
    /// `None` clears the selection.
    fn select(&mut self, node: Option<NodeHandle>);
}
