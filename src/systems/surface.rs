//! ECS-backed implementation of the menu surface traits.
//!
//! The graph writes into [`MenuButtonState`]; `sync_menu_button_visuals`
//! mirrors that into Bevy UI components so hosts may also drive buttons that
//! have no UI node at all.
use std::collections::HashMap;

use bevy::{ecs::system::SystemParam, prelude::*};

use crate::{
    graph::MenuId,
    surface::{MenuSelection, NodeHandle, NodeVisuals},
};

pub const DEFAULT_BUTTON_SIZE: Vec2 = Vec2::new(200.0, 40.0);

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
#[require(Visibility)]
pub struct MenuPanel {
    pub menu: MenuId,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
#[require(MenuButtonState, Visibility)]
pub struct MenuButton(pub NodeHandle);

/// Child entity that receives the button's localized label.
#[derive(Component, Clone, Copy, Debug)]
pub struct MenuButtonLabel;

/// Child entity that receives the button's icon.
#[derive(Component, Clone, Copy, Debug)]
pub struct MenuButtonIcon;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct MenuButtonState {
    pub active: bool,
    pub position: Vec2,
    pub size: Vec2,
    pub label: String,
    pub icon: Option<Handle<Image>>,
}

impl Default for MenuButtonState {
    fn default() -> Self {
        Self {
            active: false,
            position: Vec2::ZERO,
            size: DEFAULT_BUTTON_SIZE,
            label: String::new(),
            icon: None,
        }
    }
}

/// Currently selected menu button, if any.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuFocus(pub Option<NodeHandle>);

#[derive(SystemParam)]
pub struct MenuSurfaceParams<'w, 's> {
    buttons: Query<'w, 's, (Entity, &'static MenuButton, &'static mut MenuButtonState)>,
    panels: Query<'w, 's, (&'static MenuPanel, &'static mut Visibility), Without<MenuButton>>,
    focus: ResMut<'w, MenuFocus>,
}

impl<'w, 's> MenuSurfaceParams<'w, 's> {
    /// Indexes the current buttons and returns a surface over them.
    pub fn surface(&mut self) -> MenuSurface<'_, 'w, 's> {
        let by_handle = self
            .buttons
            .iter()
            .map(|(entity, button, _)| (button.0, entity))
            .collect();
        MenuSurface {
            params: self,
            by_handle,
        }
    }
}

pub struct MenuSurface<'a, 'w, 's> {
    params: &'a mut MenuSurfaceParams<'w, 's>,
    by_handle: HashMap<NodeHandle, Entity>,
}

impl MenuSurface<'_, '_, '_> {
    fn with_state(&mut self, node: NodeHandle, apply: impl FnOnce(&mut MenuButtonState)) {
        let Some(&entity) = self.by_handle.get(&node) else {
            debug!("menu node {node:?} has no button entity");
            return;
        };
        if let Ok((_, _, mut state)) = self.params.buttons.get_mut(entity) {
            apply(&mut state);
        }
    }

    fn state(&self, node: NodeHandle) -> Option<&MenuButtonState> {
        let entity = self.by_handle.get(&node)?;
        self.params
            .buttons
            .get(*entity)
            .ok()
            .map(|(_, _, state)| state)
    }
}

impl NodeVisuals for MenuSurface<'_, '_, '_> {
    fn activate(&mut self, node: NodeHandle) {
        self.with_state(node, |state| state.active = true);
    }

    fn deactivate(&mut self, node: NodeHandle) {
        self.with_state(node, |state| state.active = false);
    }

    fn set_position(&mut self, node: NodeHandle, position: Vec2) {
        self.with_state(node, |state| state.position = position);
    }

    fn position(&self, node: NodeHandle) -> Vec2 {
        self.state(node).map_or(Vec2::ZERO, |state| state.position)
    }

    fn size(&self, node: NodeHandle) -> Vec2 {
        self.state(node)
            .map_or(DEFAULT_BUTTON_SIZE, |state| state.size)
    }

    fn set_display_text(&mut self, node: NodeHandle, text: &str) {
        self.with_state(node, |state| state.label = text.to_string());
    }

    fn set_icon(&mut self, node: NodeHandle, icon: &Handle<Image>) {
        self.with_state(node, |state| state.icon = Some(icon.clone()));
    }

    fn set_panel_visible(&mut self, menu: MenuId, visible: bool) {
        for (panel, mut visibility) in self.params.panels.iter_mut() {
            if panel.menu == menu {
                *visibility = if visible {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
            }
        }
    }
}

impl MenuSelection for MenuSurface<'_, '_, '_> {
    fn select(&mut self, node: Option<NodeHandle>) {
        self.params.focus.0 = node;
    }
}

/// Copies [`MenuButtonState`] into the UI components present on a button.
pub fn sync_menu_button_visuals(
    mut button_query: Query<
        (
            &MenuButtonState,
            &mut Visibility,
            Option<&mut Node>,
            Option<&Children>,
        ),
        (With<MenuButton>, Changed<MenuButtonState>),
    >,
    mut label_query: Query<&mut Text, With<MenuButtonLabel>>,
    mut icon_query: Query<&mut ImageNode, With<MenuButtonIcon>>,
) {
    for (state, mut visibility, node, children) in button_query.iter_mut() {
        *visibility = if state.active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        if let Some(mut node) = node {
            node.position_type = PositionType::Absolute;
            node.left = Val::Px(state.position.x);
            node.top = Val::Px(state.position.y);
        }

        let Some(children) = children else {
            continue;
        };
        for child in children.iter() {
            if let Ok(mut text) = label_query.get_mut(child) {
                if text.0 != state.label {
                    text.0 = state.label.clone();
                }
            }
            if let (Ok(mut image), Some(icon)) = (icon_query.get_mut(child), &state.icon) {
                image.image = icon.clone();
            }
        }
    }
}

/// Feeds laid-out button sizes back so the next walk spaces buttons correctly.
pub fn sync_menu_button_sizes(
    mut button_query: Query<(&ComputedNode, &mut MenuButtonState), Changed<ComputedNode>>,
) {
    for (computed, mut state) in button_query.iter_mut() {
        let size = computed.size() * computed.inverse_scale_factor();
        if size != Vec2::ZERO && state.size != size {
            state.size = size;
        }
    }
}
