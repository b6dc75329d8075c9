//! Bevy integration: registry resource, button entities and intent handling.
//!
//! Hosts build graphs in [`MenuRegistry`], spawn one panel per graph with
//! [`spawn_menu_panel`] and drive navigation by writing [`MenuIntent`]s.
//! Pressing a spawned button is forwarded as a click automatically.
use bevy::prelude::*;

use crate::{
    graph::{MenuError, MenuGraph, MenuId, NodeId},
    registry::MenuRegistry,
    surface::{NodeHandle, NodeVisuals},
};

mod surface;

pub use surface::{
    sync_menu_button_sizes, sync_menu_button_visuals, MenuButton, MenuButtonIcon, MenuButtonLabel,
    MenuButtonState, MenuFocus, MenuPanel, MenuSurface, MenuSurfaceParams, DEFAULT_BUTTON_SIZE,
};

const BUTTON_CONTENT_GAP: f32 = 8.0;

pub struct ProgrammableMenuPlugin;

impl Plugin for ProgrammableMenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuRegistry>()
            .init_resource::<MenuFocus>()
            .add_message::<MenuIntent>()
            .add_systems(
                Update,
                (
                    initialize_menu_panels,
                    forward_button_presses,
                    apply_menu_intents,
                    sync_menu_button_sizes,
                    sync_menu_button_visuals,
                )
                    .chain()
                    .in_set(MenuSystems),
            );
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct MenuSystems;

#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub enum MenuIntent {
    /// Open `entry`, or the menu root when `None`.
    Open {
        menu: MenuId,
        entry: Option<NodeId>,
    },
    Back(MenuId),
    Close(MenuId),
    /// Back when showing, open otherwise.
    Toggle(MenuId),
    Click(NodeHandle),
    SetLocale(String),
}

/// Spawns a hidden panel for `graph` with one inactive button per node.
pub fn spawn_menu_panel(commands: &mut Commands, graph: &MenuGraph) -> Entity {
    let icon_slot = graph.config().icon_slot;
    commands
        .spawn((
            Name::new(graph.name().to_string()),
            MenuPanel { menu: graph.id() },
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            Visibility::Hidden,
        ))
        .with_children(|panel| {
            for (id, node) in graph.nodes() {
                panel
                    .spawn((
                        Name::new(node.name().to_string()),
                        MenuButton(graph.handle(id)),
                        Button,
                        Node {
                            position_type: PositionType::Absolute,
                            width: Val::Px(DEFAULT_BUTTON_SIZE.x),
                            height: Val::Px(DEFAULT_BUTTON_SIZE.y),
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            column_gap: Val::Px(BUTTON_CONTENT_GAP),
                            ..default()
                        },
                    ))
                    .with_children(|button| {
                        if icon_slot {
                            button.spawn((MenuButtonIcon, ImageNode::default()));
                        }
                        button.spawn((MenuButtonLabel, Text::new(String::new())));
                    });
            }
        })
        .id()
}

/// Opens panels configured to show on start and hides the rest.
fn initialize_menu_panels(
    panel_query: Query<&MenuPanel, Added<MenuPanel>>,
    mut registry: ResMut<MenuRegistry>,
    mut surface_params: MenuSurfaceParams,
) {
    let added: Vec<MenuId> = panel_query.iter().map(|panel| panel.menu).collect();
    if added.is_empty() {
        return;
    }

    let mut surface = surface_params.surface();
    for menu in added {
        let Some(show_on_start) = registry
            .menu(menu)
            .map(|graph| graph.config().show_on_start)
        else {
            warn!("{}", MenuError::UnknownMenu(menu));
            continue;
        };
        if show_on_start {
            if let Err(error) = registry.open(menu, None, &mut surface) {
                debug!("menu {} not opened on start: {error}", menu.index());
            }
        } else {
            surface.set_panel_visible(menu, false);
        }
    }
}

fn forward_button_presses(
    button_query: Query<(&Interaction, &MenuButton), Changed<Interaction>>,
    mut intents: MessageWriter<MenuIntent>,
) {
    for (interaction, button) in button_query.iter() {
        if *interaction == Interaction::Pressed {
            intents.write(MenuIntent::Click(button.0));
        }
    }
}

fn apply_menu_intents(
    mut intents: MessageReader<MenuIntent>,
    mut registry: ResMut<MenuRegistry>,
    mut surface_params: MenuSurfaceParams,
) {
    if intents.is_empty() {
        return;
    }

    let mut surface = surface_params.surface();
    for intent in intents.read() {
        let result = match intent {
            MenuIntent::Open { menu, entry } => registry.open(*menu, *entry, &mut surface).map(drop),
            MenuIntent::Back(menu) => registry.back(*menu, &mut surface).map(drop),
            MenuIntent::Close(menu) => registry.close(*menu, &mut surface).map(drop),
            MenuIntent::Toggle(menu) => registry.toggle(*menu, &mut surface).map(drop),
            MenuIntent::Click(node) => registry.click(*node, &mut surface).map(drop),
            MenuIntent::SetLocale(locale) => {
                registry.set_locale(locale.clone(), &mut surface);
                Ok(())
            }
        };
        if let Err(error) = result {
            debug!("menu intent {intent:?} not applied: {error}");
        }
    }
}
