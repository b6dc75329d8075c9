//! Directional menu navigation for Bevy.
//!
//! A [`MenuGraph`] links buttons along up/down/left/right and a one-way `in`
//! axis into submenus. Opening, stepping back and closing walk the linked
//! buttons to show, hide and lay them out. [`ProgrammableMenuPlugin`] keeps
//! every graph in the [`MenuRegistry`] resource and maps them onto UI
//! entities.
pub mod config;
pub mod graph;
pub mod locale;
pub mod registry;
pub mod schema;
pub mod surface;
pub mod systems;

pub use config::{MenuConfig, MenuConfigError};
pub use graph::{
    ClickAction, Direction, MenuCommand, MenuError, MenuGraph, MenuId, MenuNode, MenuTransition,
    NodeBuilder, NodeId,
};
pub use locale::{LocaleContext, LocalizedText, DEFAULT_LOCALE, UNTITLED};
pub use registry::{ClickOutcome, MenuRegistry};
pub use schema::{load_menu, CommandRegistry, MenuSchema, MenuSchemaError};
pub use surface::{MenuSelection, NodeHandle, NodeVisuals};
pub use systems::{spawn_menu_panel, MenuFocus, MenuIntent, MenuSystems, ProgrammableMenuPlugin};
