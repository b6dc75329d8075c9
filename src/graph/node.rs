use std::fmt;

use bevy::prelude::*;
use enum_map::EnumMap;

use super::{Direction, MenuError};
use crate::locale::{LocaleContext, LocalizedText, UNTITLED};

/// Index of a node inside the graph that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Navigation requests a button can issue when clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    /// Open the given node, or the menu root when `None`.
    Open(Option<NodeId>),
    Back,
    Close,
    SetLocale(String),
}

pub type ClickCallback = Box<dyn FnMut() + Send + Sync>;

pub enum ClickAction {
    Command(MenuCommand),
    Callback(ClickCallback),
}

impl fmt::Debug for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[derive(Debug)]
pub struct MenuNode {
    name: String,
    links: EnumMap<Direction, Option<NodeId>>,
    in_link: Option<NodeId>,
    text: LocalizedText,
    action: Option<ClickAction>,
    icon: Option<Handle<Image>>,
}

impl MenuNode {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            links: EnumMap::default(),
            in_link: None,
            text: LocalizedText::default(),
            action: None,
            icon: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self, direction: Direction) -> Option<NodeId> {
        self.links[direction]
    }

    pub fn up(&self) -> Option<NodeId> {
        self.link(Direction::Up)
    }

    pub fn down(&self) -> Option<NodeId> {
        self.link(Direction::Down)
    }

    pub fn left(&self) -> Option<NodeId> {
        self.link(Direction::Left)
    }

    pub fn right(&self) -> Option<NodeId> {
        self.link(Direction::Right)
    }

    pub fn in_link(&self) -> Option<NodeId> {
        self.in_link
    }

    pub fn text(&self) -> &LocalizedText {
        &self.text
    }

    pub fn action(&self) -> Option<&ClickAction> {
        self.action.as_ref()
    }

    pub fn icon(&self) -> Option<&Handle<Image>> {
        self.icon.as_ref()
    }

    /// Text for the current locale, falling back to the default locale.
    pub fn localized_text(&self, locale: &LocaleContext) -> Result<&str, MenuError> {
        self.text
            .resolve(locale)
            .ok_or_else(|| MenuError::LookupMiss {
                node: self.name.clone(),
                current: locale.current().to_string(),
                default: locale.default_locale().to_string(),
            })
    }

    /// Like [`Self::localized_text`] but never fails; a miss is logged and
    /// rendered as [`UNTITLED`].
    pub fn display_text(&self, locale: &LocaleContext) -> &str {
        match self.localized_text(locale) {
            Ok(text) => text,
            Err(error) => {
                warn!("{error}");
                UNTITLED
            }
        }
    }

    pub(crate) fn set_link(&mut self, direction: Direction, target: Option<NodeId>) {
        self.links[direction] = target;
    }

    pub(crate) fn set_in_link(&mut self, target: NodeId) {
        self.in_link = Some(target);
    }

    pub(crate) fn text_mut(&mut self) -> &mut LocalizedText {
        &mut self.text
    }

    pub(crate) fn set_action(&mut self, action: ClickAction) {
        self.action = Some(action);
    }

    pub(crate) fn action_mut(&mut self) -> Option<&mut ClickAction> {
        self.action.as_mut()
    }

    pub(crate) fn set_icon(&mut self, icon: Handle<Image>) {
        self.icon = Some(icon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::DEFAULT_LOCALE;

    #[test]
    fn default_text_is_used_for_other_locales() {
        let mut node = MenuNode::new(String::from("main_start"));
        node.text_mut().set(DEFAULT_LOCALE, "A");

        let locale = LocaleContext::default().with_current("lithuanian");
        assert_eq!(node.localized_text(&locale), Ok("A"));
        assert_eq!(node.display_text(&locale), "A");
    }

    #[test]
    fn empty_node_renders_untitled() {
        let node = MenuNode::new(String::from("main_start"));
        let locale = LocaleContext::default();

        assert!(matches!(
            node.localized_text(&locale),
            Err(MenuError::LookupMiss { .. })
        ));
        assert_eq!(node.display_text(&locale), UNTITLED);
    }

    #[test]
    fn click_action_debug_hides_callback_body() {
        let action = ClickAction::Callback(Box::new(|| {}));
        assert_eq!(format!("{action:?}"), "Callback(..)");

        let action = ClickAction::Command(MenuCommand::Back);
        assert_eq!(format!("{action:?}"), "Command(Back)");
    }
}
