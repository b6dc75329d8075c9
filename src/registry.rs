//! Host-owned set of live menus and the locale they share.
use bevy::prelude::*;

use crate::{
    config::MenuConfig,
    graph::{ClickAction, MenuCommand, MenuError, MenuGraph, MenuId, MenuTransition, NodeId},
    locale::LocaleContext,
    surface::{MenuSelection, NodeHandle, NodeVisuals},
};

/// Result of clicking a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Command bound to the node, already applied.
    pub command: Option<MenuCommand>,
    /// The node's `in` link, opened after the command.
    pub entered: Option<NodeId>,
    pub ran_callback: bool,
}

#[derive(Resource, Debug, Default)]
pub struct MenuRegistry {
    menus: Vec<MenuGraph>,
    locale: LocaleContext,
}

impl MenuRegistry {
    pub fn new(locale: LocaleContext) -> Self {
        Self {
            menus: Vec::new(),
            locale,
        }
    }

    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    pub fn create_menu(&mut self, name: impl Into<String>, config: MenuConfig) -> MenuId {
        self.insert(MenuGraph::new(name, config))
    }

    pub fn insert(&mut self, mut graph: MenuGraph) -> MenuId {
        let id = MenuId::from_index(self.menus.len());
        graph.assign_id(id);
        self.menus.push(graph);
        id
    }

    pub fn menu(&self, id: MenuId) -> Option<&MenuGraph> {
        self.menus.get(id.index())
    }

    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut MenuGraph> {
        self.menus.get_mut(id.index())
    }

    pub fn find(&self, name: &str) -> Option<MenuId> {
        self.menus
            .iter()
            .find(|menu| menu.name() == name)
            .map(MenuGraph::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuGraph> {
        self.menus.iter()
    }

    pub fn open<S>(
        &mut self,
        menu: MenuId,
        entry: Option<NodeId>,
        surface: &mut S,
    ) -> Result<MenuTransition, MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        let graph = self
            .menus
            .get_mut(menu.index())
            .ok_or(MenuError::UnknownMenu(menu))?;
        graph.open(entry, &self.locale, surface)
    }

    pub fn back<S>(&mut self, menu: MenuId, surface: &mut S) -> Result<MenuTransition, MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        let graph = self
            .menus
            .get_mut(menu.index())
            .ok_or(MenuError::UnknownMenu(menu))?;
        let transition = graph.back(&self.locale, surface);
        self.hand_off_focus(menu, &transition, surface);
        Ok(transition)
    }

    pub fn close<S>(&mut self, menu: MenuId, surface: &mut S) -> Result<MenuTransition, MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        let graph = self
            .menus
            .get_mut(menu.index())
            .ok_or(MenuError::UnknownMenu(menu))?;
        let transition = graph.close(surface);
        self.hand_off_focus(menu, &transition, surface);
        Ok(transition)
    }

    /// Steps back when the menu is showing, opens its root otherwise.
    pub fn toggle<S>(&mut self, menu: MenuId, surface: &mut S) -> Result<MenuTransition, MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        let showing = self
            .menu(menu)
            .ok_or(MenuError::UnknownMenu(menu))?
            .is_open();
        if showing {
            self.back(menu, surface)
        } else {
            self.open(menu, None, surface)
        }
    }

    pub fn apply<S>(
        &mut self,
        menu: MenuId,
        command: MenuCommand,
        surface: &mut S,
    ) -> Result<(), MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        match command {
            MenuCommand::Open(entry) => self.open(menu, entry, surface).map(drop),
            MenuCommand::Back => self.back(menu, surface).map(drop),
            MenuCommand::Close => self.close(menu, surface).map(drop),
            MenuCommand::SetLocale(locale) => {
                self.set_locale(locale, surface);
                Ok(())
            }
        }
    }

    /// Runs the node's action, then opens its `in` link if it has one.
    ///
    /// A failing command is logged and does not stop the `in` link from
    /// opening; it is returned only when there is no link to open.
    pub fn click<S>(&mut self, node: NodeHandle, surface: &mut S) -> Result<ClickOutcome, MenuError>
    where
        S: NodeVisuals + MenuSelection,
    {
        let graph = self
            .menus
            .get_mut(node.menu.index())
            .ok_or(MenuError::UnknownMenu(node.menu))?;
        let menu_node = graph.node_entry_mut(node.node)?;
        let entered = menu_node.in_link();

        if menu_node.action().is_none() && entered.is_none() {
            let error = MenuError::UnreachableAction {
                node: menu_node.name().to_string(),
            };
            warn!("{error}");
            return Err(error);
        }

        let mut outcome = ClickOutcome {
            entered,
            ..ClickOutcome::default()
        };
        match menu_node.action_mut() {
            Some(ClickAction::Callback(callback)) => {
                callback();
                outcome.ran_callback = true;
            }
            Some(ClickAction::Command(command)) => outcome.command = Some(command.clone()),
            None => {}
        }

        if let Some(command) = outcome.command.clone() {
            if let Err(error) = self.apply(node.menu, command, surface) {
                if entered.is_none() {
                    return Err(error);
                }
                warn!("command on {node:?} failed before entering its submenu: {error}");
            }
        }
        if let Some(target) = entered {
            self.open(node.menu, Some(target), surface)?;
        }
        Ok(outcome)
    }

    /// Switches the shared locale and refreshes the visible subtree of every open menu.
    pub fn set_locale<S: NodeVisuals>(&mut self, locale: impl Into<String>, surface: &mut S) {
        self.locale.set_current(locale);
        for menu in self.menus.iter().filter(|menu| menu.is_open()) {
            menu.reload(&self.locale, surface);
        }
    }

    fn hand_off_focus<S: MenuSelection>(
        &self,
        closed: MenuId,
        transition: &MenuTransition,
        surface: &mut S,
    ) {
        if !transition.handoff_focus {
            return;
        }
        let target = self
            .menus
            .iter()
            .filter(|menu| menu.id() != closed)
            .find_map(|menu| menu.current().map(|node| menu.handle(node)));
        surface.select(target);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{locale::UNTITLED, surface::testing::RecordingSurface};

    /// Two-level menu shaped like the multi-menu demo.
    fn language_menu(registry: &mut MenuRegistry, config: MenuConfig) -> (MenuId, [NodeId; 5]) {
        let menu = registry.create_menu("menu", config);
        let graph = registry.menu_mut(menu).expect("menu");

        let start = graph
            .create("start")
            .with_text("Dummy Menu Item")
            .localize("lithuanian", "Nieko nedarau")
            .id();
        let choose = graph
            .create("choose_language")
            .with_text("Choose Language")
            .localize("lithuanian", "pasirinkti kalba")
            .id();
        let lithuanian = graph
            .create("lithuanian")
            .with_text("Lithuanian")
            .on_command(MenuCommand::SetLocale(String::from("lithuanian")))
            .id();
        let up = graph
            .create("up")
            .with_text("Go up")
            .localize("lithuanian", "atgal")
            .on_command(MenuCommand::Back)
            .id();
        let close = graph
            .create("close")
            .with_text("Close menu")
            .on_command(MenuCommand::Close)
            .id();

        graph.node_mut(start).expect("start").on_down(choose);
        graph.node_mut(choose).expect("choose").on_in(lithuanian);
        graph.node_mut(lithuanian).expect("lithuanian").on_down(up);
        graph.node_mut(up).expect("up").on_down(close);
        graph.set_root(start).expect("root");

        (menu, [start, choose, lithuanian, up, close])
    }

    #[test]
    fn click_on_in_link_opens_submenu() {
        let mut registry = MenuRegistry::default();
        let (menu, [start, choose, lithuanian, up, close]) =
            language_menu(&mut registry, MenuConfig::default());
        let mut surface = RecordingSurface::default();
        registry.open(menu, None, &mut surface).expect("open");

        let outcome = registry
            .click(NodeHandle::new(menu, choose), &mut surface)
            .expect("click");

        assert_eq!(outcome.entered, Some(lithuanian));
        let graph = registry.menu(menu).expect("menu");
        assert_eq!(graph.stack(), &[start, lithuanian]);
        assert!(!surface.is_active(menu, start));
        assert!(!surface.is_active(menu, choose));
        for node in [lithuanian, up, close] {
            assert!(surface.is_active(menu, node));
        }
    }

    #[test]
    fn back_command_returns_to_parent_level() {
        let mut registry = MenuRegistry::default();
        let (menu, [start, choose, _, up, _]) =
            language_menu(&mut registry, MenuConfig::default());
        let mut surface = RecordingSurface::default();
        registry.open(menu, None, &mut surface).expect("open");
        registry
            .click(NodeHandle::new(menu, choose), &mut surface)
            .expect("enter");

        let outcome = registry
            .click(NodeHandle::new(menu, up), &mut surface)
            .expect("back");

        assert_eq!(outcome.command, Some(MenuCommand::Back));
        let graph = registry.menu(menu).expect("menu");
        assert_eq!(graph.stack(), &[start]);
        assert!(surface.is_active(menu, choose));
        assert!(!surface.is_active(menu, up));
        assert_eq!(surface.selected, Some(NodeHandle::new(menu, start)));
    }

    #[test]
    fn close_command_closes_from_any_depth() {
        let mut registry = MenuRegistry::default();
        let (menu, [_, choose, _, _, close]) = language_menu(&mut registry, MenuConfig::default());
        let mut surface = RecordingSurface::default();
        registry.open(menu, None, &mut surface).expect("open");
        registry
            .click(NodeHandle::new(menu, choose), &mut surface)
            .expect("enter");

        registry
            .click(NodeHandle::new(menu, close), &mut surface)
            .expect("close");

        let graph = registry.menu(menu).expect("menu");
        assert!(!graph.is_open());
        assert!(surface.active.is_empty());
        assert!(!surface.panel_visible(menu));
    }

    #[test]
    fn click_without_action_or_submenu_is_reported() {
        let mut registry = MenuRegistry::default();
        let (menu, [start, ..]) = language_menu(&mut registry, MenuConfig::default());
        let mut surface = RecordingSurface::default();
        registry.open(menu, None, &mut surface).expect("open");
        surface.clear_events();

        let result = registry.click(NodeHandle::new(menu, start), &mut surface);

        assert!(matches!(result, Err(MenuError::UnreachableAction { .. })));
        assert!(surface.events.is_empty());
        assert_eq!(registry.menu(menu).map(MenuGraph::depth), Some(1));
    }

    #[test]
    fn callback_runs_before_entering_submenu() {
        let mut registry = MenuRegistry::default();
        let menu = registry.create_menu("menu", MenuConfig::default());
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        let graph = registry.menu_mut(menu).expect("menu");
        let sub = graph.create("sub").with_text("Sub").id();
        let entry = graph
            .create("entry")
            .with_text("Entry")
            .on_click(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .on_in(sub)
            .id();
        let mut surface = RecordingSurface::default();
        registry.open(menu, Some(entry), &mut surface).expect("open");

        let outcome = registry
            .click(NodeHandle::new(menu, entry), &mut surface)
            .expect("click");

        assert!(outcome.ran_callback);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(registry.menu(menu).and_then(MenuGraph::current), Some(sub));
    }

    #[test]
    fn failed_command_still_enters_submenu() {
        let mut registry = MenuRegistry::default();
        let menu = registry.create_menu("rootless", MenuConfig::default());
        let graph = registry.menu_mut(menu).expect("menu");
        let sub = graph.create("sub").with_text("Sub").id();
        let entry = graph
            .create("entry")
            .with_text("Entry")
            .on_command(MenuCommand::Open(None))
            .on_in(sub)
            .id();
        let dead_end = graph
            .create("dead_end")
            .with_text("Dead end")
            .on_command(MenuCommand::Open(None))
            .id();
        let mut surface = RecordingSurface::default();
        registry.open(menu, Some(entry), &mut surface).expect("open");

        let outcome = registry
            .click(NodeHandle::new(menu, entry), &mut surface)
            .expect("submenu still opens");

        assert_eq!(outcome.entered, Some(sub));
        let graph = registry.menu(menu).expect("menu");
        assert_eq!(graph.stack(), &[entry, sub]);
        assert!(surface.is_active(menu, sub));

        registry.open(menu, Some(dead_end), &mut surface).expect("open");
        assert!(matches!(
            registry.click(NodeHandle::new(menu, dead_end), &mut surface),
            Err(MenuError::NoEntryNode { .. })
        ));
    }

    #[test]
    fn inserted_graph_text_resolves_through_registry_default_locale() {
        let mut registry = MenuRegistry::new(LocaleContext::new("german"));
        let mut graph = MenuGraph::new("pause", MenuConfig::default());
        let start = graph.create("start").with_text("Start").id();
        let quit = graph
            .create("quit")
            .with_text("Quit")
            .localize("german", "Beenden")
            .id();
        graph.node_mut(start).expect("start").on_down(quit);
        graph.set_root(start).expect("root");
        let menu = registry.insert(graph);
        let mut surface = RecordingSurface::default();

        registry.open(menu, None, &mut surface).expect("open");

        assert_eq!(surface.text(menu, start), Some("Start"));
        assert_eq!(surface.text(menu, quit), Some("Beenden"));

        registry.set_locale("lithuanian", &mut surface);
        assert_eq!(surface.text(menu, start), Some("Start"));
        assert_eq!(surface.text(menu, quit), Some("Beenden"));
    }

    #[test]
    fn set_locale_refreshes_open_menus_only() {
        let mut registry = MenuRegistry::default();
        let (open_menu, [start, choose, ..]) = language_menu(&mut registry, MenuConfig::default());
        let (closed_menu, [closed_start, ..]) =
            language_menu(&mut registry, MenuConfig::default());
        let mut surface = RecordingSurface::default();
        registry.open(open_menu, None, &mut surface).expect("open");

        registry.set_locale("lithuanian", &mut surface);

        assert_eq!(registry.locale().current(), "lithuanian");
        assert_eq!(surface.text(open_menu, start), Some("Nieko nedarau"));
        assert_eq!(surface.text(open_menu, choose), Some("pasirinkti kalba"));
        assert_eq!(surface.text(closed_menu, closed_start), None);
    }

    #[test]
    fn set_locale_falls_back_to_default_text() {
        let mut registry = MenuRegistry::default();
        let menu = registry.create_menu("menu", MenuConfig::default());
        let graph = registry.menu_mut(menu).expect("menu");
        let only_default = graph.create("english_only").with_text("Other Dummy").id();
        let empty = graph.create("empty").id();
        graph
            .node_mut(only_default)
            .expect("node")
            .on_down(empty);
        graph.set_root(only_default).expect("root");
        let mut surface = RecordingSurface::default();
        registry.open(menu, None, &mut surface).expect("open");

        registry.set_locale("lithuanian", &mut surface);

        assert_eq!(surface.text(menu, only_default), Some("Other Dummy"));
        assert_eq!(surface.text(menu, empty), Some(UNTITLED));
    }

    #[test]
    fn closing_hands_focus_to_first_other_open_menu() {
        let mut registry = MenuRegistry::default();
        let handoff = MenuConfig {
            select_any_on_close: true,
            ..MenuConfig::default()
        };
        let (first, [first_start, ..]) = language_menu(&mut registry, MenuConfig::default());
        let (second, _) = language_menu(&mut registry, handoff);
        let mut surface = RecordingSurface::default();
        registry.open(first, None, &mut surface).expect("open first");
        registry.open(second, None, &mut surface).expect("open second");

        let transition = registry.back(second, &mut surface).expect("back");

        assert!(transition.closed);
        assert!(transition.handoff_focus);
        assert_eq!(surface.selected, Some(NodeHandle::new(first, first_start)));
    }

    #[test]
    fn handoff_clears_focus_when_nothing_else_is_open() {
        let mut registry = MenuRegistry::default();
        let handoff = MenuConfig {
            select_any_on_close: true,
            ..MenuConfig::default()
        };
        let (menu, _) = language_menu(&mut registry, handoff);
        let mut surface = RecordingSurface::default();
        registry.open(menu, None, &mut surface).expect("open");

        registry.close(menu, &mut surface).expect("close");

        assert_eq!(surface.selected, None);
    }

    #[test]
    fn toggle_opens_then_backs_out() {
        let mut registry = MenuRegistry::default();
        let (menu, _) = language_menu(&mut registry, MenuConfig::default());
        let mut surface = RecordingSurface::default();

        registry.toggle(menu, &mut surface).expect("toggle open");
        assert!(registry.menu(menu).is_some_and(MenuGraph::is_open));

        registry.toggle(menu, &mut surface).expect("toggle back");
        assert!(!registry.menu(menu).is_some_and(MenuGraph::is_open));
    }

    #[test]
    fn unknown_menu_is_an_error() {
        let mut registry = MenuRegistry::default();
        let mut surface = RecordingSurface::default();
        let missing = MenuId::from_index(3);

        assert_eq!(
            registry.back(missing, &mut surface),
            Err(MenuError::UnknownMenu(missing))
        );
        assert_eq!(registry.find("menu"), None);
    }
}
