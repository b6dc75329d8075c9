use bevy::{log::LogPlugin, prelude::*};

use programmable_menu::{
    load_menu, spawn_menu_panel, systems::MenuButtonState, CommandRegistry, MenuCommand,
    MenuConfig, MenuError, MenuFocus, MenuGraph, MenuId, MenuIntent, MenuRegistry, MenuSystems,
    NodeHandle, ProgrammableMenuPlugin,
};

const MENU_ONE_CONFIG: &str = r#"{ "offset": [20.0, 40.0], "select_any_on_close": true }"#;
const MENU_TWO: &str = include_str!("./demo/language_menu.json");

fn main() {
    App::new()
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(ProgrammableMenuPlugin)
        .add_systems(Startup, setup_menus)
        .add_systems(
            Update,
            (
                drive_demo.before(MenuSystems),
                report_menus.after(MenuSystems),
            ),
        )
        .run();
}

#[derive(Resource)]
struct DemoMenus {
    one: MenuId,
    choose_language: NodeHandle,
    lithuanian: NodeHandle,
    other_dummy: NodeHandle,
    go_up: NodeHandle,
    two: Option<MenuId>,
}

fn setup_menus(mut commands: Commands, mut registry: ResMut<MenuRegistry>) {
    let config = MenuConfig::from_json(MENU_ONE_CONFIG).unwrap_or_else(|error| {
        warn!("menu one config rejected, using defaults: {error}");
        MenuConfig::default()
    });
    let one = registry.create_menu("menu_one", config);
    let Some(graph) = registry.menu_mut(one) else {
        return;
    };
    let nodes = match build_language_menu(graph) {
        Ok(nodes) => nodes,
        Err(error) => {
            error!("menu one not built: {error}");
            return;
        }
    };

    let two = load_menu(MENU_TWO, &CommandRegistry::default(), &mut registry)
        .inspect_err(|error| error!("menu two not loaded: {error}"))
        .ok();

    for menu in [Some(one), two].into_iter().flatten() {
        if let Some(graph) = registry.menu(menu) {
            spawn_menu_panel(&mut commands, graph);
        }
    }
    commands.insert_resource(DemoMenus {
        one,
        choose_language: NodeHandle::new(one, nodes.choose_language),
        lithuanian: NodeHandle::new(one, nodes.lithuanian),
        other_dummy: NodeHandle::new(one, nodes.other_dummy),
        go_up: NodeHandle::new(one, nodes.go_up),
        two,
    });
}

struct LanguageMenuNodes {
    choose_language: programmable_menu::NodeId,
    lithuanian: programmable_menu::NodeId,
    other_dummy: programmable_menu::NodeId,
    go_up: programmable_menu::NodeId,
}

fn build_language_menu(graph: &mut MenuGraph) -> Result<LanguageMenuNodes, MenuError> {
    // No asset server in the headless demo, so the icon is a placeholder handle.
    let start = graph
        .create("menu_start")
        .with_text("Dummy Menu Item")
        .with_icon(Handle::default())
        .localize("lithuanian", "Nieko nedarau")
        .id();
    let close = graph
        .create("menu_close")
        .with_text("Close menu")
        .localize("lithuanian", "uzdaryti")
        .on_command(MenuCommand::Close)
        .id();
    let go_up = graph
        .create("menu_up")
        .with_text("Go up")
        .localize("lithuanian", "atgal")
        .on_command(MenuCommand::Back)
        .id();
    let choose_language = graph
        .create("menu_a")
        .with_text("Choose Language")
        .localize("lithuanian", "pasirinkti kalba")
        .id();
    let other_dummy = graph
        .create("menu_b")
        .with_text("Other Dummy")
        .localize("lithuanian", "nieko nedarysiu")
        .on_click(|| info!("other dummy clicked"))
        .id();
    let english = graph
        .create("menu_in_a")
        .with_text("English")
        .on_command(MenuCommand::SetLocale(String::from("english")))
        .id();
    let lithuanian = graph
        .create("menu_in_b")
        .with_text("Lithuanian")
        .on_command(MenuCommand::SetLocale(String::from("lithuanian")))
        .id();

    graph.node_mut(start)?.on_down(choose_language);
    graph
        .node_mut(choose_language)?
        .on_down(other_dummy)
        .on_in(english);
    graph.node_mut(english)?.on_down(lithuanian);
    graph.node_mut(lithuanian)?.on_down(go_up);
    graph.node_mut(go_up)?.on_down(close);
    graph.set_root(start)?;

    Ok(LanguageMenuNodes {
        choose_language,
        lithuanian,
        other_dummy,
        go_up,
    })
}

/// Stands in for keyboard input: one navigation step per frame.
fn drive_demo(
    mut step: Local<usize>,
    menus: Option<Res<DemoMenus>>,
    mut intents: MessageWriter<MenuIntent>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(menus) = menus else {
        return;
    };

    let intent = match *step {
        0 => Some(MenuIntent::Toggle(menus.one)),
        1 => Some(MenuIntent::Click(menus.other_dummy)),
        2 => Some(MenuIntent::Click(menus.choose_language)),
        3 => Some(MenuIntent::Click(menus.lithuanian)),
        4 => menus.two.map(MenuIntent::Toggle),
        5 => Some(MenuIntent::Click(menus.go_up)),
        6 => Some(MenuIntent::Toggle(menus.one)),
        7 => Some(MenuIntent::SetLocale(String::from("english"))),
        8 => menus.two.map(MenuIntent::Toggle),
        _ => {
            exit.write(AppExit::Success);
            None
        }
    };
    if let Some(intent) = intent {
        info!("step {}: {intent:?}", *step);
        intents.write(intent);
    }
    *step += 1;
}

fn report_menus(
    registry: Res<MenuRegistry>,
    focus: Res<MenuFocus>,
    button_query: Query<(&Name, &MenuButtonState)>,
) {
    if !registry.is_changed() && !focus.is_changed() {
        return;
    }

    for menu in registry.iter() {
        info!(
            "{}: depth {}, panel {}",
            menu.name(),
            menu.depth(),
            if menu.is_panel_visible() { "shown" } else { "hidden" }
        );
    }
    for (name, state) in button_query.iter().filter(|(_, state)| state.active) {
        info!(
            "  {name} \"{}\" at ({}, {}){}",
            state.label,
            state.position.x,
            state.position.y,
            if state.icon.is_some() { " with icon" } else { "" }
        );
    }
    info!("focus: {:?}", focus.0);
}
