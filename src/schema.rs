//! Declarative menu definitions loaded from JSON.
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    error::Error,
    fmt,
};

use serde::Deserialize;

use crate::{
    config::MenuConfig,
    graph::{Direction, MenuCommand, MenuGraph, MenuId, NodeId},
    registry::MenuRegistry,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuSchema {
    pub id: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub config: MenuConfig,
    pub nodes: Vec<MenuNodeSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuNodeSchema {
    pub id: String,
    /// Text for the default locale.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub localized: BTreeMap<String, String>,
    #[serde(default)]
    pub up: Option<String>,
    #[serde(default)]
    pub down: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default, rename = "in")]
    pub enter: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

impl MenuNodeSchema {
    fn links(&self) -> [(Direction, Option<&String>); 4] {
        [
            (Direction::Up, self.up.as_ref()),
            (Direction::Down, self.down.as_ref()),
            (Direction::Left, self.left.as_ref()),
            (Direction::Right, self.right.as_ref()),
        ]
    }
}

#[derive(Debug, Clone)]
pub enum MenuSchemaError {
    Parse(String),
    Validation(String),
    CommandResolution {
        node_id: String,
        command_id: String,
        reason: String,
    },
}

impl fmt::Display for MenuSchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "schema parse error: {err}"),
            Self::Validation(err) => write!(f, "schema validation error: {err}"),
            Self::CommandResolution {
                node_id,
                command_id,
                reason,
            } => write!(
                f,
                "command resolution error for node `{node_id}` / command `{command_id}`: {reason}"
            ),
        }
    }
}

impl Error for MenuSchemaError {}

/// Named commands a schema may bind in addition to the built-ins
/// (`back`, `close`, `open`, `open:<node>`, `locale:<id>`).
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    by_id: HashMap<String, MenuCommand>,
}

impl CommandRegistry {
    pub fn from_entries<I, S>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (S, MenuCommand)>,
        S: Into<String>,
    {
        let mut by_id = HashMap::new();
        for (id, command) in entries {
            let id = id.into();
            if builtin_prefix(&id) {
                return Err(format!("command id `{id}` shadows a built-in command"));
            }
            if by_id.insert(id.clone(), command).is_some() {
                return Err(format!("duplicate command id `{id}` in command registry"));
            }
        }
        Ok(Self { by_id })
    }

    pub fn resolve(
        &self,
        command_id: &str,
        nodes: &HashMap<String, NodeId>,
    ) -> Result<MenuCommand, String> {
        match command_id {
            "back" => return Ok(MenuCommand::Back),
            "close" => return Ok(MenuCommand::Close),
            "open" => return Ok(MenuCommand::Open(None)),
            _ => {}
        }
        if let Some(target) = command_id.strip_prefix("open:") {
            return nodes
                .get(target)
                .map(|&node| MenuCommand::Open(Some(node)))
                .ok_or_else(|| format!("unknown node `{target}`"));
        }
        if let Some(locale) = command_id.strip_prefix("locale:") {
            if locale.trim().is_empty() {
                return Err("locale must not be blank".to_string());
            }
            return Ok(MenuCommand::SetLocale(locale.to_string()));
        }
        self.by_id
            .get(command_id)
            .cloned()
            .ok_or_else(|| format!("unknown command `{command_id}`"))
    }
}

fn builtin_prefix(id: &str) -> bool {
    matches!(id, "back" | "close" | "open") || id.starts_with("open:") || id.starts_with("locale:")
}

fn validate_schema(schema: &MenuSchema) -> Result<(), MenuSchemaError> {
    if schema.id.trim().is_empty() {
        return Err(MenuSchemaError::Validation(
            "menu id must not be empty".to_string(),
        ));
    }
    if schema.nodes.is_empty() {
        return Err(MenuSchemaError::Validation(
            "menu must define at least one node".to_string(),
        ));
    }
    schema
        .config
        .validate()
        .map_err(|err| MenuSchemaError::Validation(err.to_string()))?;

    let mut seen_ids = HashSet::new();
    for node in &schema.nodes {
        if node.id.trim().is_empty() {
            return Err(MenuSchemaError::Validation(
                "node id must not be empty".to_string(),
            ));
        }
        if !seen_ids.insert(node.id.as_str()) {
            return Err(MenuSchemaError::Validation(format!(
                "duplicate node id `{}`",
                node.id
            )));
        }
        if node.text.as_ref().is_some_and(|text| text.trim().is_empty()) {
            return Err(MenuSchemaError::Validation(format!(
                "node `{}` text must not be blank when provided",
                node.id
            )));
        }
        for (locale, text) in &node.localized {
            if locale.trim().is_empty() || text.trim().is_empty() {
                return Err(MenuSchemaError::Validation(format!(
                    "node `{}` has a blank localized entry",
                    node.id
                )));
            }
        }
        if node
            .command
            .as_ref()
            .is_some_and(|command| command.trim().is_empty())
        {
            return Err(MenuSchemaError::Validation(format!(
                "node `{}` command must not be blank",
                node.id
            )));
        }
    }

    for node in &schema.nodes {
        let targets = node
            .links()
            .into_iter()
            .filter_map(|(_, target)| target)
            .chain(node.enter.as_ref());
        for target in targets {
            if !seen_ids.contains(target.as_str()) {
                return Err(MenuSchemaError::Validation(format!(
                    "node `{}` links to unknown node `{target}`",
                    node.id
                )));
            }
        }
    }

    if let Some(root) = &schema.root {
        if !seen_ids.contains(root.as_str()) {
            return Err(MenuSchemaError::Validation(format!(
                "root `{root}` is not a node of this menu"
            )));
        }
    }

    Ok(())
}

pub fn parse_menu_schema(json: &str) -> Result<MenuSchema, MenuSchemaError> {
    let schema: MenuSchema =
        serde_json::from_str(json).map_err(|err| MenuSchemaError::Parse(err.to_string()))?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Builds a graph from a validated schema. Links are applied in node order.
pub fn build_menu_graph(
    schema: MenuSchema,
    commands: &CommandRegistry,
) -> Result<MenuGraph, MenuSchemaError> {
    let mut graph = MenuGraph::new(schema.id, schema.config);

    let mut ids = HashMap::with_capacity(schema.nodes.len());
    for node in &schema.nodes {
        let mut builder = graph.create(&node.id);
        if let Some(text) = &node.text {
            builder = builder.with_text(text.as_str());
        }
        for (locale, text) in &node.localized {
            builder = builder.localize(locale.as_str(), text.as_str());
        }
        ids.insert(node.id.clone(), builder.id());
    }

    for node in &schema.nodes {
        let id = ids[&node.id];
        for (direction, target) in node.links() {
            if let Some(target) = target {
                graph
                    .connect(id, direction, ids[target])
                    .map_err(|err| MenuSchemaError::Validation(err.to_string()))?;
            }
        }

        let mut builder = graph
            .node_mut(id)
            .map_err(|err| MenuSchemaError::Validation(err.to_string()))?;
        if let Some(target) = &node.enter {
            builder = builder.on_in(ids[target]);
        }
        if let Some(command_id) = &node.command {
            let command = commands.resolve(command_id, &ids).map_err(|reason| {
                MenuSchemaError::CommandResolution {
                    node_id: node.id.clone(),
                    command_id: command_id.clone(),
                    reason,
                }
            })?;
            builder.on_command(command);
        }
    }

    if let Some(root) = &schema.root {
        graph
            .set_root(ids[root])
            .map_err(|err| MenuSchemaError::Validation(err.to_string()))?;
    }

    Ok(graph)
}

/// Parses, validates and builds a menu, then registers it.
pub fn load_menu(
    json: &str,
    commands: &CommandRegistry,
    registry: &mut MenuRegistry,
) -> Result<MenuId, MenuSchemaError> {
    let schema = parse_menu_schema(json)?;
    let graph = build_menu_graph(schema, commands)?;
    Ok(registry.insert(graph))
}
