use std::{error::Error, fmt};

use bevy::math::Vec2;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_GAP: f32 = 10.0;

/// Per-menu settings. Fixed once the menu graph has been created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Lay buttons out relative to the node they were reached from.
    pub reposition: bool,
    pub gap_vertical: f32,
    pub gap_horizontal: f32,
    /// Position of the entry node of every walk.
    #[serde(deserialize_with = "deserialize_vec2")]
    pub offset: Vec2,
    /// Prepended to every button name. Blank means `"{menu name}_"`.
    pub name_prefix: Option<String>,
    /// On close, move focus to another open menu instead of clearing it.
    pub select_any_on_close: bool,
    pub show_on_start: bool,
    /// Whether button visuals carry an icon slot.
    pub icon_slot: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            reposition: true,
            gap_vertical: DEFAULT_GAP,
            gap_horizontal: DEFAULT_GAP,
            offset: Vec2::ZERO,
            name_prefix: None,
            select_any_on_close: false,
            show_on_start: false,
            icon_slot: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum MenuConfigError {
    Parse(String),
    Validation(String),
}

impl fmt::Display for MenuConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "menu config parse error: {err}"),
            Self::Validation(err) => write!(f, "menu config validation error: {err}"),
        }
    }
}

impl Error for MenuConfigError {}

impl MenuConfig {
    pub fn from_json(json: &str) -> Result<Self, MenuConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| MenuConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MenuConfigError> {
        if !self.gap_vertical.is_finite() || !self.gap_horizontal.is_finite() {
            return Err(MenuConfigError::Validation(
                "item gaps must be finite".to_string(),
            ));
        }
        if !self.offset.is_finite() {
            return Err(MenuConfigError::Validation(
                "offset must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the button name prefix for a menu called `menu_name`.
    pub fn button_prefix(&self, menu_name: &str) -> String {
        match self.name_prefix.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => prefix.to_string(),
            _ => format!("{menu_name}_"),
        }
    }
}

fn deserialize_vec2<'de, D>(deserializer: D) -> Result<Vec2, D::Error>
where
    D: Deserializer<'de>,
{
    let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
    Ok(Vec2::new(x, y))
}
