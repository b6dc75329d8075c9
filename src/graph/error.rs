use std::{error::Error, fmt};

use super::{MenuId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// `open` was called without an entry node and the graph has no root.
    NoEntryNode { menu: String },
    /// An icon was assigned on a menu whose buttons have no icon slot.
    MissingIconSlot { node: String },
    /// Neither the current nor the default locale has text for the node.
    LookupMiss {
        node: String,
        current: String,
        default: String,
    },
    /// A node was clicked that has no action and no deeper menu.
    UnreachableAction { node: String },
    UnknownNode { menu: String, node: NodeId },
    UnknownMenu(MenuId),
    /// The tree walk went deeper than the graph has nodes, so it was following a cycle.
    CycleDepthExceeded { node: String, depth: usize },
    /// A walk revisited nodes so often that it switched to one visit per node.
    WalkBudgetExceeded { menu: String, visits: usize },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEntryNode { menu } => write!(
                f,
                "menu `{menu}` has no root node; set one or pass an entry node to open"
            ),
            Self::MissingIconSlot { node } => {
                write!(f, "cannot set icon on `{node}`: menu buttons have no icon slot")
            }
            Self::LookupMiss {
                node,
                current,
                default,
            } if current == default => {
                write!(f, "no text for menu node `{node}` in locale `{current}`")
            }
            Self::LookupMiss {
                node,
                current,
                default,
            } => write!(
                f,
                "no text for menu node `{node}` (current locale `{current}`, default locale `{default}`)"
            ),
            Self::UnreachableAction { node } => write!(
                f,
                "no action bound to `{node}` and no deeper menu level to enter"
            ),
            Self::UnknownNode { menu, node } => {
                write!(f, "node {} does not belong to menu `{menu}`", node.index())
            }
            Self::UnknownMenu(menu) => write!(f, "menu {} is not registered", menu.index()),
            Self::CycleDepthExceeded { node, depth } => write!(
                f,
                "menu walk reached depth {depth} at `{node}`; links form a cycle, branch skipped"
            ),
            Self::WalkBudgetExceeded { menu, visits } => write!(
                f,
                "menu `{menu}` walk stopped repeating nodes after {visits} visits"
            ),
        }
    }
}

impl Error for MenuError {}
