use serde::{Deserialize, Serialize};

/// A single parsed dependency specifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Bare, lower-cased package name (may be empty for garbage input)
    pub name: String,
    /// The specifier exactly as the registry reported it
    pub raw: String,
    pub dep_type: DependencyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyType {
    Runtime, // Installed by default
    Extra,   // Only pulled in through an `extra == "..."` marker
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyType::Runtime => write!(f, "runtime"),
            DependencyType::Extra => write!(f, "extra"),
        }
    }
}

impl Dependency {
    /// Whether this dependency belongs in the graph at all
    pub fn is_graph_edge(&self) -> bool {
        self.dep_type == DependencyType::Runtime && !self.name.is_empty()
    }
}
