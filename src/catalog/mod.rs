//! Tool catalog: the immutable, ordered list of tool descriptors.

mod builtin;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Logical grouping of tools on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Code,
    Term,
    Ide,
    Prod,
    Infra,
    Utils,
    Runtime,
    Sys,
}

impl Category {
    /// Display order on the dashboard.
    pub const ALL: [Category; 8] = [
        Category::Code,
        Category::Term,
        Category::Ide,
        Category::Prod,
        Category::Infra,
        Category::Utils,
        Category::Runtime,
        Category::Sys,
    ];

    /// Short tag used in catalogs and matched by the search filter.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Code => "CODE",
            Self::Term => "TERM",
            Self::Ide => "IDE",
            Self::Prod => "PROD",
            Self::Infra => "INFRA",
            Self::Utils => "UTILS",
            Self::Runtime => "RUNTIME",
            Self::Sys => "SYS",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Code => "AI Development",
            Self::Term => "Terminals",
            Self::Ide => "IDEs & Editors",
            Self::Prod => "Productivity",
            Self::Infra => "Infrastructure",
            Self::Utils => "Utilities",
            Self::Runtime => "Runtimes",
            Self::Sys => "System",
        }
    }

    /// Key that jumps the cursor to this category.
    #[must_use]
    pub fn jump_key(self) -> char {
        match self {
            Self::Code => 'c',
            Self::Term => 't',
            Self::Ide => 'i',
            Self::Prod => 'p',
            Self::Infra => 'f',
            Self::Utils => 'u',
            Self::Runtime => 'r',
            Self::Sys => 's',
        }
    }

    #[must_use]
    pub fn from_jump_key(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.jump_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How a tool is probed and updated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum UpdateMethod {
    /// Package-manager formula (`brew upgrade <pkg>`).
    BrewPkg,
    /// macOS application bundle, upgradable only when tracked as a cask.
    MacApp,
    /// Global npm package installed at its `latest` tag.
    NpmPkg,
    /// npm itself, updated the same way as a global package.
    NpmSys,
    /// Oh My Zsh: git checkout upgraded by its own script.
    Omz,
    /// Re-run a published install script.
    InstallScript { url: String },
    /// No automated update path.
    Manual,
}

impl UpdateMethod {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::BrewPkg => "brew_pkg",
            Self::MacApp => "mac_app",
            Self::NpmPkg => "npm_pkg",
            Self::NpmSys => "npm_sys",
            Self::Omz => "omz",
            Self::InstallScript { .. } => "install_script",
            Self::Manual => "manual",
        }
    }

    #[must_use]
    pub fn is_npm(&self) -> bool {
        matches!(self, Self::NpmPkg | Self::NpmSys)
    }
}

impl fmt::Display for UpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Static identity and metadata of one manageable tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Binary on PATH, or application name for bundles.
    pub binary: String,
    #[serde(default)]
    pub package: String,
    pub category: Category,
    #[serde(flatten)]
    pub method: UpdateMethod,
}

impl ToolDescriptor {
    pub fn new(
        name: &str,
        binary: &str,
        package: &str,
        category: Category,
        method: UpdateMethod,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            binary: binary.to_string(),
            package: package.to_string(),
            category,
            method,
        }
    }

    /// Package identifier, falling back to the binary name.
    #[must_use]
    pub fn package_or_binary(&self) -> &str {
        if self.package.is_empty() {
            &self.binary
        } else {
            &self.package
        }
    }

    /// Case-insensitive substring match over name, binary, package and category.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.binary.as_str(),
            self.package.as_str(),
            self.category.tag(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Immutable, deterministically ordered list of descriptors with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Arc<[ToolDescriptor]>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "tool")]
    tools: Vec<ToolDescriptor>,
}

impl Catalog {
    /// Build a catalog, assigning `S-NN` ids to descriptors without one.
    pub fn new(mut tools: Vec<ToolDescriptor>) -> Result<Self> {
        if tools.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for (i, tool) in tools.iter_mut().enumerate() {
            if tool.id.is_empty() {
                tool.id = format!("S-{:02}", i + 1);
            }
            if tool.binary.is_empty() {
                return Err(Error::Catalog(format!("tool '{}' has no binary", tool.name)));
            }
            if !seen.insert(tool.id.clone()) {
                return Err(Error::DuplicateTool(tool.id.clone()));
            }
        }
        Ok(Self {
            tools: tools.into(),
        })
    }

    /// The catalog compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            tools: builtin::tools()
                .into_iter()
                .enumerate()
                .map(|(i, mut t)| {
                    t.id = format!("S-{:02}", i + 1);
                    t
                })
                .collect::<Vec<_>>()
                .into(),
        }
    }

    /// Parse a TOML catalog made of `[[tool]]` tables.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.tools)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ToolDescriptor> {
        self.tools.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
