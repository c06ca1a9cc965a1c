// src/recipe.rs

//! Build recipe files
//!
//! Each package is built from a YAML recipe named `{name}.yaml`. The ABI
//! check only needs the declared subpackage list, but the package stanza is
//! parsed too so a recipe whose name disagrees with its filename can be
//! spotted in logs. Unknown fields (build pipelines, environments, test
//! stanzas) are ignored.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// A package build recipe
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRecipe {
    /// Primary package stanza
    pub package: PackageStanza,
    /// Additional archives produced alongside the primary package
    #[serde(default)]
    pub subpackages: Vec<Subpackage>,
}

/// The `package:` stanza of a build recipe
#[derive(Debug, Clone, Deserialize)]
pub struct PackageStanza {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub epoch: Option<u64>,
}

/// One `subpackages:` entry
#[derive(Debug, Clone, Deserialize)]
pub struct Subpackage {
    pub name: String,
}

impl BuildRecipe {
    /// Parse a recipe from a YAML string
    pub fn parse(content: &str) -> Result<BuildRecipe> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Parse(format!("invalid build recipe: {e}")))
    }

    /// Parse a recipe from a file
    pub fn load(path: &Path) -> Result<BuildRecipe> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("failed to read recipe file {}: {e}", path.display())))?;
        Self::parse(&content)
    }
}
