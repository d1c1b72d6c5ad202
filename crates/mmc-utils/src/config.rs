//! Configuration file handling for meta-model projects.

use anyhow::{Context, Result};
use mmc_core::Identifier;
use mmc_ir::{BuildOptions, NamingConvention};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the root of a project
pub const CONFIG_FILE: &str = "mmc.toml";

/// Represents the mmc.toml configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub package: Package,
    #[serde(default)]
    pub analysis: Analysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(default = "default_edition")]
    pub edition: String,
}

fn default_edition() -> String {
    "2024".to_string()
}

/// Settings of the symbol table builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Class modeling the references across aggregates
    #[serde(default = "default_ref_association")]
    pub ref_association: String,
    /// Conventions the names must not collide in
    #[serde(default = "default_naming_conventions")]
    pub naming_conventions: Vec<NamingConvention>,
}

fn default_ref_association() -> String {
    "Reference".to_string()
}

fn default_naming_conventions() -> Vec<NamingConvention> {
    NamingConvention::ALL.to_vec()
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            ref_association: default_ref_association(),
            naming_conventions: default_naming_conventions(),
        }
    }
}

impl Config {
    /// Creates a new default configuration with the given project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            package: Package {
                name: name.into(),
                version: "0.1.0".to_string(),
                edition: default_edition(),
            },
            analysis: Analysis::default(),
        }
    }

    /// Loads configuration from a mmc.toml file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Saves configuration to a mmc.toml file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration")?;

        fs::write(path.as_ref(), contents)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))
    }

    /// Finds the mmc.toml file starting from the current directory.
    ///
    /// # Errors
    /// Returns an error if no mmc.toml is found in the current or parent directories.
    pub fn find() -> Result<(Self, PathBuf)> {
        let current_dir =
            std::env::current_dir().with_context(|| "Failed to get current directory")?;
        Self::find_from(current_dir)
    }

    /// Finds the mmc.toml file in `start` or the closest of its ancestors.
    ///
    /// Returns the configuration and the directory it was found in.
    ///
    /// # Errors
    /// Returns an error if no mmc.toml is found or it cannot be loaded.
    pub fn find_from(start: impl Into<PathBuf>) -> Result<(Self, PathBuf)> {
        let mut current_dir = start.into();

        loop {
            let config_path = current_dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load(&config_path)?;
                return Ok((config, current_dir));
            }

            if !current_dir.pop() {
                anyhow::bail!(
                    "Could not find {CONFIG_FILE} in current directory or any parent directory"
                );
            }
        }
    }

    /// Converts the `[analysis]` section into options of the builder.
    ///
    /// # Errors
    /// Returns an error if the reference association is not an identifier or
    /// no naming convention is configured.
    pub fn build_options(&self) -> Result<BuildOptions> {
        let analysis = &self.analysis;

        Identifier::new(analysis.ref_association.as_str()).with_context(|| {
            format!(
                "Invalid ref_association in {CONFIG_FILE}: {:?}",
                analysis.ref_association
            )
        })?;

        if analysis.naming_conventions.is_empty() {
            anyhow::bail!("Expected at least one naming convention in {CONFIG_FILE}");
        }

        Ok(BuildOptions {
            ref_association: analysis.ref_association.clone(),
            naming_conventions: analysis.naming_conventions.clone(),
        })
    }
}
