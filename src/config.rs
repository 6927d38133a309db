use crate::grid::{ComposeMode, LayoutMode, MonthGridOptions, StripOptions, Theme};
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from the optional TOML file.  Command-line options are
/// applied on top by `main`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Defaults to the current local year
    #[serde(default)]
    pub(crate) year: Option<i32>,

    /// Path to the JSON holiday dataset
    #[serde(default)]
    pub(crate) data: Option<PathBuf>,

    #[serde(default = "default_countries")]
    pub(crate) countries: Vec<String>,

    #[serde(default = "default_primary")]
    pub(crate) primary: String,

    #[serde(default = "default_language")]
    pub(crate) language: String,

    #[serde(default)]
    pub(crate) layout: LayoutConfig,

    #[serde(default)]
    pub(crate) colors: Theme,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    #[serde(default)]
    pub(crate) mode: LayoutMode,
    /// Defaults to immediate for the strip and accumulate for the month grid
    #[serde(default)]
    pub(crate) compose: Option<ComposeMode>,
    /// Countries given a coverage-count row; defaults to the primary country
    #[serde(default)]
    pub(crate) count_rows: Option<Vec<String>>,
    /// Country shown in the month grid's week column; defaults to the first
    /// configured country other than the primary one
    #[serde(default)]
    pub(crate) secondary: Option<String>,
}

fn default_countries() -> Vec<String> {
    vec![String::from("DE")]
}

fn default_primary() -> String {
    String::from("DE")
}

fn default_language() -> String {
    String::from("DE")
}

impl Default for Config {
    fn default() -> Config {
        Config {
            year: None,
            data: None,
            countries: default_countries(),
            primary: default_primary(),
            language: default_language(),
            layout: LayoutConfig::default(),
            colors: Theme::default(),
        }
    }
}

impl Config {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Config> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&src).context("failed to parse TOML config")
    }

    pub(crate) fn compose_mode(&self) -> ComposeMode {
        self.layout.compose.unwrap_or(match self.layout.mode {
            LayoutMode::Strip => ComposeMode::Immediate,
            LayoutMode::MonthGrid => ComposeMode::Accumulate,
        })
    }

    pub(crate) fn count_rows(&self) -> Vec<String> {
        self.layout
            .count_rows
            .clone()
            .unwrap_or_else(|| vec![self.primary.clone()])
    }

    pub(crate) fn secondary(&self) -> Option<String> {
        self.layout
            .secondary
            .clone()
            .or_else(|| self.countries.iter().find(|&c| c != &self.primary).cloned())
    }

    /// Every country whose holidays have to be loaded, primary first and
    /// without repeats
    pub(crate) fn all_countries(&self) -> Vec<String> {
        let mut all = Vec::new();
        let mentioned = std::iter::once(self.primary.clone())
            .chain(self.countries.iter().cloned())
            .chain(self.count_rows())
            .chain(self.secondary());
        for code in mentioned {
            if !all.contains(&code) {
                all.push(code);
            }
        }
        all
    }

    pub(crate) fn strip_options(&self) -> StripOptions {
        StripOptions {
            primary: self.primary.clone(),
            count_rows: self.count_rows(),
            language: self.language.clone(),
            theme: self.colors,
        }
    }

    pub(crate) fn month_grid_options(&self) -> MonthGridOptions {
        MonthGridOptions {
            primary: self.primary.clone(),
            secondary: self.secondary(),
            theme: self.colors,
        }
    }
}
