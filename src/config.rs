//! View configuration
//!
//! Defaults, overridable from the environment (after `.env` is loaded).

use std::path::PathBuf;

use crate::graph::layout::LayoutMode;
use crate::graph::ClickBehavior;

pub const ENV_DATA: &str = "LEET_COMPASS_DATA";
pub const ENV_SOLVED: &str = "LEET_COMPASS_SOLVED";
pub const ENV_LAYOUT: &str = "LEET_COMPASS_LAYOUT";
pub const ENV_CLICK: &str = "LEET_COMPASS_CLICK";
pub const ENV_BASE_PATH: &str = "LEET_COMPASS_BASE_PATH";

pub const DEFAULT_DATA: &str = "public";
pub const DEFAULT_SOLVED: &str = "solved-problems.json";
pub const DEFAULT_BASE_PATH: &str = "/leet-compass";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Directory or base URL of the static JSON files
    pub data: String,
    /// Solved-marker file
    pub solved: PathBuf,
    pub layout: LayoutMode,
    pub click: ClickBehavior,
    /// Site base path for pattern links
    pub base_path: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            data: DEFAULT_DATA.to_string(),
            solved: PathBuf::from(DEFAULT_SOLVED),
            layout: LayoutMode::default(),
            click: ClickBehavior::default(),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl ViewConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data: lookup(ENV_DATA).unwrap_or(defaults.data),
            solved: lookup(ENV_SOLVED)
                .map(PathBuf::from)
                .unwrap_or(defaults.solved),
            layout: parse_or_default(ENV_LAYOUT, lookup(ENV_LAYOUT), defaults.layout),
            click: parse_or_default(ENV_CLICK, lookup(ENV_CLICK), defaults.click),
            base_path: lookup(ENV_BASE_PATH).unwrap_or(defaults.base_path),
        }
    }
}

fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("{}={:?} ignored ({}), using {:?}", key, raw, e, default);
            default
        }),
    }
}
