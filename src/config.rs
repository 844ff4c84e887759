//! Runtime knobs for the interpreter and the line editor, loaded from
//! `TINYLISP_*` environment variables.

use std::path::PathBuf;
use thiserror::Error;

pub const SET_SCOPE_VAR: &str = "TINYLISP_SET_SCOPE";
pub const MAX_DEPTH_VAR: &str = "TINYLISP_MAX_DEPTH";
pub const HISTORY_VAR: &str = "TINYLISP_HISTORY";
pub const EDIT_MODE_VAR: &str = "TINYLISP_EDIT_MODE";

pub const DEFAULT_HISTORY_FILE: &str = "tinylisp_history.txt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// When set, `set!` evaluates its right-hand side in the global scope
    /// instead of the scope the form appears in, while still binding the
    /// result in the current scope. This reproduces the long-standing
    /// behaviour of the interpreter and is on by default; turning it off
    /// gives the conventional lexical reading.
    pub set_evaluates_in_global_scope: bool,
    /// Maximum number of nested closure calls before evaluation fails with
    /// `StackLimitExceeded`. `None` leaves recursion bounded only by the
    /// native stack.
    pub max_call_depth: Option<usize>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            set_evaluates_in_global_scope: true,
            max_call_depth: None,
        }
    }
}

impl InterpreterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source; unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = InterpreterConfig::default();
        if let Some(value) = lookup(SET_SCOPE_VAR) {
            config.set_evaluates_in_global_scope = match value.trim() {
                "global" => true,
                "current" => false,
                _ => return Err(invalid(SET_SCOPE_VAR, value.clone(), "'global' or 'current'")),
            };
        }
        if let Some(value) = lookup(MAX_DEPTH_VAR) {
            let trimmed = value.trim();
            config.max_call_depth = if trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                match trimmed.parse::<usize>() {
                    Ok(depth) => Some(depth),
                    Err(_) => {
                        return Err(invalid(MAX_DEPTH_VAR, value.clone(), "an integer or 'none'"));
                    }
                }
            };
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Vi,
    Emacs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    pub history_file: Option<PathBuf>,
    pub edit_mode: EditMode,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            history_file: Some(PathBuf::from(DEFAULT_HISTORY_FILE)),
            edit_mode: EditMode::Vi,
        }
    }
}

impl ReplConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ReplConfig::default();
        if let Some(path) = lookup(HISTORY_VAR) {
            // An empty value turns history off.
            config.history_file = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(value) = lookup(EDIT_MODE_VAR) {
            config.edit_mode = match value.trim().to_ascii_lowercase().as_str() {
                "vi" => EditMode::Vi,
                "emacs" => EditMode::Emacs,
                _ => return Err(invalid(EDIT_MODE_VAR, value.clone(), "'vi' or 'emacs'")),
            };
        }
        Ok(config)
    }
}

fn invalid(var: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value,
        expected,
    }
}
