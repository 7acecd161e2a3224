//! Verb resolution for the command tree.
//!
//! A [`CommandTable`] maps registered command names to handlers and resolves a
//! user token by exact name, by alias, or by an unambiguous prefix (`del` for
//! `delete`). [`MappedCommands`] adds the two-level lookup used by
//! `repository create <type> <recipe>`, where the recipe picks a
//! format-specific handler and unknown recipes fall back to a generic one.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Command '{token}' is ambiguous; it could be any of: {}", .candidates.join(", "))]
    AmbiguousCommand {
        token: String,
        candidates: Vec<String>,
    },
    #[error("Unknown command '{token}'")]
    UnknownCommand { token: String },
}

/// Registered commands of one level of the command tree.
#[derive(Debug, Clone)]
pub struct CommandTable<H> {
    commands: BTreeMap<String, H>,
    aliases: BTreeMap<String, String>,
}

impl<H> Default for CommandTable<H> {
    fn default() -> Self {
        CommandTable {
            commands: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl<H> CommandTable<H> {
    pub fn new() -> CommandTable<H> {
        CommandTable::default()
    }

    pub fn register(&mut self, name: &str, handler: H) -> &mut Self {
        self.commands.insert(name.to_string(), handler);
        self
    }

    /// Register `alias` as another spelling of the already registered `name`.
    pub fn alias(&mut self, alias: &str, name: &str) -> &mut Self {
        self.aliases.insert(alias.to_string(), name.to_string());
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Resolve `token` to the canonical name of a registered command.
    pub fn resolve_name(&self, token: &str) -> Result<&str, DispatchError> {
        if let Some((name, _)) = self.commands.get_key_value(token) {
            return Ok(name);
        }

        if let Some(name) = self.aliases.get(token) {
            if let Some((name, _)) = self.commands.get_key_value(name.as_str()) {
                return Ok(name);
            }
        }

        // a command and its aliases count once
        let mut candidates: BTreeSet<&str> = self
            .commands
            .keys()
            .filter(|name| name.starts_with(token))
            .map(String::as_str)
            .collect();
        for (alias, name) in &self.aliases {
            if alias.starts_with(token) {
                if let Some((name, _)) = self.commands.get_key_value(name.as_str()) {
                    candidates.insert(name);
                }
            }
        }

        let mut candidates = candidates.into_iter();
        match (candidates.next(), candidates.next()) {
            (Some(name), None) if !token.is_empty() => {
                trace!("Resolved abbreviation '{}' to '{}'", token, name);
                Ok(name)
            }
            (Some(first), Some(second)) if !token.is_empty() => {
                let mut names = vec![first.to_string(), second.to_string()];
                names.extend(candidates.map(str::to_string));
                Err(DispatchError::AmbiguousCommand {
                    token: token.to_string(),
                    candidates: names,
                })
            }
            _ => Err(DispatchError::UnknownCommand {
                token: token.to_string(),
            }),
        }
    }

    /// Resolve `token` to its handler.
    pub fn resolve(&self, token: &str) -> Result<&H, DispatchError> {
        let name = self.resolve_name(token)?;
        self.commands
            .get(name)
            .ok_or_else(|| DispatchError::UnknownCommand {
                token: token.to_string(),
            })
    }
}

/// Handlers selected by a discriminator value such as a repository recipe.
///
/// Each key (`docker`, `maven`, ...) owns a set of discriminator values; the
/// `fallback` key, when registered, receives every value nobody claimed.
#[derive(Debug, Clone)]
pub struct MappedCommands<H> {
    handlers: CommandTable<H>,
    values: BTreeMap<String, String>,
    fallback: Option<String>,
}

impl<H> Default for MappedCommands<H> {
    fn default() -> Self {
        MappedCommands {
            handlers: CommandTable::new(),
            values: BTreeMap::new(),
            fallback: None,
        }
    }
}

impl<H> MappedCommands<H> {
    pub fn new() -> MappedCommands<H> {
        MappedCommands::default()
    }

    /// Register `handler` under `key` for each of `values`.
    pub fn register(&mut self, key: &str, values: &[&str], handler: H) -> &mut Self {
        self.handlers.register(key, handler);
        for value in values {
            self.values.insert(value.to_string(), key.to_string());
        }
        self
    }

    /// Use the handler registered under `key` for unclaimed values.
    pub fn fallback(&mut self, key: &str) -> &mut Self {
        self.fallback = Some(key.to_string());
        self
    }

    /// All discriminator values with an explicit mapping.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Resolve a discriminator value to the key of its handler.
    pub fn resolve_key(&self, value: &str) -> Result<&str, DispatchError> {
        if let Some(key) = self.values.get(value) {
            return self.handlers.resolve_name(key);
        }
        if self.handlers.contains(value) {
            return self.handlers.resolve_name(value);
        }
        match &self.fallback {
            Some(key) => self.handlers.resolve_name(key),
            None => Err(DispatchError::UnknownCommand {
                token: value.to_string(),
            }),
        }
    }

    pub fn resolve(&self, value: &str) -> Result<&H, DispatchError> {
        let key = self.resolve_key(value)?;
        self.handlers.resolve(key)
    }
}
