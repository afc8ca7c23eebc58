//! Command registry: canonical name → handler, alias → canonical name,
//! category → ordered name list.
//!
//! All keys are lowercase. The name and alias key sets stay disjoint, and
//! every category entry refers to a registered name. One reader/writer
//! lock guards all three maps; lookups clone the handler `Arc` out so no
//! guard is ever held across an await.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lingobot_core::RegistrationError;

use crate::command::Command;
use crate::response::ResponseBuilder;

#[derive(Default)]
struct RegistryInner {
    commands: HashMap<String, Arc<dyn Command>>,
    aliases: HashMap<String, String>,
    categories: HashMap<String, Vec<String>>,
}

#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and all of its aliases.
    ///
    /// Every key is checked against both maps before anything is inserted,
    /// so a rejected registration leaves the registry unchanged.
    pub fn register(&self, cmd: Arc<dyn Command>) -> Result<(), RegistrationError> {
        let meta = cmd.metadata().clone();
        if meta.name.trim().is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        let name = meta.name.to_lowercase();
        let aliases: Vec<String> = meta.aliases.iter().map(|a| a.to_lowercase()).collect();

        let mut inner = self.inner.write().expect("registry lock poisoned");

        if inner.commands.contains_key(&name) || inner.aliases.contains_key(&name) {
            return Err(RegistrationError::DuplicateName(name));
        }
        for (i, alias) in aliases.iter().enumerate() {
            let collides_within = aliases[..i].contains(alias);
            if *alias == name
                || collides_within
                || inner.commands.contains_key(alias)
                || inner.aliases.contains_key(alias)
            {
                return Err(RegistrationError::DuplicateAlias(alias.clone()));
            }
        }

        for alias in aliases {
            inner.aliases.insert(alias, name.clone());
        }
        if !meta.category.is_empty() {
            inner
                .categories
                .entry(meta.category.clone())
                .or_default()
                .push(name.clone());
        }
        inner.commands.insert(name, cmd);
        Ok(())
    }

    /// Case-insensitive lookup, resolving aliases transparently.
    pub fn get(&self, name_or_alias: &str) -> Option<Arc<dyn Command>> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.resolve(name_or_alias)
    }

    /// Replace the handler registered under `name`, reconciling category
    /// membership when the category changed.
    ///
    /// Trusted internal use (middleware re-wrapping after startup): alias
    /// collisions are not re-validated.
    pub fn update_command(
        &self,
        name: &str,
        cmd: Arc<dyn Command>,
    ) -> Result<(), RegistrationError> {
        let name = name.to_lowercase();
        let mut inner = self.inner.write().expect("registry lock poisoned");

        let Some(existing) = inner.commands.get(&name) else {
            return Err(RegistrationError::NotFound(name));
        };
        let old_category = existing.metadata().category.clone();
        let new_category = cmd.metadata().category.clone();

        if old_category != new_category {
            if !old_category.is_empty() {
                if let Some(names) = inner.categories.get_mut(&old_category) {
                    names.retain(|n| n != &name);
                }
            }
            if !new_category.is_empty() {
                inner
                    .categories
                    .entry(new_category)
                    .or_default()
                    .push(name.clone());
            }
        }

        inner.commands.insert(name, cmd);
        Ok(())
    }

    /// All category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        let inner = self.inner.read().expect("registry lock poisoned");
        let mut cats: Vec<String> = inner.categories.keys().cloned().collect();
        cats.sort();
        cats
    }

    /// Render the general help listing. Hidden commands are excluded.
    pub fn generate_help(&self) -> String {
        let inner = self.inner.read().expect("registry lock poisoned");

        let mut builder = ResponseBuilder::new();
        builder.add_line("📋 *Available Commands*").add_empty_line();

        let mut categories: Vec<&String> = inner.categories.keys().collect();
        categories.sort();

        let categorized: std::collections::HashSet<&str> = inner
            .categories
            .values()
            .flatten()
            .map(String::as_str)
            .collect();

        for category in categories {
            let mut names = inner.categories[category].clone();
            if names.is_empty() {
                continue;
            }
            names.sort();

            builder.add_bold(category);
            for name in &names {
                let Some(cmd) = inner.commands.get(name) else { continue };
                let meta = cmd.metadata();
                if meta.hidden {
                    continue;
                }
                builder.add_line(entry_line(&meta.name, &meta.description));
            }
            builder.add_empty_line();
        }

        let mut uncategorized: Vec<&str> = inner
            .commands
            .iter()
            .filter(|(name, cmd)| {
                !cmd.metadata().hidden && !categorized.contains(name.as_str())
            })
            .map(|(name, _)| name.as_str())
            .collect();
        if !uncategorized.is_empty() {
            uncategorized.sort();
            builder.add_bold("Other Commands");
            for name in uncategorized {
                if let Some(cmd) = inner.commands.get(name) {
                    let meta = cmd.metadata();
                    builder.add_line(entry_line(&meta.name, &meta.description));
                }
            }
        }

        builder.build()
    }

    /// Render detailed help for one command. Hidden commands are included
    /// here; only the general listing omits them.
    pub fn generate_command_help(&self, name: &str) -> String {
        let inner = self.inner.read().expect("registry lock poisoned");
        let Some(cmd) = inner.resolve(name) else {
            return format!("Command '{name}' not found");
        };
        let meta = cmd.metadata();

        let mut builder = ResponseBuilder::new();
        builder.add_line(format!("*Command:* */{}*", meta.name));

        if !meta.aliases.is_empty() {
            let aliases: Vec<String> =
                meta.aliases.iter().map(|a| format!("*/{a}*")).collect();
            builder.add_line(format!("*Aliases:* {}", aliases.join(", ")));
        }
        if !meta.description.is_empty() {
            builder.add_line(format!("*Description:* {}", meta.description));
        }
        if !meta.usage.is_empty() {
            builder.add_line(format!("*Usage:* `{}`", meta.usage));
        }

        if !meta.parameters.is_empty() {
            builder.add_empty_line().add_line("*Parameters:*");
            for param in &meta.parameters {
                let mut line = format!("• `{}`", param.name);
                if param.required {
                    line.push_str(" *(required)*");
                }
                if !param.description.is_empty() {
                    line.push_str(&format!(" - {}", param.description));
                }
                builder.add_line(line);
            }
        }

        if !meta.examples.is_empty() {
            builder.add_empty_line().add_line("*Examples:*");
            for example in &meta.examples {
                builder.add_line(format!("• `{example}`"));
            }
        }

        if meta.require_owner {
            builder
                .add_empty_line()
                .add_line("⚠️ *This command requires owner permissions*");
        }

        builder.build()
    }
}

impl RegistryInner {
    fn resolve(&self, name_or_alias: &str) -> Option<Arc<dyn Command>> {
        let key = name_or_alias.to_lowercase();
        if let Some(cmd) = self.commands.get(&key) {
            return Some(Arc::clone(cmd));
        }
        let canonical = self.aliases.get(&key)?;
        self.commands.get(canonical).map(Arc::clone)
    }
}

fn entry_line(name: &str, description: &str) -> String {
    if description.is_empty() {
        format!("• */{name}*")
    } else {
        format!("• */{name}* - {description}")
    }
}
