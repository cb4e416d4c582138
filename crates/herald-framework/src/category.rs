//! Command categories.
//!
//! A [`Category`] is a named, ordered group of commands built once per load
//! of its source. The category owns its commands; each command only keeps
//! the category name as a back-reference (for localization keys and help
//! listings).
//!
//! Trigger uniqueness is **not** checked here. That is the job of
//! [`CommandHandler::add_category`](crate::handler::CommandHandler::add_category),
//! which sees the whole registry.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// Opaque identifier of the place a category was loaded from.
///
/// Usually a path such as `commands/fun/mod.rs`, but the handler never
/// interprets it beyond passing it to a [`CategoryLoader`](crate::loader::CategoryLoader)
/// and printing it in error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns everything before the last path separator (`/` or `\`), or
    /// an empty string when the source has no directory part.
    pub fn parent(&self) -> &str {
        self.0
            .rfind(['/', '\\'])
            .map_or("", |idx| &self.0[..idx])
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A named, ordered collection of commands.
///
/// # Example
///
/// ```rust,ignore
/// let fun = Category::new("fun", "commands/fun/mod.rs")
///     .command(ping)
///     .command(coinflip);
/// handler.add_category(fun)?;
/// ```
#[derive(Clone)]
pub struct Category {
    name: String,
    source: SourceRef,
    commands: Vec<Arc<Command>>,
}

impl Category {
    /// Creates an empty category.
    pub fn new(name: impl Into<String>, source: impl Into<SourceRef>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            commands: Vec::new(),
        }
    }

    /// Adds a command (builder pattern).
    ///
    /// Stamps the command with this category's name and, if the command did
    /// not declare its own source, with this category's source.
    pub fn command(mut self, command: Command) -> Self {
        let mut command = command.category(self.name.clone());
        if command.source_ref().is_none() {
            command = command.source(self.source.clone());
        }
        self.commands.push(Arc::new(command));
        self
    }

    /// Adds several commands in order.
    pub fn commands(self, commands: impl IntoIterator<Item = Command>) -> Self {
        commands.into_iter().fold(self, Self::command)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Returns the commands in declaration order.
    pub fn command_list(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("source", &self.source)
            .field(
                "commands",
                &self.commands.iter().map(|c| c.key()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
