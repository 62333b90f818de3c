//! Commands and the command table.

use crate::error::GameError;
use crate::store::SessionStore;
use async_trait::async_trait;
use command_args::{CommandArgs, Namespace};
use session_bus::{BusHandle, BusMessage, SessionId};
use std::collections::HashMap;
use std::sync::Arc;

/// What a command handler gets to work with.
#[derive(Clone)]
pub struct CommandContext {
    pub session_id: SessionId,
    pub bus: BusHandle,
    pub store: Arc<dyn SessionStore>,
    pub table: Arc<CommandTable>,
}

impl CommandContext {
    /// Sends text to the session running the command.
    pub async fn msg(&self, text: impl Into<String>) -> Result<(), GameError> {
        self.bus
            .send(BusMessage::write(self.session_id, text.into()))
            .await?;
        Ok(())
    }

    /// Asks the portal to disconnect the session.
    pub async fn disconnect(&self) -> Result<(), GameError> {
        self.bus
            .send(BusMessage::close_session(self.session_id))
            .await?;
        Ok(())
    }
}

/// Runs one branch of a command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &CommandContext, args: &Namespace) -> Result<(), GameError>;
}

/// A named command: its arguments and the handlers of its branches.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    args: CommandArgs,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: CommandArgs) -> Self {
        Self {
            name: name.into().to_lowercase(),
            aliases: Vec::new(),
            args,
            handlers: HashMap::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().to_lowercase());
        self
    }

    /// Registers the handler run when the branch named `handler` matches.
    pub fn handler(mut self, handler: &str, run: impl CommandHandler + 'static) -> Self {
        self.handlers.insert(handler.to_string(), Arc::new(run));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn args(&self) -> &CommandArgs {
        &self.args
    }

    /// Usage text: the command name followed by each accepted syntax.
    pub fn usage(&self) -> String {
        let syntaxes = self.args.format();
        syntaxes
            .lines()
            .map(|syntax| {
                if syntax.is_empty() {
                    self.name.clone()
                } else {
                    format!("{} {}", self.name, syntax)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn handler_for(&self, namespace: &Namespace) -> Option<Arc<dyn CommandHandler>> {
        let name = namespace.handler().unwrap_or(command_args::DEFAULT_HANDLER);
        self.handlers.get(name).cloned()
    }

    fn check_handlers(&self) -> Result<(), GameError> {
        let declared: Vec<&str> = if self.args.branches().is_empty() {
            vec![command_args::DEFAULT_HANDLER]
        } else {
            self.args.branches().iter().map(|b| b.handler()).collect()
        };

        match declared.into_iter().find(|h| !self.handlers.contains_key(*h)) {
            Some(missing) => Err(GameError::MissingHandler {
                command: self.name.clone(),
                handler: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// All commands known to the game, looked up by name or alias.
#[derive(Default)]
pub struct CommandTable {
    commands: Vec<Arc<Command>>,
    index: HashMap<String, usize>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command, checking that every branch has a handler.
    pub fn add(&mut self, command: Command) -> Result<(), GameError> {
        command.check_handlers()?;

        let names: Vec<String> = std::iter::once(command.name.clone())
            .chain(command.aliases.iter().cloned())
            .collect();
        if let Some(taken) = names.iter().find(|name| self.index.contains_key(*name)) {
            return Err(GameError::DuplicateCommand(taken.clone()));
        }

        let position = self.commands.len();
        for name in names {
            self.index.insert(name, position);
        }
        self.commands.push(Arc::new(command));
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<Arc<Command>> {
        self.index
            .get(&name.to_lowercase())
            .map(|&position| self.commands[position].clone())
    }

    /// Commands in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
