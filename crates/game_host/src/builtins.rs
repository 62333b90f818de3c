//! Commands every game gets.

use crate::command::{Command, CommandContext, CommandHandler, CommandTable};
use crate::error::GameError;
use async_trait::async_trait;
use command_args::{Argument, CommandArgs, Namespace};
use tracing::debug;

/// `quit`: says goodbye and asks the portal to close the session.
pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    async fn run(&self, ctx: &CommandContext, _args: &Namespace) -> Result<(), GameError> {
        debug!("Session {} quits", ctx.session_id);
        ctx.msg("Goodbye.").await?;
        ctx.disconnect().await
    }
}

/// `help [command]`: lists commands or shows the usage of one.
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn run(&self, ctx: &CommandContext, args: &Namespace) -> Result<(), GameError> {
        let text = match args.text("command") {
            Some(name) => match ctx.table.find(name) {
                Some(command) => format!("Usage:\n{}", command.usage()),
                None => format!("No command named '{name}'."),
            },
            None => {
                let names: Vec<&str> = ctx.table.commands().map(|c| c.name()).collect();
                format!("Available commands: {}", names.join(", "))
            }
        };
        ctx.msg(text).await
    }
}

pub fn quit_command() -> Result<Command, GameError> {
    let mut args = CommandArgs::new();
    args.add_argument(Argument::named("nothing", None)?)?;
    Ok(Command::new("quit", args).handler(command_args::DEFAULT_HANDLER, Quit))
}

pub fn help_command() -> Result<Command, GameError> {
    let mut args = CommandArgs::new();
    args.add_argument(Argument::named("word", None)?.dest("command").optional())?;
    Ok(Command::new("help", args).handler(command_args::DEFAULT_HANDLER, Help))
}

/// Adds `quit` and `help` to a table.
pub fn register_builtins(table: &mut CommandTable) -> Result<(), GameError> {
    table.add(quit_command()?)?;
    table.add(help_command()?)?;
    Ok(())
}
