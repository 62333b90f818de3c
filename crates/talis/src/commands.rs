//! Commands the stock game ships with, on top of the `game_host` builtins.

use async_trait::async_trait;
use command_args::{Argument, CommandArgs, Namespace, DEFAULT_HANDLER};
use game_host::{register_builtins, Command, CommandContext, CommandHandler, CommandTable, GameError};

/// `say <message>`
struct Say;

#[async_trait]
impl CommandHandler for Say {
    async fn run(&self, ctx: &CommandContext, args: &Namespace) -> Result<(), GameError> {
        let message = args.text("message").unwrap_or_default();
        ctx.msg(format!("You say: {message}")).await
    }
}

/// `who`
struct Who;

#[async_trait]
impl CommandHandler for Who {
    async fn run(&self, ctx: &CommandContext, _args: &Namespace) -> Result<(), GameError> {
        let online = ctx.store.count().await;
        ctx.msg(format!("Sessions connected: {online}")).await
    }
}

/// Builds the command table of the game process.
pub fn command_table() -> Result<CommandTable, GameError> {
    let mut table = CommandTable::new();
    register_builtins(&mut table)?;

    let mut say = CommandArgs::new();
    say.add_argument(Argument::named("text", None)?.dest("message"))?;
    table.add(Command::new("say", say).handler(DEFAULT_HANDLER, Say))?;

    let mut who = CommandArgs::new();
    who.add_argument(Argument::named("nothing", None)?)?;
    table.add(Command::new("who", who).handler(DEFAULT_HANDLER, Who))?;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_stock_commands() {
        let table = command_table().unwrap();
        for name in ["quit", "help", "say", "who"] {
            assert!(table.find(name).is_some(), "missing {name}");
        }
        assert_eq!(table.find("say").unwrap().usage(), "say <message>");
    }
}
