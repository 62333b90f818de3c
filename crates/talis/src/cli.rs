//! Command-line interface of the server binary.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Which half of the server this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Network-facing process: client listeners and the bus server
    Portal,
    /// Game process: connects to the portal and runs commands
    Game,
}

/// Command line arguments parsed from user input.
///
/// Everything except the role overrides a setting of the configuration file.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub role: Role,
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for the cleartext bind address
    pub bind_address: Option<String>,
    /// Optional override for the bus address
    pub bus_address: Option<String>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

fn command() -> Command {
    Command::new("talis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-process text-game server")
        .subcommand_required(true)
        .subcommand(Command::new("portal").about("Accept clients and relay them to the game process"))
        .subcommand(Command::new("game").about("Run the game and connect to the portal"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("talis.toml")
                .global(true),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDRESS")
                .help("Cleartext bind address (e.g., 0.0.0.0:4000)")
                .global(true),
        )
        .arg(
            Arg::new("bus")
                .long("bus")
                .value_name("ADDRESS")
                .help("Address of the portal bus (e.g., 127.0.0.1:4005)")
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .global(true),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
}

impl CliArgs {
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list; `args[0]` is the program name.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let role = match matches.subcommand_name() {
            Some("game") => Role::Game,
            _ => Role::Portal,
        };

        Self {
            role,
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("talis.toml")),
            bind_address: matches.get_one::<String>("bind").cloned(),
            bus_address: matches.get_one::<String>("bus").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}
