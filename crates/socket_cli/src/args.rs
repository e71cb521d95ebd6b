use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "socket", version, about = "SoCket contact manager")]
pub struct Cli {
    /// SQLite file holding the saved persons.
    #[arg(long, global = true, default_value = "data/socket.sqlite3")]
    pub data_file: PathBuf,

    /// Log level: trace|debug|info|warn|error (default depends on build).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log directory (default: `logs` next to the data file).
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Identity policy for duplicate detection: profile|name|contact
    #[arg(long, global = true, default_value = "profile")]
    pub identity: String,

    /// Start with an empty list when the saved data cannot be loaded.
    #[arg(long, global = true)]
    pub fresh_on_load_error: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read commands interactively from stdin.
    Repl,

    /// Print the saved persons as JSON.
    Export,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn defaults_to_repl_without_subcommand() {
        let cli = Cli::try_parse_from(["socket"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.identity, "profile");
        assert!(!cli.fresh_on_load_error);
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "socket",
            "export",
            "--data-file",
            "/tmp/people.sqlite3",
            "--identity",
            "name",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Export));
        assert_eq!(cli.data_file.to_str(), Some("/tmp/people.sqlite3"));
        assert_eq!(cli.identity, "name");
    }
}
