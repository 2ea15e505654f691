use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: a two-operand calculator with a persistent history",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "tally.toml")]
    pub config: PathBuf,

    /// Overrides `data_dir` from the config file.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Calculate `A OP B` and record it in history
    Calc(CalcArgs),
    /// Show calculation history, newest first
    History(HistoryArgs),
    /// Recompute a history entry
    Load(EntryArgs),
    /// Delete a history entry
    Delete(EntryArgs),
    /// Erase the whole history
    Clear,
    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct CalcArgs {
    /// First operand
    #[arg(allow_hyphen_values = true)]
    pub a: String,
    /// Operator: token (1-4), name (add), or symbol (+)
    pub op: String,
    /// Second operand
    #[arg(allow_hyphen_values = true)]
    pub b: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct EntryArgs {
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_calc() {
        let cli = Cli::try_parse_from(["tally", "calc", "6", "x", "3"]).unwrap();
        if let Command::Calc(args) = cli.command {
            assert_eq!(args.a, "6");
            assert_eq!(args.op, "x");
            assert_eq!(args.b, "3");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_calc_negative_operands() {
        let cli = Cli::try_parse_from(["tally", "calc", "-2.5", "+", "-4"]).unwrap();
        if let Command::Calc(args) = cli.command {
            assert_eq!(args.a, "-2.5");
            assert_eq!(args.b, "-4");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_history_limit() {
        let cli = Cli::try_parse_from(["tally", "history", "-n", "5"]).unwrap();
        if let Command::History(args) = cli.command {
            assert_eq!(args.limit, 5);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_delete() {
        let cli = Cli::try_parse_from(["tally", "delete", "12"]).unwrap();
        if let Command::Delete(args) = cli.command {
            assert_eq!(args.id, 12);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_delete_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["tally", "delete", "abc"]).is_err());
    }

    #[test]
    fn parse_clear() {
        let cli = Cli::try_parse_from(["tally", "clear"]).unwrap();
        assert!(matches!(cli.command, Command::Clear));
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "tally", "--verbose", "--format", "json", "--data-dir", "/tmp/t", "config",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/t")));
        assert_eq!(cli.config, PathBuf::from("tally.toml"));
    }
}
