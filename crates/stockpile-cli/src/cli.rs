use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stockpile_items::DEFAULT_QUALITY;

#[derive(Parser)]
#[command(
    name = "stockpile",
    about = "Stockpile — item ledgers and JSON map files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger or map file to operate on
    #[arg(short, long, global = true, default_value = "stockpile.json")]
    pub file: PathBuf,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Skip fsync before replacing files
    #[arg(long, global = true)]
    pub no_fsync: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every non-zero item count
    Show,
    /// Show the count of one item
    Count(CountArgs),
    /// Add to an item count
    Add(AdjustArgs),
    /// Subtract from an item count
    Remove(AdjustArgs),
    /// List the records of an id-keyed array file
    Records(RecordsArgs),
}

#[derive(Args)]
pub struct CountArgs {
    pub item: String,
    #[arg(short, long, default_value = DEFAULT_QUALITY)]
    pub quality: String,
}

#[derive(Args)]
pub struct AdjustArgs {
    pub item: String,
    #[arg(allow_negative_numbers = true)]
    pub count: i64,
    #[arg(short, long, default_value = DEFAULT_QUALITY)]
    pub quality: String,
}

#[derive(Args)]
pub struct RecordsArgs {
    /// Only show the record with this string id
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn quality_defaults_to_normal() {
        let cli = Cli::parse_from(["stockpile", "add", "gear", "3"]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.item, "gear");
                assert_eq!(args.count, 3);
                assert_eq!(args.quality, "normal");
            }
            _ => panic!("expected add"),
        }
        assert_eq!(cli.file, PathBuf::from("stockpile.json"));
    }

    #[test]
    fn negative_counts_parse() {
        let cli = Cli::parse_from(["stockpile", "-f", "inv.json", "add", "gear", "-2", "-q", "rare"]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.count, -2);
                assert_eq!(args.quality, "rare");
            }
            _ => panic!("expected add"),
        }
    }
}
