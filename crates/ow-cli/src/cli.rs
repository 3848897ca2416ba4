use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ow",
    about = "OpenWin: browse open locations as a virtual folder",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file of [[record]] tables to use as the record source
    #[arg(long, global = true, conflicts_with = "dir")]
    pub records: Option<PathBuf>,

    /// Use the subdirectories of this directory as the record source
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Provider configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Location of the caller, excluded from enumeration
    #[arg(long, global = true)]
    pub caller: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SortColumn {
    Name,
    Path,
    Rank,
}

#[derive(Subcommand)]
pub enum Command {
    /// Enumerate the namespace and print its columns
    List(ListArgs),
    /// Print the raw identifier bytes of every item
    Dump,
    /// Show display names, attributes, and column values for one item
    Show(ItemArgs),
    /// Bind an item and print the folder it resolves to
    Bind(ItemArgs),
    /// Build the transfer package for one item
    Transfer(ItemArgs),
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value = "rank")]
    pub sort: SortColumn,
    /// Reverse the sort order
    #[arg(short, long)]
    pub reverse: bool,
}

#[derive(Args)]
pub struct ItemArgs {
    /// Rank of the item, as printed by `ow list`
    pub rank: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_defaults() {
        let cli = Cli::try_parse_from(["ow", "list", "--records", "open.toml"]).unwrap();
        assert_eq!(cli.records, Some(PathBuf::from("open.toml")));
        assert_eq!(cli.format, OutputFormat::Text);
        if let Command::List(args) = cli.command {
            assert_eq!(args.sort, SortColumn::Rank);
            assert!(!args.reverse);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_list_sorted_json() {
        let cli = Cli::try_parse_from([
            "ow", "--dir", "/tmp", "--format", "json", "list", "--sort", "name", "-r",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::List(args) = cli.command {
            assert_eq!(args.sort, SortColumn::Name);
            assert!(args.reverse);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_item_commands() {
        let cli = Cli::try_parse_from(["ow", "bind", "3", "--dir", "/tmp"]).unwrap();
        assert!(matches!(cli.command, Command::Bind(ItemArgs { rank: 3 })));

        let cli = Cli::try_parse_from(["ow", "transfer", "0", "--caller", "C:\\A"]).unwrap();
        assert_eq!(cli.caller.as_deref(), Some("C:\\A"));
        assert!(matches!(cli.command, Command::Transfer(_)));
    }

    #[test]
    fn sources_conflict() {
        let args = ["ow", "dump", "--records", "a.toml", "--dir", "/tmp"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn rank_must_fit() {
        assert!(Cli::try_parse_from(["ow", "show", "70000"]).is_err());
    }
}
