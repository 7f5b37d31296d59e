use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use argv_reader::config::GrammarConfig;
use argv_reader::grammar::Grammar;
use argv_reader::logging::init_tracing;

/// Classify command-line tokens with a TOML grammar and print the result
/// as JSON.
#[derive(Parser, Debug)]
#[command(name = "argv-reader", version)]
struct Cli {
    /// Grammar file (default: ~/.config/argv-reader/grammar.toml)
    #[arg(short, long, value_name = "PATH")]
    grammar: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Tokens to read, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.grammar {
        Some(path) => GrammarConfig::load_from(path)?,
        None => GrammarConfig::load()?,
    };
    let grammar = Grammar::new(config)?;

    let acc = grammar
        .read(&cli.tokens)
        .with_context(|| format!("cannot read {:?}", cli.tokens))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&acc)?
    } else {
        serde_json::to_string(&acc)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn tokens_follow_double_dash() {
        let cli = Cli::try_parse_from(["argv-reader", "-vv", "--", "-t", "--", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.tokens, vec!["-t", "--", "x"]);
        assert!(cli.grammar.is_none());
    }

    #[test]
    fn grammar_path_is_optional_value() {
        let cli = Cli::try_parse_from(["argv-reader", "--grammar", "g.toml", "--pretty"]).unwrap();
        assert_eq!(cli.grammar.as_deref(), Some(std::path::Path::new("g.toml")));
        assert!(cli.pretty);
        assert!(cli.tokens.is_empty());
    }
}
