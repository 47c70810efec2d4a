use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "compass", bin_name = "compass")]
#[command(about = "Regex-like pattern matching over arrays of strings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a query document against an array of tokens
    #[command(after_help = r#"EXAMPLES:
  compass exec -q query.json -i tokens.json
  compass exec -q query.json -i - --pretty
  compass exec --query-text '[["// c", ["KEY", "()", "."]]]' -i tokens.json"#)]
    Exec {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        tokens: TokensArgs,

        /// Pretty-print the match records
        #[arg(long)]
        pretty: bool,
    },

    /// Compile a query document and print its canonical form
    #[command(after_help = r#"EXAMPLES:
  compass dump -q query.json
  compass dump --query-text '[["// c", "^prefix", "()"]]'"#)]
    Dump {
        #[command(flatten)]
        query: QueryArgs,

        /// Pretty-print the dumped queries
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args)]
#[group(id = "query_input", required = true, multiple = false)]
pub struct QueryArgs {
    /// Query document as inline JSON text
    #[arg(long = "query-text", value_name = "JSON")]
    pub query_text: Option<String>,

    /// Query document from file (use "-" for stdin)
    #[arg(short = 'q', long = "query-file", value_name = "FILE")]
    pub query_file: Option<PathBuf>,
}

#[derive(Args)]
#[group(id = "tokens_input", required = true, multiple = false)]
pub struct TokensArgs {
    /// Token array as inline JSON text
    #[arg(long = "input-text", value_name = "JSON")]
    pub input_text: Option<String>,

    /// Token array from file (use "-" for stdin)
    #[arg(short = 'i', long = "input-file", value_name = "FILE")]
    pub input_file: Option<PathBuf>,
}
