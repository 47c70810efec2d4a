mod cli;
mod commands;
mod util;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Exec {
            query,
            tokens,
            pretty,
        } => commands::exec::run(query, tokens, pretty),
        Command::Dump { query, pretty } => commands::dump::run(query, pretty),
    }
}
