use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::cli::{QueryArgs, TokensArgs};

pub fn load_query(args: &QueryArgs) -> String {
    if let Some(text) = &args.query_text {
        return text.clone();
    }
    if let Some(path) = &args.query_file {
        return read_input(path, "query");
    }
    unreachable!("clap enforces one query input")
}

pub fn load_tokens(args: &TokensArgs) -> String {
    if let Some(text) = &args.input_text {
        return text.clone();
    }
    if let Some(path) = &args.input_file {
        return read_input(path, "input");
    }
    unreachable!("clap enforces one tokens input")
}

fn read_input(path: &Path, what: &str) -> String {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: failed to read {what} from stdin: {e}");
            std::process::exit(1);
        }
        return buf;
    }
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {what} file {}: {e}", path.display());
        std::process::exit(1);
    })
}
