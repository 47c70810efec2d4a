//! Run a compiled query document against a token array and print the
//! match records as JSON.

use compass_lib::Compass;
use serde_json::Value;

use crate::cli::{QueryArgs, TokensArgs};
use crate::util::{load_query, load_tokens};

pub fn run(query: QueryArgs, tokens: TokensArgs, pretty: bool) {
    let compass = Compass::from_json(&load_query(&query)).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    let records = compass
        .matches_json(&load_tokens(&tokens))
        .unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(1);
        });

    let output = serde_json::to_value(&records).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    print_json(&output, pretty);
}

pub(crate) fn print_json(value: &Value, pretty: bool) {
    if pretty {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", value);
    }
}
