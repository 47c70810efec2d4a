//! Compile a query document and print its canonical dumped form.
//!
//! Useful for checking how tokens classified and how definitions
//! expanded; the output compiles back to the same queries.

use compass_lib::{Compass, dump_queries};

use crate::cli::QueryArgs;
use crate::util::load_query;

use super::exec::print_json;

pub fn run(query: QueryArgs, pretty: bool) {
    let compass = Compass::from_json(&load_query(&query)).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    print_json(&dump_queries(compass.queries()), pretty);
}
