//! Jack Analyzer - command-line entry point
//!
//! Parses a `.jack` file or a directory of `.jack` files and emits an XML
//! parse tree for each one.
//!
//! # Usage
//! ```bash
//! jack-analyzer <path.jack>
//! jack-analyzer <dir>
//! ```
//!
//! A single file writes a sibling `.xml`; a directory writes one `.xml` per
//! `.jack` file it directly contains, visited in lexicographic order.
//!
//! Set `VERBOSE=1` to trace each file written.

use std::env;
use std::path::Path;
use std::process;

use jack_analyzer::{analyze_directory, analyze_file};

fn main() {
    hack_common::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        let program = args.first().map_or("jack-analyzer", String::as_str);
        eprintln!("Usage: {program} <path.jack | dir>");
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    let result = if path.is_dir() {
        analyze_directory(path).map(|outputs| outputs.len())
    } else {
        analyze_file(path).map(|_| 1)
    };

    match result {
        Ok(count) => println!("Analysis complete: {count} file(s)"),
        Err(err) => {
            eprintln!("jack-analyzer: {err}");
            process::exit(1);
        }
    }
}
