//! VM Translator - command-line entry point
//!
//! Translates a `.vm` file or a directory of `.vm` files into Hack
//! assembly.
//!
//! # Usage
//! ```bash
//! vm-translator <path.vm> [--bootstrap]
//! vm-translator <dir>
//! ```
//!
//! A single file writes a sibling `.asm`; a directory writes
//! `<dir>/<dir>.asm` preceded by the `SP=256; call Sys.init 0` bootstrap.
//! For single-file mode the bootstrap is an explicit opt-in via
//! `--bootstrap`, since the default output is a linkable fragment meant for
//! unit testing against a single function.
//!
//! Set `VERBOSE=1` to trace each file as directory-mode translation visits it.

use std::env;
use std::path::Path;
use std::process;

use vm_translator::{translate_directory, translate_single_file};

fn main() {
    hack_common::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        let program = args.first().map_or("vm-translator", String::as_str);
        eprintln!("Usage: {program} <path.vm | dir> [--bootstrap]");
        process::exit(1);
    }

    let path = Path::new(&args[1]);
    let with_bootstrap = args.get(2).is_some_and(|flag| flag == "--bootstrap");

    let result = if path.is_dir() {
        translate_directory(path)
    } else {
        translate_single_file(path, with_bootstrap)
    };

    match result {
        Ok(output) => println!("Translation complete: {}", output.display()),
        Err(err) => {
            eprintln!("vm-translator: {err}");
            process::exit(1);
        }
    }
}
