//! Shared path and filesystem utilities for the Hack toolchain.
//!
//! Every translator in the workspace derives its output path the same way,
//! and the VM translator's directory mode discovers its input files the same
//! way; this crate is the one place that logic lives so the three binaries
//! agree on naming conventions without depending on each other.

#![warn(clippy::all)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Swaps `path`'s extension for `ext`, keeping the rest of the path intact.
///
/// Used by the assembler (`.asm` -> `.hack`) and the Jack analyzer
/// (`.jack` -> `.xml`), both of which always write a sibling file.
#[must_use]
pub fn sibling_with_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

/// Output path for the VM translator: a single file translates to a sibling
/// `.asm`; a directory translates to `<dir>/<dir>.asm`.
#[must_use]
pub fn vm_output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.join(format!("{name}.asm"))
    } else {
        input.with_extension("asm")
    }
}

/// Lists the `.vm` files directly inside `dir`, sorted lexicographically by
/// file name so that directory-mode translation output is reproducible
/// regardless of the underlying filesystem's directory-listing order.
pub fn discover_vm_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    discover_files_with_extension(dir, "vm")
}

/// Lists the `.jack` files directly inside `dir`, sorted lexicographically by
/// file name, for the Jack analyzer's directory mode.
pub fn discover_jack_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    discover_files_with_extension(dir, "jack")
}

fn discover_files_with_extension(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .collect();
    files.sort();
    Ok(files)
}

/// The file stem (no directory, no extension) used to namespace a VM file's
/// `static` segment and its function-label scope.
#[must_use]
pub fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("Unknown")
}

/// Flattens one level of nested collections into a single `Vec`.
///
/// Used to merge per-file command lists gathered while walking a VM
/// directory into one flat translation unit.
pub fn flatten<I, J, T>(nested: I) -> Vec<T>
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = T>,
{
    nested.into_iter().flat_map(IntoIterator::into_iter).collect()
}

/// Initializes logging for a translator binary.
///
/// By default only warnings and errors are printed. Setting the `VERBOSE`
/// environment variable to any non-empty value raises the level to `debug`,
/// which the assembler uses to trace symbol resolution as it runs.
pub fn init_logging() {
    let verbose = std::env::var("VERBOSE").is_ok_and(|v| !v.is_empty());
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .target(env_logger::Target::Stdout)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vm_output_path_for_file() {
        assert_eq!(vm_output_path(Path::new("Foo.vm")), Path::new("Foo.asm"));
        assert_eq!(
            vm_output_path(Path::new("dir/Foo.vm")),
            Path::new("dir/Foo.asm")
        );
    }

    #[test]
    fn sibling_with_extension_swaps_suffix() {
        assert_eq!(
            sibling_with_extension(Path::new("Prog.asm"), "hack"),
            Path::new("Prog.hack")
        );
        assert_eq!(
            sibling_with_extension(Path::new("Main.jack"), "xml"),
            Path::new("Main.xml")
        );
    }

    #[test]
    fn file_stem_strips_dir_and_extension() {
        assert_eq!(file_stem(Path::new("dir/Foo.vm")), "Foo");
        assert_eq!(file_stem(Path::new("Bar.vm")), "Bar");
    }

    #[test]
    fn flatten_merges_one_level() {
        let nested = vec![vec![1, 2], vec![3], vec![]];
        assert_eq!(flatten(nested), vec![1, 2, 3]);
    }
}
