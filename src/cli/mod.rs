pub mod asm;
pub mod jack;
pub mod vm;

use std::path::{Path, PathBuf};
use std::process;

use hackc::Error;

/// Read a source file or bail out with a one-line diagnostic.
pub fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

pub fn write_output(path: &Path, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        eprintln!("error: cannot write '{}': {}", path.display(), e);
        process::exit(1);
    }
}

/// Render a toolchain error against its source and exit nonzero.
pub fn fail(error: &Error, filename: &str, source: &str) -> ! {
    error.to_diagnostic().render(filename, source);
    process::exit(1);
}

/// Collect the files with the given extension directly inside a directory,
/// sorted by name so output is deterministic.
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("error: cannot read directory '{}': {}", dir.display(), e);
            process::exit(1);
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}

/// File stem as a string, for static-segment prefixes and output naming.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
