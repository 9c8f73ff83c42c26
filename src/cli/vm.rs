use std::path::PathBuf;
use std::process;

use clap::Args;

use hackc::vm::Translator;

use super::{fail, files_with_extension, read_source, stem_of, write_output};

#[derive(Args)]
pub struct VmArgs {
    /// Input .vm file, or a directory containing .vm files
    pub input: PathBuf,
    /// Output .asm file (default: <input>.asm, or <dir>/<dir>.asm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn cmd_vm(args: VmArgs) {
    let is_dir = args.input.is_dir();

    // Bootstrap code is prepended only in directory mode.
    let files = if is_dir {
        let files = files_with_extension(&args.input, "vm");
        if files.is_empty() {
            eprintln!(
                "error: no files with .vm suffix found in '{}'",
                args.input.display()
            );
            process::exit(1);
        }
        files
    } else {
        vec![args.input.clone()]
    };

    let mut translator = Translator::new(is_dir);
    for file in &files {
        let source = read_source(file);
        let stem = stem_of(file);
        if let Err(e) = translator.translate_unit(&stem, &source) {
            fail(&e, &file.to_string_lossy(), &source);
        }
    }

    let out_path = args.output.unwrap_or_else(|| {
        if is_dir {
            // D/D.asm, named after the final path component
            let dir_name = args
                .input
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| stem_of(&args.input));
            args.input.join(format!("{}.asm", dir_name))
        } else {
            args.input.with_extension("asm")
        }
    });
    write_output(&out_path, &translator.finish());
    eprintln!("Translated -> {}", out_path.display());
}
