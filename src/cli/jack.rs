use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{fail, files_with_extension, read_source, write_output};

#[derive(Args)]
pub struct JackArgs {
    /// Input .jack file, or a directory of .jack files
    pub input: PathBuf,
    /// Output .vm file (single-file mode only; default: <input>.vm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn cmd_jack(args: JackArgs) {
    let files = if args.input.is_dir() {
        let files = files_with_extension(&args.input, "jack");
        if files.is_empty() {
            eprintln!(
                "error: no files with .jack suffix found in '{}'",
                args.input.display()
            );
            process::exit(1);
        }
        files
    } else {
        vec![args.input.clone()]
    };
    let single = files.len() == 1;

    // Each class file compiles independently; no cross-file state.
    for file in &files {
        let source = read_source(file);
        let vm_code = match hackc::jack::compile(&source) {
            Ok(code) => code,
            Err(e) => fail(&e, &file.to_string_lossy(), &source),
        };
        let out_path = match (&args.output, single) {
            (Some(output), true) => output.clone(),
            _ => file.with_extension("vm"),
        };
        write_output(&out_path, &vm_code);
        eprintln!("Compiled -> {}", out_path.display());
    }
}
