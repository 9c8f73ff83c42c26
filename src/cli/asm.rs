use std::path::PathBuf;

use clap::Args;

use super::{fail, read_source, write_output};

#[derive(Args)]
pub struct AsmArgs {
    /// Input .asm file
    pub input: PathBuf,
    /// Output .hack file (default: <input>.hack)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn cmd_asm(args: AsmArgs) {
    let source = read_source(&args.input);
    let filename = args.input.to_string_lossy().into_owned();

    let machine_code = match hackc::asm::assemble(&source) {
        Ok(code) => code,
        Err(e) => fail(&e, &filename, &source),
    };

    let out_path = args
        .output
        .unwrap_or_else(|| args.input.with_extension("hack"));
    write_output(&out_path, &machine_code);
    eprintln!("Assembled -> {}", out_path.display());
}
