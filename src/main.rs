mod cli;

use clap::{Parser, Subcommand};

use cli::asm::AsmArgs;
use cli::jack::JackArgs;
use cli::vm::VmArgs;

#[derive(Parser)]
#[command(
    name = "hackc",
    version,
    about = "Hack platform toolchain: Jack compiler, VM translator, assembler"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile .jack files to VM code
    Jack(JackArgs),
    /// Translate VM code to Hack assembly
    Vm(VmArgs),
    /// Assemble Hack assembly to 16-bit machine code
    Asm(AsmArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Jack(args) => cli::jack::cmd_jack(args),
        Command::Vm(args) => cli::vm::cmd_vm(args),
        Command::Asm(args) => cli::asm::cmd_asm(args),
    }
}
