//! Line-oriented parser for the VM language.
//!
//! Each line holds at most one command. Everything after `//` is a comment;
//! blank lines are skipped. Commands are validated against a fixed table of
//! names and arities before they reach the code generator.

use crate::error::{Error, Result};
use crate::span::Span;

use super::{Segment, VmCommand, VmOp};

/// A parsed command together with the source location it came from.
#[derive(Clone, Debug)]
pub struct ParsedCommand {
    pub command: VmCommand,
    pub line: u32,
    pub span: Span,
}

/// Parse a complete VM source into its command sequence.
pub fn parse_source(source: &str) -> Result<Vec<ParsedCommand>> {
    let mut commands = Vec::new();
    let mut offset = 0u32;

    for (index, raw) in source.lines().enumerate() {
        let line = index as u32 + 1;
        let span = Span::new(offset, offset + raw.len() as u32);
        // +1 for the newline; the final line may lack one, which only
        // affects spans past the end of input.
        offset += raw.len() as u32 + 1;

        let text = raw.split("//").next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        let command = parse_line(text, span, line)?;
        commands.push(ParsedCommand { command, line, span });
    }

    Ok(commands)
}

fn parse_line(text: &str, span: Span, line: u32) -> Result<VmCommand> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let name = fields[0];
    let args = &fields[1..];

    if let Some(op) = VmOp::parse(name) {
        expect_arity(text, args, 0, span, line)?;
        return Ok(VmCommand::Arithmetic(op));
    }

    match name {
        "push" | "pop" => {
            expect_arity(text, args, 2, span, line)?;
            let segment = Segment::parse(args[0]).ok_or_else(|| {
                Error::parse(format!("invalid segment '{}' in <{}>", args[0], text), span, line)
            })?;
            let index = parse_index(args[1], text, span, line)?;
            if name == "push" {
                Ok(VmCommand::Push(segment, index))
            } else {
                Ok(VmCommand::Pop(segment, index))
            }
        }
        "label" | "goto" | "if-goto" => {
            expect_arity(text, args, 1, span, line)?;
            let target = args[0].to_string();
            Ok(match name {
                "label" => VmCommand::Label(target),
                "goto" => VmCommand::Goto(target),
                _ => VmCommand::IfGoto(target),
            })
        }
        "function" | "call" => {
            expect_arity(text, args, 2, span, line)?;
            let count = parse_index(args[1], text, span, line)?;
            if name == "function" {
                Ok(VmCommand::Function(args[0].to_string(), count))
            } else {
                Ok(VmCommand::Call(args[0].to_string(), count))
            }
        }
        "return" => {
            expect_arity(text, args, 0, span, line)?;
            Ok(VmCommand::Return)
        }
        _ => Err(Error::parse(
            format!("invalid command <{}>", text),
            span,
            line,
        )),
    }
}

fn expect_arity(text: &str, args: &[&str], want: usize, span: Span, line: u32) -> Result<()> {
    if args.len() != want {
        return Err(Error::parse(
            format!(
                "invalid number of arguments for this command: <{}> (expected {})",
                text, want
            ),
            span,
            line,
        ));
    }
    Ok(())
}

fn parse_index(arg: &str, text: &str, span: Span, line: u32) -> Result<u16> {
    arg.parse::<u16>().map_err(|_| {
        Error::parse(
            format!("argument '{}' must be a non-negative integer in <{}>", arg, text),
            span,
            line,
        )
    })
}
