//! Per-line parsing of Hack assembly.
//!
//! All whitespace within a line is deleted before tokenization, and
//! everything after `//` is a comment. What remains is classified as an
//! A-instruction, a C-instruction, or a label pseudo-instruction.

use crate::error::{Error, Result};
use crate::span::Span;

use super::code;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    A(AddressValue),
    /// Fields hold the already-encoded bit strings.
    C {
        comp: &'static str,
        dest: &'static str,
        jump: &'static str,
    },
    Label(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressValue {
    Literal(u16),
    Symbol(String),
}

/// Parse one raw source line. Returns `None` for blank/comment-only lines.
pub fn parse_line(raw: &str, span: Span, line: u32) -> Result<Option<Instruction>> {
    let text: String = raw
        .split("//")
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if text.is_empty() {
        return Ok(None);
    }

    if let Some(body) = text.strip_prefix('@') {
        return parse_a_instruction(body, &text, span, line).map(Some);
    }
    if text.starts_with('(') {
        return parse_label(&text, span, line).map(Some);
    }
    parse_c_instruction(&text, span, line).map(Some)
}

fn parse_a_instruction(body: &str, text: &str, span: Span, line: u32) -> Result<Instruction> {
    if body.is_empty() {
        return Err(Error::parse(
            format!("missing symbol in A-instruction <{}>", text),
            span,
            line,
        ));
    }

    if body.bytes().all(|b| b.is_ascii_digit()) {
        let value = body.parse::<u32>().unwrap_or(u32::MAX);
        if value >= 32768 {
            return Err(Error::parse(
                format!(
                    "invalid value in A-instruction <{}>: value must be between 0 and 32767 (inclusive)",
                    text
                ),
                span,
                line,
            ));
        }
        return Ok(Instruction::A(AddressValue::Literal(value as u16)));
    }

    if !is_symbol(body) {
        return Err(Error::parse(
            format!("malformed symbol in A-instruction <{}>", text),
            span,
            line,
        ));
    }
    Ok(Instruction::A(AddressValue::Symbol(body.to_string())))
}

fn parse_label(text: &str, span: Span, line: u32) -> Result<Instruction> {
    let body = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or("");
    if body.is_empty() || !is_symbol(body) {
        return Err(Error::parse(
            format!("malformed label <{}>", text),
            span,
            line,
        ));
    }
    Ok(Instruction::Label(body.to_string()))
}

fn parse_c_instruction(text: &str, span: Span, line: u32) -> Result<Instruction> {
    if text.matches('=').count() > 1 {
        return Err(Error::parse(
            format!("multiple destinations specified in <{}>", text),
            span,
            line,
        ));
    }
    if text.matches(';').count() > 1 {
        return Err(Error::parse(
            format!("multiple jumps specified in <{}>", text),
            span,
            line,
        ));
    }

    let (dest_mnemonic, rest) = match text.split_once('=') {
        Some((d, r)) => (Some(d), r),
        None => (None, text),
    };
    let (comp_mnemonic, jump_mnemonic) = match rest.split_once(';') {
        Some((c, j)) => (c, Some(j)),
        None => (rest, None),
    };

    let dest = match dest_mnemonic {
        None => "000",
        Some(d) => code::dest(d).ok_or_else(|| {
            Error::parse(
                format!("invalid destination specified in <{}>", text),
                span,
                line,
            )
        })?,
    };
    let comp = code::comp(comp_mnemonic).ok_or_else(|| {
        Error::parse(
            format!("invalid computation specified in <{}>", text),
            span,
            line,
        )
    })?;
    let jump = match jump_mnemonic {
        None => "000",
        Some(j) => code::jump(j).ok_or_else(|| {
            Error::parse(format!("invalid jump specified in <{}>", text), span, line)
        })?,
    };

    Ok(Instruction::C { comp, dest, jump })
}

/// Hack symbols: letters, digits, `_`, `.`, `$`, `:`, not starting with a
/// digit.
fn is_symbol(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b"_.$:".contains(&b) => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b"_.$:".contains(&b))
}
