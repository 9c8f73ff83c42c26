use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::span::Span;

/// The stage-level classification of a toolchain error.
///
/// Kinds, not types: every stage reports through the same `Error` record and
/// tags it with the kind of contract that was broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed character stream (unterminated string or comment).
    Tokenizer,
    /// Token-level violation (integer out of range, unclassifiable lexeme).
    Token,
    /// Grammar mismatch; carries line number and expectation.
    Syntax,
    /// Symbol redefinition, or lookup the caller guaranteed would succeed.
    SymbolTable,
    /// Contract violation in the VM writer.
    VmWriter,
    /// Contract violation in the assembly code generator.
    Code,
    /// ISA- or command-level violation in the assembler / VM parser.
    Parse,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Tokenizer => "tokenizer error",
            ErrorKind::Token => "token error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::SymbolTable => "symbol table error",
            ErrorKind::VmWriter => "vm writer error",
            ErrorKind::Code => "code generation error",
            ErrorKind::Parse => "parse error",
        }
    }
}

/// A toolchain error. The first error in a compilation unit aborts the unit;
/// there is no recovery and no batching.
#[derive(Clone, Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    /// 1-based source line, or 0 when the error has no source location
    /// (internal contract violations).
    pub line: u32,
    pub help: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span, line: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            line,
            help: None,
        }
    }

    pub fn tokenizer(message: impl Into<String>, span: Span, line: u32) -> Self {
        Self::new(ErrorKind::Tokenizer, message, span, line)
    }

    pub fn token(message: impl Into<String>, span: Span, line: u32) -> Self {
        Self::new(ErrorKind::Token, message, span, line)
    }

    pub fn syntax(message: impl Into<String>, span: Span, line: u32) -> Self {
        Self::new(ErrorKind::Syntax, message, span, line)
    }

    pub fn symbol_table(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SymbolTable, message, Span::dummy(), 0)
    }

    pub fn vm_writer(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::VmWriter, message, Span::dummy(), 0)
    }

    pub fn code(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Code, message, Span::dummy(), 0)
    }

    pub fn parse(message: impl Into<String>, span: Span, line: u32) -> Self {
        Self::new(ErrorKind::Parse, message, span, line)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach a source location to an error raised without one.
    pub fn at(mut self, span: Span, line: u32) -> Self {
        if self.line == 0 {
            self.span = span;
            self.line = line;
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string(), self.span);
        if let Some(help) = &self.help {
            diag = diag.with_help(help.clone());
        }
        diag
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{} on line {}: {}", self.kind.label(), self.line, self.message)
        } else {
            write!(f, "{}: {}", self.kind.label(), self.message)
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
