//! The VM intermediate language: command types shared by the Jack compiler's
//! VM writer and the VM-to-assembly translator, plus the translation driver.

pub mod codegen;
pub mod parser;

use crate::error::Result;
use codegen::AsmGen;

/// A VM memory segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Static,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Static => "static",
        }
    }

    pub fn parse(s: &str) -> Option<Segment> {
        match s {
            "constant" => Some(Segment::Constant),
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "pointer" => Some(Segment::Pointer),
            "temp" => Some(Segment::Temp),
            "static" => Some(Segment::Static),
            _ => None,
        }
    }
}

/// A VM arithmetic/logic command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VmOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl VmOp {
    pub fn as_str(self) -> &'static str {
        match self {
            VmOp::Add => "add",
            VmOp::Sub => "sub",
            VmOp::Neg => "neg",
            VmOp::Eq => "eq",
            VmOp::Gt => "gt",
            VmOp::Lt => "lt",
            VmOp::And => "and",
            VmOp::Or => "or",
            VmOp::Not => "not",
        }
    }

    pub fn parse(s: &str) -> Option<VmOp> {
        match s {
            "add" => Some(VmOp::Add),
            "sub" => Some(VmOp::Sub),
            "neg" => Some(VmOp::Neg),
            "eq" => Some(VmOp::Eq),
            "gt" => Some(VmOp::Gt),
            "lt" => Some(VmOp::Lt),
            "and" => Some(VmOp::And),
            "or" => Some(VmOp::Or),
            "not" => Some(VmOp::Not),
            _ => None,
        }
    }
}

/// One VM instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VmCommand {
    Arithmetic(VmOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

/// A single VM translation unit: the file stem (used to namespace the
/// `static` segment) and its source text.
#[derive(Clone, Debug)]
pub struct VmUnit {
    pub stem: String,
    pub source: String,
}

impl VmUnit {
    pub fn new(stem: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            source: source.into(),
        }
    }
}

/// Incremental VM-to-assembly translator. Label counters are shared across
/// units; the static-name prefix is reset per unit.
pub struct Translator {
    gen: AsmGen,
}

impl Translator {
    pub fn new(bootstrap: bool) -> Self {
        let mut gen = AsmGen::new();
        if bootstrap {
            gen.emit_bootstrap();
        }
        Self { gen }
    }

    pub fn translate_unit(&mut self, stem: &str, source: &str) -> Result<()> {
        self.gen.set_file(stem);
        for parsed in parser::parse_source(source)? {
            self.gen
                .emit(&parsed.command)
                .map_err(|e| e.at(parsed.span, parsed.line))?;
        }
        Ok(())
    }

    pub fn finish(self) -> String {
        self.gen.finish()
    }
}

/// Translate a set of VM units into one assembly output.
pub fn translate(units: &[VmUnit], bootstrap: bool) -> Result<String> {
    let mut translator = Translator::new(bootstrap);
    for unit in units {
        translator.translate_unit(&unit.stem, &unit.source)?;
    }
    Ok(translator.finish())
}
