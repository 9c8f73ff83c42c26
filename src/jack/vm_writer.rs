//! Line-oriented emitter for VM instructions. Each write method produces
//! exactly one line; failures are programmer errors in the caller, not
//! parse-time diagnostics.

use crate::error::{Error, Result};
use crate::vm::{Segment, VmOp};

#[derive(Default)]
pub struct VmWriter {
    output: Vec<String>,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) -> Result<()> {
        self.check_index(segment, index)?;
        self.line(format!("push {} {}", segment.as_str(), index));
        Ok(())
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) -> Result<()> {
        if segment == Segment::Constant {
            return Err(Error::vm_writer("cannot pop the constant segment"));
        }
        self.check_index(segment, index)?;
        self.line(format!("pop {} {}", segment.as_str(), index));
        Ok(())
    }

    pub fn write_arithmetic(&mut self, op: VmOp) {
        self.line(op.as_str().to_string());
    }

    pub fn write_label(&mut self, label: &str) {
        self.line(format!("label {}", label));
    }

    pub fn write_goto(&mut self, label: &str) {
        self.line(format!("goto {}", label));
    }

    pub fn write_if(&mut self, label: &str) {
        self.line(format!("if-goto {}", label));
    }

    pub fn write_call(&mut self, name: &str, args: u16) {
        self.line(format!("call {} {}", name, args));
    }

    pub fn write_function(&mut self, name: &str, locals: u16) {
        self.line(format!("function {} {}", name, locals));
    }

    pub fn write_return(&mut self) {
        self.line("return".to_string());
    }

    pub fn finish(self) -> String {
        let mut text = self.output.join("\n");
        text.push('\n');
        text
    }

    fn check_index(&self, segment: Segment, index: u16) -> Result<()> {
        let max = match segment {
            Segment::Pointer => 1,
            Segment::Temp => 7,
            _ => return Ok(()),
        };
        if index > max {
            return Err(Error::vm_writer(format!(
                "{} index must be between 0 and {} (inclusive), got {}",
                segment.as_str(),
                max,
                index
            )));
        }
        Ok(())
    }

    fn line(&mut self, text: String) {
        self.output.push(text);
    }
}
