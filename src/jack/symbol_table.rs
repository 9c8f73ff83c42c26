//! Two-level scoped symbol table for the Jack compiler.
//!
//! Static/Field entries live in the class scope, which spans one compilation
//! unit. Arg/Var entries live in the subroutine scope, which is cleared at
//! the start of each subroutine. Lookup consults the subroutine scope first.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::vm::Segment;

/// The kind of a declared Jack variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Static,
    Field,
    Arg,
    Var,
}

impl VarKind {
    /// The VM segment backing this kind of variable.
    pub fn segment(self) -> Segment {
        match self {
            VarKind::Static => Segment::Static,
            VarKind::Field => Segment::This,
            VarKind::Arg => Segment::Argument,
            VarKind::Var => Segment::Local,
        }
    }

    fn is_class_scope(self) -> bool {
        matches!(self, VarKind::Static | VarKind::Field)
    }
}

#[derive(Clone, Debug)]
struct SymbolEntry {
    ty: String,
    kind: VarKind,
    index: u16,
}

#[derive(Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, SymbolEntry>,
    subroutine_scope: HashMap<String, SymbolEntry>,
    static_index: u16,
    field_index: u16,
    arg_index: u16,
    var_index: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the subroutine scope and reset its per-kind indices.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.arg_index = 0;
        self.var_index = 0;
    }

    /// Insert a name into the scope determined by `kind`. Indices are
    /// per-kind, zero-based, assigned in insertion order.
    pub fn define(&mut self, name: &str, ty: &str, kind: VarKind) -> Result<()> {
        let scope = if kind.is_class_scope() {
            &mut self.class_scope
        } else {
            &mut self.subroutine_scope
        };
        if scope.contains_key(name) {
            return Err(Error::symbol_table(format!(
                "attempting to define a symbol that is already defined: <{}>",
                name
            )));
        }

        let counter = match kind {
            VarKind::Static => &mut self.static_index,
            VarKind::Field => &mut self.field_index,
            VarKind::Arg => &mut self.arg_index,
            VarKind::Var => &mut self.var_index,
        };
        let index = *counter;
        *counter += 1;

        scope.insert(
            name.to_string(),
            SymbolEntry {
                ty: ty.to_string(),
                kind,
                index,
            },
        );
        Ok(())
    }

    /// Subroutine scope first, then class scope.
    fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<VarKind> {
        self.get(name).map(|e| e.kind)
    }

    pub fn type_of(&self, name: &str) -> Result<&str> {
        self.get(name)
            .map(|e| e.ty.as_str())
            .ok_or_else(|| undefined(name))
    }

    pub fn index_of(&self, name: &str) -> Result<u16> {
        self.get(name).map(|e| e.index).ok_or_else(|| undefined(name))
    }

    pub fn segment_of(&self, name: &str) -> Result<Segment> {
        self.get(name)
            .map(|e| e.kind.segment())
            .ok_or_else(|| undefined(name))
    }

    /// Number of entries of the given kind in the appropriate scope.
    pub fn var_count(&self, kind: VarKind) -> u16 {
        match kind {
            VarKind::Static => self.static_index,
            VarKind::Field => self.field_index,
            VarKind::Arg => self.arg_index,
            VarKind::Var => self.var_index,
        }
    }
}

fn undefined(name: &str) -> Error {
    Error::symbol_table(format!("undefined name: <{}>", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense_per_kind() {
        let mut table = SymbolTable::new();
        table.define("x", "int", VarKind::Field).unwrap();
        table.define("y", "int", VarKind::Field).unwrap();
        table.define("count", "int", VarKind::Static).unwrap();
        table.define("a", "int", VarKind::Arg).unwrap();
        table.define("b", "boolean", VarKind::Arg).unwrap();
        table.define("tmp", "Array", VarKind::Var).unwrap();

        assert_eq!(table.index_of("x").unwrap(), 0);
        assert_eq!(table.index_of("y").unwrap(), 1);
        assert_eq!(table.index_of("count").unwrap(), 0);
        assert_eq!(table.index_of("a").unwrap(), 0);
        assert_eq!(table.index_of("b").unwrap(), 1);
        assert_eq!(table.index_of("tmp").unwrap(), 0);

        assert_eq!(table.var_count(VarKind::Field), 2);
        assert_eq!(table.var_count(VarKind::Static), 1);
        assert_eq!(table.var_count(VarKind::Arg), 2);
        assert_eq!(table.var_count(VarKind::Var), 1);
    }

    #[test]
    fn test_redefinition_in_scope_is_an_error() {
        let mut table = SymbolTable::new();
        table.define("x", "int", VarKind::Field).unwrap();
        let err = table.define("x", "boolean", VarKind::Static).unwrap_err();
        assert!(err.message.contains("already defined"));
    }

    #[test]
    fn test_subroutine_scope_shadows_class_scope() {
        let mut table = SymbolTable::new();
        table.define("value", "int", VarKind::Field).unwrap();
        table.define("value", "boolean", VarKind::Var).unwrap();
        assert_eq!(table.kind_of("value"), Some(VarKind::Var));
        assert_eq!(table.type_of("value").unwrap(), "boolean");
    }

    #[test]
    fn test_start_subroutine_resets_only_subroutine_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", VarKind::Field).unwrap();
        table.define("a", "int", VarKind::Arg).unwrap();
        table.define("v", "int", VarKind::Var).unwrap();

        table.start_subroutine();

        assert_eq!(table.var_count(VarKind::Arg), 0);
        assert_eq!(table.var_count(VarKind::Var), 0);
        assert_eq!(table.kind_of("a"), None);
        assert_eq!(table.kind_of("v"), None);
        // class scope survives
        assert_eq!(table.kind_of("x"), Some(VarKind::Field));
        assert_eq!(table.var_count(VarKind::Field), 1);

        // indices restart from zero
        table.define("p", "int", VarKind::Arg).unwrap();
        assert_eq!(table.index_of("p").unwrap(), 0);
    }

    #[test]
    fn test_redefinition_allowed_after_reset() {
        let mut table = SymbolTable::new();
        table.define("i", "int", VarKind::Var).unwrap();
        table.start_subroutine();
        assert!(table.define("i", "int", VarKind::Var).is_ok());
    }

    #[test]
    fn test_segment_mapping() {
        let mut table = SymbolTable::new();
        table.define("s", "int", VarKind::Static).unwrap();
        table.define("f", "int", VarKind::Field).unwrap();
        table.define("a", "int", VarKind::Arg).unwrap();
        table.define("v", "int", VarKind::Var).unwrap();
        assert_eq!(table.segment_of("s").unwrap(), Segment::Static);
        assert_eq!(table.segment_of("f").unwrap(), Segment::This);
        assert_eq!(table.segment_of("a").unwrap(), Segment::Argument);
        assert_eq!(table.segment_of("v").unwrap(), Segment::Local);
    }

    #[test]
    fn test_lookup_of_undefined_name() {
        let table = SymbolTable::new();
        assert_eq!(table.kind_of("ghost"), None);
        assert!(table.type_of("ghost").is_err());
        assert!(table.index_of("ghost").is_err());
        assert!(table.segment_of("ghost").is_err());
    }
}
