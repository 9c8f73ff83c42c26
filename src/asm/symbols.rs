//! The assembler's symbol table, pre-populated with the Hack platform's
//! fixed symbols. Labels are bound to ROM addresses during pass 1; variables
//! are allocated monotonically from RAM address 16 during pass 2.

use std::collections::HashMap;

pub const VARIABLE_BASE: u16 = 16;

pub struct SymbolTable {
    map: HashMap<String, u16>,
    next_variable: u16,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut map = HashMap::new();
        for i in 0..16u16 {
            map.insert(format!("R{}", i), i);
        }
        map.insert("SP".to_string(), 0);
        map.insert("LCL".to_string(), 1);
        map.insert("ARG".to_string(), 2);
        map.insert("THIS".to_string(), 3);
        map.insert("THAT".to_string(), 4);
        map.insert("SCREEN".to_string(), 16384);
        map.insert("KBD".to_string(), 24576);
        Self {
            map,
            next_variable: VARIABLE_BASE,
        }
    }

    /// Bind a label to a ROM address. Returns false if the name is taken.
    pub fn bind(&mut self, name: &str, address: u16) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        self.map.insert(name.to_string(), address);
        true
    }

    /// Look the name up, allocating the next RAM slot if it is unknown.
    pub fn resolve_or_allocate(&mut self, name: &str) -> u16 {
        if let Some(&address) = self.map.get(name) {
            return address;
        }
        let address = self.next_variable;
        self.next_variable += 1;
        self.map.insert(name.to_string(), address);
        address
    }
}
