// src/types.rs

use std::collections::HashMap;
use std::collections::hash_map;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,          // Symbol name as written in the TEXT header
    pub syscall_ids: Vec<u16>, // Syscalls triggered directly by the body, in order
    pub sub_calls: Vec<String>, // Distinct call targets, in order of first appearance
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A symbol with neither syscalls nor outgoing calls cannot contribute to a walk.
    pub fn is_inert(&self) -> bool {
        self.syscall_ids.is_empty() && self.sub_calls.is_empty()
    }
}

/// Every non-inert symbol of one dump, keyed by name.
///
/// Built once by the parser and only read afterwards. Re-defining a name
/// replaces the earlier record.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `symbol` unless it is inert. Returns whether it was kept.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if symbol.is_inert() {
            return false;
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn names(&self) -> hash_map::Keys<'_, String, Symbol> {
        self.symbols.keys()
    }
}

impl FromIterator<Symbol> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut table = Self::new();
        for symbol in iter {
            table.insert(symbol);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SystemCall {
    pub id: u16,
    pub name: String,
}
