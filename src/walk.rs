//! Call graph reachability from the entry points.

use std::collections::{BTreeSet, HashSet};
use std::thread;

use parking_lot::Mutex;
use tracing::trace;

use crate::types::SymbolTable;

/// What one extraction has seen so far.
///
/// Every check is also the mark: `visit` and `emit` insert and report
/// whether the value was new, so a caller holding the state (or its lock)
/// once can never see a symbol as unvisited twice.
#[derive(Debug, Default)]
pub struct VisitedState {
    symbols: HashSet<String>,
    syscalls: BTreeSet<u16>,
}

impl VisitedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit(&mut self, name: &str) -> bool {
        if self.symbols.contains(name) {
            return false;
        }
        self.symbols.insert(name.to_string())
    }

    pub fn emit(&mut self, id: u16) -> bool {
        self.syscalls.insert(id)
    }

    pub fn visited(&self) -> usize {
        self.symbols.len()
    }

    pub fn into_syscalls(self) -> BTreeSet<u16> {
        self.syscalls
    }
}

/// Collects the syscalls reachable from `entry_points`, walking each symbol once.
pub fn walk<S: AsRef<str>>(table: &SymbolTable, entry_points: &[S]) -> BTreeSet<u16> {
    let mut state = VisitedState::new();
    for entry in entry_points {
        walk_from(table, entry.as_ref(), &mut state);
    }
    trace!(visited = state.visited(), "walk finished");
    state.into_syscalls()
}

/// Same result as [`walk`], with one thread per entry point over a shared state.
pub fn walk_parallel<S: AsRef<str> + Sync>(
    table: &SymbolTable,
    entry_points: &[S],
) -> BTreeSet<u16> {
    let state = Mutex::new(VisitedState::new());

    thread::scope(|scope| {
        for entry in entry_points {
            let state = &state;
            scope.spawn(move || {
                let mut pending = vec![entry.as_ref()];
                while let Some(name) = pending.pop() {
                    let mut guard = state.lock();
                    if !guard.visit(name) {
                        continue;
                    }
                    let Some(symbol) = table.get(name) else {
                        continue;
                    };
                    for &id in &symbol.syscall_ids {
                        guard.emit(id);
                    }
                    drop(guard);
                    pending.extend(symbol.sub_calls.iter().rev().map(String::as_str));
                }
            });
        }
    });

    state.into_inner().into_syscalls()
}

fn walk_from(table: &SymbolTable, entry: &str, state: &mut VisitedState) {
    let mut pending = vec![entry];
    while let Some(name) = pending.pop() {
        if !state.visit(name) {
            continue;
        }
        // Unknown names are leaves.
        let Some(symbol) = table.get(name) else {
            continue;
        };
        for &id in &symbol.syscall_ids {
            if state.emit(id) {
                trace!(symbol = name, id, "reached syscall");
            }
        }
        // Reversed so callees are visited in call order.
        pending.extend(symbol.sub_calls.iter().rev().map(String::as_str));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    fn symbol(name: &str, syscalls: &[u16], calls: &[&str]) -> Symbol {
        Symbol {
            name: name.to_string(),
            syscall_ids: syscalls.to_vec(),
            sub_calls: calls.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn ids(set: BTreeSet<u16>) -> Vec<u16> {
        set.into_iter().collect()
    }

    #[test]
    fn visit_is_check_and_mark() {
        let mut state = VisitedState::new();
        assert!(state.visit("main.main"));
        assert!(!state.visit("main.main"));
        assert!(state.emit(1));
        assert!(!state.emit(1));
    }

    #[test]
    fn self_recursion_terminates() {
        let table: SymbolTable = [symbol("main.main", &[231, 231], &["main.main"])]
            .into_iter()
            .collect();
        assert_eq!(ids(walk(&table, &["main.main"])), vec![231]);
    }

    #[test]
    fn mutual_recursion_terminates() {
        let table: SymbolTable = [
            symbol("main.main", &[], &["main.a"]),
            symbol("main.a", &[1], &["main.b"]),
            symbol("main.b", &[2], &["main.a", "main.main"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(ids(walk(&table, &["main.main"])), vec![1, 2]);
    }

    #[test]
    fn shared_syscalls_are_reported_once() {
        let table: SymbolTable = [
            symbol("main.main", &[], &["main.a", "main.b"]),
            symbol("main.a", &[60], &[]),
            symbol("main.b", &[60], &[]),
        ]
        .into_iter()
        .collect();
        assert_eq!(ids(walk(&table, &["main.main"])), vec![60]);
    }

    #[test]
    fn unknown_names_are_leaves() {
        let table: SymbolTable = [symbol("main.main", &[39], &["runtime.missing"])]
            .into_iter()
            .collect();
        assert_eq!(ids(walk(&table, &["main.init.0", "main.main"])), vec![39]);
    }

    #[test]
    fn unreachable_symbols_are_ignored() {
        let table: SymbolTable = [
            symbol("main.main", &[1], &[]),
            symbol("main.dead", &[2], &[]),
        ]
        .into_iter()
        .collect();
        assert_eq!(ids(walk(&table, &["main.main"])), vec![1]);
    }

    #[test]
    fn parallel_matches_serial() {
        let mut symbols = vec![symbol("main.main", &[0], &["f0", "main.main"])];
        for i in 0..200u16 {
            let next = format!("f{}", (i + 1) % 200);
            let back = format!("f{}", i / 2);
            symbols.push(symbol(&format!("f{i}"), &[i % 50], &[&next, &back]));
        }
        symbols.push(symbol("os.init", &[300], &["f7"]));
        let table: SymbolTable = symbols.into_iter().collect();
        let roots = ["main.main", "main.init.0", "main.init.1", "os.init"];

        let serial = walk(&table, &roots);
        assert_eq!(walk_parallel(&table, &roots), serial);
        assert_eq!(serial.len(), 51);
    }
}
