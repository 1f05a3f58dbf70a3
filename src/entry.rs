//! Traversal roots.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::SymbolTable;

/// The program's main routine. Its absence marks the input as a library.
pub const PRIMARY_ENTRY_POINT: &str = "main.main";

/// Roots that are always walked, present in the table or not.
pub const FIXED_ENTRY_POINTS: [&str; 3] = [PRIMARY_ENTRY_POINT, "main.init.0", "main.init.1"];

// Package initialisers: `os.init`, `sync.init.0`, ...
static INITIALIZER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.init(?:\.[0-9]+)?$").expect("initializer pattern"));

pub fn is_initializer(name: &str) -> bool {
    INITIALIZER.is_match(name)
}

/// Fixed roots first, then every initializer found in `table` by name.
pub fn entry_points(table: &SymbolTable) -> Vec<String> {
    let mut discovered: Vec<&str> = table
        .names()
        .map(String::as_str)
        .filter(|name| is_initializer(name) && !FIXED_ENTRY_POINTS.contains(name))
        .collect();
    discovered.sort_unstable();

    FIXED_ENTRY_POINTS
        .iter()
        .copied()
        .chain(discovered)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    fn calling(name: &str) -> Symbol {
        let mut symbol = Symbol::new(name);
        symbol.sub_calls.push("runtime.morestack".to_string());
        symbol
    }

    #[test]
    fn initializer_names() {
        assert!(is_initializer("os.init"));
        assert!(is_initializer("sync.init.0"));
        assert!(is_initializer("golang.org/x/sys/unix.init.12"));
        assert!(!is_initializer("main.initialize"));
        assert!(!is_initializer("os.init.func1"));
        assert!(!is_initializer("init"));
    }

    #[test]
    fn fixed_roots_come_first_even_when_absent() {
        let table = SymbolTable::new();
        assert_eq!(entry_points(&table), FIXED_ENTRY_POINTS.map(String::from).to_vec());
    }

    #[test]
    fn discovered_initializers_are_appended_once() {
        let table: SymbolTable = ["sync.init.0", "os.init", "main.init.0", "main.run"]
            .into_iter()
            .map(calling)
            .collect();
        assert_eq!(
            entry_points(&table),
            vec!["main.main", "main.init.0", "main.init.1", "os.init", "sync.init.0"]
        );
    }
}
