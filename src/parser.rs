//! Builds a [`SymbolTable`] from a disassembly dump in one pass.

use std::io::BufRead;

use tracing::{debug, trace};

use crate::classify::{self, Line};
use crate::error::Result;
use crate::resolver::SyscallResolver;
use crate::types::{Symbol, SymbolTable};

/// Parses every symbol body of `reader`.
///
/// Malformed lines are ignored; only read failures are returned.
pub fn parse_dump<R, S>(reader: R, resolver: &S) -> Result<SymbolTable>
where
    R: BufRead,
    S: SyscallResolver + ?Sized,
{
    let mut lines = DumpLines::new(reader);
    let mut table = SymbolTable::new();
    let mut discarded = 0usize;

    while let Some(line) = lines.next_line()? {
        let Some(name) = classify::match_symbol_definition(line) else {
            continue;
        };
        let mut body = BodyParser::new(name, resolver);

        while let Some(line) = lines.next_line()? {
            if !body.feed(line) {
                break;
            }
        }

        let symbol = body.finish();
        trace!(
            symbol = %symbol.name,
            syscalls = symbol.syscall_ids.len(),
            calls = symbol.sub_calls.len(),
            "parsed symbol"
        );
        if !table.insert(symbol) {
            discarded += 1;
        }
    }

    debug!(symbols = table.len(), discarded, "parsed dump");
    Ok(table)
}

/// Accumulates one symbol body.
struct BodyParser<'r, S: ?Sized> {
    symbol: Symbol,
    // Immediates loaded since the body started, most recent last.
    pending: Vec<u16>,
    resolver: &'r S,
}

impl<'r, S: SyscallResolver + ?Sized> BodyParser<'r, S> {
    fn new(name: &str, resolver: &'r S) -> Self {
        Self {
            symbol: Symbol::new(name),
            pending: Vec::new(),
            resolver,
        }
    }

    /// Consumes one body line. Returns `false` once the body has ended.
    fn feed(&mut self, line: &str) -> bool {
        match classify::classify(line) {
            Line::Terminator => return false,
            Line::SyscallTrigger => {
                if let Some(id) = self.pop_syscall_id() {
                    if self.resolver.is_syscall(id) {
                        self.symbol.syscall_ids.push(id);
                    } else {
                        trace!(symbol = %self.symbol.name, id, "ignoring unknown syscall number");
                    }
                }
            }
            Line::Call(target) => {
                if !self.symbol.sub_calls.iter().any(|known| known == target) {
                    self.symbol.sub_calls.push(target.to_string());
                }
            }
            // Only real syscall numbers are candidates.
            Line::ImmediateLoad(value) if self.resolver.is_syscall(value) => {
                self.pending.push(value);
            }
            Line::ImmediateLoad(_) => {}
            Line::Other => {}
        }
        true
    }

    // Pops once, then once more: when two values were pending the older one
    // is the syscall number and the newer one an argument loaded after it.
    fn pop_syscall_id(&mut self) -> Option<u16> {
        let last = self.pending.pop()?;
        Some(self.pending.pop().unwrap_or(last))
    }

    fn finish(self) -> Symbol {
        self.symbol
    }
}

/// Line reader that tolerates invalid UTF-8 and reuses one buffer.
struct DumpLines<R> {
    reader: R,
    raw: Vec<u8>,
    line: String,
}

impl<R: BufRead> DumpLines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            raw: Vec::new(),
            line: String::new(),
        }
    }

    fn next_line(&mut self) -> Result<Option<&str>> {
        self.raw.clear();
        if self.reader.read_until(b'\n', &mut self.raw)? == 0 {
            return Ok(None);
        }
        if self.raw.last() == Some(&b'\n') {
            self.raw.pop();
        }
        if self.raw.last() == Some(&b'\r') {
            self.raw.pop();
        }
        self.line.clear();
        self.line.push_str(&String::from_utf8_lossy(&self.raw));
        Ok(Some(&self.line))
    }
}
