pub mod classify;
pub mod entry;
pub mod error;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod source;
pub mod types;
pub mod walk;

use std::io::BufRead;

use tracing::{debug, info};

pub use error::{Error, Result};
pub use resolver::{LinuxX86_64, StaticTable, SyscallResolver};
pub use source::{DumpReader, ExeReader, Source};
pub use types::{Symbol, SymbolTable, SystemCall};

/// Finds the system calls reachable from a program's entry points.
pub struct Extractor<R = LinuxX86_64> {
    resolver: R,
    parallel: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(LinuxX86_64)
    }
}

impl<R: SyscallResolver> Extractor<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            parallel: false,
        }
    }

    /// Walk entry points on separate threads. The result is the same either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn extract(&self, source: &dyn Source) -> Result<Vec<SystemCall>> {
        debug!(source = %source.describe(), "extracting");
        let reader = source.open()?;
        self.extract_from_reader(reader)
    }

    pub fn extract_from_reader(&self, reader: impl BufRead) -> Result<Vec<SystemCall>> {
        let table = parser::parse_dump(reader, &self.resolver)?;
        self.extract_from_table(&table)
    }

    /// Walks an already parsed table. Results are sorted by id.
    pub fn extract_from_table(&self, table: &SymbolTable) -> Result<Vec<SystemCall>> {
        if !table.contains(entry::PRIMARY_ENTRY_POINT) {
            return Err(Error::UnsupportedInput {
                entry_point: entry::PRIMARY_ENTRY_POINT.to_string(),
            });
        }

        let entry_points = entry::entry_points(table);
        debug!(?entry_points, "walking call graph");

        let ids = if self.parallel {
            walk::walk_parallel(table, &entry_points)
        } else {
            walk::walk(table, &entry_points)
        };

        // ids is ordered, so the result is too.
        let syscalls: Vec<SystemCall> = ids
            .into_iter()
            .filter_map(|id| {
                self.resolver.name_of(id).map(|name| SystemCall {
                    id,
                    name: name.to_string(),
                })
            })
            .collect();

        info!(symbols = table.len(), syscalls = syscalls.len(), "extraction finished");
        Ok(syscalls)
    }
}

pub fn extract(source: &dyn Source) -> Result<Vec<SystemCall>> {
    Extractor::new(LinuxX86_64).extract(source)
}
