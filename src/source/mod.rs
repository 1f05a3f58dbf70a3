//! Where the disassembly text comes from.

mod dump;
mod exe;
mod path;

use std::io::BufRead;

pub use dump::DumpReader;
pub use exe::{Disassembler, DisassemblyStream, ExeReader};
pub use path::sanitise_path;

use crate::error::Result;

/// Something that can hand out a readable disassembly stream.
pub trait Source {
    fn open(&self) -> Result<Box<dyn BufRead + Send>>;

    fn describe(&self) -> String;
}

impl<T: Source + ?Sized> Source for &T {
    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        (**self).open()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
