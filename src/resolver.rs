//! Static syscall number tables.

use syscalls::x86_64::Sysno;

/// Maps a raw syscall number to its name.
///
/// Used twice: to reject immediates that are not real syscall numbers while
/// parsing, and to name the final results.
pub trait SyscallResolver: Sync {
    fn name_of(&self, id: u16) -> Option<&'static str>;

    fn is_syscall(&self, id: u16) -> bool {
        self.name_of(id).is_some()
    }
}

impl<R: SyscallResolver + ?Sized> SyscallResolver for &R {
    fn name_of(&self, id: u16) -> Option<&'static str> {
        (**self).name_of(id)
    }
}

/// The Linux amd64 table, the only one `go tool objdump`'s `SYSCALL` maps onto.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxX86_64;

impl SyscallResolver for LinuxX86_64 {
    fn name_of(&self, id: u16) -> Option<&'static str> {
        Sysno::new(id as usize).map(|sysno| sysno.name())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticTable(pub &'static [(u16, &'static str)]);

impl SyscallResolver for StaticTable {
    fn name_of(&self, id: u16) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(nr, _)| *nr == id)
            .map(|(_, name)| *name)
    }
}
