use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use goblin::Object;
use tracing::{debug, warn};

use super::{Source, sanitise_path};
use crate::error::{Error, Result};

const DEFAULT_GOROOT: &str = "/usr/local/go";

/// A compiled Go executable, disassembled on the fly with `go tool objdump`.
#[derive(Debug, Clone)]
pub struct ExeReader {
    path: PathBuf,
    objdump: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disassembler {
    Objdump(PathBuf),
    GoTool,
}

impl Disassembler {
    fn command(&self, target: &Path) -> (PathBuf, Command) {
        match self {
            Self::Objdump(program) => {
                let mut cmd = Command::new(program);
                cmd.arg(target);
                (program.clone(), cmd)
            }
            Self::GoTool => {
                let mut cmd = Command::new("go");
                cmd.args(["tool", "objdump"]).arg(target);
                (PathBuf::from("go"), cmd)
            }
        }
    }
}

impl ExeReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objdump: None,
        }
    }

    pub fn with_objdump(mut self, objdump: impl Into<PathBuf>) -> Self {
        self.objdump = Some(objdump.into());
        self
    }

    /// Picks the explicit objdump, then the toolchain's, then `go tool objdump`.
    pub fn disassembler(&self) -> Disassembler {
        if let Some(objdump) = &self.objdump {
            if objdump.is_file() {
                return Disassembler::Objdump(objdump.clone());
            }
            warn!(objdump = %objdump.display(), "objdump not found, falling back");
        }
        let toolchain = toolchain_objdump();
        if toolchain.is_file() {
            Disassembler::Objdump(toolchain)
        } else {
            Disassembler::GoTool
        }
    }
}

impl Source for ExeReader {
    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        let path = sanitise_path(&self.path)?;
        if !path.is_file() {
            return Err(Error::NotFound(path));
        }
        inspect(&path)?;
        let stream = DisassemblyStream::spawn(&self.disassembler(), &path)?;
        Ok(Box::new(BufReader::new(stream)))
    }

    fn describe(&self) -> String {
        format!("executable {}", self.path.display())
    }
}

/// Rejects files no disassembler would understand.
fn inspect(path: &Path) -> Result<()> {
    let buffer = fs::read(path)?;
    let object = Object::parse(&buffer).map_err(|source| Error::Object {
        path: path.to_path_buf(),
        source,
    })?;
    match object {
        Object::Elf(elf) => {
            debug!(
                path = %path.display(),
                is_64 = elf.is_64,
                is_lib = elf.is_lib,
                "ELF executable"
            );
        }
        Object::Unknown(magic) => {
            return Err(Error::UnknownObject {
                path: path.to_path_buf(),
                magic,
            });
        }
        _ => debug!(path = %path.display(), "non-ELF object"),
    }
    Ok(())
}

fn toolchain_objdump() -> PathBuf {
    let goroot = env::var_os("GOROOT").unwrap_or_else(|| OsString::from(DEFAULT_GOROOT));
    PathBuf::from(goroot)
        .join("pkg")
        .join("tool")
        .join(format!("{}_{}", go_os(), go_arch()))
        .join("objdump")
}

fn go_os() -> &'static str {
    match env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}

fn go_arch() -> &'static str {
    match env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        arch => arch,
    }
}

/// Stdout of a running disassembler.
///
/// Reaching EOF reaps the child and turns a failed exit status into a read
/// error. Dropping the stream early kills the child.
pub struct DisassemblyStream {
    program: PathBuf,
    child: Child,
    stdout: ChildStdout,
    finished: bool,
}

impl DisassemblyStream {
    pub fn spawn(disassembler: &Disassembler, target: &Path) -> Result<Self> {
        let (program, mut cmd) = disassembler.command(target);
        debug!(program = %program.display(), target = %target.display(), "spawning disassembler");

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::Disassembler {
                program: program.clone(),
                source,
            })?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::Disassembler {
                program,
                source: io::Error::other("stdout was not captured"),
            });
        };

        Ok(Self {
            program,
            child,
            stdout,
            finished: false,
        })
    }
}

impl Read for DisassemblyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.stdout.read(buf)?;
        if n == 0 && !buf.is_empty() && !self.finished {
            self.finished = true;
            let status = self.child.wait()?;
            if !status.success() {
                return Err(io::Error::other(format!(
                    "{} exited with {status}",
                    self.program.display()
                )));
            }
        }
        Ok(n)
    }
}

impl Drop for DisassemblyStream {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
