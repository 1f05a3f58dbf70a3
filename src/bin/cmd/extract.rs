use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use systract::output::{self, Format, Template};
use systract::{DumpReader, ExeReader, Extractor, LinuxX86_64, Result, Source};

#[derive(Args)]
pub struct Cmd {
    /// FILE is a `go tool objdump` dump rather than an executable.
    #[arg(short, long)]
    pub dumpfile: bool,

    #[arg(long, value_enum, default_value_t = Format::Text, conflicts_with = "template")]
    pub format: Format,

    /// Per-syscall output format, e.g. '{name} ({id})\n'.
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// objdump binary used to disassemble executables.
    #[arg(long, value_name = "PATH", env = "SYSTRACT_OBJDUMP")]
    pub objdump: Option<PathBuf>,

    /// Walk entry points on separate threads.
    #[arg(long)]
    pub parallel: bool,

    #[arg(value_name = "FILE")]
    pub filepath: PathBuf,
}

impl Cmd {
    pub fn execute(&self) -> Result<()> {
        // Bad templates fail before any work is done.
        let template = self.template.as_deref().map(Template::parse).transpose()?;

        let source: Box<dyn Source> = if self.dumpfile {
            Box::new(DumpReader::new(self.filepath.clone()))
        } else {
            let mut reader = ExeReader::new(self.filepath.clone());
            if let Some(objdump) = &self.objdump {
                reader = reader.with_objdump(objdump.clone());
            }
            Box::new(reader)
        };

        let syscalls = Extractor::new(LinuxX86_64)
            .parallel(self.parallel)
            .extract(&*source)?;

        let mut out = io::stdout().lock();
        match &template {
            Some(template) => template.render(&mut out, &syscalls)?,
            None => output::render(&mut out, &syscalls, self.format)?,
        }
        out.flush()?;
        Ok(())
    }
}
