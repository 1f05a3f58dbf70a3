//! Rendering of extraction results.

use std::io::Write;

use crate::error::{Error, Result};
use crate::types::SystemCall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// `N system calls found:` followed by one `name (id)` per line.
    #[default]
    Text,
    /// A JSON array of `{"id", "name"}` objects.
    Json,
}

pub fn render(out: &mut impl Write, syscalls: &[SystemCall], format: Format) -> Result<()> {
    match format {
        Format::Text => render_text(out, syscalls),
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, syscalls)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn render_text(out: &mut impl Write, syscalls: &[SystemCall]) -> Result<()> {
    if syscalls.is_empty() {
        writeln!(out, "no system calls were found")?;
        return Ok(());
    }
    writeln!(out, "{} system calls found:", syscalls.len())?;
    for syscall in syscalls {
        writeln!(out, "    {} ({})", syscall.name, syscall.id)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Id,
    Name,
}

/// A per-syscall line format with `{id}` and `{name}` placeholders.
///
/// `{{` and `}}` are literal braces; `\n` and `\t` are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => key.push(c),
                            None => {
                                let msg = format!("unclosed placeholder `{{{key}`");
                                return Err(Error::Template(msg));
                            }
                        }
                    }
                    let piece = match key.as_str() {
                        "id" => Piece::Id,
                        "name" => Piece::Name,
                        other => {
                            let msg = format!("unknown placeholder `{{{other}}}`");
                            return Err(Error::Template(msg));
                        }
                    };
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(piece);
                }
                '}' => return Err(Error::Template("unmatched `}`".to_string())),
                '\\' => match chars.peek() {
                    Some('n') => {
                        chars.next();
                        literal.push('\n');
                    }
                    Some('t') => {
                        chars.next();
                        literal.push('\t');
                    }
                    _ => literal.push('\\'),
                },
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    pub fn render(&self, out: &mut impl Write, syscalls: &[SystemCall]) -> Result<()> {
        for syscall in syscalls {
            for piece in &self.pieces {
                match piece {
                    Piece::Literal(text) => out.write_all(text.as_bytes())?,
                    Piece::Id => write!(out, "{}", syscall.id)?,
                    Piece::Name => out.write_all(syscall.name.as_bytes())?,
                }
            }
        }
        Ok(())
    }
}
