//! Line classification for `go tool objdump` output.
//!
//! Each function is a stateless predicate over a single line. The dump looks
//! like this:
//!
//! ```text
//! TEXT main.main(SB) /src/app/main.go
//!   main.go:5		0x452e60		b8e7000000		MOVL $0xe7, AX
//!   main.go:5		0x452e65		0f05			SYSCALL
//!   main.go:6		0x452e67		e8d4ffffff		CALL main.(*T).run(SB)
//!
//! ```

use std::sync::LazyLock;

use regex::Regex;

static SYMBOL_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"TEXT.([%()*a-zA-Z0-9_./]+)\b\(").expect("symbol definition pattern")
});

static CALL_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".+CALL.(\b(?:[a-zA-Z0-9_./]|\(\*[a-zA-Z0-9_./]+\))+\b)")
        .expect("call target pattern")
});

static IMMEDIATE_LOAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MOV(?:Q|L).\$0x([0-9a-fA-F]+)").expect("immediate load pattern"));

// The raw instruction, or a call into one of the Go syscall wrappers.
static SYSCALL_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SYSCALL|golang\.org/x/sys/unix\.Syscall|syscall\.Syscall")
        .expect("syscall trigger pattern")
});

/// What a line inside a symbol body means to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Terminator,
    SyscallTrigger,
    Call(&'a str),
    ImmediateLoad(u16),
    Other,
}

/// Classifies a body line. The first matching rule wins, in the order
/// terminator, syscall trigger, call, immediate load.
pub fn classify(line: &str) -> Line<'_> {
    if is_body_terminator(line) {
        Line::Terminator
    } else if is_syscall_trigger(line) {
        Line::SyscallTrigger
    } else if let Some(target) = match_call_target(line) {
        Line::Call(target)
    } else if let Some(value) = match_immediate_load(line) {
        Line::ImmediateLoad(value)
    } else {
        Line::Other
    }
}

/// Name declared by a `TEXT <name>(SB)` header line.
pub fn match_symbol_definition(line: &str) -> Option<&str> {
    capture(&SYMBOL_DEFINITION, line)
}

/// Callee of a `CALL <name>(SB)` instruction.
pub fn match_call_target(line: &str) -> Option<&str> {
    capture(&CALL_TARGET, line)
}

/// Value of a `MOVQ $0x..`/`MOVL $0x..` immediate, if it fits in 16 bits.
pub fn match_immediate_load(line: &str) -> Option<u16> {
    let literal = capture(&IMMEDIATE_LOAD, line)?;
    u16::from_str_radix(literal, 16).ok()
}

pub fn is_syscall_trigger(line: &str) -> bool {
    SYSCALL_TRIGGER.is_match(line)
}

pub fn is_body_terminator(line: &str) -> bool {
    line.trim_end_matches('\r').is_empty()
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
