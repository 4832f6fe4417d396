//! Line matchers for the two external dumps.
//!
//! The disassembly dump (`objdump -d -l`) carries three interesting line
//! shapes, everything else is noise:
//!
//! ```text
//! 0000000000012340 <sip_call_hangup>:           -> DefineSymbol
//! /home/build/daemon/src/sip/sipcall.cpp:211    -> Attribution
//!    12358:	e8 33 ff ff ff       	call   12290 <pj_log+0x10>   -> Reference
//! ```
//!
//! The dynamic symbol dump (`nm -D --defined-only`) yields one `Export` per
//! defined text symbol (`T`).
//!
//! Matchers are pure; building the symbol table from events lives in
//! [`crate::symbol`].

use std::sync::OnceLock;

use regex::Regex;

/// A typed event produced from one dump line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpEvent {
    /// A symbol label in the disassembly.
    DefineSymbol { address: u64, name: String },
    /// An instruction ending in `<target>` or `<target+0xNN>`.
    /// The target is kept raw, see [`strip_offset`].
    Reference { target: String },
    /// Debug line info naming the source file of the code that follows.
    Attribution { path: String },
    /// A defined, exported text symbol from the dynamic symbol table.
    Export { name: String },
}

fn define_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^([0-9a-fA-F]{1,16}) <([^<>]+)>:$").expect("Hardcoded regex pattern is valid")
    })
}

fn reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*[0-9a-fA-F]+:\s.*<([^<>\s]+)>$").expect("Hardcoded regex pattern is valid")
    })
}

fn attribution_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(/[^:\s]+):(\d+)(?:\s.*)?$").expect("Hardcoded regex pattern is valid")
    })
}

fn export_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]+\s+T\s+(\S+)$").expect("Hardcoded regex pattern is valid")
    })
}

/// Match one disassembly line against the three grammars.
///
/// Returns `None` for noise (section headers, blank lines, instructions
/// without a symbolic operand, `name():` lines printed by `-l`).
pub fn parse_disassembly_line(line: &str) -> Option<DumpEvent> {
    let line = line.trim_end();

    if let Some(caps) = define_regex().captures(line) {
        let address = u64::from_str_radix(&caps[1], 16).ok()?;
        return Some(DumpEvent::DefineSymbol {
            address,
            name: caps[2].to_string(),
        });
    }

    if let Some(caps) = reference_regex().captures(line) {
        return Some(DumpEvent::Reference {
            target: caps[1].to_string(),
        });
    }

    attribution_regex()
        .captures(line)
        .map(|caps| DumpEvent::Attribution {
            path: caps[1].to_string(),
        })
}

/// Match one line of the dynamic symbol dump.
///
/// Version suffixes (`name@@LIB_1.0`, `name@LIB_0.9`) are stripped so the
/// export matches the plain label used in the disassembly.
pub fn parse_export_line(line: &str) -> Option<DumpEvent> {
    let caps = export_regex().captures(line.trim())?;
    let raw = &caps[1];
    let name = raw.split('@').next().unwrap_or(raw);
    if name.is_empty() {
        return None;
    }
    Some(DumpEvent::Export {
        name: name.to_string(),
    })
}

/// Parse a whole disassembly dump into events, in dump order.
pub fn extract_disassembly(dump: &str) -> Vec<DumpEvent> {
    dump.lines().filter_map(parse_disassembly_line).collect()
}

/// Parse a whole dynamic symbol dump into `Export` events.
pub fn extract_exports(dump: &str) -> Vec<DumpEvent> {
    dump.lines().filter_map(parse_export_line).collect()
}

/// Strip a trailing `+0xNN` offset from a reference target.
///
/// `pj_log+0x10` -> `pj_log`. Names without a hex offset are returned as is.
pub fn strip_offset(target: &str) -> &str {
    match target.rfind('+') {
        Some(pos) => {
            let suffix = &target[pos + 1..];
            let is_offset = suffix
                .strip_prefix("0x")
                .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()));
            if is_offset && pos > 0 {
                &target[..pos]
            } else {
                target
            }
        }
        None => target,
    }
}
