//! Capturing the two dumps from external binutils.
//!
//! Each tool runs to completion and its stdout is fully drained before the
//! next one starts; nothing is streamed.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{DeadsymError, DeadsymResult};

/// Program names used to produce the dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub objdump: String,
    pub nm: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            objdump: "objdump".to_string(),
            nm: "nm".to_string(),
        }
    }
}

/// Raw text of both dumps for one library.
#[derive(Debug, Clone, Default)]
pub struct Dumps {
    /// `objdump -d -l` output.
    pub disassembly: String,
    /// `nm -D --defined-only` output.
    pub exports: String,
}

/// Run a program and return its stdout, failing on spawn error or
/// non-zero exit.
pub fn run_tool(program: &str, args: &[&str], library: &Path) -> DeadsymResult<String> {
    debug!(program = %program, ?args, library = %library.display(), "running tool");

    let output = Command::new(program)
        .args(args)
        .arg(library)
        .output()
        .map_err(|e| DeadsymError::tool(program, "not started", e.to_string()))?;

    if !output.status.success() {
        return Err(DeadsymError::tool(
            program,
            output.status.to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Capture the disassembly then the dynamic symbol table of `library`.
pub fn capture_dumps(tools: &ToolSet, library: &Path) -> DeadsymResult<Dumps> {
    let disassembly = run_tool(&tools.objdump, &["-d", "-l"], library)?;
    info!(bytes = disassembly.len(), "disassembly captured");

    let exports = run_tool(&tools.nm, &["-D", "--defined-only"], library)?;
    info!(bytes = exports.len(), "dynamic symbols captured");

    Ok(Dumps {
        disassembly,
        exports,
    })
}
