//! Plain text report of possibly unused symbols.

use std::fmt::Write as _;

use crate::symbol::{is_internal_label, SymbolTable};

/// Bucket label for symbols without debug line info.
pub const UNKNOWN_FILE: &str = "<unknown file>";

/// Printed after the grand total.
pub const DISCLAIMER: &str = "\
Note: calls through function pointers, vtables and other indirect dispatch are \
invisible to this analysis, so some of the symbols above may still be used. \
Sizes are approximated from the distance between consecutive symbols.";

/// One unreached symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,
    pub address: u64,
    pub size: u64,
    /// Sorted names of symbols referencing this one.
    pub referenced_by: Vec<String>,
}

/// Unreached symbols attributed to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub file: String,
    pub entries: Vec<ReportEntry>,
    pub subtotal: u64,
}

/// The whole report, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub files: Vec<FileGroup>,
    pub total_bytes: u64,
}

impl Report {
    /// Number of unreached symbols listed.
    pub fn entry_count(&self) -> usize {
        self.files.iter().map(|f| f.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Collect unreached symbols, grouped by file and sorted by (file, name).
pub fn generate_report(table: &SymbolTable) -> Report {
    let mut rows: Vec<(&str, ReportEntry)> = table
        .symbols()
        .iter()
        .filter(|s| !s.reached && !is_internal_label(&s.name))
        .map(|s| {
            let file = s.source_file.as_deref().unwrap_or(UNKNOWN_FILE);
            let entry = ReportEntry {
                name: s.name.clone(),
                address: s.address,
                size: s.approx_size,
                referenced_by: s.referenced_by.iter().cloned().collect(),
            };
            (file, entry)
        })
        .collect();

    rows.sort_by(|(fa, a), (fb, b)| {
        fa.cmp(fb)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.address.cmp(&b.address))
    });

    let mut report = Report::default();
    for (file, entry) in rows {
        let needs_group = report.files.last().map_or(true, |g| g.file != file);
        if needs_group {
            report.files.push(FileGroup {
                file: file.to_string(),
                entries: Vec::new(),
                subtotal: 0,
            });
        }
        if let Some(group) = report.files.last_mut() {
            group.subtotal += entry.size;
            report.total_bytes += entry.size;
            group.entries.push(entry);
        }
    }
    report
}

/// Human readable size: bytes below 1 KiB, then one decimal KiB / MiB.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{} bytes", bytes)
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}

/// Render the report as text.
pub fn render_plain(report: &Report) -> String {
    let mut out = String::new();

    if report.is_empty() {
        out.push_str("No possibly unused symbols found.\n");
    } else {
        for group in &report.files {
            let _ = writeln!(out, "{}:", group.file);
            for entry in &group.entries {
                let _ = writeln!(out, "  {} ({})", entry.name, format_size(entry.size));
                if !entry.referenced_by.is_empty() {
                    let _ = writeln!(out, "    referenced by: {}", entry.referenced_by.join(", "));
                }
            }
            let _ = writeln!(out, "  subtotal: {}", format_size(group.subtotal));
            out.push('\n');
        }
    }

    let _ = writeln!(
        out,
        "Total possibly unused: {} in {} symbol(s)",
        format_size(report.total_bytes),
        report.entry_count()
    );
    out.push('\n');
    out.push_str(DISCLAIMER);
    out.push('\n');
    out
}

/// Prints the report to stdout.
pub fn print_plain(report: &Report) {
    print!("{}", render_plain(report));
}
