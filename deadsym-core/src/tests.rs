//! End-to-end scenarios for deadsym-core, driven from dump text.

use crate::*;

/// A small x86-64 `objdump -d -l` listing.
///
/// pub_x -> priv_y -> priv_z, priv_orphan unreferenced, two `helper`
/// definitions of which only one is called, a callback only reachable through
/// the curated list, and a loop with a local jump.
const DISASSEMBLY: &str = "\

libsample.so:     file format elf64-x86-64


Disassembly of section .plt:

0000000000001000 <malloc@plt>:
    1000:\tff 25 12 30 00 00    \tjmp    *0x3012(%rip)

Disassembly of section .text:

0000000000001100 <pub_x>:
pub_x():
/home/build/lib/src/api.c:10
    1100:\t55                   \tpush   %rbp
    1101:\te8 3a 00 00 00       \tcall   1140 <priv_y>
    1106:\te8 f5 fe ff ff       \tcall   1000 <malloc@plt>
    110b:\tc3                   \tret

0000000000001140 <priv_y>:
priv_y():
/home/build/lib/src/impl.c:5
    1140:\te8 3b 00 00 00       \tcall   1180 <priv_z>
/usr/include/x86_64-linux-gnu/bits/string_fortified.h:29
    1145:\te8 00 00 00 00       \tcall   11c0 <helper>
    114a:\tc3                   \tret

0000000000001180 <priv_z>:
priv_z():
/home/build/lib/src/impl.c:20
    1180:\teb fe                \tjmp    1180 <priv_z>
    1182:\t75 fc                \tjne    1180 <priv_z+0x0>

00000000000011c0 <helper>:
helper():
/home/build/lib/src/impl.c:40
    11c0:\tc3                   \tret

0000000000001200 <priv_orphan>:
priv_orphan():
/home/build/lib/src/legacy.c:3
    1200:\te8 00 00 00 00       \tcall   1240 <helper+0x10>
    1205:\tc3                   \tret

0000000000001240 <helper>:
helper():
/home/build/lib/src/other.c:7
    1240:\tc3                   \tret

0000000000001280 <registration_cb>:
registration_cb():
/home/build/lib/src/sip.c:100
    1280:\te8 00 00 00 00       \tcall   12c0 <cb_worker>
    1285:\te8 00 00 00 00       \tcall   9999 <vanished_fn>

00000000000012c0 <cb_worker>:
/home/build/lib/src/sip.c:120
    12c0:\tc3                   \tret

0000000000001300 <unused_big>:
    1300:\tc3                   \tret

0000000000001700 <.L_tail>:
    1700:\tc3                   \tret
";

const EXPORTS: &str = "\
                 w __cxa_finalize
                 U malloc
0000000000001100 T pub_x
0000000000004010 D exported_data
";

fn run(disasm: &str, exports: &str) -> DeadsymResult<AnalysisResult> {
    analyze_dumps_with_roots(disasm, exports, &AnalysisOptions::default(), &["registration_cb"])
}

fn reached_flags(table: &SymbolTable, name: &str) -> Vec<bool> {
    table
        .candidates(name)
        .iter()
        .map(|id| table.symbol(*id).reached)
        .collect()
}

fn reported_names(report: &Report) -> Vec<String> {
    report
        .files
        .iter()
        .flat_map(|g| g.entries.iter().map(|e| e.name.clone()))
        .collect()
}

#[test]
fn test_chain_reached_orphan_reported() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    let t = &result.table;

    assert_eq!(reached_flags(t, "pub_x"), vec![true]);
    assert_eq!(reached_flags(t, "priv_y"), vec![true]);
    assert_eq!(reached_flags(t, "priv_z"), vec![true]);
    assert_eq!(reached_flags(t, "priv_orphan"), vec![false]);

    let legacy = result
        .report
        .files
        .iter()
        .find(|g| g.file == "/home/build/lib/src/legacy.c")
        .expect("legacy.c group");
    assert_eq!(legacy.entries.len(), 1);
    assert_eq!(legacy.entries[0].name, "priv_orphan");
    assert_eq!(legacy.entries[0].size, 0x40);
    assert!(legacy.entries[0].referenced_by.is_empty());
}

#[test]
fn test_ambiguous_helper_all_reached() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();

    assert_eq!(reached_flags(&result.table, "helper"), vec![true, true]);
    assert!(result.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::Ambiguous { name, candidates: 2 } if name == "helper"
    )));
    assert!(!reported_names(&result.report).contains(&"helper".to_string()));
}

#[test]
fn test_curated_root_reaches_callees() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    assert_eq!(reached_flags(&result.table, "registration_cb"), vec![true]);
    assert_eq!(reached_flags(&result.table, "cb_worker"), vec![true]);
    assert!(result.diagnostics.contains(&Diagnostic::Unresolved {
        from: Some("registration_cb".to_string()),
        target: "vanished_fn".to_string(),
    }));
}

#[test]
fn test_self_loops_dropped() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    for sym in result.table.symbols() {
        assert!(
            !sym.references.contains(&sym.name),
            "{} references itself",
            sym.name
        );
    }
    let z = result.table.candidates("priv_z")[0];
    assert!(result.table.symbol(z).references.is_empty());
}

#[test]
fn test_system_header_line_info_ignored() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    let y = result.table.candidates("priv_y")[0];
    assert_eq!(
        result.table.symbol(y).source_file.as_deref(),
        Some("/home/build/lib/src/impl.c")
    );
}

#[test]
fn test_unreached_reported_exactly_once() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    let names = reported_names(&result.report);

    let unreached: Vec<&Symbol> = result
        .table
        .symbols()
        .iter()
        .filter(|s| !s.reached && !is_internal_label(&s.name))
        .collect();
    assert_eq!(names.len(), unreached.len());
    for sym in unreached {
        assert_eq!(names.iter().filter(|n| **n == sym.name).count(), 1);
    }

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["priv_orphan", "unused_big"]);
    assert!(!names.contains(&".L_tail".to_string()));
}

#[test]
fn test_plt_stub_reached_through_caller() {
    // PLT stubs are ordinary labels in the dump.
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    assert_eq!(reached_flags(&result.table, "malloc@plt"), vec![true]);
}

#[test]
fn test_unknown_file_bucket_and_totals() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    let unknown = result
        .report
        .files
        .iter()
        .find(|g| g.file == report::UNKNOWN_FILE)
        .expect("unknown bucket");
    let names: Vec<&str> = unknown.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["unused_big"]);
    assert_eq!(unknown.subtotal, 0x400);

    let sum: u64 = result.report.files.iter().map(|g| g.subtotal).sum();
    assert_eq!(result.report.total_bytes, sum);
}

#[test]
fn test_report_text_contains_groups() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    let text = render_plain(&result.report);
    assert!(text.contains("/home/build/lib/src/legacy.c:"));
    assert!(text.contains("  priv_orphan (64 bytes)"));
    assert!(text.contains("  unused_big (1.0 KiB)"));
    assert!(text.contains("Total possibly unused:"));
    assert!(text.contains(report::DISCLAIMER));
}

#[test]
fn test_duplicate_export_aborts() {
    let exports = "\
0000000000001100 T dup_sym
0000000000001200 T other
0000000000001100 T dup_sym
";
    let err = run(DISASSEMBLY, exports).unwrap_err();
    assert!(matches!(err, DeadsymError::DuplicateExport { ref name } if name == "dup_sym"));
}

#[test]
fn test_stale_curated_root_aborts() {
    let exports = "0000000000001280 T registration_cb\n";
    let err = run(DISASSEMBLY, exports).unwrap_err();
    assert!(matches!(err, DeadsymError::StaleCuratedRoot { .. }));
}

#[test]
fn test_conflicting_attribution_aborts() {
    let disasm = "\
0000000000000100 <split_fn>:
/src/a.c:1
 100:\tc3\tret
/src/b.c:2
 101:\tc3\tret
";
    let err = run(disasm, "").unwrap_err();
    assert!(matches!(
        err,
        DeadsymError::ConflictingAttribution { ref symbol, ref existing, ref conflicting }
            if symbol == "split_fn" && existing == "/src/a.c" && conflicting == "/src/b.c"
    ));
}

#[test]
fn test_sizes_from_address_deltas() {
    let disasm = "\
0000000000000100 <first>:
0000000000000140 <second>:
0000000000000180 <third>:
";
    let result = run(disasm, "").unwrap();
    let size = |name: &str| result.table.symbol(result.table.candidates(name)[0]).approx_size;
    assert_eq!(size("first"), 0x40);
    assert_eq!(size("second"), 0x40);
    assert_eq!(size("third"), 0);
}

#[test]
fn test_negative_size_is_diagnostic_not_fatal() {
    let disasm = "\
0000000000000200 <late>:
0000000000000100 <early>:
";
    let result = run(disasm, "").unwrap();
    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::NegativeSize { symbol, .. } if symbol == "late")));
    assert_eq!(result.table.symbol(result.table.candidates("late")[0]).approx_size, 0);
}

#[test]
fn test_marker_rerun_is_idempotent() {
    let mut result = run(DISASSEMBLY, EXPORTS).unwrap();
    let before: Vec<bool> = result.table.symbols().iter().map(|s| s.reached).collect();
    let outcome = mark_reachable(&mut result.table, &result.roots);
    let after: Vec<bool> = result.table.symbols().iter().map(|s| s.reached).collect();
    assert_eq!(before, after);
    assert_eq!(outcome.marked, 0);
}

#[test]
fn test_ambiguous_names_all_or_nothing() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    for name in result.table.ambiguous_names() {
        let flags = reached_flags(&result.table, name);
        assert!(
            flags.iter().all(|f| *f) || flags.iter().all(|f| !*f),
            "{} is partially reached",
            name
        );
    }
}

#[test]
fn test_reachable_closure_fully_marked() {
    let result = run(DISASSEMBLY, EXPORTS).unwrap();
    let t = &result.table;

    // Independent closure over names.
    let mut seen = std::collections::HashSet::new();
    let mut work: Vec<String> = result.roots.iter().map(str::to_string).collect();
    while let Some(name) = work.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        for id in t.candidates(&name) {
            work.extend(t.symbol(*id).references.iter().cloned());
        }
    }

    for sym in t.symbols() {
        assert_eq!(sym.reached, seen.contains(&sym.name), "{}", sym.name);
    }
}

#[test]
fn test_backlinks_shown_for_dead_callees() {
    let disasm = "\
0000000000000100 <dead_a>:
/src/a.c:1
 100:\te8 00 00 00 00\tcall 140 <dead_b>
0000000000000140 <dead_b>:
/src/a.c:9
 140:\tc3\tret
0000000000000180 <end>:
";
    let result = run(disasm, "").unwrap();
    let group = &result.report.files[0];
    assert_eq!(group.file, "/src/a.c");
    let b = group.entries.iter().find(|e| e.name == "dead_b").unwrap();
    assert_eq!(b.referenced_by, vec!["dead_a".to_string()]);
}

#[test]
fn test_default_curated_roots_reported_unresolved_when_absent() {
    let result = analyze_dumps("0000000000000100 <a>:\n", "", &AnalysisOptions::default()).unwrap();
    assert_eq!(result.stats.curated_roots, CURATED_ROOTS.len());
    assert_eq!(result.stats.unresolved_references, CURATED_ROOTS.len());
}

#[test]
fn test_empty_dumps() {
    let result = run("", "").unwrap();
    assert!(result.table.is_empty());
    assert!(result.report.is_empty());
}
