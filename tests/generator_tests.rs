//! End-to-end tests for header generation.
//!
//! The `basic` fixture holds one table per supported architecture and the
//! header the generator must produce for it, byte for byte.

use std::fs;
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use lapi_syscalls::dispatch::{self, Errno, ENOSYS, INVALID_SYSCALL_VALUE};
use lapi_syscalls::generator::{self, GeneratorConfig};
use lapi_syscalls::loader::InputLoader;
use lapi_syscalls::parser::SkipReason;
use lapi_syscalls::{Arch, DispatchOutcome, GenError, GenerationSession, TableBuilder, Target};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/basic")
}

fn expected_header() -> String {
    let path = fixture_dir().join("expected.h");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Copy every fixture table into a scratch directory, minus `skip`.
fn copy_tables(dest: &Path, skip: Option<Arch>) {
    for arch in Arch::ALL {
        if Some(arch) == skip {
            continue;
        }
        let name = arch.input_file_name();
        fs::copy(fixture_dir().join(&name), dest.join(&name))
            .unwrap_or_else(|e| panic!("Failed to copy {}: {}", name, e));
    }
}

#[test]
fn test_matches_golden_header() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("syscalls.h");
    let config = GeneratorConfig::new(Some(output.clone()), fixture_dir()).unwrap();

    let stats = generator::run(&config).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), expected_header());
    assert_eq!(stats.architectures, 18);
    assert_eq!(stats.records, 47);
    assert_eq!(stats.skipped_lines, 4);
    assert_eq!(stats.shadowed_records, 1);
    assert_eq!(stats.symbols, 8);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
}

#[test]
fn test_output_is_deterministic() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let first = out.path().join("first.h");
    let second = out.path().join("second.h");

    generator::run(&GeneratorConfig::new(Some(first.clone()), fixture_dir()).unwrap()).unwrap();
    generator::run(&GeneratorConfig::new(Some(second.clone()), fixture_dir()).unwrap()).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_replaces_existing_output() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("syscalls.h");
    fs::write(&output, "stale contents that are much longer than nothing\n").unwrap();

    generator::run(&GeneratorConfig::new(Some(output.clone()), fixture_dir()).unwrap()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), expected_header());
}

#[test]
fn test_stale_sibling_temp_entry_does_not_block_write() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("syscalls.h");
    fs::write(&output, "old\n").unwrap();
    fs::create_dir(out.path().join("syscalls.h.tmp")).unwrap();

    generator::run(&GeneratorConfig::new(Some(output.clone()), fixture_dir()).unwrap()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), expected_header());
    assert!(out.path().join("syscalls.h.tmp").is_dir());
}

#[test]
fn test_missing_table_aborts_without_touching_output() {
    init_logging();
    let tables = tempfile::tempdir().unwrap();
    copy_tables(tables.path(), Some(Arch::Sh));
    let output = tables.path().join("syscalls.h");
    fs::write(&output, "previous\n").unwrap();

    let config = GeneratorConfig::new(Some(output.clone()), tables.path()).unwrap();
    let err = generator::run(&config).unwrap_err();

    match err {
        GenError::ReadInput { arch, path, .. } => {
            assert_eq!(arch, Arch::Sh);
            assert_eq!(path, tables.path().join("sh.in"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn test_registry_covers_exactly_the_union_of_symbols() {
    init_logging();
    let arena = Bump::new();
    let session = GenerationSession::new(&arena);
    let sets = InputLoader::new(&session, fixture_dir()).load_all().unwrap();

    let mut union: Vec<&str> = Vec::new();
    for set in &sets {
        for def in &set.definitions {
            if !union.contains(&def.symbol) {
                union.push(def.symbol);
            }
        }
    }

    let table = TableBuilder::build(&session, sets);
    assert_eq!(table.registry.iter().collect::<Vec<_>>(), union);

    let text = expected_header();
    for symbol in &union {
        let stanza = format!("#  define {} __LTP__NR_INVALID_SYSCALL\n", symbol);
        assert_eq!(text.matches(&stanza).count(), 1, "stanza for {}", symbol);
    }
    assert!(!text.contains("__NR_bogus"));
}

#[test]
fn test_every_symbol_resolves_on_every_architecture() {
    init_logging();
    let arena = Bump::new();
    let session = GenerationSession::new(&arena);
    let config = GeneratorConfig::new(Some(PathBuf::from("unused.h")), fixture_dir()).unwrap();
    let header = generator::generate_header(&session, &config).unwrap();

    let sets = InputLoader::new(&session, fixture_dir()).load_all().unwrap();
    let table = TableBuilder::build(&session, sets);

    for arch in Arch::ALL {
        let macros = header.evaluate(&arch.reference_target()).unwrap();
        let block = table.block(arch).unwrap();
        for symbol in table.registry.iter() {
            let expected = block.value_of(symbol).unwrap_or("-1");
            assert_eq!(
                macros.resolve(symbol).as_deref(),
                Some(expected),
                "{} on {}",
                symbol,
                arch
            );
        }
    }
}

#[test]
fn test_active_block_takes_precedence() {
    init_logging();
    let header = expected_header();
    let arm = Arch::Arm.reference_target();
    let i386 = Arch::I386.reference_target();
    let x86_64 = Arch::X86_64.reference_target();

    let value = |target: &Target, symbol: &str| {
        lapi_syscalls::preprocess::evaluate(&header, target)
            .unwrap()
            .resolve(symbol)
    };

    // arm lists pause twice; the first entry wins.
    assert_eq!(value(&arm, "__NR_pause").as_deref(), Some("29"));
    assert_eq!(value(&i386, "__NR_pause").as_deref(), Some("29"));
    assert_eq!(value(&x86_64, "__NR_pause").as_deref(), Some("34"));
    assert_eq!(value(&x86_64, "__NR_socketcall").as_deref(), Some("-1"));
    assert_eq!(
        value(&arm, "__NR_read").as_deref(),
        Some("(__NR_SYSCALL_BASE + 3)")
    );
}

#[test]
fn test_openat2_dispatch_scenario() {
    init_logging();
    let header = expected_header();
    let nr_for = |arch: Arch| {
        lapi_syscalls::preprocess::evaluate(&header, &arch.reference_target())
            .unwrap()
            .resolve_number("__NR_openat2")
            .unwrap()
    };

    // x86_64 lists openat2, i386 does not.
    let nr_a = nr_for(Arch::X86_64);
    let nr_b = nr_for(Arch::I386);
    assert_eq!(nr_a, 437);
    assert_eq!(nr_b, INVALID_SYSCALL_VALUE);

    let mut errno = Errno::default();
    let mut attempted = false;
    let outcome = dispatch::dispatch("__NR_openat2", nr_b, &mut errno, |_, _| {
        attempted = true;
        0
    });
    assert!(outcome.is_unsupported());
    assert!(!attempted);
    assert_eq!(errno, Errno(ENOSYS));

    let mut errno = Errno::default();
    let outcome = dispatch::dispatch("__NR_openat2", nr_a, &mut errno, |nr, _| nr - 434);
    assert_eq!(outcome, DispatchOutcome::Completed(3));

    let mut errno = Errno::default();
    let outcome = dispatch::dispatch("__NR_openat2", nr_a, &mut errno, |_, errno| {
        errno.0 = ENOSYS;
        -1
    });
    match outcome {
        DispatchOutcome::Unsupported(signal) => {
            assert!(signal.attempted);
            assert_eq!(signal.nr, 437);
        }
        other => panic!("expected unsupported, got {:?}", other),
    }
}

#[test]
fn test_single_token_lines_are_tolerated() {
    init_logging();
    let arena = Bump::new();
    let session = GenerationSession::new(&arena);
    let set = InputLoader::new(&session, fixture_dir())
        .warn_malformed(true)
        .load(Arch::MipsN32)
        .unwrap();

    assert_eq!(set.definitions.len(), 2);
    assert_eq!(set.skipped.len(), 1);
    assert_eq!(set.skipped[0].line, 3);
    assert_eq!(set.skipped[0].reason, SkipReason::MissingValue);
}

#[test]
fn test_warn_malformed_flag_reaches_loader() {
    init_logging();
    let arena = Bump::new();
    let session = GenerationSession::new(&arena);
    let config = GeneratorConfig::new(Some(PathBuf::from("unused.h")), fixture_dir())
        .unwrap()
        .with_warn_malformed(true);

    let loader = generator::input_loader(&session, &config);
    assert_eq!(loader.skip_level(SkipReason::MissingValue), log::Level::Warn);

    let default = GeneratorConfig::new(Some(PathBuf::from("unused.h")), fixture_dir()).unwrap();
    let loader = generator::input_loader(&session, &default);
    assert_eq!(loader.skip_level(SkipReason::MissingValue), log::Level::Debug);
}

#[test]
fn test_unknown_target_gets_only_sentinels() {
    init_logging();
    let header = expected_header();
    let macros = lapi_syscalls::preprocess::evaluate(&header, &Target::new()).unwrap();

    for symbol in ["__NR_read", "__NR_openat2", "__NR_spu_run"] {
        assert_eq!(macros.resolve_number(symbol), Some(-1), "{}", symbol);
    }
    assert!(macros.is_defined("tst_syscall"));
    assert!(macros.is_defined("TST_SYSCALL_BRK__"));
}
