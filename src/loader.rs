//! Loading per-architecture definition tables.

use std::fs;
use std::path::PathBuf;

use crate::arch::Arch;
use crate::core::{GenError, GenResult, GenerationSession};
use crate::parser::{self, Record, SkipReason};

/// One `(symbol, value)` pair as read from an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition<'arena> {
    /// Full macro name, e.g. `__NR_openat2`.
    pub symbol: &'arena str,
    /// Raw value expression.
    pub value: &'arena str,
    /// 1-based line in the input file.
    pub line: usize,
}

/// A line that did not produce a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: SkipReason,
}

/// Ordered definitions for one architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureDefinitionSet<'arena> {
    pub arch: Arch,
    pub definitions: Vec<Definition<'arena>>,
    pub skipped: Vec<SkippedLine>,
}

/// Reads `<arch>.in` files from one directory.
pub struct InputLoader<'s, 'arena> {
    session: &'s GenerationSession<'arena>,
    input_dir: PathBuf,
    warn_malformed: bool,
}

impl<'s, 'arena> InputLoader<'s, 'arena> {
    pub fn new(session: &'s GenerationSession<'arena>, input_dir: impl Into<PathBuf>) -> Self {
        Self {
            session,
            input_dir: input_dir.into(),
            warn_malformed: false,
        }
    }

    /// Log skipped single-token lines as warnings instead of debug output.
    pub fn warn_malformed(mut self, enabled: bool) -> Self {
        self.warn_malformed = enabled;
        self
    }

    /// Log level for a skipped line. Only lines missing a value are
    /// promoted to warnings, and only when asked for.
    pub fn skip_level(&self, reason: SkipReason) -> log::Level {
        match reason {
            SkipReason::MissingValue if self.warn_malformed => log::Level::Warn,
            _ => log::Level::Debug,
        }
    }

    /// Path of the table for `arch`.
    pub fn path_for(&self, arch: Arch) -> PathBuf {
        self.input_dir.join(arch.input_file_name())
    }

    /// Read every supported architecture, in header order.
    ///
    /// The first unreadable file aborts the whole load.
    pub fn load_all(&self) -> GenResult<Vec<ArchitectureDefinitionSet<'arena>>> {
        Arch::ALL.into_iter().map(|arch| self.load(arch)).collect()
    }

    /// Read and parse the table for one architecture.
    pub fn load(&self, arch: Arch) -> GenResult<ArchitectureDefinitionSet<'arena>> {
        let path = self.path_for(arch);
        let text = fs::read_to_string(&path).map_err(|source| GenError::ReadInput {
            arch,
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded {} table from {}", arch, path.display());
        Ok(self.parse(arch, &text))
    }

    /// Parse table text already in memory.
    pub fn parse(&self, arch: Arch, text: &str) -> ArchitectureDefinitionSet<'arena> {
        let mut definitions = Vec::new();
        let mut skipped = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            match parser::parse_record(raw) {
                Record::Definition { name, value } => {
                    definitions.push(Definition {
                        symbol: self.session.intern_str(&parser::symbol_name(name)),
                        value: self.session.intern_str(value),
                        line,
                    });
                }
                Record::Skip(reason) => {
                    self.session.record_skipped_line();
                    log::log!(
                        self.skip_level(reason),
                        "{}:{}: skipped ({:?}): {:?}",
                        arch.input_file_name(),
                        line,
                        reason,
                        raw.trim()
                    );
                    skipped.push(SkippedLine { line, reason });
                }
            }
        }

        ArchitectureDefinitionSet {
            arch,
            definitions,
            skipped,
        }
    }
}
