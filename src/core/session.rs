// This module provides arena-based session management for one header generation run using
// the bumpalo crate. GenerationSession owns a reference to the arena that holds every
// interned symbol name and value expression read from the per-architecture tables, so the
// loader, table builder and fallback generator can pass plain &'arena str slices around
// without cloning. Interning deduplicates identical strings (the same __NR_ name shows up in
// most architecture tables). SessionStats tracks what the run consumed and produced:
// architectures merged, records emitted, lines skipped, duplicate records shadowed by an
// earlier definition in the same block, and the size of the global symbol registry.

//! Arena-based generation session.
//!
//! Everything a run builds is tied to the session lifetime; nothing outlives
//! the run and nothing is shared between runs.

use bumpalo::Bump;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::fmt;

/// Arena-based generation session.
pub struct GenerationSession<'arena> {
    /// Arena holding interned strings.
    arena: &'arena Bump,

    /// Run statistics.
    stats: RefCell<SessionStats>,

    /// String interning for symbol names and value expressions.
    interned_strings: RefCell<HashMap<String, &'arena str>>,
}

impl<'arena> GenerationSession<'arena> {
    /// Create a new session backed by the given arena.
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            stats: RefCell::new(SessionStats::default()),
            interned_strings: RefCell::new(HashMap::new()),
        }
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.interned_strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }

        let interned = self.arena.alloc_str(s);
        strings.insert(s.to_string(), interned);
        interned
    }

    /// Record that an architecture table was merged.
    pub fn record_architecture(&self) {
        self.stats.borrow_mut().architectures += 1;
    }

    /// Record an emitted definition.
    pub fn record_definition(&self) {
        self.stats.borrow_mut().records += 1;
    }

    /// Record a line that did not form a definition.
    pub fn record_skipped_line(&self) {
        self.stats.borrow_mut().skipped_lines += 1;
    }

    /// Record a definition shadowed by an earlier one in the same block.
    pub fn record_shadowed(&self) {
        self.stats.borrow_mut().shadowed_records += 1;
    }

    /// Record the final registry size.
    pub fn record_symbols(&self, count: usize) {
        self.stats.borrow_mut().symbols = count;
    }

    /// Get run statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }
}

/// Generation session statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Architecture tables merged.
    pub architectures: usize,

    /// Definitions emitted across all blocks.
    pub records: usize,

    /// Blank or malformed lines skipped.
    pub skipped_lines: usize,

    /// Duplicate definitions inside one block.
    pub shadowed_records: usize,

    /// Symbols in the global registry (fallback stanzas).
    pub symbols: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation Session Statistics:")?;
        writeln!(f, "  Architectures: {}", self.architectures)?;
        writeln!(f, "  Definitions emitted: {}", self.records)?;
        writeln!(f, "  Lines skipped: {}", self.skipped_lines)?;
        writeln!(f, "  Shadowed duplicates: {}", self.shadowed_records)?;
        writeln!(f, "  Fallback stubs: {}", self.symbols)?;
        Ok(())
    }
}
