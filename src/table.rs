// This module merges the per-architecture definition sets into the two structures the
// header is assembled from: one guarded block per architecture, in the fixed enumeration
// order, and the global symbol registry, an insertion-ordered set of every __NR_ symbol
// seen in any architecture. Every parsed record is emitted inside its block wrapped in
// #ifndef/#endif, so a repeated symbol in one table is a harmless no-op for the
// preprocessor; the block additionally keeps an explicit first-wins map so the resolved
// value of a symbol under that block's guard is an enforced, queryable fact rather than a
// side effect of the emitted text. The registry is owned by the returned SyscallTable and
// threaded to the fallback generator; nothing here is ambient state.

//! Architecture blocks and the global symbol registry.

use hashbrown::{HashMap, HashSet};

use crate::arch::Arch;
use crate::core::GenerationSession;
use crate::guard::Guard;
use crate::loader::{ArchitectureDefinitionSet, Definition};

/// Insertion-ordered, deduplicating set of symbol names.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry<'arena> {
    order: Vec<&'arena str>,
    seen: HashSet<&'arena str>,
}

impl<'arena> SymbolRegistry<'arena> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `symbol` if it has not been seen. Returns whether it was new.
    pub fn insert(&mut self, symbol: &'arena str) -> bool {
        if self.seen.insert(symbol) {
            self.order.push(symbol);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.seen.contains(symbol)
    }

    /// Symbols in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &'arena str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The guarded block of definitions for one architecture.
#[derive(Debug, Clone)]
pub struct ArchBlock<'arena> {
    pub arch: Arch,
    pub guard: Guard,
    /// Every record, in input order, including shadowed duplicates.
    pub entries: Vec<Definition<'arena>>,
    resolved: HashMap<&'arena str, &'arena str>,
    shadowed: usize,
}

impl<'arena> ArchBlock<'arena> {
    fn new(arch: Arch) -> Self {
        Self {
            arch,
            guard: arch.guard(),
            entries: Vec::new(),
            resolved: HashMap::new(),
            shadowed: 0,
        }
    }

    /// Append a record; the first definition of a symbol wins.
    fn push(&mut self, def: Definition<'arena>) -> bool {
        self.entries.push(def);
        match self.resolved.entry(def.symbol) {
            hashbrown::hash_map::Entry::Occupied(_) => {
                self.shadowed += 1;
                false
            }
            hashbrown::hash_map::Entry::Vacant(slot) => {
                slot.insert(def.value);
                true
            }
        }
    }

    /// Value `symbol` resolves to when this block's guard is active.
    pub fn value_of(&self, symbol: &str) -> Option<&'arena str> {
        self.resolved.get(symbol).copied()
    }

    /// Number of distinct symbols the block defines.
    pub fn symbol_count(&self) -> usize {
        self.resolved.len()
    }

    /// Records that repeat a symbol already defined earlier in the block.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }

    /// Append the block's text to `out`.
    pub fn render(&self, out: &mut String) {
        out.push_str(&self.guard.open_directive());
        out.push('\n');
        for def in &self.entries {
            out.push_str(&format!("# ifndef {}\n", def.symbol));
            out.push_str(&format!("#  define {} {}\n", def.symbol, def.value));
            out.push_str("# endif\n");
        }
        out.push_str("#endif\n\n");
    }
}

/// Result of merging all architecture sets.
#[derive(Debug, Clone)]
pub struct SyscallTable<'arena> {
    pub blocks: Vec<ArchBlock<'arena>>,
    pub registry: SymbolRegistry<'arena>,
}

impl<'arena> SyscallTable<'arena> {
    pub fn block(&self, arch: Arch) -> Option<&ArchBlock<'arena>> {
        self.blocks.iter().find(|b| b.arch == arch)
    }
}

/// Merges definition sets block by block.
pub struct TableBuilder<'s, 'arena> {
    session: &'s GenerationSession<'arena>,
    blocks: Vec<ArchBlock<'arena>>,
    registry: SymbolRegistry<'arena>,
}

impl<'s, 'arena> TableBuilder<'s, 'arena> {
    pub fn new(session: &'s GenerationSession<'arena>) -> Self {
        Self {
            session,
            blocks: Vec::new(),
            registry: SymbolRegistry::new(),
        }
    }

    /// Merge every set, reordered into header enumeration order.
    pub fn build(
        session: &'s GenerationSession<'arena>,
        mut sets: Vec<ArchitectureDefinitionSet<'arena>>,
    ) -> SyscallTable<'arena> {
        sets.sort_by_key(|set| set.arch);
        let mut builder = Self::new(session);
        for set in &sets {
            builder.add(set);
        }
        builder.finish()
    }

    /// Emit one architecture's block and register its symbols.
    pub fn add(&mut self, set: &ArchitectureDefinitionSet<'arena>) {
        let mut block = ArchBlock::new(set.arch);
        for def in &set.definitions {
            log::trace!("{}: {} = {}", set.arch, def.symbol, def.value);
            if !block.push(*def) {
                log::debug!(
                    "{}:{}: {} already defined in this block, later value ignored",
                    set.arch.input_file_name(),
                    def.line,
                    def.symbol
                );
                self.session.record_shadowed();
            }
            self.session.record_definition();
            self.registry.insert(def.symbol);
        }

        log::debug!(
            "{} block: {} records, {} symbols",
            set.arch,
            block.entries.len(),
            block.symbol_count()
        );
        self.session.record_architecture();
        self.blocks.push(block);
    }

    pub fn finish(self) -> SyscallTable<'arena> {
        self.session.record_symbols(self.registry.len());
        SyscallTable {
            blocks: self.blocks,
            registry: self.registry,
        }
    }
}
