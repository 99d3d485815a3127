//! Fallback stubs for symbols an architecture does not define.
//!
//! Every symbol in the registry gets an unguarded `#ifndef` stanza defining
//! it to the invalid-syscall sentinel. When the active architecture block has
//! already defined the symbol the stanza is a no-op, otherwise the symbol
//! still compiles and resolves to a value no real syscall number can have.

use crate::dispatch::INVALID_SYSCALL;
use crate::table::SymbolRegistry;

/// Heading emitted before the stanzas.
pub const FALLBACK_HEADING: &str = "/* Common stubs */\n";

/// Append the fallback section for `registry` to `out`.
pub fn render(registry: &SymbolRegistry<'_>, out: &mut String) {
    out.push_str(FALLBACK_HEADING);
    for symbol in registry.iter() {
        out.push_str(&stanza(symbol));
    }
    log::debug!("Emitted {} fallback stubs", registry.len());
}

/// `# ifndef S / #  define S <sentinel> / # endif`
pub fn stanza(symbol: &str) -> String {
    format!(
        "# ifndef {symbol}\n#  define {symbol} {INVALID_SYSCALL}\n# endif\n"
    )
}
