//! Record parser for `<arch>.in` tables.
//!
//! Each line is `name value-expression`. Anything with fewer than two tokens
//! is not a record and is skipped; this is a tolerance policy for blank and
//! stray lines, not a parse failure.

/// Namespace prefix for syscall-number macros.
pub const NR_PREFIX: &str = "__NR_";

/// Outcome of parsing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    /// A syscall name and its value expression, copied verbatim.
    Definition { name: &'a str, value: &'a str },
    /// The line does not contribute a symbol.
    Skip(SkipReason),
}

/// Why a line was not a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or whitespace only.
    Blank,
    /// A single token with no value expression.
    MissingValue,
}

/// Prefix a raw syscall name with [`NR_PREFIX`].
pub fn symbol_name(name: &str) -> String {
    format!("{}{}", NR_PREFIX, name)
}

/// Split one line at its first whitespace boundary.
///
/// The value expression keeps everything after the separating whitespace
/// (it may reference other macros resolved later by the C preprocessor);
/// only the surrounding whitespace of the line is dropped.
pub fn parse_record(line: &str) -> Record<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Record::Skip(SkipReason::Blank);
    }

    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let value = rest.trim_start();
            if value.is_empty() {
                Record::Skip(SkipReason::MissingValue)
            } else {
                Record::Definition { name, value }
            }
        }
        None => Record::Skip(SkipReason::MissingValue),
    }
}
