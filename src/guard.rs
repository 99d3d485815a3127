//! Compile-time guard conditions and the targets they are evaluated against.
//!
//! A [`Guard`] is the condition wrapped around one architecture's block of
//! definitions. It renders to the C preprocessor condition that ends up in
//! the header and can also be evaluated against a [`Target`], the set of
//! macros a compiler predefines for some real platform.

use hashbrown::HashMap;
use std::fmt;

/// Preprocessor condition selecting one architecture block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// `defined(NAME)`
    Defined(&'static str),
    /// `!defined(NAME)`
    NotDefined(&'static str),
    /// `NAME == VALUE`; an undefined macro reads as 0.
    Equals(&'static str, i64),
    /// Conjunction of all terms.
    All(Vec<Guard>),
}

impl Guard {
    /// Shorthand for `All`.
    pub fn all(terms: impl IntoIterator<Item = Guard>) -> Self {
        Guard::All(terms.into_iter().collect())
    }

    /// Evaluate the condition for a compile target.
    pub fn evaluate(&self, target: &Target) -> bool {
        match self {
            Guard::Defined(name) => target.is_defined(name),
            Guard::NotDefined(name) => !target.is_defined(name),
            Guard::Equals(name, value) => target.value(name) == *value,
            Guard::All(terms) => terms.iter().all(|t| t.evaluate(target)),
        }
    }

    /// The directive opening the guarded block.
    ///
    /// A lone `Defined` term uses the short `#ifdef` form; anything else is
    /// spelled out as `#if <condition>`.
    pub fn open_directive(&self) -> String {
        match self {
            Guard::Defined(name) => format!("#ifdef {}", name),
            other => format!("#if {}", other),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Defined(name) => write!(f, "defined({})", name),
            Guard::NotDefined(name) => write!(f, "!defined({})", name),
            Guard::Equals(name, value) => write!(f, "{} == {}", name, value),
            Guard::All(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" && ")?;
                    }
                    write!(f, "{}", term)?;
                }
                Ok(())
            }
        }
    }
}

/// Macros predefined by the compiler for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    macros: HashMap<String, i64>,
}

impl Target {
    /// Target with nothing predefined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` as `1`.
    pub fn define(self, name: &str) -> Self {
        self.define_value(name, 1)
    }

    /// Define `name` with an integer value.
    pub fn define_value(mut self, name: &str, value: i64) -> Self {
        self.macros.insert(name.to_string(), value);
        self
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Value in `#if` arithmetic; undefined names evaluate to 0.
    pub fn value(&self, name: &str) -> i64 {
        self.macros.get(name).copied().unwrap_or(0)
    }

    /// Iterate over the predefined macros.
    pub fn macros(&self) -> impl Iterator<Item = (&str, i64)> {
        self.macros.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_defined_uses_ifdef() {
        let guard = Guard::Defined("__x86_64__");
        assert_eq!(guard.open_directive(), "#ifdef __x86_64__");
    }

    #[test]
    fn test_compound_rendering() {
        let guard = Guard::all([
            Guard::Defined("__mips__"),
            Guard::Defined("_ABIO32"),
            Guard::Equals("_MIPS_SZLONG", 32),
        ]);
        assert_eq!(
            guard.open_directive(),
            "#if defined(__mips__) && defined(_ABIO32) && _MIPS_SZLONG == 32"
        );

        let guard = Guard::all([Guard::Defined("__sparc__"), Guard::NotDefined("__arch64__")]);
        assert_eq!(
            guard.open_directive(),
            "#if defined(__sparc__) && !defined(__arch64__)"
        );
    }

    #[test]
    fn test_evaluation() {
        let sparc64 = Target::new().define("__sparc__").define("__arch64__");
        let sparc32 = Target::new().define("__sparc__");
        let guard = Guard::all([Guard::Defined("__sparc__"), Guard::NotDefined("__arch64__")]);

        assert!(!guard.evaluate(&sparc64));
        assert!(guard.evaluate(&sparc32));
    }

    #[test]
    fn test_equals_treats_undefined_as_zero() {
        let target = Target::new();
        assert!(Guard::Equals("_MIPS_SZLONG", 0).evaluate(&target));
        assert!(!Guard::Equals("_MIPS_SZLONG", 32).evaluate(&target));

        let target = target.define_value("_MIPS_SZLONG", 32);
        assert!(Guard::Equals("_MIPS_SZLONG", 32).evaluate(&target));
    }
}
