// This module enumerates the architectures (and ABI variants) the header covers and maps
// each one to its compile-time guard. The enumeration order is fixed and is the order the
// architecture blocks appear in the generated header. Most architectures are selected by
// the compiler's canonical __<arch>__ macro; ABI variants that share an instruction set
// need compound conditions: 64-bit vs 32-bit SPARC, S/390 vs its 64-bit successor, 64-bit
// vs 32-bit PowerPC, and the three MIPS calling conventions (n32, n64, o32, the last also
// constrained by the width of long). Each architecture also carries a reference target,
// the macros a real compiler predefines for it, so that guard exclusivity can be checked.

//! Supported architectures and their guards.

use std::fmt;
use std::str::FromStr;

use crate::guard::{Guard, Target};

/// One architecture / ABI numbering space with its own `<name>.in` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
    Aarch64,
    Arc,
    Arm,
    Hppa,
    I386,
    Ia64,
    Loongarch,
    MipsN32,
    MipsN64,
    MipsO32,
    Powerpc64,
    Powerpc,
    S390x,
    S390,
    Sh,
    Sparc64,
    Sparc,
    X86_64,
}

impl Arch {
    /// Every supported architecture, in header order.
    pub const ALL: [Arch; 18] = [
        Arch::Aarch64,
        Arch::Arc,
        Arch::Arm,
        Arch::Hppa,
        Arch::I386,
        Arch::Ia64,
        Arch::Loongarch,
        Arch::MipsN32,
        Arch::MipsN64,
        Arch::MipsO32,
        Arch::Powerpc64,
        Arch::Powerpc,
        Arch::S390x,
        Arch::S390,
        Arch::Sh,
        Arch::Sparc64,
        Arch::Sparc,
        Arch::X86_64,
    ];

    /// Identifier used for the input file name.
    pub fn name(self) -> &'static str {
        match self {
            Arch::Aarch64 => "aarch64",
            Arch::Arc => "arc",
            Arch::Arm => "arm",
            Arch::Hppa => "hppa",
            Arch::I386 => "i386",
            Arch::Ia64 => "ia64",
            Arch::Loongarch => "loongarch",
            Arch::MipsN32 => "mips_n32",
            Arch::MipsN64 => "mips_n64",
            Arch::MipsO32 => "mips_o32",
            Arch::Powerpc64 => "powerpc64",
            Arch::Powerpc => "powerpc",
            Arch::S390x => "s390x",
            Arch::S390 => "s390",
            Arch::Sh => "sh",
            Arch::Sparc64 => "sparc64",
            Arch::Sparc => "sparc",
            Arch::X86_64 => "x86_64",
        }
    }

    /// `<name>.in`
    pub fn input_file_name(self) -> String {
        format!("{}.in", self.name())
    }

    /// Canonical `__<name>__` macro.
    fn canonical_macro(self) -> &'static str {
        match self {
            Arch::Aarch64 => "__aarch64__",
            Arch::Arc => "__arc__",
            Arch::Arm => "__arm__",
            Arch::Hppa => "__hppa__",
            Arch::I386 => "__i386__",
            Arch::Ia64 => "__ia64__",
            Arch::Loongarch => "__loongarch__",
            Arch::Powerpc64 => "__powerpc64__",
            Arch::Powerpc => "__powerpc__",
            Arch::S390x => "__s390x__",
            Arch::S390 => "__s390__",
            Arch::Sh => "__sh__",
            Arch::Sparc64 | Arch::Sparc => "__sparc__",
            Arch::MipsN32 | Arch::MipsN64 | Arch::MipsO32 => "__mips__",
            Arch::X86_64 => "__x86_64__",
        }
    }

    /// Guard selecting this architecture's block.
    pub fn guard(self) -> Guard {
        match self {
            Arch::Sparc64 => Guard::all([Guard::Defined("__sparc__"), Guard::Defined("__arch64__")]),
            Arch::Sparc => Guard::all([Guard::Defined("__sparc__"), Guard::NotDefined("__arch64__")]),
            Arch::S390 => Guard::all([Guard::Defined("__s390__"), Guard::NotDefined("__s390x__")]),
            // 64-bit PowerPC compilers define __powerpc__ as well.
            Arch::Powerpc => Guard::all([
                Guard::Defined("__powerpc__"),
                Guard::NotDefined("__powerpc64__"),
            ]),
            Arch::MipsN32 => Guard::all([Guard::Defined("__mips__"), Guard::Defined("_ABIN32")]),
            Arch::MipsN64 => Guard::all([Guard::Defined("__mips__"), Guard::Defined("_ABI64")]),
            Arch::MipsO32 => Guard::all([
                Guard::Defined("__mips__"),
                Guard::Defined("_ABIO32"),
                Guard::Equals("_MIPS_SZLONG", 32),
            ]),
            other => Guard::Defined(other.canonical_macro()),
        }
    }

    /// Macros a compiler predefines when building for this architecture.
    pub fn reference_target(self) -> Target {
        let target = Target::new().define(self.canonical_macro());
        match self {
            Arch::Sparc64 => target.define("__arch64__"),
            Arch::Powerpc64 => target.define("__powerpc__"),
            Arch::S390x => target.define("__s390__"),
            Arch::MipsN32 => target.define("_ABIN32").define_value("_MIPS_SZLONG", 32),
            Arch::MipsN64 => target.define("_ABI64").define_value("_MIPS_SZLONG", 64),
            Arch::MipsO32 => target.define("_ABIO32").define_value("_MIPS_SZLONG", 32),
            _ => target,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|arch| arch.name() == s)
            .ok_or_else(|| format!("unknown architecture '{}'", s))
    }
}
