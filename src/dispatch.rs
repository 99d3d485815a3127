// This module owns the fixed, architecture-independent text at the top of the generated
// header: the do-not-edit banner, the include guard and includes, the TST_SYSCALL_BRK__
// signal (tst_brk with TCONF for new-style tests, tst_brkm with a CLEANUP callback for
// old-style ones), the tst_syscall() dispatch macro and the invalid-syscall sentinel.
// Alongside the text it provides a Rust model of the dispatch contract so the behaviour
// the macro promises can be exercised without a C toolchain: a call through the sentinel
// fails with ENOSYS without being attempted, a real call whose failure reports ENOSYS is
// escalated to the "unsupported" signal, and every other result passes through unchanged.

//! The `tst_syscall()` dispatch contract.

use thiserror::Error;

/// Macro the fallback stubs define unknown symbols to.
pub const INVALID_SYSCALL: &str = "__LTP__NR_INVALID_SYSCALL";

/// Numeric value of [`INVALID_SYSCALL`].
pub const INVALID_SYSCALL_VALUE: i64 = -1;

/// `ENOSYS` as the dispatch model reports it.
///
/// This is the asm-generic value. MIPS (89) and hppa (251) differ; the
/// emitted C macro compares against the target's own `ENOSYS`, and the model
/// only needs one consistent value since it treats [`Errno`] as opaque.
pub const ENOSYS: i32 = 38;

/// Do-not-edit banner.
pub const BANNER: &str = concat!(
    "/************************************************\n",
    " * GENERATED FILE: DO NOT EDIT/PATCH THIS FILE  *\n",
    " *  change your arch specific .in file instead  *\n",
    " ************************************************/\n",
    "\n",
);

/// Include guard, includes, dispatch macros and the sentinel.
pub const PROLOGUE: &str = concat!(
    "/*\n",
    " * Here we stick all the ugly *fallback* logic for linux\n",
    " * system call numbers (those __NR_ thingies).\n",
    " *\n",
    " * Licensed under the GPLv2 or later, see the COPYING file.\n",
    " */\n",
    "\n",
    "#ifndef LAPI_SYSCALLS_H__\n",
    "#define LAPI_SYSCALLS_H__\n",
    "\n",
    "#include <errno.h>\n",
    "#include <sys/syscall.h>\n",
    "#include <asm/unistd.h>\n",
    "#include \"cleanup.c\"\n",
    "\n",
    "#ifdef TST_TEST_H__\n",
    "#define TST_SYSCALL_BRK__(NR, SNR) ({ \\\n",
    "\ttst_brk(TCONF, \\\n",
    "\t\t\"syscall(%d) \" SNR \" not supported on your arch\", NR); \\\n",
    "})\n",
    "#else\n",
    "#define TST_SYSCALL_BRK__(NR, SNR) ({ \\\n",
    "\ttst_brkm(TCONF, CLEANUP, \\\n",
    "\t\t\"syscall(%d) \" SNR \" not supported on your arch\", NR); \\\n",
    "})\n",
    "#endif\n",
    "\n",
    "#define tst_syscall(NR, ...) ({ \\\n",
    "\tintptr_t tst_ret; \\\n",
    "\tif (NR == __LTP__NR_INVALID_SYSCALL) { \\\n",
    "\t\terrno = ENOSYS; \\\n",
    "\t\ttst_ret = -1; \\\n",
    "\t} else { \\\n",
    "\t\ttst_ret = syscall(NR, ##__VA_ARGS__); \\\n",
    "\t} \\\n",
    "\tif (tst_ret == -1 && errno == ENOSYS) { \\\n",
    "\t\tTST_SYSCALL_BRK__(NR, #NR); \\\n",
    "\t} \\\n",
    "\ttst_ret; \\\n",
    "})\n",
    "\n",
    "#define __LTP__NR_INVALID_SYSCALL -1\n",
    "\n",
);

/// Closes the include guard.
pub const EPILOGUE: &str = "#endif\n\n";

/// Process error state seen by the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Errno(pub i32);

/// The distinguished "unsupported here" signal (TCONF in the C macro).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syscall({nr}) {symbol} not supported on your arch")]
pub struct Unsupported {
    pub nr: i64,
    pub symbol: String,
    /// Whether the underlying call was made before the signal was raised.
    pub attempted: bool,
}

/// Result of dispatching one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The raw result of the call, failures included.
    Completed(i64),
    /// The call is not available on this configuration.
    Unsupported(Unsupported),
}

impl DispatchOutcome {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DispatchOutcome::Unsupported(_))
    }
}

/// Dispatch `nr` the way `tst_syscall(NR, ...)` does.
///
/// `symbol` is the stringified macro name used in the diagnostic. `invoke`
/// performs the underlying call and may update `errno`; it is never called
/// for the sentinel.
pub fn dispatch<F>(symbol: &str, nr: i64, errno: &mut Errno, invoke: F) -> DispatchOutcome
where
    F: FnOnce(i64, &mut Errno) -> i64,
{
    let attempted = nr != INVALID_SYSCALL_VALUE;
    let ret = if attempted {
        invoke(nr, errno)
    } else {
        errno.0 = ENOSYS;
        -1
    };

    if ret == -1 && errno.0 == ENOSYS {
        let signal = Unsupported {
            nr,
            symbol: symbol.to_string(),
            attempted,
        };
        log::debug!("{}", signal);
        return DispatchOutcome::Unsupported(signal);
    }

    DispatchOutcome::Completed(ret)
}
