//! Entry point of the `dazeus` command.
//!
//! Everything happens in [`dazeus_cli::run`]; the binary only supplies the
//! process arguments and standard streams.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    dazeus_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
