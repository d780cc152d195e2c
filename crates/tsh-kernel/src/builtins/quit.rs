//! quit: leave the shell.

use super::{Builtin, Flow};
use crate::jobs::JobControl;

/// Quit builtin: exit immediately. Children are left to the OS.
pub struct Quit;

impl Builtin for Quit {
    fn name(&self) -> &str {
        "quit"
    }

    fn execute(&self, _args: &[String], _jobs: &JobControl) -> Flow {
        Flow::Exit(0)
    }
}
