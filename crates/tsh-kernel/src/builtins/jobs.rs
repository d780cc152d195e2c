//! jobs: list tracked jobs.

use tsh_types::ExecResult;

use super::{Builtin, Flow};
use crate::jobs::JobControl;

/// Jobs builtin: print every occupied slot in table order.
pub struct Jobs;

impl Builtin for Jobs {
    fn name(&self) -> &str {
        "jobs"
    }

    fn execute(&self, _args: &[String], jobs: &JobControl) -> Flow {
        let listing = jobs.inspect(|table| table.list());
        let lines: Vec<String> = listing.iter().map(ToString::to_string).collect();
        Flow::Continue(ExecResult::success(lines.join("\n")))
    }
}
