//! Process launcher: start an external program in its own process group.

use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;

use nix::unistd::Pid;

use crate::error::LaunchError;

/// Resolve a command name against a colon-separated search path.
///
/// Names containing `/` are returned as-is. Returns `None` if no executable
/// file matches.
pub fn resolve_in_path(name: &str, path_var: &str) -> Option<String> {
    if name.contains('/') {
        return Some(name.to_string());
    }

    for dir in path_var.split(':') {
        if dir.is_empty() {
            continue;
        }

        let full_path = format!("{}/{}", dir, name);
        let path = Path::new(&full_path);

        if path.is_file() {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = path.metadata() {
                if metadata.permissions().mode() & 0o111 != 0 {
                    return Some(full_path);
                }
            }
        }
    }

    None
}

/// Start `argv[0]` with the remaining arguments.
///
/// The child is moved into a fresh process group (pgid = its pid) before it
/// execs, so keyboard signals aimed at the shell's group never reach it
/// directly. The returned pid is both the job's pid and its group id.
///
/// The child is not waited for here; the signal relay reaps it.
#[tracing::instrument(level = "debug", skip(argv), fields(command = %argv.first().map(String::as_str).unwrap_or("")))]
pub fn spawn(argv: &[String]) -> Result<Pid, LaunchError> {
    let Some((name, args)) = argv.split_first() else {
        return Err(LaunchError::NotFound(String::new()));
    };

    let path_var = std::env::var("PATH").unwrap_or_default();
    let executable = resolve_in_path(name, &path_var)
        .filter(|path| Path::new(path).is_file())
        .ok_or_else(|| LaunchError::NotFound(name.clone()))?;
    tracing::debug!(executable = %executable, "resolved external command");

    let child = Command::new(&executable)
        .arg0(name)
        .args(args)
        .process_group(0)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => LaunchError::NotFound(name.clone()),
            _ => LaunchError::Spawn {
                name: name.clone(),
                source: e,
            },
        })?;

    // std's Child neither kills nor reaps on drop; ownership of the process
    // passes to the job table from here on.
    Ok(Pid::from_raw(child.id() as i32))
}
