//! Integration tests for the tsh binary.
//!
//! Each test drives a real `tsh` process over pipes, the way a test driver
//! or a script would, and checks what it prints. Child programs are kept
//! short-lived: anything still holding the stdout pipe when the shell exits
//! delays `finish`.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

/// A running shell with piped stdio.
struct Session {
    child: Child,
}

/// Everything a session printed, plus its exit status.
struct Transcript {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

impl Transcript {
    fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

impl Session {
    /// Start `tsh -p` (no prompt).
    fn start() -> Self {
        Self::with_args(&["-p"])
    }

    fn with_args(args: &[&str]) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_tsh"))
            .args(args)
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start tsh");
        Self { child }
    }

    fn send(&mut self, line: &str) {
        let stdin = self.child.stdin.as_mut().expect("stdin already closed");
        writeln!(stdin, "{}", line).expect("failed to write to tsh");
        stdin.flush().expect("failed to flush tsh stdin");
    }

    /// Write raw bytes, for input that is not valid UTF-8.
    fn send_bytes(&mut self, bytes: &[u8]) {
        let stdin = self.child.stdin.as_mut().expect("stdin already closed");
        stdin.write_all(bytes).expect("failed to write to tsh");
        stdin.flush().expect("failed to flush tsh stdin");
    }

    /// Deliver a signal to the shell process itself.
    fn signal(&self, name: &str) {
        let status = Command::new("kill")
            .arg(format!("-{}", name))
            .arg(self.child.id().to_string())
            .status()
            .expect("failed to run kill");
        assert!(status.success(), "kill -{} failed", name);
    }

    /// Close stdin (end of input) and collect the transcript.
    fn finish(mut self) -> Transcript {
        drop(self.child.stdin.take());
        let output = self.child.wait_with_output().expect("failed to wait for tsh");
        Transcript {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        }
    }
}

fn pause(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

/// Pull the pid out of a line shaped like `... (<pid>) ...`.
fn pid_in(line: &str) -> &str {
    let start = line.find('(').expect("no pid in line") + 1;
    let end = line[start..].find(')').expect("unterminated pid") + start;
    &line[start..end]
}

// ============================================================================
// Input protocol
// ============================================================================

#[test]
fn end_of_input_exits_zero() {
    let t = Session::start().finish();
    assert_eq!(t.code, Some(0));
    assert_eq!(t.stdout, "");
}

#[test]
fn blank_lines_do_nothing() {
    let mut s = Session::start();
    s.send("");
    s.send("    ");
    s.send("&");
    let t = s.finish();
    assert_eq!(t.code, Some(0));
    assert_eq!(t.stdout, "");
    assert_eq!(t.stderr, "");
}

#[test]
fn prompt_is_printed_before_each_read() {
    let mut s = Session::with_args(&[]);
    s.send("sh -c 'sleep 1; echo done'");
    let t = s.finish();
    // The second prompt only appears once the foreground job has finished.
    assert_eq!(t.stdout, "tsh> done\ntsh> ");
}

#[test]
fn quit_stops_reading() {
    let mut s = Session::start();
    s.send("echo before");
    s.send("quit");
    s.send("echo after");
    let t = s.finish();
    assert_eq!(t.code, Some(0));
    assert_eq!(t.stdout, "before\n");
}

#[test]
fn foreground_jobs_run_in_order() {
    let mut s = Session::start();
    s.send("sh -c 'sleep 0.5; echo first'");
    s.send("echo second");
    s.send("jobs");
    let t = s.finish();
    assert_eq!(t.lines(), vec!["first", "second"]);
}

#[test]
fn invalid_utf8_line_does_not_end_the_shell() {
    let mut s = Session::start();
    s.send_bytes(b"echo \xff\n");
    s.send("echo alive");
    let t = s.finish();
    assert_eq!(t.code, Some(0), "stderr: {}", t.stderr);
    assert_eq!(t.lines().last(), Some(&"alive"));
}

#[test]
fn quoted_arguments_reach_the_program_whole() {
    let mut s = Session::start();
    s.send("printf '%s|%s\\n' 'hello world' x");
    let t = s.finish();
    assert_eq!(t.stdout, "hello world|x\n");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_command_is_reported_and_not_tracked() {
    let mut s = Session::start();
    s.send("bogus_cmd_xyz");
    s.send("jobs");
    s.send("echo still here");
    let t = s.finish();
    assert!(t.stderr.contains("bogus_cmd_xyz: Command not found."), "stderr: {}", t.stderr);
    assert_eq!(t.stdout, "still here\n");
    assert_eq!(t.code, Some(0));
}

#[test]
fn fg_unknown_job() {
    let mut s = Session::start();
    s.send("fg %7");
    s.send("jobs");
    let t = s.finish();
    assert_eq!(t.stdout, "(%7): No such job\n");
    assert_eq!(t.stderr, "");
}

#[test]
fn bg_fg_argument_errors() {
    let mut s = Session::start();
    s.send("bg");
    s.send("fg abc");
    s.send("bg 999999");
    let t = s.finish();
    assert_eq!(
        t.lines(),
        vec![
            "bg command requires PID or %jobid argument",
            "fg: argument must be a PID or %jobid",
            "(999999): No such process",
        ]
    );
    assert_eq!(t.code, Some(0));
}

#[test]
fn too_many_jobs_is_not_fatal() {
    let mut s = Session::start();
    for _ in 0..17 {
        s.send("sleep 1 &");
    }
    // The table is full, so wait here rather than in a foreground job.
    pause(2000);
    s.send("jobs");
    s.send("echo ok");
    let t = s.finish();

    assert!(t.stdout.contains("Tried to create too many jobs\n"), "stdout: {}", t.stdout);
    let announcements: Vec<&str> = t.lines().into_iter().filter(|l| l.ends_with(" sleep 1 &")).collect();
    assert_eq!(announcements.len(), 16);
    assert!(announcements[15].starts_with("[16] ("));
    // All sixteen were reaped during the pause.
    assert_eq!(t.lines().last(), Some(&"ok"));
    assert!(!t.stdout.contains("Running"));
}

// ============================================================================
// Background jobs
// ============================================================================

#[test]
fn background_job_is_announced_then_reaped() {
    let mut s = Session::start();
    s.send("sleep 1 &");
    s.send("jobs");
    s.send("sleep 2");
    s.send("jobs");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 2, "stdout: {}", t.stdout);
    assert!(lines[0].starts_with("[1] (") && lines[0].ends_with(") sleep 1 &"), "{}", lines[0]);
    assert_eq!(lines[1], format!("[1] ({}) Running sleep 1 &", pid_in(lines[0])));
}

#[test]
fn background_job_ids_increase() {
    let mut s = Session::start();
    s.send("sleep 1 &");
    s.send("sleep 1 &");
    s.send("jobs");
    s.send("sleep 2");
    let t = s.finish();

    let lines = t.lines();
    assert!(lines[0].starts_with("[1] ("));
    assert!(lines[1].starts_with("[2] ("));
    assert_ne!(pid_in(lines[0]), pid_in(lines[1]));
    assert!(lines[2].starts_with("[1] (") && lines[2].contains(" Running "));
    assert!(lines[3].starts_with("[2] (") && lines[3].contains(" Running "));
}

// ============================================================================
// Child state changes
// ============================================================================

#[test]
fn job_killed_by_signal_is_reported_once() {
    let mut s = Session::start();
    s.send("sh -c 'kill -TERM $$'");
    s.send("jobs");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 1, "stdout: {}", t.stdout);
    assert!(lines[0].starts_with("Job [1] ("), "{}", lines[0]);
    assert!(lines[0].ends_with(") terminated by signal 15"), "{}", lines[0]);
}

#[test]
fn stopped_job_resumes_with_fg() {
    let mut s = Session::start();
    s.send("sh -c 'kill -STOP $$; echo resumed'");
    s.send("jobs");
    s.send("fg %1");
    s.send("jobs");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 3, "stdout: {}", t.stdout);
    assert!(lines[0].starts_with("Job [1] ("), "{}", lines[0]);
    assert!(lines[0].ends_with(") stopped by signal 19"), "{}", lines[0]);
    let pid = pid_in(lines[0]);
    assert_eq!(lines[1], format!("[1] ({}) Stopped sh -c 'kill -STOP $$; echo resumed'", pid));
    assert_eq!(lines[2], "resumed");
}

#[test]
fn stopped_job_resumes_with_bg() {
    let mut s = Session::start();
    s.send("sh -c 'kill -STOP $$; sleep 1'");
    s.send("jobs");
    s.send("bg %1");
    s.send("jobs");
    s.send("sleep 2");
    s.send("jobs");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 4, "stdout: {}", t.stdout);
    let pid = pid_in(lines[0]);
    assert_eq!(lines[1], format!("[1] ({}) Stopped sh -c 'kill -STOP $$; sleep 1'", pid));
    // bg reuses the background-launch announcement.
    assert_eq!(lines[2], format!("[1] ({}) sh -c 'kill -STOP $$; sleep 1'", pid));
    assert_eq!(lines[3], format!("[1] ({}) Running sh -c 'kill -STOP $$; sleep 1'", pid));
}

// ============================================================================
// Keyboard signals
// ============================================================================

#[test]
fn interrupt_is_forwarded_to_foreground_job() {
    let mut s = Session::start();
    s.send("sleep 5");
    pause(500);
    s.signal("INT");
    s.send("jobs");
    s.send("echo alive");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 2, "stdout: {}", t.stdout);
    assert!(lines[0].starts_with("Job [1] ("), "{}", lines[0]);
    assert!(lines[0].ends_with(") terminated by signal 2"), "{}", lines[0]);
    assert_eq!(lines[1], "alive");
    assert_eq!(t.code, Some(0));
}

#[test]
fn interrupt_is_reported_once_amid_other_exits() {
    let mut s = Session::start();
    s.send("sleep 0.5 &");
    s.send("sleep 5");
    // Let the background job finish before interrupting the foreground one.
    pause(1500);
    s.signal("INT");
    s.send("jobs");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 2, "stdout: {}", t.stdout);
    assert!(lines[0].starts_with("[1] (") && lines[0].ends_with(") sleep 0.5 &"), "{}", lines[0]);
    assert!(lines[1].starts_with("Job [2] ("), "{}", lines[1]);
    assert!(lines[1].ends_with(") terminated by signal 2"), "{}", lines[1]);
    assert_eq!(t.stdout.matches("terminated by signal").count(), 1);
}

#[test]
fn suspend_is_forwarded_to_foreground_job() {
    let mut s = Session::start();
    s.send("sleep 2");
    pause(500);
    s.signal("TSTP");
    s.send("jobs");
    s.send("fg %1");
    s.send("jobs");
    let t = s.finish();

    let lines = t.lines();
    assert_eq!(lines.len(), 2, "stdout: {}", t.stdout);
    assert!(lines[0].ends_with(") stopped by signal 20"), "{}", lines[0]);
    assert_eq!(lines[1], format!("[1] ({}) Stopped sleep 2", pid_in(lines[0])));
}

#[test]
fn interrupt_with_no_foreground_job_is_ignored() {
    let mut s = Session::start();
    pause(500);
    s.signal("INT");
    s.signal("TSTP");
    pause(100);
    s.send("echo alive");
    let t = s.finish();
    assert_eq!(t.stdout, "alive\n");
    assert_eq!(t.code, Some(0));
}

#[test]
fn sigquit_terminates_the_shell() {
    let s = Session::start();
    pause(500);
    s.signal("QUIT");
    let t = s.finish();
    assert_eq!(t.stdout, "Terminating after receipt of SIGQUIT signal\n");
    assert_eq!(t.code, Some(1));
}

// ============================================================================
// Startup flags
// ============================================================================

#[test]
fn help_flag_prints_usage() {
    let t = Session::with_args(&["-h"]).finish();
    assert!(t.stdout.starts_with("Usage: tsh"));
    assert_eq!(t.code, Some(1));
}

#[test]
fn unknown_flag_is_rejected() {
    let t = Session::with_args(&["-z"]).finish();
    assert!(t.stderr.contains("Unknown option: -z"));
    assert_eq!(t.code, Some(1));
}

#[test]
fn verbose_flag_announces_added_jobs() {
    let mut s = Session::with_args(&["-vp"]);
    s.send("echo hi");
    let t = s.finish();
    // The child may print before the shell does.
    let added = t.lines().into_iter().find(|l| l.starts_with("Added job "));
    let added = added.unwrap_or_else(|| panic!("no announcement in stdout: {}", t.stdout));
    assert!(added.starts_with("Added job [1] "), "{}", added);
    assert!(added.ends_with(" echo hi"), "{}", added);
    assert!(t.stdout.contains("hi\n"));
}
