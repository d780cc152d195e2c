//! tsh REPL: the read/evaluate loop around the tsh kernel.
//!
//! It handles:
//! - Startup flags (`-h`, `-v`, `-p`, `-V`)
//! - The prompt and the input source (rustyline on a terminal, plain
//!   buffered stdin when driven through a pipe)
//! - Line-editing history via rustyline
//! - Exit status: 0 on end of input or `quit`, non-zero on read failure

use std::io::{self, BufRead, IsTerminal, StdinLock, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use tsh_kernel::{Flow, Shell, ShellConfig};

/// Parsed startup flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupFlags {
    /// `-h`: print usage and exit.
    pub help: bool,
    /// `-v`: extra diagnostics.
    pub verbose: bool,
    /// `-p`: do not print a prompt.
    pub no_prompt: bool,
    /// `-V` / `--version`.
    pub version: bool,
}

impl StartupFlags {
    /// Parse flags in the `-hvp` style; letters may be combined.
    ///
    /// Returns the offending argument if something is not recognized.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg == "--version" {
                flags.version = true;
                continue;
            }
            let Some(letters) = arg.strip_prefix('-').filter(|l| !l.is_empty()) else {
                return Err(arg.to_string());
            };
            for letter in letters.chars() {
                match letter {
                    'h' => flags.help = true,
                    'v' => flags.verbose = true,
                    'p' => flags.no_prompt = true,
                    'V' => flags.version = true,
                    _ => return Err(arg.to_string()),
                }
            }
        }
        Ok(flags)
    }

    /// Shell configuration implied by these flags.
    pub fn config(&self) -> ShellConfig {
        ShellConfig::interactive()
            .with_emit_prompt(!self.no_prompt)
            .with_verbose(self.verbose)
    }
}

/// Usage text for `-h` and bad flags.
pub const USAGE: &str = "Usage: tsh [-hvpV]
   -h   print this message
   -v   print additional diagnostic information
   -p   do not emit a command prompt
   -V   print version information";

/// Where input lines come from.
enum LineSource {
    /// A human at a terminal: line editing and history.
    Terminal {
        editor: Box<Editor<(), DefaultHistory>>,
        history_path: Option<PathBuf>,
    },
    /// Anything else (pipes, files): one line per read.
    Piped(StdinLock<'static>),
}

impl LineSource {
    fn open() -> Result<Self> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Ok(LineSource::Piped(stdin.lock()));
        }

        let mut editor: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;
        let history_path = directories::BaseDirs::new().map(|b| b.data_dir().join("tsh").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Err(e) = editor.load_history(path) {
                // A missing file is expected on first run
                let is_not_found =
                    matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound);
                if !is_not_found {
                    tracing::warn!("Failed to load history: {}", e);
                }
            }
        }

        Ok(LineSource::Terminal {
            editor: Box::new(editor),
            history_path,
        })
    }

    /// Read one line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            LineSource::Piped(stdin) => {
                if !prompt.is_empty() {
                    let mut out = io::stdout().lock();
                    write!(out, "{}", prompt).context("Failed to write prompt")?;
                    out.flush().context("Failed to write prompt")?;
                }
                // Lines are bytes; undecodable ones still run, with U+FFFD in place.
                let mut line = Vec::new();
                let read = stdin.read_until(b'\n', &mut line).context("Failed to read input")?;
                Ok((read > 0).then(|| String::from_utf8_lossy(&line).into_owned()))
            }
            LineSource::Terminal { editor, .. } => loop {
                match editor.readline(prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            if let Err(e) = editor.add_history_entry(line.as_str()) {
                                tracing::warn!("Failed to add history entry: {}", e);
                            }
                        }
                        return Ok(Some(line));
                    }
                    // ctrl-c at the prompt just discards the line
                    Err(ReadlineError::Interrupted) => continue,
                    Err(ReadlineError::Eof) => return Ok(None),
                    // An undecodable keystroke drops the line, not the shell.
                    Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                        eprintln!("tsh: input is not valid UTF-8");
                        continue;
                    }
                    Err(e) => return Err(anyhow::anyhow!("Failed to read input: {}", e)),
                }
            },
        }
    }

    fn save_history(&mut self) {
        let LineSource::Terminal {
            editor,
            history_path: Some(path),
        } = self
        else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create history directory: {}", e);
            }
        }
        if let Err(e) = editor.save_history(path.as_path()) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Run the shell until end of input or `quit`.
pub fn run(config: ShellConfig) -> Result<ExitCode> {
    let shell = Shell::new(config).context("Failed to start shell")?;
    let mut input = LineSource::open()?;

    let prompt = if shell.config().emit_prompt {
        shell.config().prompt.clone()
    } else {
        String::new()
    };

    let status = loop {
        let Some(line) = input.read_line(&prompt)? else {
            break 0;
        };

        if let Flow::Exit(code) = shell.eval(&line) {
            break code;
        }
    };

    input.save_history();
    io::stdout().flush().context("Failed to flush output")?;
    Ok(ExitCode::from(u8::try_from(status).unwrap_or(1)))
}
