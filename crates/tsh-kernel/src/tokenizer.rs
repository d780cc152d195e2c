//! Line tokenizer: raw input line → argument vector + background flag.
//!
//! Arguments are whitespace-separated. An argument that begins with `'` runs
//! to the next `'` and may contain whitespace; the quotes are dropped. If the
//! last argument begins with `&`, it is removed and the line runs in the
//! background.

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Program name followed by its arguments. Empty only for a bare `&`.
    pub argv: Vec<String>,
    /// True if the line ended in `&`.
    pub background: bool,
}

impl ParsedLine {
    /// The command name, if any.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

/// Split `line` into arguments.
///
/// Returns `None` for a blank line, which must not be evaluated.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let mut argv = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('\'') {
            // An unterminated quote swallows the remainder of the line.
            let Some(end) = quoted.find('\'') else {
                break;
            };
            argv.push(quoted[..end].to_string());
            rest = &quoted[end + 1..];
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            argv.push(rest[..end].to_string());
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }

    if argv.is_empty() {
        return None;
    }

    let background = argv.last().is_some_and(|arg| arg.starts_with('&'));
    if background {
        argv.pop();
    }

    Some(ParsedLine { argv, background })
}
