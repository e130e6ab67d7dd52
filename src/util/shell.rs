//! POSIX shell quoting for emitted command strings.

use std::path::Path;

/// Wrap `s` in double quotes, escaping the characters the shell still
/// interprets inside them (`\`, `"`, `$`, `` ` ``).
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Quote a path for the shell.
pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}
