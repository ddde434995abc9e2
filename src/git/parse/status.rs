use super::{quote, unrecognized};
use crate::git::errors::{Listing, ParseError};
use crate::git::model::ChangeKind;

/// One line of `git status --porcelain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    /// Source path of a rename or copy
    pub original_path: Option<String>,
    pub kind: ChangeKind,
    /// Index (staged) status code
    pub index: char,
    /// Working-tree status code
    pub worktree: char,
}

const CODES: &[u8] = b" MTADRCU";

/// Parse `git status --porcelain` (v1) output, preserving report order.
pub fn parse_status(output: &str) -> Result<Vec<StatusEntry>, ParseError> {
    let mut entries = Vec::new();

    for (idx, raw) in output.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        let entry = parse_line(line).ok_or_else(|| unrecognized(Listing::Status, idx + 1, raw))?;
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_line(line: &str) -> Option<StatusEntry> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 || bytes[2] != b' ' {
        return None;
    }
    let (x, y) = (bytes[0], bytes[1]);
    let rest = &line[3..];

    let kind = if x == b'?' && y == b'?' {
        ChangeKind::Untracked
    } else {
        if !CODES.contains(&x) || !CODES.contains(&y) || (x == b' ' && y == b' ') {
            return None;
        }
        classify(x, y)
    };

    let (path, original_path) = if matches!(x, b'R' | b'C') || matches!(y, b'R' | b'C') {
        let (from, to) = split_rename(rest)?;
        (to, Some(from))
    } else {
        (quote::unquote(rest)?, None)
    };

    Some(StatusEntry {
        path,
        original_path,
        kind,
        index: x as char,
        worktree: y as char,
    })
}

fn classify(x: u8, y: u8) -> ChangeKind {
    let either = |code: u8| x == code || y == code;
    if either(b'D') {
        ChangeKind::Deleted
    } else if either(b'R') {
        ChangeKind::Renamed
    } else if either(b'A') || either(b'C') {
        ChangeKind::Added
    } else {
        ChangeKind::Modified
    }
}

/// `ORIG -> PATH`, either side possibly quoted
fn split_rename(rest: &str) -> Option<(String, String)> {
    const ARROW: &str = " -> ";
    if rest.starts_with('"') {
        let (from, after) = quote::split_quoted(rest)?;
        let to = after.strip_prefix(ARROW)?;
        Some((from, quote::unquote(to)?))
    } else {
        let (from, to) = rest.split_once(ARROW)?;
        Some((from.to_string(), quote::unquote(to)?))
    }
}
