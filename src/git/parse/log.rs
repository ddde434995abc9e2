use chrono::{DateTime, Utc};

use super::{is_hex, quote, unrecognized};
use crate::git::errors::{Listing, ParseError};
use crate::git::model::{ChangeKind, Commit, FileChange, Person};

/// Record layout for `git log --name-status`.
///
/// Each record opens with NUL and every header field is NUL-terminated, so a
/// record is exactly `FIELD_COUNT` header fields followed by its name-status
/// block. NUL cannot occur in a commit message, an ident or a path.
pub const LOG_FORMAT: &str =
    "--format=%x00%H%x00%P%x00%an%x00%ae%x00%at%x00%cn%x00%ce%x00%ct%x00%B%x00";

const SEPARATOR: char = '\0';
const FIELD_COUNT: usize = 9;

/// Parse log output into commits, keeping the engine's (newest-first) order.
pub fn parse_log(output: &str) -> Result<Vec<Commit>, ParseError> {
    let mut tokens = output.split(SEPARATOR);

    // Anything before the first record must be blank.
    let preamble = tokens.next().unwrap_or("");
    if !preamble.trim().is_empty() {
        return Err(unrecognized(Listing::Log, 1, preamble.trim()));
    }
    let mut line_no = 1 + preamble.matches('\n').count();

    let tokens: Vec<&str> = tokens.collect();
    if tokens.len() % (FIELD_COUNT + 1) != 0 {
        return Err(malformed(format!(
            "{} fields do not split into records of {FIELD_COUNT} header fields",
            tokens.len()
        )));
    }

    let mut commits = Vec::with_capacity(tokens.len() / (FIELD_COUNT + 1));
    for record in tokens.chunks(FIELD_COUNT + 1) {
        let (header, files) = record.split_at(FIELD_COUNT);
        commits.push(parse_record(header, files[0], line_no)?);
        line_no += record.iter().map(|t| t.matches('\n').count()).sum::<usize>();
    }

    Ok(commits)
}

fn parse_record(fields: &[&str], files: &str, first_line: usize) -> Result<Commit, ParseError> {
    let hash = fields[0];
    if !is_hex(hash) {
        return Err(malformed(format!("invalid commit hash {hash:?}")));
    }
    let parents: Vec<String> = fields[1].split_whitespace().map(str::to_string).collect();
    if let Some(bad) = parents.iter().find(|p| !is_hex(p)) {
        return Err(malformed(format!("invalid parent hash {bad:?}")));
    }

    let author = person(fields[2], fields[3], fields[4])?;
    let committer = person(fields[5], fields[6], fields[7])?;
    let message = fields[8].trim_end().to_string();

    let header_lines: usize = fields.iter().map(|f| f.matches('\n').count()).sum();
    let mut changes = Vec::new();
    for (idx, raw) in files.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        let change = parse_name_status(line)
            .ok_or_else(|| unrecognized(Listing::Log, first_line + header_lines + idx, raw))?;
        changes.push(change);
    }

    Ok(Commit::new(
        hash.to_string(),
        parents,
        author,
        committer,
        message,
        changes,
    ))
}

fn person(name: &str, email: &str, timestamp: &str) -> Result<Person, ParseError> {
    let secs: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid timestamp {timestamp:?}")))?;
    let time: DateTime<Utc> = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| malformed(format!("timestamp out of range {secs}")))?;

    Ok(Person {
        name: name.to_string(),
        email: email.to_string(),
        time,
    })
}

/// `M\tpath`, `R100\told\tnew`, `C075\tsrc\tdst`
fn parse_name_status(line: &str) -> Option<FileChange> {
    let mut parts = line.split('\t');
    let status = parts.next()?;
    let mut chars = status.chars();
    let letter = chars.next()?;
    let score = chars.as_str();

    let kind = match letter {
        'A' | 'C' => ChangeKind::Added,
        'M' | 'T' | 'U' => ChangeKind::Modified,
        'D' => ChangeKind::Deleted,
        'R' => ChangeKind::Renamed,
        _ => return None,
    };
    if !score.is_empty() && !(matches!(letter, 'R' | 'C') && score.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    let path = match letter {
        'R' | 'C' => {
            let _from = parts.next()?;
            parts.next()?
        }
        _ => parts.next()?,
    };
    if parts.next().is_some() || path.is_empty() {
        return None;
    }

    Some(FileChange {
        path: quote::unquote(path)?,
        kind,
    })
}

fn malformed(reason: impl Into<String>) -> ParseError {
    ParseError::MalformedRecord {
        listing: Listing::Log,
        reason: reason.into(),
    }
}
