use super::unrecognized;
use crate::git::errors::{Listing, ParseError};
use crate::git::model::Remote;

struct Urls {
    name: String,
    fetch: Option<String>,
    push: Option<String>,
}

/// Parse `git remote -v`: `name\turl (fetch)` / `name\turl (push)` pairs.
pub fn parse_remotes(output: &str) -> Result<Vec<Remote>, ParseError> {
    let mut remotes: Vec<Urls> = Vec::new();

    for (idx, raw) in output.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        let (name, url, direction) =
            split_line(line).ok_or_else(|| unrecognized(Listing::Remotes, idx + 1, raw))?;

        let pos = match remotes.iter().position(|r| r.name == name) {
            Some(pos) => pos,
            None => {
                remotes.push(Urls {
                    name: name.to_string(),
                    fetch: None,
                    push: None,
                });
                remotes.len() - 1
            }
        };
        let entry = &mut remotes[pos];
        match direction {
            "(fetch)" => entry.fetch = Some(url.to_string()),
            _ => entry.push = Some(url.to_string()),
        }
    }

    Ok(remotes
        .into_iter()
        .map(|r| {
            let url = r.fetch.clone().or_else(|| r.push.clone()).unwrap_or_default();
            let push = r.push.filter(|p| *p != url);
            Remote::new(r.name, url, push)
        })
        .collect())
}

fn split_line(line: &str) -> Option<(&str, &str, &str)> {
    let (name, rest) = line.split_once('\t')?;
    let (url, direction) = rest.rsplit_once(' ')?;
    if name.is_empty() || url.is_empty() || !matches!(direction, "(fetch)" | "(push)") {
        return None;
    }
    Some((name, url, direction))
}
