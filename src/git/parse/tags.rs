use super::{is_hex, unrecognized};
use crate::git::errors::{Listing, ParseError};
use crate::git::model::Tag;

/// `git for-each-ref refs/tags` record: refname, object type and name, peeled
/// type and name (annotated tags only), full message and its signature.
///
/// Records open with NUL and every field is NUL-terminated, so multi-line
/// messages survive.
pub const TAG_FORMAT: &str = "--format=%00%(refname)%00%(objecttype)%00%(objectname)%00%(*objecttype)%00%(*objectname)%00%(contents)%00%(contents:signature)%00";

const SEPARATOR: char = '\0';
const FIELD_COUNT: usize = 7;

pub fn parse_tags(output: &str) -> Result<Vec<Tag>, ParseError> {
    let mut tokens = output.split(SEPARATOR);
    let preamble = tokens.next().unwrap_or("");
    if !preamble.trim().is_empty() {
        return Err(unrecognized(Listing::Tags, 1, preamble.trim()));
    }

    let tokens: Vec<&str> = tokens.collect();
    if tokens.len() % (FIELD_COUNT + 1) != 0 {
        return Err(ParseError::MalformedRecord {
            listing: Listing::Tags,
            reason: format!(
                "{} fields do not split into records of {FIELD_COUNT} fields",
                tokens.len()
            ),
        });
    }

    let mut tags = Vec::with_capacity(tokens.len() / (FIELD_COUNT + 1));
    for (idx, record) in tokens.chunks(FIELD_COUNT + 1).enumerate() {
        let (fields, rest) = record.split_at(FIELD_COUNT);
        let parsed = if rest[0].trim().is_empty() { parse_record(fields) } else { None };
        let tag = parsed.ok_or_else(|| unrecognized(Listing::Tags, idx + 1, &record.join("\t")))?;
        tags.push(tag);
    }

    Ok(tags)
}

fn parse_record(fields: &[&str]) -> Option<Tag> {
    let name = fields[0].strip_prefix("refs/tags/").filter(|n| !n.is_empty())?;
    let object_type = fields[1];
    let object = fields[2];
    let peeled_type = fields[3];
    let peeled = fields[4];

    if !is_hex(object) || !(peeled.is_empty() || is_hex(peeled)) {
        return None;
    }

    let tag = match object_type {
        "tag" => {
            let contents = fields[5];
            let message = contents.strip_suffix(fields[6]).unwrap_or(contents).trim_end();
            let commit = (peeled_type == "commit").then(|| peeled.to_string());
            Tag::listed(
                name.to_string(),
                Some(message.to_string()),
                object.to_string(),
                commit,
            )
        }
        "commit" => Tag::listed(name.to_string(), None, object.to_string(), Some(object.to_string())),
        "tree" | "blob" => Tag::listed(name.to_string(), None, object.to_string(), None),
        _ => return None,
    };

    Some(tag)
}
