//! OutputParser: engine listings → structured records
//!
//! Every parser here is strict: a line that does not match the known shape of
//! its listing is a [`ParseError`], never skipped. Trailing whitespace and
//! blank lines are tolerated. The `--format` strings that produce these
//! shapes live next to their parsers so a format change stays inside this
//! module.

mod log;
mod quote;
mod refs;
mod remotes;
mod status;
mod tags;

pub use log::{parse_log, LOG_FORMAT};
pub use quote::unquote;
pub use refs::{parse_branches, parse_remote_branches, BranchListing, BRANCH_FORMAT, REMOTE_BRANCH_FORMAT};
pub use remotes::parse_remotes;
pub use status::{parse_status, StatusEntry};
pub use tags::{parse_tags, TAG_FORMAT};

use crate::git::errors::{Listing, ParseError};

/// Engine output as text; listings must be valid UTF-8.
pub fn text(bytes: &[u8], listing: Listing) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8 { listing })
}

fn unrecognized(listing: Listing, line: usize, content: &str) -> ParseError {
    ParseError::UnrecognizedLine {
        listing,
        line,
        content: content.to_string(),
    }
}

fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}
