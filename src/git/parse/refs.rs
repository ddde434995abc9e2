use std::collections::HashSet;

use super::unrecognized;
use crate::git::errors::{Listing, ParseError};
use crate::git::model::{Branch, Named};

/// `git branch --list` line: HEAD marker, full refname, upstream short name
pub const BRANCH_FORMAT: &str = "--format=%(HEAD)%09%(refname)%09%(upstream:short)";

/// `git for-each-ref refs/remotes/<remote>` line: full refname, symref target
pub const REMOTE_BRANCH_FORMAT: &str = "--format=%(refname)%09%(symref)";

/// Parsed local branch listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchListing {
    pub branches: Vec<Branch>,
}

impl BranchListing {
    pub fn find(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name() == name)
    }
}

/// Parse the local branch listing.
///
/// A non-empty listing must mark exactly one line as active; anything else
/// means the engine output is inconsistent.
pub fn parse_branches(output: &str) -> Result<BranchListing, ParseError> {
    let mut listing = BranchListing::default();
    let mut marked = 0;
    let mut detached = false;
    let mut seen = HashSet::new();

    for (idx, raw) in output.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if !(2..=3).contains(&fields.len()) {
            return Err(unrecognized(Listing::Branches, idx + 1, raw));
        }

        let active = match fields[0] {
            "*" => true,
            " " => false,
            _ => return Err(unrecognized(Listing::Branches, idx + 1, raw)),
        };
        if active {
            marked += 1;
        }

        let refname = fields[1];
        if refname.starts_with('(') {
            // "(HEAD detached at 1a2b3c)" and friends only appear for HEAD.
            if !active {
                return Err(unrecognized(Listing::Branches, idx + 1, raw));
            }
            detached = true;
            continue;
        }

        let name = match refname.strip_prefix("refs/heads/") {
            Some(name) if !name.is_empty() => name,
            _ => return Err(unrecognized(Listing::Branches, idx + 1, raw)),
        };
        if !seen.insert(name.to_string()) {
            return Err(ParseError::MalformedRecord {
                listing: Listing::Branches,
                reason: format!("branch '{name}' listed twice"),
            });
        }

        let upstream = fields
            .get(2)
            .filter(|u| !u.is_empty())
            .map(|u| u.to_string());
        listing.branches.push(Branch::local(name, upstream));
    }

    let entries = listing.branches.len() + usize::from(detached);
    if entries > 0 && marked != 1 {
        return Err(ParseError::ActiveCount {
            listing: Listing::Branches,
            count: marked,
        });
    }

    Ok(listing)
}

/// Parse remote-tracking refs of `remote`, skipping symbolic refs such as
/// `origin/HEAD`.
pub fn parse_remote_branches(output: &str, remote: &str) -> Result<Vec<Branch>, ParseError> {
    let prefix = format!("refs/remotes/{remote}/");
    let mut branches = Vec::new();

    for (idx, raw) in output.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let refname = fields.next().unwrap_or("");
        let symref = fields.next().unwrap_or("");
        if fields.next().is_some() || refname.len() <= prefix.len() || !refname.starts_with(&prefix) {
            return Err(unrecognized(Listing::RemoteBranches, idx + 1, raw));
        }
        if !symref.is_empty() {
            continue;
        }
        let short = &refname["refs/remotes/".len()..];
        branches.push(Branch::remote_tracking(remote, short));
    }

    Ok(branches)
}
