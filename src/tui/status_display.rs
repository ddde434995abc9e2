use console::{style, StyledObject};
use gitmodel::git::{ChangeKind, ChangeSet};

pub fn display_status(branch: Option<&str>, changes: &ChangeSet) {
    match branch {
        Some(name) => println!("On branch {}", style(name).cyan().bold()),
        None => println!("{}", style("HEAD detached").yellow().bold()),
    }

    if changes.is_empty() {
        println!("{} Working tree clean", style("✓").green().bold());
        return;
    }
    println!();
    display_changes(changes);
}

/// One line per path, labelled with its change kind
pub fn display_changes(changes: &ChangeSet) {
    for (path, kind) in changes {
        println!("  {:>10}  {}", label(*kind), path);
    }
}

fn label(kind: ChangeKind) -> StyledObject<&'static str> {
    let text = kind.as_str();
    match kind {
        ChangeKind::Added => style(text).green(),
        ChangeKind::Modified | ChangeKind::Renamed => style(text).yellow(),
        ChangeKind::Deleted => style(text).red(),
        ChangeKind::Untracked => style(text).dim(),
    }
}
