use console::style;
use serde::Serialize;

/// Information about a single branch
#[derive(Debug, Serialize)]
pub struct BranchInfo {
    pub name: String,
    pub is_current: bool,
    pub commit_info: Option<String>,
    pub upstream: Option<String>,
    /// Commits (ahead, behind) the upstream
    pub ahead_behind: Option<(usize, usize)>,
}

/// Display the branch listing in a formatted way
pub fn display_branches(branches: &[BranchInfo]) {
    if branches.is_empty() {
        println!("{} No branches found", style("⚠").yellow());
        return;
    }

    for branch in branches {
        display_single_branch(branch);
    }
}

/// Display information for a single branch
fn display_single_branch(branch: &BranchInfo) {
    let branch_marker = if branch.is_current {
        style("● ").green().bold()
    } else {
        style("  ").dim()
    };

    println!("{}{}", branch_marker, style(&branch.name).cyan().bold());

    if let Some(commit_info) = &branch.commit_info {
        println!("  {} {}", style("📝").blue(), style(commit_info).dim());
    }

    display_remote_tracking_info(branch.upstream.as_deref(), branch.ahead_behind);
    println!();
}

/// Display remote tracking information for a branch
fn display_remote_tracking_info(upstream: Option<&str>, ahead_behind: Option<(usize, usize)>) {
    let Some(upstream) = upstream else {
        println!(
            "  {} {}",
            style("📡").blue(),
            style("No remote tracking").yellow()
        );
        return;
    };

    let sync = match ahead_behind {
        Some((0, 0)) => style("up to date".to_string()).green(),
        Some((ahead, behind)) => style(format!("ahead {ahead}, behind {behind}")).yellow(),
        None => style("not fetched".to_string()).dim(),
    };
    println!("  {} {} ({})", style("📡").blue(), style(upstream).cyan(), sync);
}
