use console::style;
use gitmodel::git::Commit;

pub fn display_log(commits: &[Commit]) {
    if commits.is_empty() {
        println!("{} No commits yet", style("⚠").yellow());
        return;
    }

    for commit in commits {
        println!(
            "{} {}",
            style(commit.short_hash()).yellow(),
            style(commit.subject()).bold()
        );
        println!(
            "        {} <{}>, {}",
            commit.author().name,
            commit.author().email,
            style(commit.author().time.format("%Y-%m-%d %H:%M")).dim()
        );
    }
}
