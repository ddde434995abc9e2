use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::git::{
    errors::{is_nothing_to_commit, CommitError, Listing, Operation, PathError, Result, StagingError},
    model::{to_change_set, ChangeKind, ChangeSet, Commit},
    parse::{self, parse_log, parse_status, StatusEntry, LOG_FORMAT},
    repository::core::{args, GitRepo},
};

impl GitRepo {
    /// Stage files or directories for the next commit.
    ///
    /// Paths are relative to the repository root or absolute inside it. A path
    /// missing from disk is accepted only when its deletion is pending, so that
    /// removals can be staged too.
    pub fn add<P: AsRef<Path>>(&self, paths: &[P]) -> Result<&Self> {
        let root = self.require_work_tree()?;
        if paths.is_empty() {
            return Ok(self);
        }
        let mut rel = self.relative_paths(paths)?;

        let missing: Vec<PathBuf> = rel
            .iter()
            .filter(|p| fs::symlink_metadata(root.join(p)).is_err())
            .cloned()
            .collect();
        if !missing.is_empty() {
            let entries = self.status_entries()?;
            let status = to_change_set(entries.iter().map(|e| (e.path.as_str(), e.kind)));
            for path in &missing {
                let key = slash_path(path);
                if !is_pending_deletion(&status, &key) {
                    return Err(StagingError::PathNotFound { path: key }.into());
                }
            }

            // The engine rejects paths that are gone from both disk and index.
            rel.retain(|p| !(missing.contains(p) && is_staged_deletion(&entries, &slash_path(p))));
            if rel.is_empty() {
                tracing::debug!("deletions already staged");
                return Ok(self);
            }
        }

        let mut argv = args(["add", "--"]);
        argv.extend(rel.iter().map(|p| p.as_os_str().to_os_string()));
        self.git_ok(Operation::Stage, &argv)?;
        tracing::debug!(count = rel.len(), "staged paths");

        Ok(self)
    }

    /// Stage the removal of files or directories and delete them from disk.
    ///
    /// Paths already deleted from disk are fine as long as the engine still
    /// tracks them.
    pub fn rm<P: AsRef<Path>>(&self, paths: &[P]) -> Result<&Self> {
        let root = self.require_work_tree()?;
        if paths.is_empty() {
            return Ok(self);
        }
        let rel = self.relative_paths(paths)?;

        let mut argv = args(["rm", "-r", "-f", "--quiet", "--"]);
        argv.extend(rel.iter().map(|p| p.as_os_str().to_os_string()));
        self.git_ok(Operation::Remove, &argv)?;

        // Untracked leftovers keep a removed directory alive on disk.
        for path in &rel {
            let full = root.join(path);
            let removed = match fs::symlink_metadata(&full) {
                Ok(meta) if meta.is_dir() => fs::remove_dir_all(&full),
                Ok(_) => fs::remove_file(&full),
                Err(_) => continue,
            };
            removed.map_err(|source| PathError::Io { path: full, source })?;
        }
        tracing::debug!(count = rel.len(), "removed paths");

        Ok(self)
    }

    /// Working-tree changes relative to HEAD, including untracked files.
    ///
    /// Never cached: the working tree changes behind our back.
    pub fn status(&self) -> Result<ChangeSet> {
        let entries = self.status_entries()?;
        Ok(to_change_set(entries.iter().map(|e| (e.path.as_str(), e.kind))))
    }

    /// Status entries with their raw index and worktree codes
    pub fn status_entries(&self) -> Result<Vec<StatusEntry>> {
        self.require_work_tree()?;
        let output = self.git_ok(
            Operation::Query,
            &args([
                "-c",
                "core.quotepath=false",
                "status",
                "--porcelain",
                "--untracked-files=all",
            ]),
        )?;
        Ok(parse_status(parse::text(&output.stdout, Listing::Status)?)?)
    }

    /// Whether any tracked file differs from HEAD; untracked files don't count
    pub fn is_dirty(&self) -> Result<bool> {
        Ok(self.status()?.values().any(|kind| *kind != ChangeKind::Untracked))
    }

    /// Check if there are any staged changes in the index
    pub fn has_staged_changes(&self) -> Result<bool> {
        self.require_work_tree()?;
        let argv = args(["diff", "--cached", "--quiet"]);
        let output = self.git(&argv)?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(self.fail(Operation::Query, &argv, &output)),
        }
    }

    /// Commit the index, first staging modifications of tracked files when
    /// `commit_all` is set.
    ///
    /// Returns the files the new commit touched, or `None` when there was
    /// nothing to commit.
    pub fn commit(&self, message: &str, commit_all: bool) -> Result<Option<ChangeSet>> {
        self.require_work_tree()?;
        if commit_all {
            self.git_ok(Operation::Stage, &args(["add", "--update"]))?;
        }
        if !self.has_staged_changes()? {
            tracing::debug!("nothing to commit");
            return Ok(None);
        }

        let argv = args(["commit", "--quiet", "-m", message]);
        let output = self.git(&argv)?;
        if !output.success() {
            if is_nothing_to_commit(&output) {
                return Ok(None);
            }
            return Err(self.fail(Operation::Commit, &argv, &output));
        }

        let commit = self.last_commit()?;
        self.invalidate_after_commit()?;
        tracing::info!(hash = commit.short_hash(), files = commit.changes().len(), "created commit");

        Ok(Some(commit.files()))
    }

    /// The commit HEAD points to
    pub fn last_commit(&self) -> Result<Commit> {
        self.find_commit("HEAD")
    }

    /// Look up a single commit by hash or any revision the engine understands
    pub fn find_commit(&self, rev: &str) -> Result<Commit> {
        self.require_repo()?;
        let not_found = || CommitError::NotFound { rev: rev.to_string() };
        let load = || -> Result<Commit> {
            let hash = self.resolve_commit(rev)?.ok_or_else(not_found)?;
            let commit = self.log(&hash, Some(1))?.into_iter().next();
            Ok(commit.ok_or_else(not_found)?)
        };

        // Only full hashes are stable keys; names move.
        if is_full_hash(rev) {
            Ok((*self.cache.commits_by_hash.get_or_load(rev, load)?).clone())
        } else {
            load()
        }
    }

    /// Newest-first history reachable from `refname`, cached until a commit
    /// on that ref or a fetch/push that moves it.
    ///
    /// The unborn branch HEAD points to has an empty history; any other ref
    /// that resolves to nothing is `CommitError::NotFound`.
    pub(crate) fn commits_for(&self, refname: &str) -> Result<Rc<Vec<Commit>>> {
        self.require_repo()?;
        self.cache.commits.get_or_load(refname, || {
            tracing::debug!(refname, "loading history");
            match self.resolve_commit(refname)? {
                Some(hash) => self.log(&hash, None),
                None if self.head_refname()?.as_deref() == Some(refname) => {
                    tracing::debug!(refname, "unborn branch");
                    Ok(Vec::new())
                }
                None => Err(CommitError::NotFound {
                    rev: refname.to_string(),
                }
                .into()),
            }
        })
    }

    /// Full hash of the commit `rev` names, `None` when it names nothing
    fn resolve_commit(&self, rev: &str) -> Result<Option<String>> {
        let spec = format!("{rev}^{{commit}}");
        let argv = args(["rev-parse", "--verify", "--quiet", spec.as_str()]);
        let output = self.git(&argv)?;
        match output.code {
            Some(0) => {
                let hash = parse::text(&output.stdout, Listing::Scalar)?.trim();
                Ok(Some(hash.to_string()))
            }
            Some(1) => Ok(None),
            _ => Err(self.fail(Operation::Query, &argv, &output)),
        }
    }

    /// History from an already resolved commit
    fn log(&self, hash: &str, limit: Option<usize>) -> Result<Vec<Commit>> {
        let mut argv = args([
            "-c",
            "core.quotepath=false",
            "-c",
            "log.showSignature=false",
            "log",
            "--no-color",
            "--no-renames",
            "--name-status",
            LOG_FORMAT,
        ]);
        if let Some(limit) = limit {
            argv.push(format!("--max-count={limit}").into());
        }
        argv.push(hash.into());
        argv.push("--".into());

        let output = self.git_ok(Operation::Query, &argv)?;
        Ok(parse_log(parse::text(&output.stdout, Listing::Log)?)?)
    }

    /// Drop what a new commit on the active branch made stale.
    fn invalidate_after_commit(&self) -> Result<()> {
        let Some(refname) = self.head_refname()? else {
            return Ok(());
        };
        self.cache.commits.invalidate(&refname);
        self.cache.branch_tags.invalidate(&refname);

        // The first commit on an unborn branch makes it appear in the listing.
        let listed = self.cache.branches.peek().map(|listing| {
            listing.branches.iter().any(|b| b.refname() == refname)
        });
        if listed == Some(false) {
            self.cache.branches.invalidate();
        }
        Ok(())
    }

    fn relative_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<PathBuf>> {
        paths
            .iter()
            .map(|p| self.relative_to_root(p.as_ref()))
            .collect()
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A deleted file, or a directory whose tracked files were all deleted
fn is_pending_deletion(status: &ChangeSet, path: &str) -> bool {
    if status.get(path) == Some(&ChangeKind::Deleted) {
        return true;
    }
    let prefix = format!("{path}/");
    let mut under = status
        .range(prefix.clone()..)
        .take_while(|(p, _)| p.starts_with(&prefix))
        .peekable();
    under.peek().is_some() && under.all(|(_, kind)| *kind == ChangeKind::Deleted)
}

/// A deletion already in the index, for a file or every file under a directory
fn is_staged_deletion(entries: &[StatusEntry], path: &str) -> bool {
    let prefix = format!("{path}/");
    let mut under = entries
        .iter()
        .filter(|e| e.path == path || e.path.starts_with(&prefix))
        .peekable();
    under.peek().is_some() && under.all(|e| e.index == 'D')
}

fn is_full_hash(rev: &str) -> bool {
    matches!(rev.len(), 40 | 64) && rev.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::git::{
        errors::{CommitError, GitError, StagingError},
        model::{ChangeKind, ChangeSet, HasCommits},
    };
    use crate::test_utils::{create_test_repo, RepoAssertions, RepoTestOperations, ScriptedRunner};
    use crate::git::GitRepo;

    fn changes(entries: &[(&str, ChangeKind)]) -> ChangeSet {
        entries.iter().map(|(p, k)| (p.to_string(), *k)).collect()
    }

    #[test]
    fn add_works() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file("test.txt", "Hello, world!").unwrap();

        repo.add(&["test.txt"]).unwrap();

        assert_eq!(
            repo.status().unwrap(),
            changes(&[("test.txt", ChangeKind::Added)])
        );
        let index = git2::Repository::open(repo.path()).unwrap().index().unwrap();
        assert!(index.get_path(std::path::Path::new("test.txt"), 0).is_some());
    }

    #[test]
    fn add_accepts_absolute_paths_and_directories() {
        let (temp_dir, repo) = create_test_repo();
        repo.add_file("dir/a.txt", "a").unwrap();
        repo.add_file("dir/b.txt", "b").unwrap();

        repo.add(&[temp_dir.path().join("dir")]).unwrap();

        assert_eq!(
            repo.status().unwrap(),
            changes(&[("dir/a.txt", ChangeKind::Added), ("dir/b.txt", ChangeKind::Added)])
        );
    }

    #[test]
    fn add_missing_path_fails() {
        let (_temp_dir, repo) = create_test_repo();

        let result = repo.add(&["missing.txt"]);

        match result {
            Err(GitError::Staging(StagingError::PathNotFound { path })) => {
                assert_eq!(path, "missing.txt")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn add_stages_deletions() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("gone.txt", "bye", "Initial commit").unwrap();
        std::fs::remove_file(repo.path().join("gone.txt")).unwrap();

        repo.add(&["gone.txt"]).unwrap();

        assert_eq!(repo.status().unwrap(), changes(&[("gone.txt", ChangeKind::Deleted)]));
        assert!(repo.has_staged_changes().unwrap());
    }

    #[test]
    fn add_after_rm_keeps_the_staged_deletion() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file("gone.txt", "bye").unwrap();
        repo.add_file("dir/a.txt", "a").unwrap();
        repo.add_file("keep.txt", "keep").unwrap();
        repo.add(&["gone.txt", "dir", "keep.txt"]).unwrap();
        repo.commit("Initial commit", false).unwrap();

        repo.rm(&["gone.txt", "dir"]).unwrap();
        repo.append_to_file("keep.txt", "more").unwrap();
        repo.add(&["gone.txt", "dir", "keep.txt"]).unwrap();

        assert_eq!(
            repo.status().unwrap(),
            changes(&[
                ("dir/a.txt", ChangeKind::Deleted),
                ("gone.txt", ChangeKind::Deleted),
                ("keep.txt", ChangeKind::Modified),
            ])
        );
        let files = repo.commit("Remove files", false).unwrap();
        assert_eq!(
            files,
            Some(changes(&[
                ("dir/a.txt", ChangeKind::Deleted),
                ("gone.txt", ChangeKind::Deleted),
                ("keep.txt", ChangeKind::Modified),
            ]))
        );
    }

    #[test]
    fn add_outside_repository_fails() {
        let (_temp_dir, repo) = create_test_repo();
        let elsewhere = assert_fs::TempDir::new().unwrap();

        assert!(matches!(
            repo.add(&[elsewhere.path()]),
            Err(GitError::Staging(StagingError::OutsideRepository { .. }))
        ));
    }

    #[test]
    fn add_nothing_is_a_no_op() {
        let (_temp_dir, repo) = create_test_repo();
        let none: [&str; 0] = [];
        repo.add(&none).unwrap();
        assert!(repo.status().unwrap().is_empty());
    }

    #[test]
    fn rm_works() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file("keep.txt", "keep").unwrap();
        repo.add_file("dir/a.txt", "a").unwrap();
        repo.add(&["keep.txt", "dir"]).unwrap();
        repo.commit("Initial commit", false).unwrap();
        repo.add_file("dir/untracked.txt", "u").unwrap();

        repo.rm(&["dir"]).unwrap();

        repo.assert_file_not_exists("dir").assert_file_exists("keep.txt");
        assert_eq!(repo.status().unwrap(), changes(&[("dir/a.txt", ChangeKind::Deleted)]));
    }

    #[test]
    fn rm_accepts_paths_already_deleted_from_disk() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "Initial commit").unwrap();
        std::fs::remove_file(repo.path().join("a.txt")).unwrap();

        repo.rm(&["a.txt"]).unwrap();

        assert_eq!(repo.status().unwrap(), changes(&[("a.txt", ChangeKind::Deleted)]));
    }

    #[test]
    fn status_reports_each_kind() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file("modified.txt", "one").unwrap();
        repo.add_file("deleted.txt", "two").unwrap();
        repo.add(&["modified.txt", "deleted.txt"]).unwrap();
        repo.commit("Initial commit", false).unwrap();

        repo.append_to_file("modified.txt", "more").unwrap();
        std::fs::remove_file(repo.path().join("deleted.txt")).unwrap();
        repo.add_file("added.txt", "new").unwrap();
        repo.add(&["added.txt"]).unwrap();
        repo.add_file("untracked file.txt", "?").unwrap();

        assert_eq!(
            repo.status().unwrap(),
            changes(&[
                ("added.txt", ChangeKind::Added),
                ("deleted.txt", ChangeKind::Deleted),
                ("modified.txt", ChangeKind::Modified),
                ("untracked file.txt", ChangeKind::Untracked),
            ])
        );
        assert!(repo.is_dirty().unwrap());
    }

    #[test]
    fn commit_works() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file("test.txt", "Hello, world!").unwrap();
        repo.add(&["test.txt"]).unwrap();

        let files = repo.commit("Initial commit", false).unwrap();

        assert_eq!(files, Some(changes(&[("test.txt", ChangeKind::Added)])));
        assert!(repo.status().unwrap().is_empty());

        let git2_repo = git2::Repository::open(repo.path()).unwrap();
        let head = git2_repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.id().to_string(), repo.last_commit().unwrap().hash());
        assert_eq!(head.message(), Some("Initial commit\n"));
    }

    #[test]
    fn commit_with_nothing_staged_returns_none() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "Initial commit").unwrap();
        repo.add_file("untracked.txt", "u").unwrap();

        assert_eq!(repo.commit("Nothing", false).unwrap(), None);
        assert_eq!(repo.commit("Nothing", true).unwrap(), None);
        repo.assert_commit_messages(&["Initial commit"]);
    }

    #[test]
    fn commit_all_stages_tracked_modifications() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "Initial commit").unwrap();
        repo.add_file_and_commit("b.txt", "b", "Second commit").unwrap();
        repo.append_to_file("a.txt", "more").unwrap();
        std::fs::remove_file(repo.path().join("b.txt")).unwrap();

        let files = repo.commit("Update", true).unwrap();

        assert_eq!(
            files,
            Some(changes(&[("a.txt", ChangeKind::Modified), ("b.txt", ChangeKind::Deleted)]))
        );
    }

    #[test]
    fn commit_refreshes_cached_history() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "First").unwrap();
        let branch = repo.active_branch().unwrap();
        assert_eq!(branch.commits(&repo).unwrap().len(), 1);

        repo.add_file_and_commit("b.txt", "b", "Second").unwrap();

        let commits = branch.commits(&repo).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject(), "Second");
        assert_eq!(commits[0].parent(), Some(commits[1].hash()));
    }

    #[test]
    fn first_commit_makes_branch_listed() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.branches().unwrap().is_empty());

        repo.add_file_and_commit("a.txt", "a", "First").unwrap();

        assert_eq!(repo.branch_names().unwrap(), vec!["master".to_string()]);
    }

    #[test]
    fn unborn_branch_has_empty_history() {
        let (_temp_dir, repo) = create_test_repo();
        let branch = repo.active_branch().unwrap();

        assert!(branch.commits(&repo).unwrap().is_empty());
        assert_eq!(branch.tip(&repo).unwrap(), None);
    }

    #[test]
    fn unborn_history_is_decided_by_exit_code() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .ok(&["rev-parse"], "false\n\n")
            .fail(&["rev-parse", "--verify"], 1, "")
            .ok(&["symbolic-ref"], "refs/heads/master\n")
            .ok(&["branch", "--list"], "");
        let calls = runner.calls();
        let mut repo = GitRepo::with_runner(Box::new(runner));
        repo.set_path(temp_dir.path(), false, false).unwrap();

        let branch = repo.active_branch().unwrap();

        assert!(branch.commits(&repo).unwrap().is_empty());
        assert!(matches!(
            repo.last_commit(),
            Err(GitError::Commit(CommitError::NotFound { .. }))
        ));
        assert_eq!(calls.count(&["log"]), 0);
    }

    #[test]
    fn history_of_deleted_branch_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "First").unwrap();
        repo.checkout("feature", true).unwrap();
        repo.checkout("master", false).unwrap();
        let feature = repo.find_branch("feature").unwrap().unwrap();

        repo.delete_branch("feature", true).unwrap();

        assert!(matches!(
            feature.commits(&repo),
            Err(GitError::Commit(CommitError::NotFound { .. }))
        ));
    }

    #[test]
    fn commit_records_changes_and_identity() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "First").unwrap();
        repo.append_to_file("a.txt", "b").unwrap();
        repo.add_file("c.txt", "c").unwrap();
        repo.add(&["a.txt", "c.txt"]).unwrap();
        repo.commit("Second\n\nWith a body", false).unwrap();

        let commit = repo.last_commit().unwrap();
        assert_eq!(commit.subject(), "Second");
        assert_eq!(commit.message(), "Second\n\nWith a body");
        assert_eq!(commit.author().name, "Test User");
        assert_eq!(commit.author().email, "test@example.com");
        assert_eq!(
            commit.files(),
            changes(&[("a.txt", ChangeKind::Modified), ("c.txt", ChangeKind::Added)])
        );
    }

    #[test]
    fn find_commit_by_hash_and_missing_revision() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "First").unwrap();
        let hash = repo.last_commit().unwrap().hash().to_string();

        assert_eq!(repo.find_commit(&hash).unwrap().subject(), "First");
        assert!(matches!(
            repo.find_commit("no-such-revision"),
            Err(GitError::Commit(CommitError::NotFound { .. }))
        ));
    }

    #[test]
    fn history_is_loaded_once() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .ok(&["rev-parse"], "false\n\n")
            .ok(&["rev-parse", "--verify"], "c0ffee0000000000000000000000000000000000\n")
            .ok(&["log"], "")
            .ok(&["symbolic-ref"], "refs/heads/master\n")
            .ok(&["branch", "--list"], "");
        let calls = runner.calls();
        let mut repo = GitRepo::with_runner(Box::new(runner));
        repo.set_path(temp_dir.path(), false, false).unwrap();

        let branch = repo.active_branch().unwrap();
        branch.commits(&repo).unwrap();
        branch.commits(&repo).unwrap();

        assert_eq!(calls.count(&["log"]), 1);
    }

    #[test]
    fn malformed_log_is_a_parse_error() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .ok(&["rev-parse"], "false\n\n")
            .ok(&["rev-parse", "--verify"], "c0ffee0000000000000000000000000000000000\n")
            .ok(&["log"], "garbage\n");
        let mut repo = GitRepo::with_runner(Box::new(runner));
        repo.set_path(temp_dir.path(), false, false).unwrap();

        assert!(matches!(repo.last_commit(), Err(GitError::Parse(_))));
    }

    #[test]
    fn is_pending_deletion_covers_directories() {
        let status = changes(&[
            ("dir/a.txt", ChangeKind::Deleted),
            ("dir/b.txt", ChangeKind::Deleted),
            ("mixed/a.txt", ChangeKind::Deleted),
            ("mixed/b.txt", ChangeKind::Modified),
        ]);

        assert!(super::is_pending_deletion(&status, "dir"));
        assert!(super::is_pending_deletion(&status, "dir/a.txt"));
        assert!(!super::is_pending_deletion(&status, "mixed"));
        assert!(!super::is_pending_deletion(&status, "other"));
    }
}
