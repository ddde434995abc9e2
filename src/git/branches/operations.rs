use std::rc::Rc;

use crate::git::{
    errors::{CheckoutError, GitError, Listing, Operation, Result},
    model::{Branch, Named},
    parse::{self, parse_branches, BranchListing, BRANCH_FORMAT},
    repository::core::{args, GitRepo},
};

impl GitRepo {
    /// Local branches with their upstreams, cached until a branch is created,
    /// deleted or re-tracked
    pub fn branches(&self) -> Result<Vec<Branch>> {
        Ok(self.branch_listing()?.branches.clone())
    }

    pub fn get_all_branches(&self) -> Result<Vec<String>> {
        self.branch_names()
    }

    pub fn branch_names(&self) -> Result<Vec<String>> {
        Ok(self
            .branch_listing()?
            .branches
            .iter()
            .map(|b| b.name().to_string())
            .collect())
    }

    pub fn find_branch(&self, name: &str) -> Result<Option<Branch>> {
        Ok(self.branch_listing()?.find(name).cloned())
    }

    pub(crate) fn branch_listing(&self) -> Result<Rc<BranchListing>> {
        self.require_repo()?;
        self.cache.branches.get_or_load(|| {
            tracing::debug!("loading branch listing");
            let output = self.git_ok(
                Operation::Query,
                &args(["branch", "--list", "--no-color", BRANCH_FORMAT]),
            )?;
            Ok(parse_branches(parse::text(&output.stdout, Listing::Branches)?)?)
        })
    }

    /// The checked-out branch.
    ///
    /// HEAD is re-read on every call since it can move outside this instance;
    /// only the upstream comes from the cached listing. A branch without
    /// commits yet is returned even though it is not listed.
    pub fn active_branch(&self) -> Result<Branch> {
        let name = self.get_current_branch()?;
        let upstream = self
            .branch_listing()?
            .find(&name)
            .and_then(|b| b.upstream().map(str::to_string));
        Ok(Branch::local(name, upstream))
    }

    /// Get the current branch name
    pub fn get_current_branch(&self) -> Result<String> {
        let refname = self.head_refname()?.ok_or(GitError::DetachedHead)?;
        match refname.strip_prefix("refs/heads/") {
            Some(name) => Ok(name.to_string()),
            None => Err(GitError::DetachedHead),
        }
    }

    /// HEAD's symbolic target, e.g. `refs/heads/master`; `None` when detached
    pub fn head_refname(&self) -> Result<Option<String>> {
        self.require_repo()?;
        let argv = args(["symbolic-ref", "--quiet", "HEAD"]);
        let output = self.git(&argv)?;
        match output.code {
            Some(0) => {
                let target = parse::text(&output.stdout, Listing::Scalar)?.trim();
                Ok(Some(target.to_string()))
            }
            Some(1) => Ok(None),
            _ => Err(self.fail(Operation::Query, &argv, &output)),
        }
    }

    /// Whether a local branch exists, asking the engine rather than the cache
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        self.require_repo()?;
        let refname = format!("refs/heads/{name}");
        let argv = args(["show-ref", "--verify", "--quiet", refname.as_str()]);
        let output = self.git(&argv)?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(self.fail(Operation::Query, &argv, &output)),
        }
    }

    /// Switch to branch `name`, creating it from HEAD when it does not exist
    /// and `create_if_missing` is set.
    ///
    /// Checking out the branch that is already active does nothing.
    pub fn checkout(&self, name: &str, create_if_missing: bool) -> Result<()> {
        self.require_work_tree()?;
        let refname = format!("refs/heads/{name}");

        if self.branch_exists(name)? {
            if self.head_refname()?.as_deref() == Some(refname.as_str()) {
                tracing::debug!(branch = name, "already on branch");
                return Ok(());
            }
            self.git_ok(
                Operation::Checkout { branch: name },
                &args(["checkout", "--quiet", name, "--"]),
            )?;
            tracing::info!(branch = name, "switched branch");
            return Ok(());
        }

        // An unborn branch has no ref yet but may still be checked out.
        if self.head_refname()?.as_deref() == Some(refname.as_str()) {
            return Ok(());
        }
        if !create_if_missing {
            return Err(CheckoutError::BranchNotFound {
                name: name.to_string(),
            }
            .into());
        }

        self.create_and_checkout_branch(name)
    }

    /// Create a new branch from the current HEAD and switch to it
    pub fn create_and_checkout_branch(&self, name: &str) -> Result<()> {
        self.require_work_tree()?;
        self.git_ok(
            Operation::CreateBranch { branch: name },
            &args(["checkout", "--quiet", "-b", name]),
        )?;
        self.cache.branches.invalidate();
        tracing::info!(branch = name, "created and switched branch");
        Ok(())
    }

    /// Delete a local branch; unmerged branches need `force`
    pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        self.require_repo()?;
        let refname = format!("refs/heads/{name}");
        if self.head_refname()?.as_deref() == Some(refname.as_str()) {
            return Err(CheckoutError::DeleteActive {
                name: name.to_string(),
            }
            .into());
        }

        let flag = if force { "-D" } else { "-d" };
        self.git_ok(
            Operation::DeleteBranch { branch: name },
            &args(["branch", "--quiet", flag, name]),
        )?;

        self.cache.branches.invalidate();
        self.cache.commits.invalidate(&refname);
        self.cache.branch_tags.invalidate(&refname);
        tracing::info!(branch = name, force, "deleted branch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::git::{
        errors::{CheckoutError, GitError, ParseError},
        model::{HasCommits, Named},
        GitRepo,
    };
    use crate::test_utils::{create_test_repo, RepoAssertions, RepoTestOperations, ScriptedRunner};

    #[test]
    fn get_all_branches_works() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();

        repo.checkout("feature", true).unwrap();
        repo.checkout("master", false).unwrap();

        let mut branches = repo.get_all_branches().unwrap();
        branches.sort();
        assert_eq!(branches, vec!["feature".to_string(), "master".to_string()]);
    }

    #[test]
    fn checkout_creates_branch_at_head() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        let head = repo.last_commit().unwrap();

        repo.checkout("feature", true).unwrap();

        repo.assert_current_branch("feature");
        let feature = repo.find_branch("feature").unwrap().unwrap();
        assert_eq!(feature.tip(&repo).unwrap().unwrap().hash(), head.hash());
    }

    #[test]
    fn checkout_switches_working_tree() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        repo.checkout("feature", true).unwrap();
        repo.add_file_and_commit("feature.txt", "feature", "Feature work")
            .unwrap();

        repo.checkout("master", false).unwrap();

        repo.assert_current_branch("master")
            .assert_file_not_exists("feature.txt");
        let git2_repo = git2::Repository::open(repo.path()).unwrap();
        assert_eq!(git2_repo.head().unwrap().shorthand(), Some("master"));
    }

    #[test]
    fn checkout_missing_branch_without_create_fails() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();

        match repo.checkout("nope", false) {
            Err(GitError::Checkout(CheckoutError::BranchNotFound { name })) => {
                assert_eq!(name, "nope")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        repo.assert_current_branch("master");
    }

    #[test]
    fn checkout_active_branch_is_a_no_op() {
        let (_temp_dir, repo) = create_test_repo();
        // Unborn: master has no ref yet
        repo.checkout("master", false).unwrap();

        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        repo.checkout("master", false).unwrap();
        repo.assert_current_branch("master");
    }

    #[test]
    fn checkout_invalid_name_fails() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();

        assert!(matches!(
            repo.checkout("bad..name", true),
            Err(GitError::Checkout(CheckoutError::InvalidName { .. }))
        ));
    }

    #[test]
    fn checkout_with_conflicting_changes_fails() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("shared.txt", "base", "Initial commit")
            .unwrap();
        repo.checkout("feature", true).unwrap();
        repo.append_to_file_and_commit("shared.txt", "feature", "Feature edit")
            .unwrap();
        repo.checkout("master", false).unwrap();
        repo.append_to_file("shared.txt", "local edit").unwrap();

        assert!(matches!(
            repo.checkout("feature", false),
            Err(GitError::Checkout(CheckoutError::Conflict { .. }))
        ));
        repo.assert_current_branch("master");
    }

    #[test]
    fn active_branch_is_requeried() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        assert_eq!(repo.active_branch().unwrap().name(), "master");

        // Move HEAD behind the instance's back
        let git2_repo = git2::Repository::open(repo.path()).unwrap();
        let head = git2_repo.head().unwrap().peel_to_commit().unwrap();
        git2_repo.branch("other", &head, false).unwrap();
        git2_repo.set_head("refs/heads/other").unwrap();

        assert_eq!(repo.active_branch().unwrap().name(), "other");
    }

    #[test]
    fn detached_head_has_no_active_branch() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        let git2_repo = git2::Repository::open(repo.path()).unwrap();
        let head = git2_repo.head().unwrap().target().unwrap();
        git2_repo.set_head_detached(head).unwrap();

        assert!(matches!(repo.active_branch(), Err(GitError::DetachedHead)));
        assert_eq!(repo.head_refname().unwrap(), None);
    }

    #[test]
    fn delete_branch_works() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        repo.checkout("feature", true).unwrap();
        repo.checkout("master", false).unwrap();
        assert!(repo.find_branch("feature").unwrap().is_some());

        repo.delete_branch("feature", false).unwrap();

        assert_eq!(repo.branch_names().unwrap(), vec!["master".to_string()]);
        assert!(!repo.branch_exists("feature").unwrap());
    }

    #[test]
    fn delete_unmerged_branch_needs_force() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();
        repo.checkout("feature", true).unwrap();
        repo.add_file_and_commit("feature.txt", "feature", "Feature work")
            .unwrap();
        repo.checkout("master", false).unwrap();

        assert!(matches!(
            repo.delete_branch("feature", false),
            Err(GitError::Checkout(CheckoutError::Rejected { .. }))
        ));
        repo.delete_branch("feature", true).unwrap();
        assert!(!repo.branch_exists("feature").unwrap());
    }

    #[test]
    fn delete_active_branch_fails() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("README.md", "hello", "Initial commit")
            .unwrap();

        assert!(matches!(
            repo.delete_branch("master", true),
            Err(GitError::Checkout(CheckoutError::DeleteActive { .. }))
        ));
    }

    #[test]
    fn branch_listing_is_loaded_once() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .ok(&["rev-parse"], "false\n\n")
            .ok(&["branch", "--list"], "*\trefs/heads/master\t\n \trefs/heads/dev\t\n")
            .ok(&["symbolic-ref"], "refs/heads/master\n");
        let calls = runner.calls();
        let mut repo = GitRepo::with_runner(Box::new(runner));
        repo.set_path(temp_dir.path(), false, false).unwrap();

        repo.branches().unwrap();
        repo.branch_names().unwrap();
        repo.active_branch().unwrap();
        repo.active_branch().unwrap();

        assert_eq!(calls.count(&["branch", "--list"]), 1);
        assert_eq!(calls.count(&["symbolic-ref"]), 2);
    }

    #[test]
    fn listing_without_active_branch_is_a_parse_error() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .ok(&["rev-parse"], "false\n\n")
            .ok(&["branch", "--list"], " \trefs/heads/master\t\n \trefs/heads/dev\t\n");
        let mut repo = GitRepo::with_runner(Box::new(runner));
        repo.set_path(temp_dir.path(), false, false).unwrap();

        assert!(matches!(
            repo.branches(),
            Err(GitError::Parse(ParseError::ActiveCount { count: 0, .. }))
        ));
    }
}
