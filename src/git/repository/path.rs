use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::core::{args, GitRepo, RepoState};
use crate::git::{
    errors::{Listing, Operation, ParseError, PathError, Result, StagingError},
    parse,
};

impl GitRepo {
    /// Open an existing repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut repo = Self::new();
        repo.set_path(path.as_ref(), false, false)?;
        if repo.state() == RepoState::Uninitialized {
            return Err(PathError::NotInitialized {
                path: path.as_ref().to_path_buf(),
            }
            .into());
        }
        Ok(repo)
    }

    /// Initialize a new repository at `path`, creating the directory if needed
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut repo = Self::new();
        repo.create(path, false)?;
        Ok(repo)
    }

    /// Initialize a new bare repository at `path`
    pub fn init_bare<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut repo = Self::new();
        repo.create(path, true)?;
        Ok(repo)
    }

    /// Clone `url` into `path` unless a repository is already there, in which
    /// case that repository is opened as-is.
    pub fn clone_into<P: AsRef<Path>>(url: &str, path: P) -> Result<Self> {
        let mut repo = Self::new();
        repo.clone_or_open(url, path)?;
        Ok(repo)
    }

    /// Point this instance at `path` and initialize a repository there; fails
    /// when one already exists.
    pub fn create<P: AsRef<Path>>(&mut self, path: P, bare: bool) -> Result<()> {
        let path = path.as_ref();
        self.set_path(path, true, false)?;
        if self.state() != RepoState::Uninitialized {
            return Err(PathError::AlreadyInitialized {
                path: path.to_path_buf(),
            }
            .into());
        }
        self.initialize(bare)
    }

    /// Point this instance at `path`, cloning `url` there first when it does
    /// not hold a repository yet
    pub fn clone_or_open<P: AsRef<Path>>(&mut self, url: &str, path: P) -> Result<()> {
        let path = path.as_ref();
        self.set_path(path, true, false)?;
        if self.state() != RepoState::Uninitialized {
            tracing::debug!(path = %path.display(), "repository already present, skipping clone");
            return Ok(());
        }

        let target = self.location()?.to_path_buf();
        self.git_ok(
            Operation::Clone { path: &target },
            &args(["clone", "--quiet", "--", url, "."]),
        )?;
        let state = self.detect_state()?;
        self.set_state(state);
        tracing::info!(url, path = %target.display(), "cloned repository");
        Ok(())
    }

    /// Point this instance at `path`.
    ///
    /// The directory is created when missing and `create_if_missing` is set; a
    /// repository is initialized in it when `init_if_empty` is set and it does
    /// not hold one yet. All cached listings are dropped.
    pub fn set_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        create_if_missing: bool,
        init_if_empty: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(meta) if !meta.is_dir() => {
                return Err(PathError::NotADirectory {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !create_if_missing {
                    return Err(PathError::NotFound {
                        path: path.to_path_buf(),
                    }
                    .into());
                }
                fs::create_dir_all(path).map_err(|source| PathError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "created working tree directory");
            }
            Err(source) => {
                return Err(PathError::Io {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        }

        self.set_location(path.to_path_buf(), RepoState::Uninitialized);
        let state = self.detect_state()?;
        self.set_state(state);

        if state == RepoState::Uninitialized && init_if_empty {
            self.initialize(false)?;
        }
        Ok(())
    }

    fn initialize(&mut self, bare: bool) -> Result<()> {
        let path = self.location()?.to_path_buf();
        let op = Operation::Init { path: &path };

        let mut argv = args(["init", "--quiet"]);
        if bare {
            argv.push("--bare".into());
        }
        self.git_ok(op, &argv)?;

        // HEAD points at the configured branch; it is born with the first commit.
        let head = format!("refs/heads/{}", self.options().initial_branch);
        self.git_ok(op, &args(["symbolic-ref", "HEAD", head.as_str()]))?;

        self.set_state(if bare {
            RepoState::Bare
        } else {
            RepoState::Initialized
        });
        tracing::info!(path = %path.display(), bare, "initialized repository");
        Ok(())
    }

    /// Ask the engine what lives at the current path.
    fn detect_state(&self) -> Result<RepoState> {
        let output = self.git(&args(["rev-parse", "--is-bare-repository", "--show-prefix"]))?;
        if !output.success() {
            return Ok(RepoState::Uninitialized);
        }

        let text = parse::text(&output.stdout, Listing::Scalar)?;
        let mut lines = text.lines().map(str::trim);
        match (lines.next(), lines.next().unwrap_or("")) {
            (Some("true"), _) => Ok(RepoState::Bare),
            (Some("false"), "") => Ok(RepoState::Initialized),
            // A subdirectory of some other working tree is not a repository of its own.
            (Some("false"), _) => Ok(RepoState::Uninitialized),
            _ => Err(ParseError::UnrecognizedLine {
                listing: Listing::Scalar,
                line: 1,
                content: text.trim().to_string(),
            }
            .into()),
        }
    }

    /// Express `path` relative to the working tree root.
    ///
    /// Relative paths are taken as already relative to the root; absolute
    /// paths must lie inside it. The target does not need to exist.
    pub(crate) fn relative_to_root(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }
        let root = self.location()?;
        if let Ok(rel) = path.strip_prefix(root) {
            return Ok(non_empty(rel));
        }

        // Retry on canonical forms to see through symlinked prefixes.
        let outside = || StagingError::OutsideRepository {
            path: path.display().to_string(),
        };
        let root = fs::canonicalize(root).map_err(|source| PathError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let target = canonicalize_lenient(path).ok_or_else(outside)?;
        let rel = target.strip_prefix(&root).map_err(|_| outside())?;
        Ok(non_empty(rel))
    }
}

fn non_empty(rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel.to_path_buf()
    }
}

/// Canonicalize a path whose last component may no longer exist.
fn canonicalize_lenient(path: &Path) -> Option<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Some(canonical);
    }
    let parent = fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(path.file_name()?))
}
