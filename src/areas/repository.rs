use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::config::RepositoryConfig;
use crate::errors::{Error, Result};
use std::cell::{RefCell, RefMut};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";
const DEFAULT_HEAD: &str = "ref: refs/heads/master\n";

/// A worktree together with its `.git` metadata directory
///
/// Command methods (see `commands`) write their output to `writer`.
pub struct Repository {
    path: Box<Path>,
    git_path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    config: RepositoryConfig,
    index: Index,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository whose worktree is `path`
    pub fn new(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let path = path.as_ref();
        let path = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;
        let git_path = path.join(METADATA_DIR);

        if !git_path.is_dir() {
            return Err(Error::NotARepository(path));
        }

        let config = RepositoryConfig::load(&git_path.join("config"))?;
        config.ensure_supported()?;

        debug!(worktree = %path.display(), "opened repository");

        Ok(Repository {
            index: Index::new(git_path.join("index").into_boxed_path()),
            database: Database::new(git_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.clone().into_boxed_path()),
            config,
            writer: RefCell::new(writer),
            git_path: git_path.into_boxed_path(),
            path: path.into_boxed_path(),
        })
    }

    /// Open the repository containing `start`, looking through its ancestors
    pub fn find(start: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let start = start.as_ref();
        let start = start
            .canonicalize()
            .map_err(|_| Error::NotARepository(start.to_path_buf()))?;

        let worktree = start
            .ancestors()
            .find(|candidate| candidate.join(METADATA_DIR).is_dir())
            .ok_or_else(|| Error::NotARepository(start.clone()))?;

        Self::new(worktree, writer)
    }

    /// Create an empty repository at `path` and open it
    pub fn init(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() && !path.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }
        std::fs::create_dir_all(path)?;

        let git_path = path.join(METADATA_DIR);
        if git_path.exists() {
            if !git_path.is_dir() {
                return Err(Error::NotADirectory(git_path));
            }
            if std::fs::read_dir(&git_path)?.next().is_some() {
                return Err(Error::AlreadyInitialized(git_path));
            }
        }

        for dir in ["objects", "refs/heads", "refs/tags", "branches"] {
            std::fs::create_dir_all(git_path.join(dir))?;
        }
        std::fs::write(git_path.join("description"), DEFAULT_DESCRIPTION)?;
        std::fs::write(git_path.join("HEAD"), DEFAULT_HEAD)?;
        RepositoryConfig::default_config().write(&git_path.join("config"))?;

        info!(path = %git_path.display(), "initialized empty repository");

        Self::new(path, writer)
    }

    /// The worktree root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The metadata directory, `<worktree>/.git`
    pub fn git_path(&self) -> &Path {
        &self.git_path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
