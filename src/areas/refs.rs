//! Git references (HEAD, branches, tags)
//!
//! References are human-readable names pointing to objects. A ref file holds
//! either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references, where `<path>` is relative to the
//!   metadata directory (e.g. `ref: refs/heads/master`)
//!
//! Ref files are untrusted input: symbolic chains are followed with a visited
//! set and a hop limit, and every hop is validated as a ref name so a chain
//! cannot escape the metadata directory.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::ref_name::RefName;
use crate::errors::{Error, Result};
use derive_new::new;
use file_guard::Lock;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Longest symbolic chain followed before giving up
const MAX_SYMREF_HOPS: usize = 100;

/// Deepest directory nesting listed under `refs/`
const MAX_REF_DIR_DEPTH: usize = 32;

/// Nested view of a refs directory, sorted by name at every level
pub type RefTree = BTreeMap<String, RefNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefNode {
    Oid(ObjectId),
    Directory(RefTree),
}

/// Git references manager
///
/// Writers take an exclusive lock on the ref file they update.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    path: Box<Path>,
}

/// Internal representation of a reference value
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef(String),
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read(path: &Path, name: &str) -> Result<SymRefOrOid> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NoSuchReference(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let content = content.trim_end();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(SymRefOrOid::SymRef(symref_match[1].trim().to_string()))
        } else {
            Ok(SymRefOrOid::Oid(ObjectId::try_parse(content)?))
        }
    }
}

impl Refs {
    /// Follow a ref until it reaches a literal object id
    #[instrument(skip(self))]
    pub fn resolve(&self, name: &str) -> Result<ObjectId> {
        let mut visited = HashSet::new();
        let mut current = name.to_string();

        loop {
            if visited.len() >= MAX_SYMREF_HOPS || !visited.insert(current.clone()) {
                return Err(Error::CycleDetected(name.to_string()));
            }

            let ref_name = RefName::try_parse(current.as_str())?;
            let path = self.path.join(ref_name.as_ref());

            match SymRefOrOid::read(&path, ref_name.as_ref())? {
                SymRefOrOid::SymRef(target) => {
                    debug!(from = %current, to = %target, "following symbolic ref");
                    current = target;
                }
                SymRefOrOid::Oid(oid) => return Ok(oid),
            }
        }
    }

    /// Whether `name` names an existing ref file
    pub fn exists(&self, name: &str) -> bool {
        RefName::is_valid(name) && self.path.join(name).is_file()
    }

    /// Every ref under `refs/`
    pub fn list(&self) -> Result<RefTree> {
        self.list_at(&self.refs_path())
    }

    /// Every ref under `root`, which must live inside the metadata directory
    ///
    /// Files that are not valid ref names (such as stale `.lock` files) and
    /// refs that do not resolve are left out of the listing.
    pub fn list_at(&self, root: &Path) -> Result<RefTree> {
        let mut tree = RefTree::new();
        if !root.is_dir() {
            return Ok(tree);
        }

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(MAX_REF_DIR_DEPTH)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?;
            let mut components = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>();
            let Some(leaf) = components.pop() else {
                continue;
            };

            let node = if entry.file_type().is_dir() {
                RefNode::Directory(RefTree::new())
            } else if entry.file_type().is_file() {
                let name = entry
                    .path()
                    .strip_prefix(&self.path)
                    .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?
                    .to_string_lossy()
                    .replace(std::path::MAIN_SEPARATOR, "/");
                if !RefName::is_valid(&name) {
                    warn!(name = %name, "skipping file that is not a ref");
                    continue;
                }
                match self.resolve(&name) {
                    Ok(oid) => RefNode::Oid(oid),
                    Err(error) => {
                        warn!(name = %name, %error, "skipping unresolvable ref");
                        continue;
                    }
                }
            } else {
                continue;
            };

            Self::directory_at(&mut tree, &components)?.insert(leaf, node);
        }

        Ok(tree)
    }

    fn directory_at<'t>(tree: &'t mut RefTree, parents: &[String]) -> Result<&'t mut RefTree> {
        let mut current = tree;

        for parent in parents {
            current = match current
                .entry(parent.clone())
                .or_insert_with(|| RefNode::Directory(RefTree::new()))
            {
                RefNode::Directory(children) => children,
                RefNode::Oid(_) => return Err(Error::InvalidPath(parent.clone())),
            };
        }

        Ok(current)
    }

    /// Point `refs/<name>` at `oid`
    pub fn create_ref(&self, name: &str, oid: &ObjectId) -> Result<()> {
        let ref_name = RefName::try_parse(format!("refs/{name}"))?;

        self.update_ref_file(&self.path.join(ref_name.as_ref()), &format!("{oid}\n"))
    }

    /// Make HEAD a symbolic ref to `target`, e.g. `refs/heads/master`
    pub fn set_head(&self, target: &str) -> Result<()> {
        let target = RefName::try_parse(target)?;

        self.update_ref_file(&self.head_path(), &format!("ref: {target}\n"))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        debug!(path = %path.display(), "updated ref");
        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}

/// Flatten a [`RefTree`] into `(full name, oid)` pairs in listing order
pub fn flatten_refs(tree: &RefTree, prefix: &str) -> Vec<(String, ObjectId)> {
    let mut refs = Vec::new();

    for (name, node) in tree {
        let full_name = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        match node {
            RefNode::Oid(oid) => refs.push((full_name, *oid)),
            RefNode::Directory(children) => refs.extend(flatten_refs(children, &full_name)),
        }
    }

    refs
}
