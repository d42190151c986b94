use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Deepest directory nesting a checkout will create
pub const MAX_TREE_DEPTH: usize = 256;

#[derive(new)]
pub struct TreeCheckout<'r> {
    repository: &'r Repository,
}

/// One filesystem change of a checkout, relative to the target
enum Planned {
    Directory(PathBuf),
    File(PathBuf, Bytes),
}

impl<'r> TreeCheckout<'r> {
    /// Write the tree named by `root` (a commit or a tree) below `target`
    ///
    /// `target` is created when missing and must otherwise be an empty
    /// directory. Every object is read and every name validated before the
    /// first write, and a failed write removes what was already written, so
    /// an error leaves `target` as it was found.
    #[instrument(skip(self, target), fields(target = %target.display()))]
    pub fn checkout(&self, root: &ObjectId, target: &Path) -> Result<()> {
        let tree = self.root_tree(root)?;
        let target_exists = Self::check_target(target)?;
        let plan = self.plan(tree)?;

        if !target_exists {
            std::fs::create_dir_all(target)?;
        }

        if let Err(error) = Self::apply(&plan, target) {
            Self::roll_back(&plan, target, target_exists);
            return Err(error);
        }

        debug!(entries = plan.len(), "checked out tree");
        Ok(())
    }

    /// Directories and files to create, parents before children
    fn plan(&self, tree: Tree) -> Result<Vec<Planned>> {
        let mut plan = Vec::new();
        let mut pending = vec![(tree, PathBuf::new(), 0usize)];

        while let Some((tree, dir, depth)) = pending.pop() {
            for entry in tree.entries() {
                if entry.object_type() == ObjectType::Commit {
                    warn!(name = %entry.name_lossy(), oid = %entry.oid, "skipping gitlink");
                    continue;
                }

                let path = dir.join(Self::entry_name(entry)?);

                match self.repository.database().parse_object(&entry.oid)? {
                    ObjectBox::Tree(subtree) => {
                        if depth + 1 >= MAX_TREE_DEPTH {
                            return Err(Error::TreeTooDeep(MAX_TREE_DEPTH));
                        }
                        plan.push(Planned::Directory(path.clone()));
                        pending.push((*subtree, path, depth + 1));
                    }
                    ObjectBox::Blob(blob) => {
                        plan.push(Planned::File(path, blob.content().clone()));
                    }
                    other => {
                        warn!(
                            name = %entry.name_lossy(),
                            kind = %other.object_type(),
                            "skipping entry that is neither a tree nor a blob"
                        );
                    }
                }
            }
        }

        Ok(plan)
    }

    fn apply(plan: &[Planned], target: &Path) -> Result<()> {
        for step in plan {
            match step {
                Planned::Directory(path) => std::fs::create_dir(target.join(path))?,
                Planned::File(path, content) => std::fs::write(target.join(path), content)?,
            }
        }

        Ok(())
    }

    fn roll_back(plan: &[Planned], target: &Path, target_existed: bool) {
        let cleanup = if target_existed {
            plan.iter()
                .filter_map(|step| match step {
                    Planned::Directory(path) | Planned::File(path, _)
                        if path.components().count() == 1 =>
                    {
                        Some(target.join(path))
                    }
                    _ => None,
                })
                .try_for_each(|path| {
                    if path.is_dir() {
                        std::fs::remove_dir_all(&path)
                    } else if path.exists() {
                        std::fs::remove_file(&path)
                    } else {
                        Ok(())
                    }
                })
        } else {
            std::fs::remove_dir_all(target)
        };

        if let Err(error) = cleanup {
            warn!(%error, target = %target.display(), "unable to remove a partial checkout");
        }
    }

    fn root_tree(&self, root: &ObjectId) -> Result<Tree> {
        let database = self.repository.database();

        match database.parse_object(root)? {
            ObjectBox::Tree(tree) => Ok(*tree),
            ObjectBox::Commit(commit) => {
                let tree_oid = commit.tree()?;
                database.parse_object_as_tree(&tree_oid)?.ok_or_else(|| {
                    Error::CorruptObject(format!("commit {root} points at non-tree {tree_oid}"))
                })
            }
            other => Err(Error::UnexpectedObjectType {
                expected: "commit or tree".to_string(),
                actual: other.object_type().to_string(),
            }),
        }
    }

    /// Whether `target` already exists; it may only be an empty directory
    fn check_target(target: &Path) -> Result<bool> {
        if !target.exists() {
            return Ok(false);
        }

        if !target.is_dir() {
            return Err(Error::NotADirectory(target.to_path_buf()));
        }
        if std::fs::read_dir(target)?.next().is_some() {
            return Err(Error::NonEmptyTarget(target.to_path_buf()));
        }

        Ok(true)
    }

    /// Tree data is untrusted: a name must stay a single path component
    fn entry_name(entry: &TreeEntry) -> Result<PathBuf> {
        let name = std::str::from_utf8(&entry.name)
            .map_err(|_| Error::InvalidPath(entry.name_lossy()))?;

        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::InvalidPath(name.to_string()));
        }

        Ok(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::Commit;
    use crate::artifacts::objects::entry_mode::EntryMode;
    use crate::artifacts::objects::kvlm::Kvlm;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn repository(dir: &TempDir) -> Repository {
        Repository::init(dir.path().join("repo"), Box::new(std::io::sink())).unwrap()
    }

    fn blob(repository: &Repository, content: &str) -> ObjectId {
        repository
            .database()
            .store(&Blob::new(Bytes::from(content.to_string())))
            .unwrap()
    }

    fn tree(repository: &Repository, entries: Vec<(&str, &str, ObjectId)>) -> ObjectId {
        let entries = entries
            .into_iter()
            .map(|(mode, name, oid)| {
                TreeEntry::new(
                    EntryMode::from_octal_str(mode).unwrap(),
                    Bytes::from(name.to_string()),
                    oid,
                )
            })
            .collect();
        repository.database().store(&Tree::new(entries)).unwrap()
    }

    fn sample_tree(repository: &Repository) -> ObjectId {
        let readme = blob(repository, "hello\n");
        let main = blob(repository, "fn main() {}\n");
        let src = tree(repository, vec![("100644", "main.rs", main)]);
        tree(
            repository,
            vec![("100644", "README", readme), ("40000", "src", src)],
        )
    }

    #[test]
    fn writes_nested_blobs_from_a_tree() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let root = sample_tree(&repository);

        TreeCheckout::new(&repository)
            .checkout(&root, &dir.path().join("out"))
            .unwrap();

        dir.child("out/README").assert("hello\n");
        dir.child("out/src/main.rs").assert("fn main() {}\n");
    }

    #[test]
    fn follows_a_commit_to_its_tree() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let root = sample_tree(&repository);
        let commit = Commit::new(
            Kvlm::new("initial\n")
                .with("tree", root.to_string())
                .with("author", "A U Thor <a@example.com> 0 +0000"),
        );
        let commit = repository.database().store(&commit).unwrap();

        dir.child("out").create_dir_all().unwrap();
        TreeCheckout::new(&repository)
            .checkout(&commit, &dir.path().join("out"))
            .unwrap();

        dir.child("out/src/main.rs").assert("fn main() {}\n");
    }

    #[test]
    fn refuses_a_populated_target() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let root = sample_tree(&repository);
        dir.child("out/keep.txt").write_str("mine").unwrap();

        let result = TreeCheckout::new(&repository).checkout(&root, &dir.path().join("out"));

        assert!(matches!(result, Err(Error::NonEmptyTarget(_))));
        dir.child("out/keep.txt").assert("mine");
    }

    #[test]
    fn refuses_a_file_target() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let root = sample_tree(&repository);
        dir.child("out").write_str("file").unwrap();

        let result = TreeCheckout::new(&repository).checkout(&root, &dir.path().join("out"));

        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[test]
    fn refuses_blob_roots() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let oid = blob(&repository, "x");

        let result = TreeCheckout::new(&repository).checkout(&oid, &dir.path().join("out"));

        assert!(matches!(
            result,
            Err(Error::UnexpectedObjectType { actual, .. }) if actual == "blob"
        ));
    }

    #[rstest]
    #[case::parent("..")]
    #[case::current(".")]
    #[case::separator("a/b")]
    fn rejects_names_escaping_the_target(#[case] name: &str) {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let oid = blob(&repository, "evil");
        let root = tree(&repository, vec![("100644", name, oid)]);

        let result = TreeCheckout::new(&repository).checkout(&root, &dir.path().join("out"));

        assert!(matches!(result, Err(Error::InvalidPath(_))));
        assert!(!dir.path().join("evil").exists());
    }

    #[test]
    fn skips_gitlinks() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let readme = blob(&repository, "hi");
        let missing = ObjectId::digest(b"not in the database");
        let root = tree(
            &repository,
            vec![("100644", "README", readme), ("160000", "vendor", missing)],
        );

        TreeCheckout::new(&repository)
            .checkout(&root, &dir.path().join("out"))
            .unwrap();

        dir.child("out/README").assert("hi");
        assert!(!dir.path().join("out/vendor").exists());
    }

    #[test]
    fn bounds_the_nesting_depth() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let mut root = tree(&repository, vec![]);
        for _ in 0..MAX_TREE_DEPTH {
            root = tree(&repository, vec![("40000", "d", root)]);
        }

        let result = TreeCheckout::new(&repository).checkout(&root, &dir.path().join("out"));

        assert!(matches!(result, Err(Error::TreeTooDeep(MAX_TREE_DEPTH))));
    }

    #[test]
    fn empty_trees_leave_an_empty_directory() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let root = tree(&repository, vec![]);

        TreeCheckout::new(&repository)
            .checkout(&root, &dir.path().join("out"))
            .unwrap();

        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn a_missing_blob_leaves_no_partial_checkout() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let present = blob(&repository, "kept\n");
        let missing = ObjectId::digest(b"never stored");
        let root = tree(
            &repository,
            vec![("100644", "a.txt", present), ("100644", "b.txt", missing)],
        );

        let result = TreeCheckout::new(&repository).checkout(&root, &dir.path().join("out"));

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn a_bad_name_deep_in_the_tree_leaves_the_target_empty() {
        let dir = TempDir::new().unwrap();
        let repository = repository(&dir);
        let good = blob(&repository, "fine");
        let nested = tree(&repository, vec![("100644", "..", good)]);
        let root = tree(
            &repository,
            vec![("100644", "a.txt", good), ("40000", "nested", nested)],
        );
        dir.child("out").create_dir_all().unwrap();

        let result = TreeCheckout::new(&repository).checkout(&root, &dir.path().join("out"));

        assert!(matches!(result, Err(Error::InvalidPath(_))));
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn a_failed_write_removes_what_was_written() {
        let dir = TempDir::new().unwrap();
        dir.child("out").create_dir_all().unwrap();
        let plan = vec![
            Planned::Directory(PathBuf::from("src")),
            Planned::File(PathBuf::from("src/main.rs"), Bytes::from_static(b"x")),
            Planned::File(PathBuf::from("missing/dir/file"), Bytes::from_static(b"y")),
        ];

        let target = dir.path().join("out");
        assert!(TreeCheckout::apply(&plan, &target).is_err());
        TreeCheckout::roll_back(&plan, &target, true);

        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
    }
}
