//! Turning user-supplied names into object ids
//!
//! A name is looked up every way it could be meant, and each interpretation
//! that exists contributes a candidate:
//!
//! - `HEAD` (or its alias `@`) resolves through the HEAD ref alone
//! - 40 hex characters are taken literally
//! - 4 to 39 hex characters are a prefix searched in the object store
//! - `refs/tags/<name>`, `refs/heads/<name>` and `refs/remotes/<name>`
//! - a full ref name such as `refs/heads/master`
//!
//! Zero candidates or more than one are errors, so a short hex string that
//! happens to also be a branch name is reported as ambiguous.

use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::{Error, Result};
use derive_new::new;
use std::collections::BTreeSet;
use tracing::trace;

/// Shortest abbreviated object id looked up in the object store
const MIN_ABBREVIATION: usize = 4;

/// Longest tag-to-tag chain followed while peeling
const MAX_PEEL_DEPTH: usize = 64;

const REF_NAMESPACES: [&str; 3] = ["refs/tags/", "refs/heads/", "refs/remotes/"];

pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};

#[derive(new)]
pub struct Revision<'r> {
    repository: &'r Repository,
}

impl Revision<'_> {
    /// Every object id `name` could refer to
    pub fn resolve_candidates(&self, name: &str) -> Result<BTreeSet<ObjectId>> {
        let mut candidates = BTreeSet::new();

        let name = name.trim();
        if name.is_empty() {
            return Ok(candidates);
        }
        let name = REF_ALIASES.get(name).copied().unwrap_or(name);

        if name == HEAD_REF_NAME {
            candidates.insert(self.repository.refs().resolve(HEAD_REF_NAME)?);
            return Ok(candidates);
        }

        if Self::looks_like_oid(name) {
            let name = name.to_ascii_lowercase();
            if name.len() == OBJECT_ID_LENGTH {
                candidates.insert(ObjectId::try_parse(&name)?);
            } else {
                candidates.extend(self.repository.database().find_objects_by_prefix(&name)?);
            }
        }

        let full_name = name.starts_with("refs/").then(|| name.to_string());
        let ref_names = REF_NAMESPACES
            .iter()
            .map(|namespace| format!("{namespace}{name}"))
            .chain(full_name);

        for ref_name in ref_names {
            if self.repository.refs().exists(&ref_name) {
                candidates.insert(self.repository.refs().resolve(&ref_name)?);
            }
        }

        trace!(name, candidates = candidates.len(), "resolved candidates");
        Ok(candidates)
    }

    /// Resolve `name` to a single object, optionally peeled to `expected`
    ///
    /// With `follow`, tags are peeled to their target and commits to their
    /// tree until an object of the expected kind is reached. `None` means the
    /// name exists but cannot be turned into that kind.
    pub fn find_object(
        &self,
        name: &str,
        expected: Option<ObjectType>,
        follow: bool,
    ) -> Result<Option<ObjectId>> {
        let candidates = self.resolve_candidates(name)?;

        let mut object_id = match candidates.len() {
            0 => return Err(Error::NoSuchReference(name.to_string())),
            1 => candidates
                .into_iter()
                .next()
                .ok_or_else(|| Error::NoSuchReference(name.to_string()))?,
            _ => {
                return Err(Error::AmbiguousReference {
                    name: name.to_string(),
                    candidates: candidates.iter().map(ObjectId::to_string).collect(),
                });
            }
        };

        let Some(expected) = expected else {
            return Ok(Some(object_id));
        };

        for _ in 0..MAX_PEEL_DEPTH {
            let object = self.repository.database().parse_object(&object_id)?;
            if object.object_type() == expected {
                return Ok(Some(object_id));
            }
            if !follow {
                return Ok(None);
            }

            object_id = match object {
                ObjectBox::Tag(tag) => tag.object()?,
                ObjectBox::Commit(commit) if expected == ObjectType::Tree => commit.tree()?,
                _ => return Ok(None),
            };
        }

        Err(Error::CycleDetected(name.to_string()))
    }

    /// Like [`Revision::find_object`], failing when the kind cannot be reached
    pub fn find_object_as(&self, name: &str, expected: ObjectType) -> Result<ObjectId> {
        if let Some(object_id) = self.find_object(name, Some(expected), true)? {
            return Ok(object_id);
        }

        let actual = match self.find_object(name, None, false)? {
            Some(object_id) => self.repository.database().object_type(&object_id)?,
            None => return Err(Error::NoSuchReference(name.to_string())),
        };

        Err(Error::UnexpectedObjectType {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }

    fn looks_like_oid(name: &str) -> bool {
        (MIN_ABBREVIATION..=OBJECT_ID_LENGTH).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::Commit;
    use crate::artifacts::objects::kvlm::Kvlm;
    use crate::artifacts::objects::tag::Tag;
    use crate::artifacts::objects::tree::Tree;
    use assert_fs::TempDir;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Fixture {
        _dir: TempDir,
        repository: Repository,
        tree: ObjectId,
        commit: ObjectId,
        tag: ObjectId,
    }

    #[fixture]
    fn history() -> Fixture {
        let dir = TempDir::new().unwrap();
        let repository = Repository::init(dir.path(), Box::new(std::io::sink())).unwrap();
        let database = repository.database();

        let tree = database.store(&Tree::default()).unwrap();
        let commit = database
            .store(&Commit::new(
                Kvlm::new("initial\n").with("tree", tree.to_string()),
            ))
            .unwrap();
        let tag = database
            .store(&Tag::annotate(
                &commit,
                ObjectType::Commit,
                "v1.0",
                "Jane <jane@example.com> 0 +0000",
                "release\n",
            ))
            .unwrap();

        repository.refs().create_ref("heads/master", &commit).unwrap();
        repository.refs().create_ref("tags/v1.0", &tag).unwrap();

        Fixture {
            _dir: dir,
            repository,
            tree,
            commit,
            tag,
        }
    }

    #[rstest]
    fn head_and_aliases_resolve_through_the_ref(history: Fixture) {
        let revision = Revision::new(&history.repository);

        for name in ["HEAD", "@", "master", "refs/heads/master"] {
            assert_eq!(
                revision.resolve_candidates(name).unwrap(),
                BTreeSet::from([history.commit]),
                "{name}"
            );
        }
    }

    #[rstest]
    fn blank_names_have_no_candidates(history: Fixture) {
        let revision = Revision::new(&history.repository);

        assert!(revision.resolve_candidates("  ").unwrap().is_empty());
        assert!(matches!(
            revision.find_object("nope", None, true),
            Err(Error::NoSuchReference(_))
        ));
    }

    #[rstest]
    fn full_ids_are_taken_literally(history: Fixture) {
        let revision = Revision::new(&history.repository);
        let unknown = "0".repeat(40);

        assert_eq!(
            revision.resolve_candidates(&unknown).unwrap(),
            BTreeSet::from([ObjectId::try_parse(&unknown).unwrap()])
        );
    }

    #[rstest]
    fn abbreviations_search_the_object_store(history: Fixture) {
        let revision = Revision::new(&history.repository);
        let short = &history.tree.to_string()[..6];

        assert_eq!(
            revision.find_object(short, None, false).unwrap(),
            Some(history.tree)
        );
    }

    #[rstest]
    fn tags_peel_to_commits_and_trees(history: Fixture) {
        let revision = Revision::new(&history.repository);

        assert_eq!(
            revision.find_object("v1.0", None, true).unwrap(),
            Some(history.tag)
        );
        assert_eq!(
            revision
                .find_object("v1.0", Some(ObjectType::Commit), true)
                .unwrap(),
            Some(history.commit)
        );
        assert_eq!(
            revision.find_object_as("v1.0", ObjectType::Tree).unwrap(),
            history.tree
        );
        assert_eq!(
            revision
                .find_object("v1.0", Some(ObjectType::Commit), false)
                .unwrap(),
            None
        );
        assert_eq!(
            revision
                .find_object("master", Some(ObjectType::Blob), true)
                .unwrap(),
            None
        );
        assert!(matches!(
            revision.find_object_as("master", ObjectType::Blob),
            Err(Error::UnexpectedObjectType { actual, .. }) if actual == "commit"
        ));
    }

    #[rstest]
    fn a_prefix_that_is_also_a_branch_is_ambiguous(history: Fixture) {
        let revision = Revision::new(&history.repository);
        let short = history.tree.to_string()[..6].to_string();
        history
            .repository
            .refs()
            .create_ref(&format!("heads/{short}"), &history.commit)
            .unwrap();

        assert!(matches!(
            revision.find_object(&short, None, true),
            Err(Error::AmbiguousReference { candidates, .. }) if candidates.len() == 2
        ));
    }

    #[rstest]
    fn blobs_are_found_by_full_id(history: Fixture) {
        let blob = history
            .repository
            .database()
            .store(&Blob::new(Bytes::from_static(b"data")))
            .unwrap();
        let revision = Revision::new(&history.repository);

        assert_eq!(
            revision
                .find_object(&blob.to_string(), Some(ObjectType::Blob), true)
                .unwrap(),
            Some(blob)
        );
    }
}
