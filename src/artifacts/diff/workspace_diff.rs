use crate::areas::repository::Repository;
use crate::artifacts::diff::unified::{UnifiedDiff, split_lines};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::status_info::Status;
use crate::errors::{Error, Result};
use derive_new::new;
use std::collections::BTreeMap;

/// Width of the rule printed between two file diffs
pub const FILE_SEPARATOR_WIDTH: usize = 70;

/// Differences between the staged content and the worktree of every changed file
#[derive(new)]
pub struct WorkspaceDiff<'r> {
    repository: &'r Repository,
}

impl<'r> WorkspaceDiff<'r> {
    pub fn render(&self) -> Result<String> {
        let changed = Status::new(self.repository).initialize()?.changed;
        let staged = self
            .repository
            .index()
            .load()?
            .into_iter()
            .map(|entry| (entry.path, entry.oid))
            .collect::<BTreeMap<_, _>>();

        let mut output = String::new();
        for (position, path) in changed.iter().enumerate() {
            let oid = staged
                .get(path)
                .ok_or_else(|| Error::NotFound(path.clone()))?;
            let database = self.repository.database();
            let Some(blob) = database.parse_object_as_blob(oid)? else {
                return Err(Error::UnexpectedObjectType {
                    expected: ObjectType::Blob.to_string(),
                    actual: database.object_type(oid)?.to_string(),
                });
            };

            let old = split_lines(blob.content());
            let new = split_lines(&self.repository.workspace().read_file(path)?);
            let old_label = format!("{path} (index)");
            let new_label = format!("{path} (working copy)");

            for line in UnifiedDiff::new(&old_label, &new_label, &old, &new).render() {
                output.push_str(&line);
                output.push('\n');
            }

            if position + 1 < changed.len() {
                output.push_str(&"-".repeat(FILE_SEPARATOR_WIDTH));
                output.push('\n');
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::encode_index;
    use crate::artifacts::index::index_entry::IndexEntry;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn stage(repository: &Repository, path: &str, content: &[u8]) -> IndexEntry {
        let oid = repository
            .database()
            .write(ObjectType::Blob, content)
            .unwrap();
        IndexEntry::for_content(path, oid, 0o100644, content.len() as u32)
    }

    #[test]
    fn renders_changed_files_separated_by_a_rule() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::init(dir.path(), Box::new(std::io::sink())).unwrap();
        let entries = vec![
            stage(&repository, "a.txt", b"one\ntwo\n"),
            stage(&repository, "b.txt", b"left\n"),
            stage(&repository, "c.txt", b"same\n"),
        ];
        std::fs::write(repository.index().path(), encode_index(&entries)).unwrap();
        dir.child("a.txt").write_str("one\nTWO\n").unwrap();
        dir.child("b.txt").write_str("right\n").unwrap();
        dir.child("c.txt").write_str("same\n").unwrap();

        let diff = WorkspaceDiff::new(&repository).render().unwrap();

        let rule = "-".repeat(70);
        let expected = [
            "--- a.txt (index)",
            "+++ a.txt (working copy)",
            "@@ -1,2 +1,2 @@",
            " one",
            "-two",
            "+TWO",
            rule.as_str(),
            "--- b.txt (index)",
            "+++ b.txt (working copy)",
            "@@ -1 +1 @@",
            "-left",
            "+right",
        ]
        .map(|line| format!("{line}\n"))
        .concat();
        assert_eq!(diff, expected);
    }

    #[test]
    fn clean_worktree_has_an_empty_diff() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::init(dir.path(), Box::new(std::io::sink())).unwrap();
        let entries = vec![stage(&repository, "a.txt", b"a\n")];
        std::fs::write(repository.index().path(), encode_index(&entries)).unwrap();
        dir.child("a.txt").write_str("a\n").unwrap();

        assert_eq!(WorkspaceDiff::new(&repository).render().unwrap(), "");
    }
}
