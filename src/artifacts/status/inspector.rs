use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use derive_new::new;

/// How a single path differs between the index and the worktree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceChange {
    /// Present on both sides with different content
    Modified,
    /// Present in the worktree only
    Untracked,
    /// Present in the index only
    Deleted,
}

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    pub fn check_index_against_workspace(
        &self,
        path: &str,
        entry: Option<&IndexEntry>,
        in_workspace: bool,
    ) -> Result<Option<WorkspaceChange>> {
        match (entry, in_workspace) {
            (None, true) => Ok(Some(WorkspaceChange::Untracked)),
            (Some(_), false) => Ok(Some(WorkspaceChange::Deleted)),
            (Some(entry), true) if self.is_content_changed(path, entry)? => {
                Ok(Some(WorkspaceChange::Modified))
            }
            _ => Ok(None),
        }
    }

    /// Hash the worktree copy without storing it and compare with the staged id
    fn is_content_changed(&self, path: &str, entry: &IndexEntry) -> Result<bool> {
        let content = self.repository.workspace().read_file(path)?;
        let oid = self.repository.database().hash(ObjectType::Blob, &content);

        Ok(oid != entry.oid)
    }
}
