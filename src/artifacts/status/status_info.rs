use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::status::inspector::{Inspector, WorkspaceChange};
use crate::errors::Result;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Paths grouped by how the worktree differs from the index
///
/// Every list is sorted and holds `/`-separated paths relative to the worktree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub changed: Vec<String>,
    pub new: Vec<String>,
    pub deleted: Vec<String>,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self) -> Result<StatusInfo> {
        let workspace_files = self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .collect::<BTreeSet<_>>();
        let index_entries = self
            .repository
            .index()
            .load()?
            .into_iter()
            .map(|entry| (entry.path.clone(), entry))
            .collect::<BTreeMap<String, IndexEntry>>();

        let inspector = Inspector::new(self.repository);
        let mut status = StatusInfo::default();

        let paths = workspace_files
            .iter()
            .chain(index_entries.keys())
            .collect::<BTreeSet<_>>();

        for path in paths {
            let change = inspector.check_index_against_workspace(
                path,
                index_entries.get(path),
                workspace_files.contains(path),
            )?;

            match change {
                Some(WorkspaceChange::Modified) => status.changed.push(path.clone()),
                Some(WorkspaceChange::Untracked) => status.new.push(path.clone()),
                Some(WorkspaceChange::Deleted) => status.deleted.push(path.clone()),
                None => {}
            }
        }

        debug!(
            changed = status.changed.len(),
            new = status.new.len(),
            deleted = status.deleted.len(),
            "computed status"
        );

        Ok(status)
    }
}
