use crate::errors::Result;
use bytes::Bytes;
use std::path::{Component, Path};
use walkdir::{DirEntry, WalkDir};

/// Name of the metadata directory, never part of the working tree
pub const METADATA_DIR: &str = ".git";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Regular files of the working tree, as sorted `/`-separated relative paths
    ///
    /// Metadata directories (at any depth) are skipped and symlinks are not
    /// followed.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.path) {
                files.push(Self::to_slash_path(relative));
            }
        }

        files.sort();
        Ok(files)
    }

    fn is_ignored(entry: &DirEntry) -> bool {
        entry.file_name() == METADATA_DIR
    }

    fn to_slash_path(path: &Path) -> String {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn read_file(&self, file_path: &str) -> Result<Bytes> {
        let content = std::fs::read(self.path.join(file_path))?;

        Ok(Bytes::from(content))
    }
}
