use bytes::Bytes;
use kit::areas::database::Database;
use kit::areas::refs::Refs;
use kit::artifacts::index::checksum::Checksum;
use kit::artifacts::index::index_entry::IndexEntry;
use kit::artifacts::index::index_header::IndexHeader;
use kit::artifacts::objects::commit::Commit;
use kit::artifacts::objects::entry_mode::EntryMode;
use kit::artifacts::objects::kvlm::Kvlm;
use kit::artifacts::objects::object_id::ObjectId;
use kit::artifacts::objects::object_type::ObjectType;
use kit::artifacts::objects::tree::{Tree, TreeEntry};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Objects written while building a fixture repository
#[derive(Debug, Clone)]
pub struct History {
    pub blobs: BTreeMap<String, ObjectId>,
    pub tree: ObjectId,
    pub commit: ObjectId,
}

fn database(repository_dir: &Path) -> Database {
    Database::new(repository_dir.join(".git/objects").into_boxed_path())
}

/// Store `files` as blobs, stage them in the index and commit them on master
pub fn stage_files(repository_dir: &Path, files: &[(&str, &str)]) -> History {
    let database = database(repository_dir);

    let mut blobs = BTreeMap::new();
    let mut entries = Vec::new();
    for (path, content) in files {
        let oid = database
            .write(ObjectType::Blob, content.as_bytes())
            .expect("Failed to write blob");
        blobs.insert(path.to_string(), oid);
        entries.push(IndexEntry::for_content(
            path,
            oid,
            0o100644,
            content.len() as u32,
        ));
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    write_index(repository_dir, &entries);

    let tree = write_tree(&database, &blobs, "");
    let commit = write_commit(repository_dir, &tree, &[], "Initial commit");

    History {
        blobs,
        tree,
        commit,
    }
}

/// Write the index file holding `entries`
pub fn write_index(repository_dir: &Path, entries: &[IndexEntry]) {
    let mut data = IndexHeader::for_entries(entries.len() as u32)
        .serialize()
        .expect("Failed to serialize header")
        .to_vec();
    for entry in entries {
        data.extend_from_slice(&entry.serialize().expect("Failed to serialize entry"));
    }
    let mut checksum = Checksum::new();
    checksum.update(&data);
    data.extend_from_slice(&checksum.finalize());

    std::fs::write(repository_dir.join(".git/index"), data).expect("Failed to write index");
}

/// Store the tree of every blob below `prefix`, subtrees first
fn write_tree(database: &Database, blobs: &BTreeMap<String, ObjectId>, prefix: &str) -> ObjectId {
    let mut files = Vec::new();
    let mut directories = BTreeSet::new();

    for (path, oid) in blobs {
        let Some(relative) = path.strip_prefix(prefix) else {
            continue;
        };
        match relative.split_once('/') {
            Some((directory, _)) => {
                directories.insert(directory.to_string());
            }
            None => files.push((relative.to_string(), EntryMode::regular(), *oid)),
        }
    }

    for directory in directories {
        let oid = write_tree(database, blobs, &format!("{prefix}{directory}/"));
        files.push((directory, EntryMode::directory(), oid));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let entries = files
        .into_iter()
        .map(|(name, mode, oid)| TreeEntry::new(mode, Bytes::from(name), oid))
        .collect();
    database
        .store(&Tree::new(entries))
        .expect("Failed to write tree")
}

/// Store a commit and move master to it
pub fn write_commit(
    repository_dir: &Path,
    tree: &ObjectId,
    parents: &[ObjectId],
    message: &str,
) -> ObjectId {
    let mut kvlm = Kvlm::new(format!("{message}\n")).with("tree", tree.to_string());
    for parent in parents {
        kvlm.push("parent", parent.to_string());
    }
    kvlm.push("author", "A U Thor <author@example.com> 1700000000 +0000");
    kvlm.push("committer", "A U Thor <author@example.com> 1700000000 +0000");

    let commit = database(repository_dir)
        .store(&Commit::new(kvlm))
        .expect("Failed to write commit");
    Refs::new(repository_dir.join(".git").into_boxed_path())
        .create_ref("heads/master", &commit)
        .expect("Failed to update master");

    commit
}
