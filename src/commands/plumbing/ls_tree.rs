use crate::areas::repository::Repository;
use crate::artifacts::checkout::tree_checkout::MAX_TREE_DEPTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;
use crate::errors::Error;

impl Repository {
    pub fn ls_tree(&self, name: &str, recursive: bool) -> anyhow::Result<()> {
        let tree_oid = Revision::new(self).find_object_as(name, ObjectType::Tree)?;

        self.list_tree(&tree_oid, "", recursive, 0)
    }

    fn list_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &str,
        recursive: bool,
        depth: usize,
    ) -> anyhow::Result<()> {
        if depth >= MAX_TREE_DEPTH {
            return Err(Error::TreeTooDeep(MAX_TREE_DEPTH).into());
        }

        let tree = self
            .database()
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("{tree_oid} is not a tree"))?;

        for entry in tree.entries() {
            let path = if prefix.is_empty() {
                entry.name_lossy()
            } else {
                format!("{prefix}/{}", entry.name_lossy())
            };

            if recursive && entry.object_type() == ObjectType::Tree {
                self.list_tree(&entry.oid, &path, recursive, depth + 1)?;
                continue;
            }

            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode.padded(),
                entry.object_type(),
                entry.oid,
                path
            )?;
        }

        Ok(())
    }
}
