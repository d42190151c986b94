use crate::areas::repository::Repository;
use crate::artifacts::checkout::tree_checkout::TreeCheckout;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;
use std::path::Path;

impl Repository {
    /// Write the tree of `name` (a commit, tree or tag) into the empty directory `target`
    pub fn checkout(&self, name: &str, target: &Path) -> anyhow::Result<()> {
        let tree_oid = Revision::new(self).find_object_as(name, ObjectType::Tree)?;

        TreeCheckout::new(self).checkout(&tree_oid, target)?;

        Ok(())
    }
}
