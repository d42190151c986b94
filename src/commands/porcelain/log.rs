use crate::areas::repository::Repository;
use crate::artifacts::log::commit_graph::CommitGraph;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;

impl Repository {
    /// Print the history reachable from `name` as a Graphviz digraph
    pub fn log(&self, name: &str) -> anyhow::Result<()> {
        let start = Revision::new(self).find_object_as(name, ObjectType::Commit)?;
        let dot = CommitGraph::new(self).render(&start)?;

        write!(self.writer(), "{dot}")?;

        Ok(())
    }
}
