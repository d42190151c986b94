use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use derive_new::new;
use std::collections::HashSet;
use std::fmt::Write;
use tracing::debug;

/// A `child -> parent` link between two commits
pub type Edge = (ObjectId, ObjectId);

#[derive(new)]
pub struct CommitGraph<'r> {
    repository: &'r Repository,
}

impl<'r> CommitGraph<'r> {
    /// Every edge reachable from `start`, depth-first over all parents in order
    ///
    /// Each commit is expanded once, so shared ancestors and merges do not
    /// repeat their history.
    pub fn walk(&self, start: &ObjectId) -> Result<Vec<Edge>> {
        let mut seen = HashSet::from([*start]);
        let mut pending = self.parent_edges(start)?;
        pending.reverse();
        let mut edges = Vec::new();

        while let Some((child, parent)) = pending.pop() {
            edges.push((child, parent));

            if seen.insert(parent) {
                let mut next = self.parent_edges(&parent)?;
                next.reverse();
                pending.extend(next);
            }
        }

        debug!(commits = seen.len(), edges = edges.len(), "walked commit graph");
        Ok(edges)
    }

    /// Graphviz `digraph` of the history reachable from `start`
    pub fn render(&self, start: &ObjectId) -> Result<String> {
        let edges = self.walk(start)?;

        let mut nodes = vec![*start];
        let mut labelled = HashSet::from([*start]);
        for (_, parent) in &edges {
            if labelled.insert(*parent) {
                nodes.push(*parent);
            }
        }

        let mut dot = String::from("digraph kitlog{\n  node[shape=rect]\n");
        for oid in &nodes {
            let commit = self.load_commit(oid)?;
            // writing to a String cannot fail
            let _ = writeln!(
                dot,
                "  c_{oid} [label=\"{}: {}\"]",
                oid.to_short_oid(),
                escape_label(&commit.short_message())
            );
        }
        for (child, parent) in &edges {
            let _ = writeln!(dot, "  c_{child} -> c_{parent};");
        }
        dot.push_str("}\n");

        Ok(dot)
    }

    fn parent_edges(&self, oid: &ObjectId) -> Result<Vec<Edge>> {
        Ok(self
            .load_commit(oid)?
            .parents()?
            .into_iter()
            .map(|parent| (*oid, parent))
            .collect())
    }

    fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        let database = self.repository.database();

        match database.parse_object_as_commit(oid)? {
            Some(commit) => Ok(commit),
            None => Err(Error::UnexpectedObjectType {
                expected: ObjectType::Commit.to_string(),
                actual: database.object_type(oid)?.to_string(),
            }),
        }
    }
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
