//! In-memory projection of the bucket hierarchy
//!
//! A [`Forest`] is rebuilt from scratch on every reload. Between reloads only the
//! per-bucket `expanded` flags change.

use crate::error::BrowserError;
use crate::tree::node::{Bucket, Node, NodeId, Pair};
use crate::tree::path::PathKey;

/// A bucket subtree that could not be read completely during reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadIssue {
    pub bucket: PathKey,
    pub message: String,
}

/// Outcome of resolving a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    Bucket(NodeId, &'a Bucket),
    Pair(NodeId, &'a Pair),
    NotFound,
}

impl<'a> Resolved<'a> {
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Resolved::Bucket(id, _) | Resolved::Pair(id, _) => Some(*id),
            Resolved::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Resolved::NotFound)
    }
}

/// Ordered list of root buckets plus the arena that owns every node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    issues: Vec<ReloadIssue>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there are no root buckets.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of buckets and pairs.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn issues(&self) -> &[ReloadIssue] {
        &self.issues
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn bucket(&self, id: NodeId) -> Option<&Bucket> {
        self.node(id).and_then(Node::as_bucket)
    }

    pub fn pair(&self, id: NodeId) -> Option<&Pair> {
        self.node(id).and_then(Node::as_pair)
    }

    fn bucket_mut(&mut self, id: NodeId) -> Option<&mut Bucket> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Bucket(b)) => Some(b),
            _ => None,
        }
    }

    /// Append a root bucket.
    pub fn insert_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Bucket(Bucket::new(name, None)));
        self.roots.push(id);
        id
    }

    /// Append a sub-bucket to `parent`. Returns `None` if `parent` is not a bucket.
    pub fn insert_bucket(&mut self, parent: NodeId, name: impl Into<String>) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        self.bucket_mut(parent)?.buckets.push(id);
        self.nodes.push(Node::Bucket(Bucket::new(name, Some(parent))));
        Some(id)
    }

    /// Append a pair to `parent`. Returns `None` if `parent` is not a bucket.
    pub fn insert_pair(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        value: Vec<u8>,
    ) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        self.bucket_mut(parent)?.pairs.push(id);
        self.nodes.push(Node::Pair(Pair {
            key: key.into(),
            value,
            parent,
        }));
        Some(id)
    }

    /// Flag `bucket` as partially unreadable and record the issue.
    pub fn flag_bucket(&mut self, bucket: NodeId, message: impl Into<String>) {
        let message = message.into();
        let path = self.full_path(bucket);
        if let Some(b) = self.bucket_mut(bucket) {
            match &mut b.error {
                Some(existing) => {
                    existing.push_str("; ");
                    existing.push_str(&message);
                }
                None => b.error = Some(message.clone()),
            }
            self.issues.push(ReloadIssue {
                bucket: path,
                message,
            });
        }
    }

    pub fn root_bucket(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.bucket(*id).map_or(false, |b| b.name == name))
    }

    /// Sub-bucket of `bucket` named `name`.
    pub fn child_bucket(&self, bucket: NodeId, name: &str) -> Option<NodeId> {
        self.bucket(bucket)?
            .buckets
            .iter()
            .copied()
            .find(|id| self.bucket(*id).map_or(false, |b| b.name == name))
    }

    /// Pair of `bucket` with key `key`.
    pub fn child_pair(&self, bucket: NodeId, key: &str) -> Option<NodeId> {
        self.bucket(bucket)?
            .pairs
            .iter()
            .copied()
            .find(|id| self.pair(*id).map_or(false, |p| p.key == key))
    }

    /// Resolve a path to the bucket or pair it names.
    ///
    /// Each segment after the first is matched against sub-buckets first; only the
    /// final segment may fall back to a pair.
    pub fn resolve(&self, path: &PathKey) -> Resolved<'_> {
        let segments = path.segments();
        let Some((first, rest)) = segments.split_first() else {
            return Resolved::NotFound;
        };
        let Some(mut current) = self.root_bucket(first) else {
            return Resolved::NotFound;
        };

        for (i, segment) in rest.iter().enumerate() {
            if let Some(next) = self.child_bucket(current, segment) {
                current = next;
                continue;
            }
            if i + 1 == rest.len() {
                if let Some(pair_id) = self.child_pair(current, segment) {
                    if let Some(pair) = self.pair(pair_id) {
                        return Resolved::Pair(pair_id, pair);
                    }
                }
            }
            return Resolved::NotFound;
        }

        match self.bucket(current) {
            Some(bucket) => Resolved::Bucket(current, bucket),
            None => Resolved::NotFound,
        }
    }

    /// Resolve `path` to a bucket id, reporting why it is not one.
    pub fn bucket_at(&self, path: &PathKey) -> Result<NodeId, BrowserError> {
        if path.is_empty() {
            return Err(BrowserError::EmptyPath);
        }
        match self.resolve(path) {
            Resolved::Bucket(id, _) => Ok(id),
            Resolved::Pair(..) => Err(BrowserError::NotABucket(path.clone())),
            Resolved::NotFound => Err(BrowserError::PathNotFound(path.clone())),
        }
    }

    pub fn set_expanded(&mut self, path: &PathKey, value: bool) -> Result<(), BrowserError> {
        let id = self.bucket_at(path)?;
        if let Some(bucket) = self.bucket_mut(id) {
            bucket.expanded = value;
        }
        Ok(())
    }

    /// Flip the expanded flag of the bucket at `path`; returns the new state.
    pub fn toggle(&mut self, path: &PathKey) -> Result<bool, BrowserError> {
        let id = self.bucket_at(path)?;
        let bucket = self
            .bucket_mut(id)
            .ok_or_else(|| BrowserError::NotABucket(path.clone()))?;
        bucket.expanded = !bucket.expanded;
        Ok(bucket.expanded)
    }

    /// Expand every bucket in the forest.
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if let Node::Bucket(bucket) = node {
                bucket.expanded = true;
            }
        }
    }

    pub(crate) fn set_expanded_by_id(&mut self, id: NodeId, value: bool) {
        if let Some(bucket) = self.bucket_mut(id) {
            bucket.expanded = value;
        }
    }

    /// Path of a node, rebuilt by walking parent links up to its root.
    pub fn full_path(&self, id: NodeId) -> PathKey {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.node(current) {
                Some(node) => {
                    segments.push(node.name().to_string());
                    cursor = node.parent();
                }
                None => break,
            }
        }
        segments.reverse();
        PathKey::new(segments)
    }

    /// Nesting depth of a node; root buckets are depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.node(id).and_then(Node::parent);
        while let Some(current) = cursor {
            depth += 1;
            cursor = self.node(current).and_then(Node::parent);
        }
        depth
    }
}
