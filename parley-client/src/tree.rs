use std::collections::HashMap;

use crate::{
    api::{self, CommentId, ThreadId},
    Comment,
};

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub(crate) enum TreeError {
    #[error("comment id {0:?} is already used in this thread")]
    DuplicateId(CommentId),

    #[error("comment {id:?} would be at depth {depth}, over the limit of {max}")]
    TooDeep {
        id: CommentId,
        depth: usize,
        max: usize,
    },

    #[error("reply {id:?} references unknown parent {parent:?}")]
    UnknownParent { id: CommentId, parent: CommentId },
}

#[derive(Clone, Debug)]
struct Node {
    comment: Comment,

    /// Indices into `Tree::nodes`, in display order
    replies: Vec<usize>,
}

/// Arena holding one thread's comments.
///
/// Nodes are never removed, so indices stay valid for the lifetime of the
/// tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
    index: HashMap<CommentId, usize>,
    roots: Vec<usize>,
}

impl Tree {
    pub fn new() -> Tree {
        Tree::default()
    }

    /// Builds a tree out of fetched records, which may be nested, flat (with
    /// `parent_id` set) or a mix of both
    pub fn hydrate(
        thread_id: &ThreadId,
        records: Vec<api::Comment>,
        max_depth: usize,
    ) -> Result<Tree, TreeError> {
        let mut tree = Tree::new();
        let mut flat_replies = Vec::new();
        for r in records {
            match r.parent_id.clone() {
                None => tree.insert_record(thread_id, None, r, max_depth)?,
                Some(parent) => flat_replies.push((parent, r)),
            }
        }

        // Flat replies may be listed before their parent
        while !flat_replies.is_empty() {
            let pending = flat_replies.len();
            let mut deferred = Vec::new();
            for (parent, r) in flat_replies {
                match tree.index.get(&parent).copied() {
                    Some(p) => tree.insert_record(thread_id, Some(p), r, max_depth)?,
                    None => deferred.push((parent, r)),
                }
            }
            if deferred.len() == pending {
                let (parent, r) = deferred.swap_remove(0);
                return Err(TreeError::UnknownParent { id: r.id, parent });
            }
            flat_replies = deferred;
        }

        Ok(tree)
    }

    fn insert_record(
        &mut self,
        thread_id: &ThreadId,
        parent: Option<usize>,
        mut record: api::Comment,
        max_depth: usize,
    ) -> Result<(), TreeError> {
        let replies = std::mem::take(&mut record.replies);
        let idx = self.insert(thread_id, parent, record, max_depth)?;
        for r in replies {
            self.insert_record(thread_id, Some(idx), r, max_depth)?;
        }
        Ok(())
    }

    fn insert(
        &mut self,
        thread_id: &ThreadId,
        parent: Option<usize>,
        record: api::Comment,
        max_depth: usize,
    ) -> Result<usize, TreeError> {
        let (parent_id, depth) = match parent {
            None => (None, 0),
            Some(p) => {
                let p = &self.nodes[p].comment;
                (Some(p.id.clone()), p.depth + 1)
            }
        };
        if depth > max_depth {
            return Err(TreeError::TooDeep {
                id: record.id,
                depth,
                max: max_depth,
            });
        }
        if self.index.contains_key(&record.id) {
            return Err(TreeError::DuplicateId(record.id));
        }
        if !record.replies.is_empty() {
            tracing::warn!(
                id = ?record.id,
                num_replies = record.replies.len(),
                "ignoring replies of a freshly inserted comment"
            );
        }

        let idx = self.nodes.len();
        self.index.insert(record.id.clone(), idx);
        self.nodes.push(Node {
            comment: Comment::from_record(record, thread_id, parent_id, depth),
            replies: Vec::new(),
        });
        match parent {
            None => self.roots.push(idx),
            Some(p) => self.nodes[p].replies.push(idx),
        }
        Ok(idx)
    }

    /// Appends `record` at the end of the roots, or of `parent`'s replies
    pub fn append(
        &mut self,
        thread_id: &ThreadId,
        parent: Option<&CommentId>,
        record: api::Comment,
        max_depth: usize,
    ) -> Result<&Comment, TreeError> {
        let parent = match parent {
            None => None,
            Some(p) => Some(self.index.get(p).copied().ok_or_else(|| {
                TreeError::UnknownParent {
                    id: record.id.clone(),
                    parent: p.clone(),
                }
            })?),
        };
        let idx = self.insert(thread_id, parent, record, max_depth)?;
        Ok(&self.nodes[idx].comment)
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.index.get(id).map(|&i| &self.nodes[i].comment)
    }

    pub fn get_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        let i = *self.index.get(id)?;
        Some(&mut self.nodes[i].comment)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Comment> {
        self.roots.iter().map(|&i| &self.nodes[i].comment)
    }

    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }

    /// Empty for unknown ids
    pub fn replies(&self, id: &CommentId) -> impl Iterator<Item = &Comment> {
        let replies: &[usize] = match self.index.get(id) {
            Some(&i) => &self.nodes[i].replies[..],
            None => &[],
        };
        replies.iter().map(|&i| &self.nodes[i].comment)
    }

    /// Rebuilds nested records, in display order
    pub fn to_records(&self) -> Vec<api::Comment> {
        self.roots.iter().map(|&i| self.node_to_record(i)).collect()
    }

    fn node_to_record(&self, i: usize) -> api::Comment {
        let node = &self.nodes[i];
        let replies = node
            .replies
            .iter()
            .map(|&r| self.node_to_record(r))
            .collect();
        node.comment.to_record(replies)
    }
}
