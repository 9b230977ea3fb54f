//! Arena-backed forest storage.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::record::{Record, RecordId};

/// Tree node in the arena-based forest.
#[derive(Debug, Clone)]
pub struct TreeNode<R> {
    /// The wrapped input record
    pub data: R,
    /// Index of parent node in the arena, None for root nodes.
    /// A back-reference only: the arena owns every node.
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in sibling order
    pub children: Vec<Index>,
}

/// Ordered sequence of trees sharing one arena.
///
/// Built once by [`crate::domain::TreeBuilder`] and immutable afterwards.
/// Parent links are plain arena indices, so dropping the forest drops
/// every node without any cycle breaking.
#[derive(Debug, Clone)]
pub struct Forest<R> {
    arena: Arena<TreeNode<R>>,
    roots: Vec<Index>,
    by_id: HashMap<RecordId, Index>,
}

impl<R> Forest<R> {
    pub(crate) fn from_parts(
        arena: Arena<TreeNode<R>>,
        roots: Vec<Index>,
        by_id: HashMap<RecordId, Index>,
    ) -> Self {
        Self {
            arena,
            roots,
            by_id,
        }
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<R>> {
        self.arena.get(idx)
    }

    /// Root indices in forest order.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.parent)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Look up a node by its record id.
    pub fn find(&self, id: &RecordId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    /// The node itself followed by its parent, grandparent, ... up to the root.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_, R> {
        Ancestors {
            forest: self,
            next: self.get_node(idx).map(|_| idx),
        }
    }

    /// Pre-order traversal: roots in order, each before its descendants.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_, R> {
        TreeIterator::new(self)
    }

    /// Post-order traversal: every node after all of its descendants.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, R> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest tree; 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();
        while let Some((idx, level)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                deepest = deepest.max(level);
                stack.extend(node.children.iter().map(|&c| (c, level + 1)));
            }
        }
        deepest
    }

    /// Collects all leaf nodes (nodes with no children) in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl<R: Record> Forest<R> {
    /// Record ids in pre-order.
    pub fn ids(&self) -> Vec<&RecordId> {
        self.iter().map(|(_, node)| node.data.id()).collect()
    }
}

/// Structural equality: same roots, same records, same shape.
/// Arena indices are not compared.
impl<R: PartialEq> PartialEq for Forest<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.roots.len() != other.roots.len() {
            return false;
        }
        let mut stack: Vec<(Index, Index)> = self
            .roots
            .iter()
            .copied()
            .zip(other.roots.iter().copied())
            .collect();
        while let Some((a, b)) = stack.pop() {
            match (self.get_node(a), other.get_node(b)) {
                (Some(x), Some(y)) if x.data == y.data && x.children.len() == y.children.len() => {
                    stack.extend(x.children.iter().copied().zip(y.children.iter().copied()));
                }
                _ => return false,
            }
        }
        true
    }
}

pub struct Ancestors<'a, R> {
    forest: &'a Forest<R>,
    next: Option<Index>,
}

impl<'a, R> Iterator for Ancestors<'a, R> {
    type Item = (Index, &'a TreeNode<R>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.forest.get_node(idx)?;
        self.next = node.parent;
        Some((idx, node))
    }
}

pub struct TreeIterator<'a, R> {
    forest: &'a Forest<R>,
    stack: Vec<Index>,
}

impl<'a, R> TreeIterator<'a, R> {
    fn new(forest: &'a Forest<R>) -> Self {
        // Reverse so the first root is popped first
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a, R> Iterator for TreeIterator<'a, R> {
    type Item = (Index, &'a TreeNode<R>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, R> {
    forest: &'a Forest<R>,
    stack: Vec<(Index, bool)>,
}

impl<'a, R> PostOrderIterator<'a, R> {
    fn new(forest: &'a Forest<R>) -> Self {
        let stack = forest.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { forest, stack }
    }
}

impl<'a, R> Iterator for PostOrderIterator<'a, R> {
    type Item = (Index, &'a TreeNode<R>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
