//! Breadcrumb path labels over a built forest.

use generational_arena::Index;
use itertools::Itertools;
use serde::Serialize;
use tracing::instrument;

use crate::domain::arena::Forest;
use crate::domain::record::Record;

pub const DEFAULT_SEPARATOR: &str = " > ";

/// A forest node decorated with its root-to-node path label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledNode<'a, R> {
    #[serde(skip)]
    pub index: Index,
    pub record: &'a R,
    /// 0 for roots
    pub depth: usize,
    pub label: String,
}

/// Joins ancestor titles root-first, e.g. `Africa > Nigeria > Kano`.
#[derive(Debug, Clone)]
pub struct PathLabeler {
    separator: String,
}

impl Default for PathLabeler {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl PathLabeler {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Label of a single node, walking parent back-references to the root.
    /// Returns an empty string for an index not in the forest.
    pub fn label<R: Record>(&self, forest: &Forest<R>, idx: Index) -> String {
        let mut titles: Vec<&str> = forest
            .ancestors(idx)
            .map(|(_, node)| node.data.title())
            .collect();
        titles.reverse();
        titles.into_iter().join(&self.separator)
    }

    /// Every node of the forest in pre-order, each with its full path label.
    ///
    /// Roots come in forest order and children in child-list order. A child's
    /// label extends its parent's, so each label is built once.
    #[instrument(level = "debug", skip_all, fields(nodes = forest.len()))]
    pub fn label_paths<'a, R: Record>(&self, forest: &'a Forest<R>) -> Vec<LabeledNode<'a, R>> {
        let mut out = Vec::with_capacity(forest.len());
        let mut stack: Vec<(Index, usize, Option<usize>)> = forest
            .roots()
            .iter()
            .rev()
            .map(|&r| (r, 0, None))
            .collect();

        // Entries carry the output position of their parent's label
        while let Some((idx, depth, parent_slot)) = stack.pop() {
            let Some(node) = forest.get_node(idx) else {
                continue;
            };
            let label = match parent_slot {
                Some(slot) => {
                    let parent: &LabeledNode<'a, R> = &out[slot];
                    format!("{}{}{}", parent.label, self.separator, node.data.title())
                }
                None => node.data.title().to_string(),
            };
            let slot = out.len();
            out.push(LabeledNode {
                index: idx,
                record: &node.data,
                depth,
                label,
            });
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1, Some(slot)));
            }
        }
        out
    }
}
