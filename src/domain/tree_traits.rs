/*
Rendering a forest as text trees for terminal display.
One termtree::Tree per root; node text is the record title.
Nesting is cut off at MAX_RENDER_DEPTH levels.
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::Forest;
use crate::domain::record::Record;

/// Levels rendered per tree; deeper descendants collapse into one `...` leaf.
pub const MAX_RENDER_DEPTH: usize = 256;

const TRUNCATED: &str = "...";

pub trait TreeNodeConvert {
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl<R: Record> TreeNodeConvert for Forest<R> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        // Post-order assembly: finished subtrees wait on `built` until their parent pops
        let mut built: Vec<Tree<String>> = Vec::new();
        let mut stack: Vec<(Index, usize, bool)> =
            self.roots().iter().rev().map(|&r| (r, 1, false)).collect();

        while let Some((idx, level, expanded)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            let children = &node.children;
            if !expanded && !children.is_empty() && level < MAX_RENDER_DEPTH {
                stack.push((idx, level, true));
                stack.extend(children.iter().rev().map(|&c| (c, level + 1, false)));
                continue;
            }

            let title = node.data.title().to_string();
            let tree = if expanded {
                let leaves = built.split_off(built.len().saturating_sub(children.len()));
                Tree::new(title).with_leaves(leaves)
            } else if children.is_empty() {
                Tree::new(title)
            } else {
                Tree::new(title).with_leaves([Tree::new(TRUNCATED.to_string())])
            };
            built.push(tree);
        }
        built
    }
}
