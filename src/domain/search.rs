//! Title search over labelled nodes, as used by searchable pickers.

use regex::RegexBuilder;

use crate::domain::labeler::LabeledNode;
use crate::domain::record::Record;

/// Patterns shorter than this leave the list unfiltered.
pub const DEFAULT_MIN_PATTERN_LEN: usize = 3;

/// Filter labelled nodes by title.
///
/// If `pattern` has fewer than `min_len` characters every node is returned.
/// Otherwise the nodes whose title contains `pattern` (case-insensitive,
/// taken literally) are returned. Pre-order is preserved either way.
pub fn filter<'l, 'a, R: Record>(
    nodes: &'l [LabeledNode<'a, R>],
    pattern: &str,
    min_len: usize,
) -> Vec<&'l LabeledNode<'a, R>> {
    if pattern.chars().count() < min_len {
        return nodes.iter().collect();
    }

    // An escaped literal always compiles; the fallback only guards size limits
    let Ok(re) = RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };

    nodes
        .iter()
        .filter(|n| re.is_match(n.record.title()))
        .collect()
}
