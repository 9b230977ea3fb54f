//! Forest builder: flat parent-referencing records to an ordered forest.

use std::collections::{HashMap, VecDeque};

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{Forest, TreeNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{Record, RecordId};

/// What to do with a record whose parent link would close a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Treat the record as a root, like a dangling reference
    #[default]
    Demote,
    /// Fail with [`DomainError::CycleDetected`]
    Reject,
}

/// Sibling (and root) order in the built forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingOrder {
    /// Original relative input order
    #[default]
    Input,
    /// Stable sort by title before building
    Title,
}

/// Constructs a forest from records carrying a parent reference.
///
/// Holds only options; every build is a pure function of its input.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    cycle_policy: CyclePolicy,
    sibling_order: SiblingOrder,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn with_sibling_order(mut self, order: SiblingOrder) -> Self {
        self.sibling_order = order;
        self
    }

    /// Build using each record's own parent reference.
    pub fn build<R: Record>(&self, records: impl IntoIterator<Item = R>) -> DomainResult<Forest<R>> {
        self.build_by(records, |r| r.parent_id().cloned())
    }

    /// Build using `parent_of` to select the parent id of each record.
    ///
    /// A record becomes a root when it has no parent id, when no record in the
    /// input carries that id, or (under [`CyclePolicy::Demote`]) when the link
    /// would make the record its own ancestor.
    ///
    /// Records are visited from last to first and each one is prepended to its
    /// parent's child list (or to the root list), so siblings and roots keep
    /// their original relative order.
    ///
    /// # Errors
    /// * [`DomainError::DuplicateId`] if two records share an id
    /// * [`DomainError::CycleDetected`] under [`CyclePolicy::Reject`]
    #[instrument(level = "debug", skip_all, fields(policy = ?self.cycle_policy, order = ?self.sibling_order))]
    pub fn build_by<R, P>(&self, records: impl IntoIterator<Item = R>, parent_of: P) -> DomainResult<Forest<R>>
    where
        R: Record,
        P: Fn(&R) -> Option<RecordId>,
    {
        let mut records: Vec<R> = records.into_iter().collect();
        if self.sibling_order == SiblingOrder::Title {
            records.sort_by(|a, b| a.title().cmp(b.title()));
        }
        let n = records.len();

        let mut positions: HashMap<RecordId, usize> = HashMap::with_capacity(n);
        for (pos, record) in records.iter().enumerate() {
            if positions.insert(record.id().clone(), pos).is_some() {
                return Err(DomainError::DuplicateId(record.id().clone()));
            }
        }

        let parent_refs: Vec<Option<RecordId>> = records.iter().map(&parent_of).collect();
        let resolved: Vec<Option<usize>> = parent_refs
            .iter()
            .map(|r| r.as_ref().and_then(|pid| positions.get(pid).copied()))
            .collect();
        let closers = cycle_closers(&resolved);
        let mut parent_pos: Vec<Option<usize>> = vec![None; n];
        let mut children: Vec<VecDeque<usize>> = vec![VecDeque::new(); n];
        let mut roots: VecDeque<usize> = VecDeque::new();

        for pos in (0..n).rev() {
            match resolved[pos] {
                Some(_) if closers[pos] => {
                    let id = records[pos].id().clone();
                    match self.cycle_policy {
                        CyclePolicy::Reject => return Err(DomainError::CycleDetected(id)),
                        CyclePolicy::Demote => {
                            debug!("cycle at {}, demoting to root", id);
                            roots.push_front(pos);
                        }
                    }
                }
                Some(p) => {
                    parent_pos[pos] = Some(p);
                    children[p].push_front(pos);
                }
                None => {
                    if let Some(pid) = &parent_refs[pos] {
                        debug!("dangling parent {} on {}, treating as root", pid, records[pos].id());
                    }
                    roots.push_front(pos);
                }
            }
        }

        let mut arena = Arena::with_capacity(n);
        let indices: Vec<Index> = records
            .into_iter()
            .map(|data| {
                arena.insert(TreeNode {
                    data,
                    parent: None,
                    children: Vec::new(),
                })
            })
            .collect();

        for (pos, &idx) in indices.iter().enumerate() {
            if let Some(node) = arena.get_mut(idx) {
                node.parent = parent_pos[pos].map(|p| indices[p]);
                node.children = children[pos].iter().map(|&c| indices[c]).collect();
            }
        }

        let roots: Vec<Index> = roots.into_iter().map(|pos| indices[pos]).collect();
        let by_id = positions
            .into_iter()
            .map(|(id, pos)| (id, indices[pos]))
            .collect();

        debug!("built forest: {} nodes, {} roots", n, roots.len());
        Ok(Forest::from_parts(arena, roots, by_id))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnChain,
    Done,
}

/// Marks the records whose parent link closes a cycle.
///
/// `resolved` maps every record to at most one parent, so each cycle is found
/// once by following parent links with three-state marking. Links are
/// assigned back to front, so the link closing a cycle belongs to its member
/// with the lowest position; that member is marked.
fn cycle_closers(resolved: &[Option<usize>]) -> Vec<bool> {
    let n = resolved.len();
    let mut mark = vec![Mark::Unvisited; n];
    let mut closers = vec![false; n];
    let mut chain: Vec<usize> = Vec::new();

    for start in 0..n {
        if mark[start] != Mark::Unvisited {
            continue;
        }
        let mut current = Some(start);
        while let Some(c) = current {
            match mark[c] {
                Mark::Unvisited => {
                    mark[c] = Mark::OnChain;
                    chain.push(c);
                    current = resolved[c];
                }
                Mark::OnChain => {
                    // chain[from..] is the cycle entered at c
                    let from = chain.iter().rposition(|&x| x == c).unwrap_or(0);
                    if let Some(&lowest) = chain[from..].iter().min() {
                        closers[lowest] = true;
                    }
                    break;
                }
                Mark::Done => break,
            }
        }
        for c in chain.drain(..) {
            mark[c] = Mark::Done;
        }
    }
    closers
}
