//! Generic uninformed search over immutable state graphs.
//!
//! The traversals are puzzle-agnostic: anything implementing [`SearchNode`]
//! can be searched. Breadth-first returns a shallowest goal; depth-first
//! returns whichever goal its stack discipline reaches first. Both record
//! every discovered state in a visited set to suppress duplicates, so memory
//! grows with the explored space, and that bookkeeping is what makes the
//! search terminate on finite graphs whether or not a goal exists.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Capability contract for searchable states.
///
/// Equality and hashing must agree, and should identify states that differ
/// only in how they were reached, or the visited set cannot suppress
/// duplicates.
pub trait SearchNode: Clone + Eq + Hash {
    /// Goal predicate.
    fn is_goal(&self) -> bool;

    /// Successor states, finite, yielded in preference order. Each call
    /// starts a fresh enumeration.
    fn children(&self) -> impl Iterator<Item = Self>;

    /// The state this one was derived from; `None` for roots and for node
    /// types that do not track lineage (backtracking then stops here).
    fn parent(&self) -> Option<Self> {
        None
    }
}

/// Counters describing one search invocation.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// States whose children were enumerated.
    pub expanded: usize,
    /// Children produced across all expansions.
    pub generated: usize,
    /// Rejections by the visited set.
    pub duplicates: usize,
    /// Final visited-set size.
    pub visited: usize,
    /// Largest frontier observed.
    pub peak_frontier: usize,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// A finished search: the goal, if one was reached, plus its counters.
#[derive(Debug, Clone)]
pub struct SearchOutcome<N> {
    pub goal: Option<N>,
    pub stats: SearchStats,
}

/// Breadth-first search from `start`; `None` when the space holds no goal.
///
/// The frontier is a FIFO queue and children enter the visited set as they
/// are queued, so the first goal dequeued lies at minimal depth: every edge
/// deepens the path by exactly one move.
pub fn breadth_first<N: SearchNode>(start: N) -> Option<N> {
    breadth_first_with_stats(start).goal
}

/// [`breadth_first`], returning its counters as well.
pub fn breadth_first_with_stats<N: SearchNode>(start: N) -> SearchOutcome<N> {
    let began = Instant::now();
    let mut stats = SearchStats::default();
    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();
    visited.insert(start.clone());
    frontier.push_back(start);
    stats.peak_frontier = 1;

    let mut goal = None;
    while let Some(node) = frontier.pop_front() {
        if node.is_goal() {
            goal = Some(node);
            break;
        }
        stats.expanded += 1;
        for child in node.children() {
            stats.generated += 1;
            if visited.insert(child.clone()) {
                frontier.push_back(child);
            } else {
                stats.duplicates += 1;
            }
        }
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());
    }

    stats.visited = visited.len();
    stats.elapsed = began.elapsed();
    SearchOutcome { goal, stats }
}

/// Depth-first search from `start`; `None` when the space holds no goal.
///
/// The frontier is a LIFO stack and the visited check happens at pop time,
/// not push time, so a state can sit in the stack several times before its
/// first visit is recorded. The goal found carries no shortest-path claim.
pub fn depth_first<N: SearchNode>(start: N) -> Option<N> {
    depth_first_with_stats(start).goal
}

/// [`depth_first`], returning its counters as well.
pub fn depth_first_with_stats<N: SearchNode>(start: N) -> SearchOutcome<N> {
    let began = Instant::now();
    let mut stats = SearchStats::default();
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    stats.peak_frontier = 1;

    let mut goal = None;
    while let Some(node) = stack.pop() {
        if !visited.insert(node.clone()) {
            stats.duplicates += 1;
            continue;
        }
        if node.is_goal() {
            goal = Some(node);
            break;
        }
        stats.expanded += 1;
        for child in node.children() {
            stats.generated += 1;
            stack.push(child);
        }
        stats.peak_frontier = stats.peak_frontier.max(stack.len());
    }

    stats.visited = visited.len();
    stats.elapsed = began.elapsed();
    SearchOutcome { goal, stats }
}

/// Walk parent links from a found goal back to the root.
///
/// Index 0 is the goal and the last entry is the root; an absent goal gives
/// an empty path.
pub fn backtrack<N: SearchNode>(goal: Option<N>) -> Vec<N> {
    let mut path = Vec::new();
    let mut cursor = goal;
    while let Some(node) = cursor {
        cursor = node.parent();
        path.push(node);
    }
    path
}
