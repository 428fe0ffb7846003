//! The overlapping-hierarchy engine.
//!
//! [`OverlappingHierarchy`] owns a set of nodes and a parent→child relation
//! in which a node may have several parents and several children. Two
//! invariants hold after every successful mutation:
//!
//! - **Acyclicity**: no node is its own ancestor.
//! - **Transitive reduction**: no direct edge is implied by a longer path
//!   through other edges, and no insertion is accepted that would make an
//!   existing edge so implied.
//!
//! Every structural mutation funnels through the same validation, so the
//! traversal queries never need cycle guards of their own. Any future
//! mutation path must keep that ordering: validate first, then write.
//!
//! # Virtual root
//!
//! "Top level" membership is addressed through a pseudo-parent distinct from
//! every real node, expressed in the query API as an `Option<&N>` argument
//! where `None` names the virtual root. Its child set is exactly the set of
//! hierarchs (nodes with no parent), computed from the relation rather than
//! stored, so it can never drift out of sync with the edges. The virtual
//! root is always addressable and is never a member of [`nodes`].
//!
//! # Ownership of results
//!
//! Every query returns an owned, independent copy. Mutating a returned set
//! never touches the store, and mutating the store never invalidates a
//! previously returned set.
//!
//! # Scale
//!
//! No reverse-adjacency index is kept: parent lookup scans the child sets,
//! O(nodes + edges). That favors a single small map over query latency and
//! is the intended trade-off for small-to-moderate node counts. A reverse
//! index could be added later without changing observable behavior.
//!
//! [`nodes`]: OverlappingHierarchy::nodes

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use tracing::{debug, trace};

use crate::error::{AttachError, EdgeRedundancy};

// ---------------------------------------------------------------------------
// OverlappingHierarchy
// ---------------------------------------------------------------------------

/// An acyclic, transitively reduced parent→child relation over nodes of
/// type `N`.
///
/// Nodes carry no payload beyond their identity; equality and hashing of
/// `N` decide which values are the same node. Presence as a key in the
/// internal map is what marks membership, independent of having any edges.
///
/// Copy construction is [`Clone`]: the copy owns its entire relation, and
/// subsequent mutation of either side is invisible to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlappingHierarchy<N>
where
    N: Eq + Hash + Clone,
{
    /// Direct-children sets, keyed by member node.
    children: HashMap<N, HashSet<N>>,
}

impl<N> Default for OverlappingHierarchy<N>
where
    N: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> OverlappingHierarchy<N>
where
    N: Eq + Hash + Clone,
{
    /// Create an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
        }
    }

    /// Number of member nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the hierarchy has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if `node` is a member.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.children.contains_key(node)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add `node` as a member with no edges — the attach-to-virtual-root
    /// operation.
    ///
    /// Idempotent: adding an existing member changes nothing, including its
    /// edges. Infallible: none of the attach validations can fail against
    /// the virtual root, because every descendant of a real node has a
    /// parent and therefore is never a hierarch.
    pub fn add(&mut self, node: N) {
        self.children.entry(node).or_default();
        trace!(nodes = self.children.len(), "node added");
    }

    /// Attach `node` as a direct child of `parent`.
    ///
    /// Either endpoint that is not yet a member is created. Re-attaching an
    /// existing direct edge is a no-op that returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in order, with the store left
    /// unmodified:
    ///
    /// - [`AttachError::Loop`] if `node == parent`.
    /// - [`AttachError::Cycle`] if `parent` is already a descendant of
    ///   `node`.
    /// - [`AttachError::TransitiveReduction`] with
    ///   [`EdgeRedundancy::NonChildDescendant`] if `node` is already a
    ///   non-direct descendant of `parent`.
    /// - [`AttachError::TransitiveReduction`] with
    ///   [`EdgeRedundancy::DescendantAlreadyChild`] if a descendant of
    ///   `node` is already a direct child of `parent`.
    pub fn attach(&mut self, node: N, parent: N) -> Result<(), AttachError> {
        if let Err(err) = self.validate_attach(&node, &parent) {
            debug!(%err, "attach rejected");
            return Err(err);
        }

        self.children
            .entry(parent)
            .or_default()
            .insert(node.clone());
        self.children.entry(node).or_default();
        trace!(nodes = self.children.len(), "edge attached");
        Ok(())
    }

    /// Remove the direct edge `parent → node` if present.
    ///
    /// No-op if the edge (or either endpoint) is absent. Neither node loses
    /// membership; a child detached from its only parent becomes a
    /// hierarch.
    pub fn detach(&mut self, node: &N, parent: &N) {
        if self
            .children
            .get_mut(parent)
            .is_some_and(|kids| kids.remove(node))
        {
            trace!("edge detached");
        }
    }

    /// Remove `node` from the hierarchy along with every edge touching it.
    ///
    /// Former children and parents stay members; a former child becomes a
    /// hierarch only if `node` was its only parent. Deleting an unknown
    /// node is a no-op.
    pub fn delete(&mut self, node: &N) {
        self.children.remove(node);
        for kids in self.children.values_mut() {
            kids.remove(node);
        }
        trace!(nodes = self.children.len(), "node deleted");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The full node set. The virtual root is never included.
    #[must_use]
    pub fn nodes(&self) -> HashSet<N> {
        self.children.keys().cloned().collect()
    }

    /// The nodes with no parent — the children of the virtual root.
    #[must_use]
    pub fn hierarchs(&self) -> HashSet<N> {
        self.hierarch_refs().into_iter().cloned().collect()
    }

    /// Direct children of `parent`, where `None` addresses the virtual
    /// root.
    ///
    /// Returns `None` for an unknown real parent. The virtual root is
    /// always present; its children are the hierarchs.
    #[must_use]
    pub fn children(&self, parent: Option<&N>) -> Option<HashSet<N>> {
        match parent {
            Some(parent) => self
                .children
                .get(parent)
                .map(|kids| kids.iter().cloned().collect()),
            None => Some(self.hierarchs()),
        }
    }

    /// All nodes reachable from `node` through child edges, where `None`
    /// addresses the virtual root (yielding the full node set).
    ///
    /// Returns `None` for an unknown real node.
    #[must_use]
    pub fn descendants(&self, node: Option<&N>) -> Option<HashSet<N>> {
        self.descendants_within(node, usize::MAX)
    }

    /// Nodes reachable from `node` through at most `depth` child edges.
    ///
    /// A depth of 1 is exactly the direct-children set; a depth of 0 is
    /// empty. `None` addresses the virtual root, so depth 1 from the root
    /// yields the hierarchs. Returns `None` for an unknown real node.
    #[must_use]
    pub fn descendants_within(&self, node: Option<&N>, depth: usize) -> Option<HashSet<N>> {
        let frontier = match node {
            Some(node) => {
                if !self.contains(node) {
                    return None;
                }
                self.child_refs(node)
            }
            None => self.hierarch_refs(),
        };
        let reached = sweep(frontier, depth, |n| self.child_refs(n));
        Some(reached.into_iter().cloned().collect())
    }

    /// All nodes that reach `node` through child edges.
    ///
    /// Returns `None` for an unknown node. A hierarch has an empty (not
    /// absent) ancestor set.
    #[must_use]
    pub fn ancestors(&self, node: &N) -> Option<HashSet<N>> {
        self.ancestors_within(node, usize::MAX)
    }

    /// Nodes that reach `node` through at most `depth` child edges.
    ///
    /// A depth of 1 is exactly the direct-parents set. Returns `None` for
    /// an unknown node.
    #[must_use]
    pub fn ancestors_within(&self, node: &N, depth: usize) -> Option<HashSet<N>> {
        if !self.contains(node) {
            return None;
        }
        let reached = sweep(self.parent_refs(node), depth, |n| self.parent_refs(n));
        Some(reached.into_iter().cloned().collect())
    }

    /// Direct parents of `node`, found by scanning the child sets.
    ///
    /// Returns `None` for an unknown node.
    #[must_use]
    pub fn parents(&self, node: &N) -> Option<HashSet<N>> {
        self.ancestors_within(node, 1)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Run the four attach checks without mutating anything.
    fn validate_attach(&self, node: &N, parent: &N) -> Result<(), AttachError> {
        if node == parent {
            return Err(AttachError::Loop);
        }
        if self.reaches(node, parent) {
            return Err(AttachError::Cycle);
        }

        let already_direct = self
            .children
            .get(parent)
            .is_some_and(|kids| kids.contains(node));
        if !already_direct && self.reaches(parent, node) {
            return Err(AttachError::TransitiveReduction(
                EdgeRedundancy::NonChildDescendant,
            ));
        }

        if let Some(kids) = self.children.get(parent) {
            let below = sweep(self.child_refs(node), usize::MAX, |n| self.child_refs(n));
            if below.iter().any(|descendant| kids.contains(*descendant)) {
                return Err(AttachError::TransitiveReduction(
                    EdgeRedundancy::DescendantAlreadyChild,
                ));
            }
        }

        Ok(())
    }

    /// Is `to` reachable from `from` through child edges? BFS with early
    /// exit; an absent `from` reaches nothing.
    fn reaches(&self, from: &N, to: &N) -> bool {
        let mut visited: HashSet<&N> = HashSet::new();
        let mut queue: VecDeque<&N> = VecDeque::new();
        for child in self.children.get(from).into_iter().flatten() {
            if visited.insert(child) {
                queue.push_back(child);
            }
        }

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for child in self.children.get(current).into_iter().flatten() {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        false
    }

    /// Borrowed direct children of `node`; empty if `node` is absent.
    fn child_refs(&self, node: &N) -> Vec<&N> {
        self.children.get(node).into_iter().flatten().collect()
    }

    /// Borrowed direct parents of `node`, by scanning every child set.
    fn parent_refs(&self, node: &N) -> Vec<&N> {
        self.children
            .iter()
            .filter(|(_, kids)| kids.contains(node))
            .map(|(parent, _)| parent)
            .collect()
    }

    /// Borrowed set of nodes that appear in no child set.
    fn hierarch_refs(&self) -> Vec<&N> {
        let mut tops: HashSet<&N> = self.children.keys().collect();
        for kids in self.children.values() {
            for child in kids {
                tops.remove(child);
            }
        }
        tops.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Level-order expansion of `frontier` through `expand`, for at most
/// `depth` levels. Returns every node visited; the origin the frontier was
/// derived from is not part of the result.
///
/// The visited set doubles as the usual BFS dedup for nodes reachable along
/// several paths; termination does not depend on it, since the relation is
/// acyclic by construction.
fn sweep<'a, N, F>(mut frontier: Vec<&'a N>, mut depth: usize, expand: F) -> HashSet<&'a N>
where
    N: Eq + Hash,
    F: Fn(&'a N) -> Vec<&'a N>,
{
    let mut visited: HashSet<&'a N> = HashSet::new();
    while depth > 0 && !frontier.is_empty() {
        let mut next: Vec<&'a N> = Vec::new();
        for node in frontier {
            if visited.insert(node) {
                next.extend(expand(node).into_iter().filter(|n| !visited.contains(*n)));
            }
        }
        frontier = next;
        depth -= 1;
    }
    visited
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
