//! Structural-validation errors for edge attachment.
//!
//! Attachment is the only fallible mutation: detaching an absent edge or
//! deleting an absent node is a no-op, and lookups on unknown nodes return
//! `None` rather than an error. Everything that can go wrong is a proposed
//! edge that would break a structural invariant, and the store is left
//! completely untouched whenever one of these errors is returned.

#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

/// Why a proposed edge would break transitive reduction.
///
/// Both cases are the same kind of failure — the edge set would stop being
/// the transitive reduction of its own reachability relation — but they
/// arise from opposite directions and carry distinct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EdgeRedundancy {
    /// The parent already reaches the node through a longer path, so the
    /// direct edge would be a shortcut implied by that path.
    #[error("cannot attach a non-child descendant as a direct child")]
    NonChildDescendant,
    /// The node reaches an existing direct child of the parent, so
    /// inserting the edge would turn that sibling edge into an implied
    /// shortcut.
    #[error("cannot attach a child whose descendant is already a direct child of the parent")]
    DescendantAlreadyChild,
}

/// A rejected edge attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The node and the proposed parent are the same node.
    #[error("cannot attach a node to itself")]
    Loop,
    /// The proposed parent is a descendant of the node; the edge would
    /// make the node its own ancestor.
    #[error("cannot attach an ancestor as a child")]
    Cycle,
    /// The edge is, or would make another edge, redundant with respect to
    /// the reachability relation.
    #[error(transparent)]
    TransitiveReduction(EdgeRedundancy),
}
