#![forbid(unsafe_code)]
//! An overlapping-hierarchy container.
//!
//! [`OverlappingHierarchy`] generalizes a tree: a node may have several
//! parents (so subtrees can be shared) while the structure stays acyclic
//! and transitively reduced — no node is its own ancestor, and no direct
//! edge duplicates what a longer path already implies. Every attachment is
//! validated up front and rejected with a typed [`AttachError`] instead of
//! corrupting the relation.
//!
//! ```
//! use std::collections::HashSet;
//!
//! use overlap::OverlappingHierarchy;
//!
//! let mut family = OverlappingHierarchy::new();
//! family.add("grandparent");
//! family.attach("parent", "grandparent")?;
//! family.attach("child", "parent")?;
//!
//! assert_eq!(family.parents(&"child"), Some(HashSet::from(["parent"])));
//! assert_eq!(
//!     family.ancestors(&"child"),
//!     Some(HashSet::from(["grandparent", "parent"]))
//! );
//!
//! // grandparent already reaches child through parent, so the shortcut
//! // edge is refused and the structure is left untouched.
//! assert!(family.attach("child", "grandparent").is_err());
//! # Ok::<(), overlap::AttachError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: structural-validation failures are returned as
//!   [`AttachError`] values; nothing in the library panics.
//! - **Logging**: `tracing` macros (`trace!` on mutations, `debug!` on
//!   rejected attachments).

pub mod error;
pub mod hierarchy;

pub use error::{AttachError, EdgeRedundancy};
pub use hierarchy::OverlappingHierarchy;
