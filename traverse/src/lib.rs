//!
//! The functions in this mod turn a goal task into an ordered
//! list of atomic steps that can be run by structs in the `exec` mod.
//!
//! Composite tasks are expanded depth-first, left to right, so the
//! resulting order is exactly the order a sequential runner must follow.
//! Each composite task also records the range of steps it covers, so that
//! its final state can be derived from the states of its members.
//! A task listed twice (directly or through different composites) appears
//! twice, and runs twice.

/// depth-first expansion of composite tasks
mod dfs;

/// struct returned by this mod
mod traversal;
pub use traversal::{Span, Step, Traversal};

// more nesting than this can only come from a cycle
// that slipped past registry validation.
const MAX_DEPTH: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Task nesting exceeds 64 levels at '{0}' \
        (this may be due to a circular dependency)"
    )]
    TooDeep(String),
}
