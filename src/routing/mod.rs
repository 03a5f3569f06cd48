//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (before serving):
//!     (method, pattern, handler)
//!     → pattern.rs (split into segments, truncate after `*name`)
//!     → trie.rs (insert segments under the method's root)
//!     → router.rs (store handler under (method, pattern))
//!
//! Lookup (per request):
//!     (method, path)
//!     → pattern.rs (split path the same way)
//!     → trie.rs (backtracking search)
//!     → router.rs (extract `:name` / `*name` params from the matched pattern)
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - One trie per HTTP method, created lazily
//! - Sibling precedence is registration order, not specificity
//! - Frozen after registration; lookups take `&self` and need no locks

pub mod pattern;
pub mod router;
pub mod trie;

pub use pattern::{match_prefix, parse_pattern};
pub use router::{RouteMatch, Router};
pub use trie::Node;
