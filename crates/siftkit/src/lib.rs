//! siftkit — typed fluent search over in-memory collections.
//!
//! Filter a slice of parent records by conditions on properties of each
//! parent's child records: a parent matches when at least one of its
//! children satisfies every accumulated condition. A flat sibling surface
//! applies the same conditions to a collection's own properties.
//!
//! Conditions compose through an immutable predicate tree. Accessors are
//! symbolic (a named getter bound to a placeholder param); every search
//! rebinds the accessors and fragments it absorbs onto one canonical param
//! so they can be compiled into a single closure. Compilation happens once
//! per enumeration pass, and enumeration is a streaming, restartable,
//! order-preserving filter.
//!
//! ```rust,ignore
//! use siftkit::{Accessor, SearchExt as _};
//!
//! let adults = families
//!     .search_children(|f: &Family| &f.members, Accessor::new("age", |m: &Member| m.age))
//!     .gte(18)
//!     .lt(65);
//!
//! for family in &adults {
//!     // families with at least one member aged 18..=64
//! }
//! ```
//!
//! ## Crate layout
//! - `expr`: params, accessors, the predicate AST, and its compilation.
//! - `search`: the fluent child/value search surfaces.

pub mod expr;
pub mod search;

pub use expr::{Accessor, Compare, CompareOp, Param, Predicate, PredicateOpt, PredicateShape};
pub use search::{ChildSearch, ChildSource, ResponseError, SearchExt, ValueSearch};

/// Crate version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        expr::{Accessor, CompareOp, Predicate, PredicateShape},
        search::{ChildSearch, ChildSource as _, ResponseError, SearchExt as _, ValueSearch},
    };
}
