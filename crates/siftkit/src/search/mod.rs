mod children;
mod source;
mod values;

pub use children::{ChildSearch, Matches};
pub use source::ChildSource;
pub use values::{ValueMatches, ValueSearch};

use crate::expr::Accessor;
use thiserror::Error as ThisError;

///
/// ResponseError
/// Cardinality errors from the `one` / `one_opt` helpers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum ResponseError {
    #[error("expected exactly one match, found 0")]
    NotFound,

    #[error("expected exactly one match, found {count}")]
    NotUnique { count: usize },
}

///
/// SearchExt
///
/// Entry-point extension trait on slices. Bring it into scope with
/// `use siftkit::SearchExt as _;` and start searches straight off a
/// collection.
///

pub trait SearchExt<P> {
    /// Search parents by conditions on a property of their children.
    fn search_children<'a, C, T, S>(
        &'a self,
        selector: S,
        property: Accessor<C, T>,
    ) -> ChildSearch<'a, P, C, T, S>;

    /// Search elements by conditions on their own properties.
    fn search_values<V>(&self, property: Accessor<P, V>) -> ValueSearch<'_, P, V>;
}

impl<P> SearchExt<P> for [P] {
    fn search_children<'a, C, T, S>(
        &'a self,
        selector: S,
        property: Accessor<C, T>,
    ) -> ChildSearch<'a, P, C, T, S> {
        ChildSearch::new(self, selector, property)
    }

    fn search_values<V>(&self, property: Accessor<P, V>) -> ValueSearch<'_, P, V> {
        ValueSearch::new(self, property)
    }
}
