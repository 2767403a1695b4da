mod accessor;
mod compile;
mod param;
mod predicate;
mod shape;

pub use accessor::Accessor;
pub(crate) use compile::Compiled;
pub use param::Param;
pub use predicate::{Compare, CompareOp, Predicate, PredicateOpt};
pub use shape::PredicateShape;
