use crate::expr::CompareOp;
use serde::{Deserialize, Serialize};

///
/// PredicateShape
///
/// Serializable structural summary of a predicate tree: accessor names and
/// operators, without operand values. Property types carry no `Serialize`
/// requirement, so diagnostics report structure only. This is what
/// `Debug` on a predicate prints and what tests snapshot.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PredicateShape {
    Compare { accessor: String, op: CompareOp },
    And(Vec<Self>),
    Or(Vec<Self>),
}
