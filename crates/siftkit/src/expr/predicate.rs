use crate::expr::{Accessor, Param, PredicateShape};
use derive_more::{Deref, DerefMut, Display};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{BitAnd, BitOr},
};

///
/// CompareOp
///
/// The comparison operators a leaf can carry. Retained on the leaf for
/// diagnostics; evaluation goes through the leaf's captured test fn.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum CompareOp {
    #[display("==")]
    Eq,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
}

///
/// Compare
///
/// One comparison leaf: `accessor OP value`. The test fn is monomorphized
/// at construction under the constructor's trait bound (`PartialOrd` for
/// ordering, `PartialEq` for equality), so evaluation itself carries no
/// bounds and an unsupported comparison cannot reach runtime.
///

pub struct Compare<C, T> {
    accessor: Accessor<C, T>,
    op: CompareOp,
    value: T,
    test: fn(&T, &T) -> bool,
}

impl<C, T> Compare<C, T> {
    #[must_use]
    pub const fn accessor(&self) -> &Accessor<C, T> {
        &self.accessor
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Apply the leaf to a single element.
    pub(crate) fn matches(&self, element: &C) -> bool {
        (self.test)(&self.accessor.get(element), &self.value)
    }
}

impl<C, T: Clone> Clone for Compare<C, T> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
            op: self.op,
            value: self.value.clone(),
            test: self.test,
        }
    }
}

///
/// Predicate
///
/// Immutable boolean expression tree tested against one element:
/// comparison leaves composed with `And` / `Or`. Every accessor leaf must
/// be bound to the same canonical param before compilation; `rebind`
/// establishes that invariant and every entry point applies it.
///

pub enum Predicate<C, T> {
    Compare(Compare<C, T>),
    And(Vec<Self>),
    Or(Vec<Self>),
}

impl<C, T> Predicate<C, T> {
    // --- Condition factory ---
    //
    // Each constructor builds one fragment from a set of canonical-bound
    // accessors: OR over accessors, so the fragment holds when any
    // registered property satisfies it.

    /// `any accessor > value`
    #[must_use]
    pub fn gt(accessors: &[Accessor<C, T>], value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        Self::any_compare(accessors, CompareOp::Gt, |a, b| a > b, value)
    }

    /// `any accessor >= value`
    #[must_use]
    pub fn gte(accessors: &[Accessor<C, T>], value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        Self::any_compare(accessors, CompareOp::Gte, |a, b| a >= b, value)
    }

    /// `any accessor < value`
    #[must_use]
    pub fn lt(accessors: &[Accessor<C, T>], value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        Self::any_compare(accessors, CompareOp::Lt, |a, b| a < b, value)
    }

    /// `any accessor <= value`
    #[must_use]
    pub fn lte(accessors: &[Accessor<C, T>], value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        Self::any_compare(accessors, CompareOp::Lte, |a, b| a <= b, value)
    }

    /// `any accessor == value`
    #[must_use]
    pub fn eq(accessors: &[Accessor<C, T>], value: T) -> Self
    where
        T: PartialEq + Clone,
    {
        Self::any_compare(accessors, CompareOp::Eq, |a, b| a == b, value)
    }

    /// Cross product of (accessor, value) pairs, OR-joined: holds when any
    /// registered property equals any candidate value. An empty value set
    /// yields a never-true fragment.
    #[must_use]
    pub fn eq_any(accessors: &[Accessor<C, T>], values: &[T]) -> Self
    where
        T: PartialEq + Clone,
    {
        Self::or_all(
            values
                .iter()
                .flat_map(|value| {
                    accessors.iter().map(move |accessor| {
                        Self::leaf(accessor, CompareOp::Eq, |a, b| a == b, value.clone())
                    })
                })
                .collect(),
        )
    }

    /// `any accessor >= min AND that accessor <= max`, inclusive both ends.
    ///
    /// No normalization of an inverted range: `min > max` evaluates to
    /// never-true, by contract.
    #[must_use]
    pub fn between(accessors: &[Accessor<C, T>], min: T, max: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        Self::or_all(
            accessors
                .iter()
                .map(|accessor| {
                    Self::And(vec![
                        Self::leaf(accessor, CompareOp::Gte, |a, b| a >= b, min.clone()),
                        Self::leaf(accessor, CompareOp::Lte, |a, b| a <= b, max.clone()),
                    ])
                })
                .collect(),
        )
    }

    fn leaf(
        accessor: &Accessor<C, T>,
        op: CompareOp,
        test: fn(&T, &T) -> bool,
        value: T,
    ) -> Self {
        Self::Compare(Compare {
            accessor: accessor.clone(),
            op,
            value,
            test,
        })
    }

    fn any_compare(
        accessors: &[Accessor<C, T>],
        op: CompareOp,
        test: fn(&T, &T) -> bool,
        value: T,
    ) -> Self
    where
        T: Clone,
    {
        Self::or_all(
            accessors
                .iter()
                .map(|accessor| Self::leaf(accessor, op, test, value.clone()))
                .collect(),
        )
    }

    // A single fragment stays a leaf; zero fragments make an empty Or,
    // which evaluates to never-true.
    fn or_all(mut fragments: Vec<Self>) -> Self {
        if fragments.len() == 1 {
            fragments.remove(0)
        } else {
            Self::Or(fragments)
        }
    }

    // --- Composition ---

    /// Combine two predicates conjunctively, flattening nested `And`s
    /// (`(a AND b) AND c` becomes `AND[a, b, c]`).
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::And(mut a), Self::And(mut b)) => {
                a.append(&mut b);
                Self::And(a)
            }
            (Self::And(mut a), b) => {
                a.push(b);
                Self::And(a)
            }
            (a, Self::And(mut b)) => {
                let mut list = vec![a];
                list.append(&mut b);
                Self::And(list)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Combine two predicates disjunctively, flattening nested `Or`s
    /// similarly to `and`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Or(mut a), Self::Or(mut b)) => {
                a.append(&mut b);
                Self::Or(a)
            }
            (Self::Or(mut a), b) => {
                a.push(b);
                Self::Or(a)
            }
            (a, Self::Or(mut b)) => {
                let mut list = vec![a];
                list.append(&mut b);
                Self::Or(list)
            }
            (a, b) => Self::Or(vec![a, b]),
        }
    }

    // --- Binding ---

    /// Rebind every accessor leaf onto `param`.
    ///
    /// Full recursive rewrite over every node kind; a shallow top-level
    /// substitution would leave foreign params inside nested fragments.
    /// Leaves already bound to `param` come back unchanged in meaning.
    #[must_use]
    pub fn rebind(self, param: Param) -> Self {
        match self {
            Self::Compare(cmp) => Self::Compare(Compare {
                accessor: cmp.accessor.rebind(param),
                ..cmp
            }),
            Self::And(children) => {
                Self::And(children.into_iter().map(|c| c.rebind(param)).collect())
            }
            Self::Or(children) => Self::Or(children.into_iter().map(|c| c.rebind(param)).collect()),
        }
    }

    /// True when every accessor leaf is bound to `param`.
    #[must_use]
    pub fn is_bound_to(&self, param: Param) -> bool {
        match self {
            Self::Compare(cmp) => cmp.accessor.param() == param,
            Self::And(children) | Self::Or(children) => {
                children.iter().all(|c| c.is_bound_to(param))
            }
        }
    }

    // --- Diagnostics ---

    /// Structural summary: accessor names and operators, no operand values.
    #[must_use]
    pub fn shape(&self) -> PredicateShape {
        match self {
            Self::Compare(cmp) => PredicateShape::Compare {
                accessor: cmp.accessor.name().to_string(),
                op: cmp.op,
            },
            Self::And(children) => PredicateShape::And(children.iter().map(Self::shape).collect()),
            Self::Or(children) => PredicateShape::Or(children.iter().map(Self::shape).collect()),
        }
    }
}

impl<C, T: Clone> Clone for Predicate<C, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Compare(cmp) => Self::Compare(cmp.clone()),
            Self::And(children) => Self::And(children.clone()),
            Self::Or(children) => Self::Or(children.clone()),
        }
    }
}

impl<C, T> fmt::Debug for Predicate<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.shape(), f)
    }
}

///
/// Bit Operations
/// allow `&` and `|` on predicates
///

impl<C, T> BitAnd for Predicate<C, T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<C, T> BitOr for Predicate<C, T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

///
/// PredicateOpt
///
/// Join-and-also accumulator: `&` treats an absent side as neutral and
/// joins two present sides conjunctively. This is the sole combination
/// rule across chained condition calls — every added condition narrows the
/// match set. There is deliberately no top-level `|` counterpart on the
/// search builders: disjunction exists only inside one condition, across
/// accessors and candidate values.
///

#[repr(transparent)]
#[derive(Deref, DerefMut)]
pub struct PredicateOpt<C, T>(pub Option<Predicate<C, T>>);

impl<C, T> PredicateOpt<C, T> {
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }
}

impl<C, T> Default for PredicateOpt<C, T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<C, T: Clone> Clone for PredicateOpt<C, T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C, T> fmt::Debug for PredicateOpt<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PredicateOpt").field(&self.0).finish()
    }
}

impl<C, T> BitAnd for PredicateOpt<C, T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self(Some(a.and(b))),
            (Some(a), None) => Self(Some(a)),
            (None, Some(b)) => Self(Some(b)),
            (None, None) => Self(None),
        }
    }
}

impl<C, T> From<Option<Predicate<C, T>>> for PredicateOpt<C, T> {
    fn from(opt: Option<Predicate<C, T>>) -> Self {
        Self(opt)
    }
}

impl<C, T> From<PredicateOpt<C, T>> for Option<Predicate<C, T>> {
    fn from(opt: PredicateOpt<C, T>) -> Self {
        opt.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    struct Child {
        age: i64,
    }

    fn age() -> Accessor<Child, i64> {
        Accessor::new("age", |c: &Child| c.age)
    }

    fn bound_age(param: Param) -> Accessor<Child, i64> {
        age().rebind(param)
    }

    #[test]
    fn constructors_record_op_and_accessor() {
        let param = Param::fresh();
        let accessors = [bound_age(param)];

        for (pred, op) in [
            (Predicate::gt(&accessors, 1), CompareOp::Gt),
            (Predicate::gte(&accessors, 1), CompareOp::Gte),
            (Predicate::lt(&accessors, 1), CompareOp::Lt),
            (Predicate::lte(&accessors, 1), CompareOp::Lte),
            (Predicate::eq(&accessors, 1), CompareOp::Eq),
        ] {
            match pred {
                Predicate::Compare(cmp) => {
                    assert_eq!(cmp.op(), op);
                    assert_eq!(cmp.accessor().name(), "age");
                    assert_eq!(cmp.accessor().param(), param);
                    assert_eq!(*cmp.value(), 1);
                }
                other => panic!("expected Compare, got {other:?}"),
            }
        }
    }

    #[test]
    fn multi_accessor_fragment_is_or_joined() {
        let param = Param::fresh();
        let accessors = [bound_age(param), bound_age(param)];

        match Predicate::gt(&accessors, 10) {
            Predicate::Or(children) => assert_eq!(children.len(), 2),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn between_is_gte_and_lte_per_accessor() {
        let param = Param::fresh();
        let accessors = [bound_age(param)];

        match Predicate::between(&accessors, 1, 4) {
            Predicate::And(children) => {
                assert_eq!(children.len(), 2);
                let ops: Vec<_> = children
                    .iter()
                    .map(|c| match c {
                        Predicate::Compare(cmp) => cmp.op(),
                        other => panic!("expected Compare, got {other:?}"),
                    })
                    .collect();
                assert_eq!(ops, vec![CompareOp::Gte, CompareOp::Lte]);
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn eq_any_is_cross_product() {
        let param = Param::fresh();
        let accessors = [bound_age(param), bound_age(param)];

        match Predicate::eq_any(&accessors, &[1, 2, 3]) {
            Predicate::Or(children) => assert_eq!(children.len(), 6),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn eq_any_empty_values_is_empty_or() {
        let param = Param::fresh();
        let accessors = [bound_age(param)];

        match Predicate::eq_any(&accessors, &[]) {
            Predicate::Or(children) => assert!(children.is_empty()),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn and_flattens_nested() {
        let param = Param::fresh();
        let accessors = [bound_age(param)];
        let a = Predicate::gt(&accessors, 1);
        let b = Predicate::lt(&accessors, 9);
        let c = Predicate::eq(&accessors, 5);

        match a.and(b).and(c) {
            Predicate::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn or_flattens_nested() {
        let param = Param::fresh();
        let accessors = [bound_age(param)];
        let a = Predicate::eq(&accessors, 1);
        let b = Predicate::eq(&accessors, 2);
        let c = Predicate::eq(&accessors, 3);

        match (a | b) | c {
            Predicate::Or(children) => assert_eq!(children.len(), 3),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn rebind_rewrites_every_leaf() {
        let stray = [age(), age()];
        let fragment =
            Predicate::between(&stray, 1, 4).and(Predicate::eq_any(&stray, &[2, 3]));

        let canonical = Param::fresh();
        assert!(!fragment.is_bound_to(canonical));

        let bound = fragment.rebind(canonical);
        assert!(bound.is_bound_to(canonical));
    }

    #[test]
    fn opt_join_and_also() {
        let param = Param::fresh();
        let accessors = [bound_age(param)];

        // absent side is neutral
        let out = PredicateOpt::none() & PredicateOpt(Some(Predicate::gt(&accessors, 1)));
        assert!(matches!(out.0, Some(Predicate::Compare(_))));

        let out = PredicateOpt(Some(Predicate::gt(&accessors, 1))) & PredicateOpt::none();
        assert!(matches!(out.0, Some(Predicate::Compare(_))));

        // both present joins conjunctively
        let out = PredicateOpt(Some(Predicate::gt(&accessors, 1)))
            & PredicateOpt(Some(Predicate::lt(&accessors, 9)));
        match out.0 {
            Some(Predicate::And(children)) => assert_eq!(children.len(), 2),
            other => panic!("expected Some(And), got {other:?}"),
        }

        let out: PredicateOpt<Child, i64> = PredicateOpt::none() & PredicateOpt::none();
        assert!(out.0.is_none());
    }
}
