use crate::{
    expr::{Accessor, Compiled, Param, Predicate, PredicateOpt, PredicateShape},
    search::{ChildSource, ResponseError},
};
use std::{fmt, slice};

///
/// ChildSearch
///
/// Search instance over a parent slice: owns the child selector, the
/// canonical param, the registered accessor set, and the accumulated
/// predicate. Conditions join conjunctively across calls; accessors within
/// one condition join disjunctively. Enumerating a `&ChildSearch` compiles
/// the predicate for that pass and streams the parents that have at least
/// one matching child, in input order.
///
/// The instance is not internally synchronized; concurrent enumerations of
/// one instance are the caller's responsibility.
///

pub struct ChildSearch<'a, P, C, T, S> {
    parents: &'a [P],
    selector: S,
    param: Param,
    accessors: Vec<Accessor<C, T>>,
    predicate: PredicateOpt<C, T>,
}

impl<'a, P, C, T, S> ChildSearch<'a, P, C, T, S> {
    /// Begin a search bound to one property accessor. The accessor is
    /// rebound onto this search's canonical param.
    #[must_use]
    pub fn new(parents: &'a [P], selector: S, property: Accessor<C, T>) -> Self {
        let param = Param::fresh();
        let accessors = vec![property.rebind(param)];

        Self {
            parents,
            selector,
            param,
            accessors,
            predicate: PredicateOpt::none(),
        }
    }

    /// Register another property accessor. Conditions added after this
    /// call match when any registered accessor satisfies them; conditions
    /// already joined are unaffected.
    #[must_use]
    pub fn with(mut self, property: Accessor<C, T>) -> Self {
        self.accessors.push(property.rebind(self.param));
        self
    }

    /// Join a prebuilt fragment conjunctively. The fragment is rebound
    /// onto this search's canonical param first (full tree rewrite), so
    /// fragments built from stray accessors compose correctly.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate<C, T>) -> Self {
        let bound = predicate.rebind(self.param);
        self.apply(bound);
        self
    }

    // Join-and-also: the sole combination rule across condition calls.
    fn apply(&mut self, fragment: Predicate<C, T>) {
        let existing = PredicateOpt(self.predicate.take());
        self.predicate = existing & PredicateOpt(Some(fragment));
    }

    // --- Conditions ---

    /// Any registered property is greater than `value`.
    #[must_use]
    pub fn gt(mut self, value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        let fragment = Predicate::gt(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property is greater than or equal to `value`.
    #[must_use]
    pub fn gte(mut self, value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        let fragment = Predicate::gte(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property is less than `value`.
    #[must_use]
    pub fn lt(mut self, value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        let fragment = Predicate::lt(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property is less than or equal to `value`.
    #[must_use]
    pub fn lte(mut self, value: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        let fragment = Predicate::lte(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property lies in `[min, max]`, inclusive both ends.
    /// An inverted range matches nothing.
    #[must_use]
    pub fn between(mut self, min: T, max: T) -> Self
    where
        T: PartialOrd + Clone,
    {
        let fragment = Predicate::between(&self.accessors, min, max);
        self.apply(fragment);
        self
    }

    /// Any registered property equals `value`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn eq(mut self, value: T) -> Self
    where
        T: PartialEq + Clone,
    {
        let fragment = Predicate::eq(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property equals any of `values`. An empty value set
    /// matches nothing.
    #[must_use]
    pub fn eq_any(mut self, values: &[T]) -> Self
    where
        T: PartialEq + Clone,
    {
        let fragment = Predicate::eq_any(&self.accessors, values);
        self.apply(fragment);
        self
    }

    // --- Diagnostics ---

    /// Structural summary of the accumulated predicate, if any.
    #[must_use]
    pub fn shape(&self) -> Option<PredicateShape> {
        self.predicate.as_ref().map(Predicate::shape)
    }
}

impl<'a, P, C, T, S, CS> ChildSearch<'a, P, C, T, S>
where
    C: 'a,
    S: Fn(&'a P) -> CS,
    CS: ChildSource<'a, C>,
{
    /// Start a fresh enumeration pass.
    pub fn iter(&self) -> Matches<'a, '_, P, C, S> {
        self.into_iter()
    }

    /// First matching parent, if any.
    #[must_use]
    pub fn first(&self) -> Option<&'a P> {
        self.iter().next()
    }

    /// True when at least one parent matches.
    #[must_use]
    pub fn any_match(&self) -> bool {
        self.first().is_some()
    }

    /// Number of matching parents.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Require exactly one matching parent.
    pub fn one(&self) -> Result<&'a P, ResponseError> {
        let mut matches = self.iter();
        let first = matches.next().ok_or(ResponseError::NotFound)?;

        match matches.count() {
            0 => Ok(first),
            rest => Err(ResponseError::NotUnique { count: rest + 1 }),
        }
    }

    /// Require at most one matching parent.
    pub fn one_opt(&self) -> Result<Option<&'a P>, ResponseError> {
        let mut matches = self.iter();
        let Some(first) = matches.next() else {
            return Ok(None);
        };

        match matches.count() {
            0 => Ok(Some(first)),
            rest => Err(ResponseError::NotUnique { count: rest + 1 }),
        }
    }
}

impl<'a, P, C, T, S> fmt::Debug for ChildSearch<'a, P, C, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSearch")
            .field("parents", &self.parents.len())
            .field("param", &self.param)
            .field("accessors", &self.accessors)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}

impl<'a, 's, P, C, T, S, CS> IntoIterator for &'s ChildSearch<'a, P, C, T, S>
where
    C: 'a,
    S: Fn(&'a P) -> CS,
    CS: ChildSource<'a, C>,
{
    type Item = &'a P;
    type IntoIter = Matches<'a, 's, P, C, S>;

    // Compilation happens here, once per pass: a fresh pass recompiles and
    // an abandoned pass drops the closure with no teardown.
    fn into_iter(self) -> Self::IntoIter {
        Matches {
            parents: self.parents.iter(),
            selector: &self.selector,
            test: self
                .predicate
                .as_ref()
                .map(|predicate| predicate.compile(self.param)),
        }
    }
}

///
/// Matches
///
/// One enumeration pass: pull-based, streaming, no result caching. With no
/// accumulated condition the pass is the parent sequence unchanged;
/// otherwise each parent is tested with the existential child quantifier,
/// short-circuiting at its first matching child.
///

pub struct Matches<'a, 's, P, C, S> {
    parents: slice::Iter<'a, P>,
    selector: &'s S,
    test: Option<Compiled<'s, C>>,
}

impl<'a, P, C, S, CS> Iterator for Matches<'a, '_, P, C, S>
where
    C: 'a,
    S: Fn(&'a P) -> CS,
    CS: ChildSource<'a, C>,
{
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(test) = &self.test else {
            return self.parents.next();
        };

        let selector = self.selector;
        self.parents
            .find(|&parent| selector(parent).children().any(|child| test(child)))
    }
}
