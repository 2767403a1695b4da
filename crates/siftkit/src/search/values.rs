use crate::{
    expr::{Accessor, Compiled, Param, Predicate, PredicateOpt, PredicateShape},
    search::ResponseError,
};
use std::{fmt, slice};

///
/// ValueSearch
///
/// Flat sibling of `ChildSearch`: the same condition factory and
/// join-and-also composition, with the compiled predicate applied to each
/// element itself instead of quantified over a child collection. This is
/// the surface that exercises the cross-product `eq_any` path.
///

pub struct ValueSearch<'a, T, V> {
    items: &'a [T],
    param: Param,
    accessors: Vec<Accessor<T, V>>,
    predicate: PredicateOpt<T, V>,
}

impl<'a, T, V> ValueSearch<'a, T, V> {
    /// Begin a search bound to one property accessor.
    #[must_use]
    pub fn new(items: &'a [T], property: Accessor<T, V>) -> Self {
        let param = Param::fresh();
        let accessors = vec![property.rebind(param)];

        Self {
            items,
            param,
            accessors,
            predicate: PredicateOpt::none(),
        }
    }

    /// Register another property accessor for subsequent conditions.
    #[must_use]
    pub fn with(mut self, property: Accessor<T, V>) -> Self {
        self.accessors.push(property.rebind(self.param));
        self
    }

    /// Join a prebuilt fragment conjunctively, rebound onto this search's
    /// canonical param.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate<T, V>) -> Self {
        let bound = predicate.rebind(self.param);
        self.apply(bound);
        self
    }

    fn apply(&mut self, fragment: Predicate<T, V>) {
        let existing = PredicateOpt(self.predicate.take());
        self.predicate = existing & PredicateOpt(Some(fragment));
    }

    // --- Conditions ---

    /// Any registered property is greater than `value`.
    #[must_use]
    pub fn gt(mut self, value: V) -> Self
    where
        V: PartialOrd + Clone,
    {
        let fragment = Predicate::gt(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property is greater than or equal to `value`.
    #[must_use]
    pub fn gte(mut self, value: V) -> Self
    where
        V: PartialOrd + Clone,
    {
        let fragment = Predicate::gte(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property is less than `value`.
    #[must_use]
    pub fn lt(mut self, value: V) -> Self
    where
        V: PartialOrd + Clone,
    {
        let fragment = Predicate::lt(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property is less than or equal to `value`.
    #[must_use]
    pub fn lte(mut self, value: V) -> Self
    where
        V: PartialOrd + Clone,
    {
        let fragment = Predicate::lte(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property lies in `[min, max]`, inclusive both ends.
    #[must_use]
    pub fn between(mut self, min: V, max: V) -> Self
    where
        V: PartialOrd + Clone,
    {
        let fragment = Predicate::between(&self.accessors, min, max);
        self.apply(fragment);
        self
    }

    /// Any registered property equals `value`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn eq(mut self, value: V) -> Self
    where
        V: PartialEq + Clone,
    {
        let fragment = Predicate::eq(&self.accessors, value);
        self.apply(fragment);
        self
    }

    /// Any registered property equals any of `values`.
    #[must_use]
    pub fn eq_any(mut self, values: &[V]) -> Self
    where
        V: PartialEq + Clone,
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

    // --- Consumption ---

    /// Start a fresh enumeration pass.
    pub fn iter(&self) -> ValueMatches<'a, '_, T> {
        self.into_iter()
    }

    /// First matching element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&'a T> {
        self.iter().next()
    }

    /// True when at least one element matches.
    #[must_use]
    pub fn any_match(&self) -> bool {
        self.first().is_some()
    }

    /// Number of matching elements.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Require exactly one matching element.
    pub fn one(&self) -> Result<&'a T, ResponseError> {
        let mut matches = self.iter();
        let first = matches.next().ok_or(ResponseError::NotFound)?;

        match matches.count() {
            0 => Ok(first),
            rest => Err(ResponseError::NotUnique { count: rest + 1 }),
        }
    }

    /// Require at most one matching element.
    pub fn one_opt(&self) -> Result<Option<&'a T>, ResponseError> {
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

impl<'a, T, V> fmt::Debug for ValueSearch<'a, T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSearch")
            .field("items", &self.items.len())
            .field("param", &self.param)
            .field("accessors", &self.accessors)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}

impl<'a, 's, T, V> IntoIterator for &'s ValueSearch<'a, T, V> {
    type Item = &'a T;
    type IntoIter = ValueMatches<'a, 's, T>;

    // Compiled once per pass, dropped when the pass ends.
    fn into_iter(self) -> Self::IntoIter {
        ValueMatches {
            items: self.items.iter(),
            test: self
                .predicate
                .as_ref()
                .map(|predicate| predicate.compile(self.param)),
        }
    }
}

///
/// ValueMatches
///
/// One enumeration pass over a flat search: pass-through when no condition
/// was added, a stable filter otherwise.
///

pub struct ValueMatches<'a, 's, T> {
    items: slice::Iter<'a, T>,
    test: Option<Compiled<'s, T>>,
}

impl<'a, T> Iterator for ValueMatches<'a, '_, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(test) = &self.test else {
            return self.items.next();
        };

        self.items.find(|&item| test(item))
    }
}
