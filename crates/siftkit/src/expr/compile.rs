use crate::expr::{Param, Predicate};

///
/// Compiled predicate: the closure form of an AST. Built once per
/// enumeration pass, borrows the tree it was compiled from, and is dropped
/// when the pass ends — nothing is cached across passes.
///

pub(crate) type Compiled<'p, C> = Box<dyn Fn(&C) -> bool + 'p>;

impl<C, T> Predicate<C, T> {
    /// Compile the tree into a single `Fn(&C) -> bool`.
    ///
    /// INVARIANT: every accessor leaf is bound to `canonical`. Entry points
    /// rebind everything they absorb, so a foreign param here is an
    /// internal bug, not a recoverable condition.
    pub(crate) fn compile<'p>(&'p self, canonical: Param) -> Compiled<'p, C> {
        match self {
            Self::Compare(cmp) => {
                debug_assert_eq!(
                    cmp.accessor().param(),
                    canonical,
                    "accessor bound to a foreign param"
                );
                Box::new(move |element| cmp.matches(element))
            }
            Self::And(children) => {
                let tests: Vec<_> = children.iter().map(|c| c.compile(canonical)).collect();
                Box::new(move |element| tests.iter().all(|test| test(element)))
            }
            Self::Or(children) => {
                let tests: Vec<_> = children.iter().map(|c| c.compile(canonical)).collect();
                Box::new(move |element| tests.iter().any(|test| test(element)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{Accessor, Param, Predicate};

    struct Child {
        age: i64,
        size: i64,
    }

    const fn child(age: i64, size: i64) -> Child {
        Child { age, size }
    }

    fn accessors(param: Param) -> (Accessor<Child, i64>, Accessor<Child, i64>) {
        (
            Accessor::new("age", |c: &Child| c.age).rebind(param),
            Accessor::new("size", |c: &Child| c.size).rebind(param),
        )
    }

    #[test]
    fn compare_leaf_applies_test() {
        let param = Param::fresh();
        let (age, _) = accessors(param);

        let pred = Predicate::gt(&[age], 10);
        let test = pred.compile(param);

        assert!(test(&child(11, 0)));
        assert!(!test(&child(10, 0)));
    }

    #[test]
    fn and_requires_all_children() {
        let param = Param::fresh();
        let (age, _) = accessors(param);
        let set = [age];

        let pred = Predicate::gte(&set, 2).and(Predicate::lte(&set, 4));
        let test = pred.compile(param);

        assert!(test(&child(3, 0)));
        assert!(!test(&child(1, 0)));
        assert!(!test(&child(5, 0)));
    }

    #[test]
    fn or_requires_any_child() {
        let param = Param::fresh();
        let (age, size) = accessors(param);

        let pred = Predicate::eq(&[age, size], 7);
        let test = pred.compile(param);

        assert!(test(&child(7, 0)));
        assert!(test(&child(0, 7)));
        assert!(!test(&child(1, 2)));
    }

    #[test]
    fn empty_or_is_never_true() {
        let param = Param::fresh();
        let (age, _) = accessors(param);

        let pred = Predicate::eq_any(&[age], &[]);
        let test = pred.compile(param);

        assert!(!test(&child(0, 0)));
    }

    #[test]
    fn inverted_between_is_never_true() {
        let param = Param::fresh();
        let (age, _) = accessors(param);

        let pred = Predicate::between(&[age], 4, 1);
        let test = pred.compile(param);

        for age in 0..6 {
            assert!(!test(&child(age, 0)));
        }
    }
}
