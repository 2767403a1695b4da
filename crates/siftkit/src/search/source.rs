use std::{iter::Flatten, option, slice};

///
/// ChildSource
///
/// Abstraction over a child-selector result. Decouples parent enumeration
/// from the concrete collection type a selector returns; an absent
/// (`None`) collection behaves as an empty one, so a parent without
/// children simply never matches once a condition exists.
///

pub trait ChildSource<'a, C: 'a> {
    type Iter: Iterator<Item = &'a C>;

    fn children(self) -> Self::Iter;
}

impl<'a, C> ChildSource<'a, C> for &'a [C] {
    type Iter = slice::Iter<'a, C>;

    fn children(self) -> Self::Iter {
        self.iter()
    }
}

impl<'a, C> ChildSource<'a, C> for &'a Vec<C> {
    type Iter = slice::Iter<'a, C>;

    fn children(self) -> Self::Iter {
        self.iter()
    }
}

impl<'a, C, S> ChildSource<'a, C> for Option<S>
where
    C: 'a,
    S: ChildSource<'a, C>,
{
    type Iter = Flatten<option::IntoIter<S::Iter>>;

    fn children(self) -> Self::Iter {
        self.map(ChildSource::children).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_yields_children_in_order() {
        let items = [1, 2, 3];
        let collected: Vec<_> = items.as_slice().children().copied().collect();
        assert_eq!(collected, vec![1, 2, 3]);
    }

    #[test]
    fn absent_source_is_empty() {
        let missing: Option<&[i64]> = None;
        assert_eq!(missing.children().count(), 0);

        let present: Option<&[i64]> = Some(&[4, 5]);
        assert_eq!(present.children().count(), 2);
    }
}
