use crate::expr::Param;
use std::{fmt, sync::Arc};

///
/// Accessor
///
/// Symbolic property accessor: a named getter `Fn(&C) -> T` bound to a
/// `Param`. The name is diagnostic only (it feeds the shape layer); the
/// param is semantic. A fresh accessor carries a fresh param, which is why
/// every consumer rebinds accessors onto its own canonical param before
/// composing them.
///

pub struct Accessor<C, T> {
    param: Param,
    name: &'static str,
    getter: Arc<dyn Fn(&C) -> T>,
}

impl<C, T> Accessor<C, T> {
    #[must_use]
    pub fn new(name: &'static str, getter: impl Fn(&C) -> T + 'static) -> Self {
        Self {
            param: Param::fresh(),
            name,
            getter: Arc::new(getter),
        }
    }

    #[must_use]
    pub const fn param(&self) -> Param {
        self.param
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Structurally identical accessor bound to `param`.
    ///
    /// Rebinding onto the param the accessor already carries is a no-op,
    /// not an error.
    #[must_use]
    pub fn rebind(&self, param: Param) -> Self {
        Self {
            param,
            name: self.name,
            getter: Arc::clone(&self.getter),
        }
    }

    /// Read the property off an element.
    pub(crate) fn get(&self, element: &C) -> T {
        (self.getter)(element)
    }
}

impl<C, T> Clone for Accessor<C, T> {
    fn clone(&self) -> Self {
        Self {
            param: self.param,
            name: self.name,
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<C, T> fmt::Debug for Accessor<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("param", &self.param)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Child {
        age: i64,
    }

    #[test]
    fn rebind_preserves_structure() {
        let accessor = Accessor::new("age", |c: &Child| c.age);
        let canonical = Param::fresh();
        let bound = accessor.rebind(canonical);

        assert_ne!(accessor.param(), bound.param());
        assert_eq!(bound.param(), canonical);
        assert_eq!(bound.name(), "age");
        assert_eq!(bound.get(&Child { age: 7 }), 7);
    }

    #[test]
    fn rebind_onto_own_param_is_noop() {
        let accessor = Accessor::new("age", |c: &Child| c.age);
        let bound = accessor.rebind(accessor.param());
        assert_eq!(bound.param(), accessor.param());
    }
}
