use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

///
/// Param
///
/// Placeholder symbol standing for "the element under test" inside accessor
/// and predicate trees. Identity is the whole point: accessors can only be
/// combined into one compiled closure when they carry the same param, so a
/// search instance allocates one canonical param and rebinds everything it
/// absorbs onto it.
///

static NEXT_PARAM: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Param(u64);

impl Param {
    /// Allocate a fresh, globally unique param.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_PARAM.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param#{}", self.0)
    }
}
