#[inline]
#[cold]
fn cold() {}

/// Hints that `b` is almost always true.
#[inline]
pub(crate) fn likely(b: bool) -> bool {
    if !b {
        cold()
    }
    b
}

/// Hints that `b` is almost always false.
#[inline]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold()
    }
    b
}
