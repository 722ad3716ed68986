//! Stack growth for the recursive expression walker.
//!
//! Templates nest expressions arbitrarily deep (long `a + b + c + ...`
//! chains, recursive user functions). Every recursive step of the evaluator
//! runs inside [`ensure_sufficient_stack`], which moves execution onto a
//! freshly allocated segment when the current one runs low.
//!
//! On `wasm32` the helper is a passthrough.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// close to exhaustion.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
