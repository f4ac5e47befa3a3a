//! Schema-driven engine: ABI validation plus the recursive encoder/decoder.

mod marshaler;
mod schema;

pub use marshaler::Marshaler;

/// Deepest value nesting the engine will walk.
///
/// Each struct field and each array element counts as one level, which
/// bounds recursion on hostile input such as long chains of `[]Node`.
pub const MAX_NESTING_DEPTH: usize = 64;
