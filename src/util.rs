/// Safe numeric conversion helpers.
///
/// Conversions between `f64`, `i64` and `usize` that refuse to lose data
/// silently. Used by the indexing, bitwise and factorial kernels, where a
/// fractional or oversized number is a user error rather than something to
/// truncate.
pub mod num;
