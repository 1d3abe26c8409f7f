/// Price predicate applied to every candidate.
///
/// Passes iff `price <= max_price` and, unless `include_free` is set, the
/// price is strictly positive. The ceiling is inclusive.
pub fn evaluate(price: f64, max_price: f64, include_free: bool) -> bool {
    price <= max_price && (include_free || price > 0.0)
}
