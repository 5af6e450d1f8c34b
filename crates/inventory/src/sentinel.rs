//! Product-ID suffixes that trigger demo failure and latency.

/// Suffix that makes inventory operations fail.
pub const ERROR_SUFFIX: &str = "-with-error";

/// Suffix that makes inventory operations stall before answering.
pub const DELAY_SUFFIX: &str = "-with-delay";

/// Behavior selected by a product ID. Matching is an exact, case-sensitive
/// suffix comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    None,
    Error,
    Delay,
}

impl Sentinel {
    pub fn classify(product_id: &str) -> Self {
        if product_id.ends_with(ERROR_SUFFIX) {
            Sentinel::Error
        } else if product_id.ends_with(DELAY_SUFFIX) {
            Sentinel::Delay
        } else {
            Sentinel::None
        }
    }
}
