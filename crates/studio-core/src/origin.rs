//! Sender origin allow-list.

/// Origin reported by sandboxed and other opaque-origin documents.
pub const OPAQUE_ORIGIN: &str = "null";

/// Decides which sender origins may drive the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
    wildcard: bool,
}

impl OriginPolicy {
    pub fn new<I: IntoIterator<Item = String>>(origins: I) -> Self {
        let allowed: Vec<String> = origins.into_iter().filter(|o| !o.is_empty()).collect();
        let wildcard = allowed.iter().any(|o| o == "*");
        Self { allowed, wildcard }
    }

    /// `"null"` is always accepted, then wildcard, then exact match.
    pub fn is_allowed(&self, origin: &str) -> bool {
        origin == OPAQUE_ORIGIN || self.wildcard || self.allowed.iter().any(|o| o == origin)
    }
}
