//! Request path construction.
//!
//! A round trip is two requests: the outbound search, then the same search run
//! in reverse on the inbound date.

use crate::model::SearchParams;

#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{origin}/{destination}/{outboundDate}`. Absent parts render empty;
    /// callers only pass validated params.
    pub fn outbound_path(&self, p: &SearchParams) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base,
            p.origin.as_deref().unwrap_or_default(),
            p.destination.as_deref().unwrap_or_default(),
            p.outbound_date.as_deref().unwrap_or_default()
        )
    }

    /// Path of the return leg, or `None` for a one-way search.
    pub fn return_path(&self, p: &SearchParams) -> Option<String> {
        return_params(p).map(|r| self.outbound_path(&r))
    }
}

/// Working copy of `p` with the cities swapped and the inbound date moved into the
/// outbound slot. `p` itself is left untouched.
pub fn return_params(p: &SearchParams) -> Option<SearchParams> {
    let inbound = p.inbound_date.clone()?;
    Some(SearchParams {
        origin: p.destination.clone(),
        destination: p.origin.clone(),
        outbound_date: Some(inbound),
        inbound_date: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_BASE_PATH;

    #[test]
    fn outbound_path_is_stable() {
        let b = UrlBuilder::new(DEFAULT_BASE_PATH);
        let p = SearchParams::new("JFK", "LAX", "2024-01-10", None);
        assert_eq!(b.outbound_path(&p), "/api/flights/JFK/LAX/2024-01-10");
        assert_eq!(b.outbound_path(&p), b.outbound_path(&p));
        assert!(b.return_path(&p).is_none());
    }

    #[test]
    fn return_path_reverses_the_search() {
        let b = UrlBuilder::new("/api/flights/");
        let p = SearchParams::new("JFK", "LAX", "2024-01-10", Some("2024-01-15"));
        let before = p.clone();
        assert_eq!(
            b.return_path(&p).as_deref(),
            Some("/api/flights/LAX/JFK/2024-01-15")
        );
        assert_eq!(p, before);
        assert_eq!(b.outbound_path(&p), "/api/flights/JFK/LAX/2024-01-10");
    }
}
