//! Scope policy for harvested addresses.
//!
//! Candidates pass through two stages:
//! - `prefilter`: length floor, then "does the base domain appear at all"
//! - `check_scope`: sub-domain and external-domain policy from `ScopeConfig`
//!
//! The extractor records a candidate as seen between the two stages.

use crate::config::ScopeConfig;

/// Shortest candidate still considered an address.
const MIN_CANDIDATE_LEN: usize = 4;

/// Why a candidate was not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Shorter than the minimum plausible address.
    TooShort,
    /// Base domain does not occur anywhere in the candidate.
    OffTarget,
    /// Domain is a sub-domain of the base domain and those are excluded.
    Subdomain,
    /// Domain is not on the base domain and external domains are excluded.
    External,
}

impl Rejection {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::OffTarget => "off_target",
            Self::Subdomain => "subdomain",
            Self::External => "external",
        }
    }
}

/// Case-insensitive scope checks against one base domain.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    base_domain: String,
    at_base_domain: String,
    include_subdomains: bool,
    include_external: bool,
}

impl ScopeFilter {
    /// Build a filter for `base_domain` (lowercased here) under `config`.
    pub fn new(base_domain: &str, config: &ScopeConfig) -> Self {
        let base_domain = base_domain.to_lowercase();
        Self {
            at_base_domain: format!("@{base_domain}"),
            base_domain,
            include_subdomains: config.include_subdomains,
            include_external: config.include_external,
        }
    }

    /// The lowercased base domain.
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Coarse relevance check, applied before anything is recorded.
    pub fn prefilter(&self, candidate: &str) -> Result<(), Rejection> {
        if candidate.len() < MIN_CANDIDATE_LEN {
            return Err(Rejection::TooShort);
        }
        if !candidate.to_lowercase().contains(&self.base_domain) {
            return Err(Rejection::OffTarget);
        }
        Ok(())
    }

    /// Sub-domain and external policy. The sub-domain check runs first.
    pub fn check_scope(&self, candidate: &str) -> Result<(), Rejection> {
        let lower = candidate.to_lowercase();
        if !self.include_subdomains && !lower.ends_with(&self.at_base_domain) {
            return Err(Rejection::Subdomain);
        }
        if !self.include_external && !lower.ends_with(&self.base_domain) {
            return Err(Rejection::External);
        }
        Ok(())
    }
}
