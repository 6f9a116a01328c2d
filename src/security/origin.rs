//! Origin allow-list for cross-origin callers.
//!
//! # Rules (first match wins)
//! 1. Exact match against the local development origins.
//! 2. Exact match against `https://<production domain>`.
//! 3. Suffix match on `.<production domain>` or `.<production domain>/`.
//! 4. Anything else is denied.
//!
//! Comparison is literal: no scheme or case normalization, no DNS.

use crate::config::CorsConfig;

/// Immutable origin allow-list built once at startup.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    subdomain_suffix: String,
    subdomain_suffix_slash: String,
}

impl OriginPolicy {
    /// Build a policy from local origins and the production domain.
    pub fn new<I, S>(local_origins: I, production_domain: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exact: Vec<String> = local_origins.into_iter().map(Into::into).collect();
        exact.push(format!("https://{production_domain}"));

        Self {
            exact,
            subdomain_suffix: format!(".{production_domain}"),
            subdomain_suffix_slash: format!(".{production_domain}/"),
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.local_origins.iter().cloned(), &config.production_domain)
    }

    /// Returns true if a response to `origin` may carry access-control headers.
    pub fn is_allowed(&self, origin: &str) -> bool {
        if origin.is_empty() {
            return false;
        }
        if self.exact.iter().any(|allowed| allowed == origin) {
            return true;
        }
        origin.ends_with(&self.subdomain_suffix) || origin.ends_with(&self.subdomain_suffix_slash)
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::from_config(&CorsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_development_origins() {
        let policy = OriginPolicy::default();

        assert!(policy.is_allowed("http://localhost"));
        assert!(policy.is_allowed("http://localhost:3000"));
        assert!(policy.is_allowed("http://localhost:8080"));

        assert!(!policy.is_allowed("http://localhost:5173"));
        assert!(!policy.is_allowed("https://localhost:3000")); // Scheme must match
        assert!(!policy.is_allowed("http://127.0.0.1:3000"));
    }

    #[test]
    fn test_production_domain() {
        let policy = OriginPolicy::default();

        assert!(policy.is_allowed("https://thesoorajsingh.me"));
        assert!(!policy.is_allowed("http://thesoorajsingh.me"));
        assert!(!policy.is_allowed("https://thesoorajsingh.me.evil.com"));
    }

    #[test]
    fn test_subdomains() {
        let policy = OriginPolicy::default();

        assert!(policy.is_allowed("https://app.thesoorajsingh.me"));
        assert!(policy.is_allowed("https://a.b.thesoorajsingh.me"));
        assert!(policy.is_allowed("https://app.thesoorajsingh.me/"));
        assert!(!policy.is_allowed("https://app.thesoorajsingh.me//"));
    }

    #[test]
    fn test_suffix_requires_separator() {
        let policy = OriginPolicy::default();

        assert!(!policy.is_allowed("https://evilthesoorajsingh.me"));
        assert!(!policy.is_allowed("https://thesoorajsingh.me/"));
    }

    #[test]
    fn test_empty_and_short_origins_denied() {
        let policy = OriginPolicy::default();

        assert!(!policy.is_allowed(""));
        assert!(!policy.is_allowed("x"));
        assert!(!policy.is_allowed("null"));
    }

    #[test]
    fn test_custom_domain() {
        let policy = OriginPolicy::new(["http://localhost:4000"], "example.org");

        assert!(policy.is_allowed("http://localhost:4000"));
        assert!(policy.is_allowed("https://example.org"));
        assert!(policy.is_allowed("https://docs.example.org"));
        assert!(!policy.is_allowed("http://localhost:3000"));
        assert!(!policy.is_allowed("https://app.thesoorajsingh.me"));
    }
}
