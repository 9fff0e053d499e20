//! Host allowlist applied before a URL is shortened.

use std::collections::HashSet;

use url::Url;

/// Set of hostnames that may be shortened.
///
/// Matching is exact on the URL's host (no subdomain wildcarding) and
/// case-insensitive. Ports and userinfo are ignored.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    hosts: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Returns true if the host of `url` is allowlisted.
    pub fn permits(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| host.trim_start_matches('[').trim_end_matches(']'))
            .is_some_and(|host| self.hosts.contains(&host.to_ascii_lowercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_permits_listed_host() {
        let list = AllowList::new(["example.com"]);
        assert!(list.permits(&url("https://example.com/a")));
        assert!(list.permits(&url("http://example.com:8080/a?b=c")));
    }

    #[test]
    fn test_rejects_unlisted_host() {
        let list = AllowList::new(["example.com"]);
        assert!(!list.permits(&url("https://other.com/a")));
    }

    #[test]
    fn test_subdomains_are_not_implied() {
        let list = AllowList::new(["example.com"]);
        assert!(!list.permits(&url("https://www.example.com/a")));
        assert!(!list.permits(&url("https://example.com.evil.net/a")));
    }

    #[test]
    fn test_case_insensitive() {
        let list = AllowList::new(["Example.COM"]);
        assert!(list.permits(&url("https://EXAMPLE.com/Path")));
    }

    #[test]
    fn test_userinfo_does_not_fool_the_check() {
        let list = AllowList::new(["example.com"]);
        assert!(!list.permits(&url("https://example.com@other.com/")));
    }

    #[test]
    fn test_url_without_host_is_rejected() {
        let list = AllowList::new(["example.com"]);
        assert!(!list.permits(&url("mailto:someone@example.com")));
    }

    #[test]
    fn test_ip_hosts() {
        let list = AllowList::new(["127.0.0.1", "::1"]);
        assert!(list.permits(&url("http://127.0.0.1:3000/")));
        assert!(list.permits(&url("http://[::1]:3000/")));
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let list = AllowList::new(["", "  ", "example.com"]);
        assert_eq!(list.len(), 1);
        assert!(!AllowList::default().permits(&url("https://example.com")));
        assert!(AllowList::default().is_empty());
    }
}
