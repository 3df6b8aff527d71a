//! Domain registry: the two tiers of API hosts every filtering decision uses.
//!
//! Matching is substring containment of the full `scheme://host` string against
//! a transaction URL. The first entry in declaration order wins, standard
//! entries before extended ones, so list order is an implicit priority.

use serde::{Deserialize, Serialize};

/// Host used when a URL matches no registered entry.
pub const FALLBACK_HOST: &str = "graph.microsoft.com";

/// Tier of a registered API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Documented Microsoft Graph clouds.
    Standard,
    /// Undocumented admin/portal APIs, shown for inspection only.
    Extended,
}

/// One registered base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainEntry {
    pub base: &'static str,
    pub tier: Tier,
}

impl DomainEntry {
    const fn standard(base: &'static str) -> Self {
        Self {
            base,
            tier: Tier::Standard,
        }
    }

    const fn extended(base: &'static str) -> Self {
        Self {
            base,
            tier: Tier::Extended,
        }
    }

    /// True if `url` contains this entry's base.
    pub fn matches(&self, url: &str) -> bool {
        url.contains(self.base)
    }

    /// Host part of the base (scheme stripped).
    pub fn host(&self) -> &'static str {
        self.base
            .strip_prefix("https://")
            .or_else(|| self.base.strip_prefix("http://"))
            .unwrap_or(self.base)
    }
}

const STANDARD: &[DomainEntry] = &[
    DomainEntry::standard("https://graph.microsoft.com"),
    DomainEntry::standard("https://graph.microsoft.us"),
    DomainEntry::standard("https://dod-graph.microsoft.us"),
    DomainEntry::standard("https://microsoftgraph.chinacloudapi.cn"),
];

const EXTENDED: &[DomainEntry] = &[
    DomainEntry::extended("https://main.iam.ad.ext.azure.com"),
    DomainEntry::extended("https://elm.iga.azure.com"),
    DomainEntry::extended("https://pds.iga.azure.com"),
    DomainEntry::extended("https://api.accessreviews.identitygovernance.azure.com"),
    DomainEntry::extended("https://management.azure.com"),
    DomainEntry::extended("https://admin.microsoft.com"),
    DomainEntry::extended("https://portal.office.com"),
    DomainEntry::extended("https://security.microsoft.com"),
    DomainEntry::extended("https://graph.windows.net"),
    DomainEntry::extended("https://api.azrbac.mspim.azure.com"),
];

/// Which domain tiers are enabled for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Extended,
}

impl Mode {
    pub fn from_extended_flag(extended: bool) -> Self {
        if extended {
            Mode::Extended
        } else {
            Mode::Standard
        }
    }

    pub fn is_extended(self) -> bool {
        self == Mode::Extended
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Standard => f.write_str("standard"),
            Mode::Extended => f.write_str("extended"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Mode::Standard),
            "extended" => Ok(Mode::Extended),
            other => Err(format!("unknown mode '{other}' (expected standard or extended)")),
        }
    }
}

/// Every entry in priority order (standard first).
pub fn all_domains() -> impl Iterator<Item = &'static DomainEntry> {
    STANDARD.iter().chain(EXTENDED.iter())
}

/// Entries enabled under `mode`, in priority order.
pub fn enabled_domains(mode: Mode) -> Vec<&'static DomainEntry> {
    match mode {
        Mode::Standard => STANDARD.iter().collect(),
        Mode::Extended => all_domains().collect(),
    }
}

/// True if `url` matches at least one entry enabled under `mode`.
pub fn is_relevant(url: &str, mode: Mode) -> bool {
    enabled_domains(mode).iter().any(|d| d.matches(url))
}

/// True if `url` matches an extended-tier entry, whatever the current mode.
pub fn is_extended_only(url: &str) -> bool {
    EXTENDED.iter().any(|d| d.matches(url))
}

/// Splits `url` at the first matching entry into `(host, path)`.
///
/// With no match, returns [`FALLBACK_HOST`] and the whole URL as the path.
pub fn split_host_and_path(url: &str) -> (&'static str, &str) {
    for domain in all_domains() {
        if let Some((_, rest)) = url.split_once(domain.base) {
            return (domain.host(), rest);
        }
    }
    (FALLBACK_HOST, url)
}

/// Match patterns (`<base>/*`) for every entry, e.g. for host permission lists.
pub fn all_url_patterns() -> Vec<String> {
    all_domains().map(|d| format!("{}/*", d.base)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn extended_is_superset_of_standard() {
        let standard: HashSet<_> = enabled_domains(Mode::Standard)
            .into_iter()
            .map(|d| d.base)
            .collect();
        let extended: HashSet<_> = enabled_domains(Mode::Extended)
            .into_iter()
            .map(|d| d.base)
            .collect();
        assert!(standard.is_subset(&extended));
        assert!(extended.len() > standard.len());
    }

    #[test]
    fn entries_are_unique() {
        let all: Vec<_> = all_domains().map(|d| d.base).collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn relevance_depends_on_mode() {
        let graph = "https://graph.microsoft.com/v1.0/me";
        let admin = "https://admin.microsoft.com/admin/api/users";
        assert!(is_relevant(graph, Mode::Standard));
        assert!(is_relevant(graph, Mode::Extended));
        assert!(!is_relevant(admin, Mode::Standard));
        assert!(is_relevant(admin, Mode::Extended));
        assert!(!is_relevant("https://example.com/", Mode::Extended));
    }

    #[test]
    fn extended_only_ignores_mode() {
        assert!(is_extended_only("https://management.azure.com/subscriptions"));
        assert!(!is_extended_only("https://graph.microsoft.com/beta/users"));
    }

    #[test]
    fn split_host_and_path_known_domain() {
        let (host, path) = split_host_and_path("https://graph.microsoft.us/v1.0/users?$top=5");
        assert_eq!(host, "graph.microsoft.us");
        assert_eq!(path, "/v1.0/users?$top=5");
    }

    #[test]
    fn split_host_and_path_prefers_declared_order() {
        let (host, path) = split_host_and_path("https://dod-graph.microsoft.us/v1.0/me");
        assert_eq!(host, "dod-graph.microsoft.us");
        assert_eq!(path, "/v1.0/me");

        // Substring matching: a standard base embedded in an extended URL wins.
        let url = "https://admin.microsoft.com/go?to=https://graph.microsoft.com/v1.0/me";
        let (host, path) = split_host_and_path(url);
        assert_eq!(host, "graph.microsoft.com");
        assert_eq!(path, "/v1.0/me");
    }

    #[test]
    fn split_host_and_path_fallback() {
        let url = "https://example.com/thing";
        let (host, path) = split_host_and_path(url);
        assert_eq!(host, FALLBACK_HOST);
        assert_eq!(path, url);
    }

    #[test]
    fn mode_parse_and_display() {
        assert_eq!("Extended".parse::<Mode>().unwrap(), Mode::Extended);
        assert_eq!("standard".parse::<Mode>().unwrap(), Mode::Standard);
        assert!("ultra".parse::<Mode>().is_err());
        assert_eq!(Mode::Extended.to_string(), "extended");
        assert_eq!(Mode::from_extended_flag(true), Mode::Extended);
    }

    #[test]
    fn url_patterns_cover_all_entries() {
        let patterns = all_url_patterns();
        assert_eq!(patterns.len(), all_domains().count());
        assert_eq!(patterns[0], "https://graph.microsoft.com/*");
    }
}
