//! Static domain allow-list.
//!
//! URLs on known-stable education/documentation/video domains are accepted
//! without a live network check. This bounds total validation latency and
//! avoids false negatives from sites that block HEAD requests.

use url::Url;

/// Domains whose resources skip live validation. Matched as substrings of
/// the hostname, so subdomains (e.g. `learn.freecodecamp.org`) also pass.
const TRUSTED_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "developer.mozilla.org",
    "docs.python.org",
    "reactjs.org",
    "react.dev",
    "freecodecamp.org",
    "khanacademy.org",
    "coursera.org",
    "edx.org",
    "github.com",
    "gitlab.com",
    "css-tricks.com",
    "smashingmagazine.com",
    "dev.to",
    "realpython.com",
    "w3schools.com",
    "stackoverflow.com",
];

/// Whether a URL's hostname matches the allow-list.
///
/// Pure and infallible: malformed URLs are untrusted, never an error.
/// Hostname comparison is case-insensitive with a leading `www.` stripped.
pub fn is_trusted(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    TRUSTED_DOMAINS.iter().any(|domain| host.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_docs_are_trusted() {
        assert!(is_trusted("https://docs.python.org/3/tutorial/"));
        assert!(is_trusted("https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide"));
    }

    #[test]
    fn youtube_forms_are_trusted() {
        assert!(is_trusted("https://www.youtube.com/watch?v=rfscVS0vtbw"));
        assert!(is_trusted("https://youtu.be/rfscVS0vtbw"));
    }

    #[test]
    fn www_prefix_is_stripped() {
        assert!(is_trusted("https://www.freecodecamp.org/learn/"));
    }

    #[test]
    fn hostname_match_is_case_insensitive() {
        assert!(is_trusted("https://WWW.GitHub.COM/topics/python-calculator"));
    }

    #[test]
    fn subdomains_match() {
        assert!(is_trusted("https://learn.khanacademy.org/some/course"));
    }

    #[test]
    fn unknown_domain_is_untrusted() {
        assert!(!is_trusted("https://example.com/course"));
        assert!(!is_trusted("https://udemy.com/some-course"));
    }

    #[test]
    fn malformed_url_is_untrusted() {
        assert!(!is_trusted("not a url"));
        assert!(!is_trusted(""));
        assert!(!is_trusted("http://"));
    }

    #[test]
    fn url_without_host_is_untrusted() {
        assert!(!is_trusted("mailto:someone@dev.to"));
    }
}
