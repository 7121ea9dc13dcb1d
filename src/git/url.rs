use lazy_static::lazy_static;
use regex::Regex;

use super::RemoteDescriptor;

lazy_static! {
    static ref GITHUB_SSH_URL: Regex =
        Regex::new(r"^git@github\.com:(?P<path>.+?)(?:\.git)?$").expect("valid GitHub ssh url pattern");
}

/// The URL to record for a remote, as a browsable https address where possible
pub fn canonical_url(remote: &RemoteDescriptor) -> String {
    let raw = remote.url();
    github_ssh_to_https(raw).unwrap_or_else(|| raw.to_string())
}

/// Convert `git@github.com:owner/repo.git` to `https://github.com/owner/repo`.
/// Returns `None` for anything that is not a GitHub ssh url.
pub fn github_ssh_to_https(url: &str) -> Option<String> {
    GITHUB_SSH_URL
        .captures(url)
        .map(|caps| format!("https://github.com/{}", &caps["path"]))
}
