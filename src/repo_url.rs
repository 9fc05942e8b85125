use url::Url;

/// Extracts the `owner/repo` path from a package's repository URL.
///
/// Registry manifests commonly carry `git+https://github.com/owner/repo.git`
/// style URLs; the `git+` prefix is stripped before parsing. Returns `None`
/// for anything that fails to parse or whose host is not `github.com` --
/// parse failures are logged and never propagate.
pub fn extract_github_repo_path(repo_url: &str) -> Option<String> {
    let clean_url = repo_url.strip_prefix("git+").unwrap_or(repo_url);

    let parsed = match Url::parse(clean_url) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!("Failed to parse repository URL {}: {}", repo_url, err);
            return None;
        }
    };

    if parsed.host_str() != Some("github.com") {
        return None;
    }

    let path = parsed.path().trim_start_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    Some(path.to_string())
}
