use reqwest::Client;

use crate::registry::{DocContent, DocsFetchError, NpmRegistryClient};
use crate::repo_url::extract_github_repo_path;
use crate::tarball::TarballRetriever;

/// Final text when neither the repository probe nor the tarball fallback
/// produced any documentation.
pub const NOT_FOUND_MESSAGE: &str =
    "No documentation found in any common branches or package tarball";

pub const RAW_GITHUB_BASE: &str = "https://raw.githubusercontent.com";

/// Branches probed for a raw README, in fixed order. A GitHub README always
/// wins over the tarball README.
const README_BRANCHES: [&str; 3] = ["master", "main", "develop"];

/// Orchestrates README resolution for one package name:
/// registry lookup, GitHub branch probing, tarball fallback.
pub struct DocsPipeline {
    client: Client,
    registry: NpmRegistryClient,
    raw_base: String,
    retriever: TarballRetriever,
}

impl DocsPipeline {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            registry: NpmRegistryClient::new(),
            raw_base: RAW_GITHUB_BASE.to_string(),
            retriever: TarballRetriever::new(),
        }
    }

    #[allow(dead_code)]
    pub fn new_with_base_urls(registry_base: &str, raw_base: &str) -> Self {
        Self {
            client: Client::new(),
            registry: NpmRegistryClient::new_with_base_url(registry_base),
            raw_base: raw_base.trim_end_matches('/').to_string(),
            retriever: TarballRetriever::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_retriever(mut self, retriever: TarballRetriever) -> Self {
        self.retriever = retriever;
        self
    }

    /// Resolves documentation for `package_name`.
    ///
    /// Registry failures are hard failures for the invocation. Branch-probe
    /// and tarball failures are recovered here; exhausting both yields a
    /// successful result carrying [`NOT_FOUND_MESSAGE`].
    pub async fn fetch_docs(&self, package_name: &str) -> Result<DocContent, DocsFetchError> {
        let metadata = self.registry.fetch_latest(package_name).await?;
        tracing::debug!("Resolved registry metadata for {}", metadata.name);

        let mut doc_text = None;
        if let Some(repository) = &metadata.repository {
            if let Some(repo_path) = extract_github_repo_path(repository.url()) {
                tracing::debug!("Probing GitHub branches for {}", repo_path);
                doc_text = self.probe_branches(&repo_path).await;
            }
        }

        if doc_text.is_none() {
            match self
                .retriever
                .fetch_readme(&metadata.dist.tarball, package_name)
                .await
            {
                Ok(content) => doc_text = Some(content),
                Err(err) => {
                    tracing::warn!("Tarball fallback failed for {}: {}", package_name, err);
                }
            }
        }

        let content = match doc_text {
            Some(text) if !text.is_empty() => text,
            _ => NOT_FOUND_MESSAGE.to_string(),
        };
        Ok(DocContent { content })
    }

    /// Tries each branch in order and returns the first README body found.
    /// Individual fetch failures are logged and skipped, never fatal.
    async fn probe_branches(&self, repo_path: &str) -> Option<String> {
        for branch in README_BRANCHES {
            let url = format!(
                "{}/{}/refs/heads/{}/README.md",
                self.raw_base, repo_path, branch
            );
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.text().await {
                        Ok(text) => return Some(text),
                        Err(err) => {
                            tracing::warn!(
                                "Failed to read README body from {} branch: {}",
                                branch,
                                err
                            );
                        }
                    }
                }
                Ok(response) => {
                    tracing::debug!("No README on {} branch: {}", branch, response.status());
                }
                Err(err) => {
                    tracing::warn!("Failed to fetch README from {} branch: {}", branch, err);
                }
            }
        }
        None
    }
}
