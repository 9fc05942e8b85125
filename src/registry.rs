use reqwest::Client;
use rmcp::{schemars, model::{IntoContents, Content}};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsFetchError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("npm registry returned status {status} for {package}")]
    RegistryStatus {
        package: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to download tarball: {0}")]
    TarballDownload(String),

    #[error("Could not extract filename from tarball URL")]
    TarballFilename,

    #[error("Could not find package directory in tarball")]
    PackageDirNotFound,

    #[error("Failed to extract tarball: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Package name must not be empty")]
    EmptyPackageName,
}

/// Implements conversion from DocsFetchError to MCP Contents.
///
/// Tool callers see pipeline failures as a single `Error: <message>` text
/// block rather than a protocol-level fault.
impl IntoContents for DocsFetchError {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(format!("Error: {}", self))]
    }
}

/// Input parameters for the `get_docs_for_npm_package` tool.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackageDocsParams {
    #[schemars(description = "Name of the npm package")]
    pub package_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct DocContent {
    pub content: String,
}

// Implement IntoContents trait for DocContent
impl IntoContents for DocContent {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(self.content)]
    }
}

/// Package record served by the registry's `/{package}/latest` endpoint.
///
/// Only the fields the resolution pipeline consumes are modeled; the registry
/// response carries far more.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryMetadata {
    pub name: String,
    #[serde(default)]
    pub repository: Option<RepositoryField>,
    pub dist: DistInfo,
}

/// The registry serves `repository` either as an object with a `url` field or
/// as a bare URL string, depending on how the package manifest was written.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    Descriptor(RepositoryDescriptor),
    Url(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryDescriptor {
    #[serde(rename = "type", default)]
    #[allow(dead_code)]
    pub kind: Option<String>,
    pub url: String,
}

impl RepositoryField {
    pub fn url(&self) -> &str {
        match self {
            RepositoryField::Descriptor(descriptor) => &descriptor.url,
            RepositoryField::Url(url) => url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    pub tarball: String,
}

pub const NPM_REGISTRY_BASE: &str = "https://registry.npmjs.org";

pub struct NpmRegistryClient {
    client: Client,
    base_url: String,
}

impl NpmRegistryClient {
    pub fn new() -> Self {
        Self::new_with_base_url(NPM_REGISTRY_BASE)
    }

    pub fn new_with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the latest-version metadata record for a package.
    ///
    /// Any network, status, or JSON failure here is fatal to the whole
    /// invocation; there is no fallback without a tarball URL.
    pub async fn fetch_latest(&self, package_name: &str) -> Result<RegistryMetadata, DocsFetchError> {
        if package_name.is_empty() {
            return Err(DocsFetchError::EmptyPackageName);
        }

        let url = format!("{}/{}/latest", self.base_url, package_name);
        tracing::debug!("Fetching registry metadata from {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DocsFetchError::PackageNotFound(package_name.to_string()));
        }
        if !response.status().is_success() {
            return Err(DocsFetchError::RegistryStatus {
                package: package_name.to_string(),
                status: response.status(),
            });
        }

        let metadata = response.json::<RegistryMetadata>().await?;
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_latest_success() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/left-pad/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "left-pad",
                    "repository": { "type": "git", "url": "git+https://github.com/stevemao/left-pad.git" },
                    "dist": { "tarball": "https://registry.npmjs.org/left-pad/-/left-pad-1.3.0.tgz" }
                }"#,
            )
            .create();

        let client = NpmRegistryClient::new_with_base_url(&server.url());
        let metadata = client.fetch_latest("left-pad").await.unwrap();
        m.assert();

        assert_eq!(metadata.name, "left-pad");
        assert_eq!(
            metadata.repository.unwrap().url(),
            "git+https://github.com/stevemao/left-pad.git"
        );
        assert!(metadata.dist.tarball.ends_with("left-pad-1.3.0.tgz"));
    }

    #[tokio::test]
    async fn test_fetch_latest_string_repository() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/oldstyle/latest")
            .with_status(200)
            .with_body(
                r#"{
                    "name": "oldstyle",
                    "repository": "https://github.com/someone/oldstyle",
                    "dist": { "tarball": "https://example.com/oldstyle-0.1.0.tgz" }
                }"#,
            )
            .create();

        let client = NpmRegistryClient::new_with_base_url(&server.url());
        let metadata = client.fetch_latest("oldstyle").await.unwrap();
        m.assert();

        assert_eq!(
            metadata.repository.unwrap().url(),
            "https://github.com/someone/oldstyle"
        );
    }

    #[tokio::test]
    async fn test_fetch_latest_not_found() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/no-such-package/latest")
            .with_status(404)
            .create();

        let client = NpmRegistryClient::new_with_base_url(&server.url());
        let result = client.fetch_latest("no-such-package").await;
        m.assert();

        match result {
            Err(DocsFetchError::PackageNotFound(name)) => assert_eq!(name, "no-such-package"),
            other => panic!("Expected PackageNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_latest_server_error() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/flaky/latest")
            .with_status(503)
            .create();

        let client = NpmRegistryClient::new_with_base_url(&server.url());
        let result = client.fetch_latest("flaky").await;
        m.assert();

        match result {
            Err(DocsFetchError::RegistryStatus { package, status }) => {
                assert_eq!(package, "flaky");
                assert_eq!(status.as_u16(), 503);
            }
            other => panic!("Expected RegistryStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_latest_rejects_empty_name() {
        let client = NpmRegistryClient::new_with_base_url("http://127.0.0.1:1");
        let result = client.fetch_latest("").await;
        assert!(matches!(result, Err(DocsFetchError::EmptyPackageName)));
    }

    #[test]
    fn test_error_into_contents_prefix() {
        let contents = DocsFetchError::PackageNotFound("missing".to_string()).into_contents();
        assert_eq!(contents.len(), 1);
        let text = &contents[0].as_text().unwrap().text;
        assert!(text.starts_with("Error: "));
        assert!(text.contains("missing"));
    }
}
