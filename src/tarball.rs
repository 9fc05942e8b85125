use flate2::read::GzDecoder;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tar::Archive;

use crate::registry::DocsFetchError;

/// Soft outcome when the tarball unpacks fine but carries no README.
pub const NO_README_MESSAGE: &str = "No README file found in package";

/// Candidate filenames probed inside the package directory, in priority order.
/// Probing is by exact name; there is no case folding beyond these entries.
const README_CANDIDATES: [&str; 5] = [
    "README.md",
    "readme.md",
    "README.txt",
    "readme.txt",
    "README",
];

/// Archive extraction as an injected capability, so the retriever's control
/// flow can be tested without real tarballs.
pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), DocsFetchError>;
}

/// Default extractor for npm's gzipped tar distribution format.
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), DocsFetchError> {
        let file = fs::File::open(archive)?;
        let decoder = GzDecoder::new(file);
        let mut archive = Archive::new(decoder);
        archive
            .unpack(dest)
            .map_err(|err| DocsFetchError::Extraction(err.to_string()))?;
        Ok(())
    }
}

/// Downloads a package's published tarball and digs the README out of it.
///
/// Each invocation works inside its own uniquely named temporary directory;
/// the directory is removed when the invocation returns, on every path,
/// via the `TempDir` guard.
pub struct TarballRetriever {
    client: Client,
    extractor: Arc<dyn ArchiveExtractor>,
    temp_root: PathBuf,
}

impl TarballRetriever {
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(TarGzExtractor))
    }

    pub fn with_extractor(extractor: Arc<dyn ArchiveExtractor>) -> Self {
        Self {
            client: Client::new(),
            extractor,
            temp_root: std::env::temp_dir(),
        }
    }

    /// Redirect temporary directories under `root` instead of the platform
    /// default. Used by tests to verify cleanup.
    #[allow(dead_code)]
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Downloads and extracts the tarball at `tarball_url`, returning the
    /// contents of the first README candidate found in the package directory,
    /// or [`NO_README_MESSAGE`] if the package ships none.
    pub async fn fetch_readme(
        &self,
        tarball_url: &str,
        package_name: &str,
    ) -> Result<String, DocsFetchError> {
        // Scoped names contain a slash, which must not reach the filesystem.
        let dir_tag = package_name.replace('/', "-");
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("npm-docs-{}-", dir_tag))
            .tempdir_in(&self.temp_root)?;

        let response = self.client.get(tarball_url).send().await?;
        if !response.status().is_success() {
            return Err(DocsFetchError::TarballDownload(
                response.status().to_string(),
            ));
        }
        let bytes = response.bytes().await?;

        let tarball_filename = tarball_url
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or(DocsFetchError::TarballFilename)?;
        let tarball_path = temp_dir.path().join(tarball_filename);
        tokio::fs::write(&tarball_path, &bytes).await?;

        self.extractor.extract(&tarball_path, temp_dir.path())?;

        let package_dir = self
            .find_package_dir(temp_dir.path(), &tarball_path)
            .await?;

        for candidate in README_CANDIDATES {
            let readme_path = package_dir.join(candidate);
            if tokio::fs::try_exists(&readme_path).await? {
                tracing::debug!("Found {} in {}", candidate, package_name);
                return Ok(tokio::fs::read_to_string(&readme_path).await?);
            }
        }

        Ok(NO_README_MESSAGE.to_string())
    }

    /// npm tarballs root their contents at `package/` (historically also
    /// `package-<version>`); the downloaded tarball file itself sits alongside
    /// the extracted entries and must be skipped.
    async fn find_package_dir(
        &self,
        extract_root: &Path,
        tarball_path: &Path,
    ) -> Result<PathBuf, DocsFetchError> {
        let mut entries = tokio::fs::read_dir(extract_root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path() == tarball_path {
                continue;
            }
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with("package") {
                return Ok(entry.path());
            }
        }
        Err(DocsFetchError::PackageDirNotFound)
    }
}
