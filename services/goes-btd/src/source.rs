//! Data source implementations for fetching ABI L1b files.
//!
//! Files are addressed by their object key inside the satellite's NOAA
//! bucket, e.g. `ABI-L1b-RadF/2025/071/06/OR_ABI-L1b-RadF-M6C13_G19_s...nc`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use goes_common::{GoesError, GoesResult, Satellite, ScanRequest};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Trait for data sources that can list and fetch files.
#[async_trait]
pub trait DataSourceFetcher: Send + Sync {
    /// List the files in the request's hour directory.
    async fn list_files(&self, request: &ScanRequest) -> GoesResult<Vec<RemoteFile>>;

    /// Download a specific file.
    async fn fetch_file(&self, satellite: Satellite, file: &RemoteFile) -> GoesResult<Bytes>;

    /// Locate the file a request names and download it.
    async fn fetch_scan(&self, request: &ScanRequest) -> GoesResult<(RemoteFile, Bytes)> {
        let files = self.list_files(request).await?;
        let file = select_file(&files, request)?;
        let data = self.fetch_file(request.satellite, &file).await?;
        Ok((file, data))
    }
}

/// Information about a remote file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteFile {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl RemoteFile {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            last_modified: None,
        }
    }

    /// Last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Pick the file a request names out of a directory listing.
///
/// Files of the request's product and band are sorted by name (which
/// sorts by scan start) and the `ten_minute_index`-th one is returned.
pub fn select_file(files: &[RemoteFile], request: &ScanRequest) -> GoesResult<RemoteFile> {
    let mut matching: Vec<&RemoteFile> = files
        .iter()
        .filter(|f| request.matches_file_name(f.file_name()))
        .collect();
    matching.sort_by(|a, b| a.key.cmp(&b.key));

    matching
        .get(request.ten_minute_index)
        .map(|f| (*f).clone())
        .ok_or_else(|| {
            GoesError::DataNotAvailable(format!(
                "{}: {} matching files under {}, index {} requested",
                request,
                matching.len(),
                request.s3_prefix(),
                request.ten_minute_index
            ))
        })
}

// =============================================================================
// AWS S3
// =============================================================================

/// One page of an S3 ListObjectsV2 response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListBucketResult {
    #[serde(default)]
    pub contents: Vec<RemoteFile>,
    #[serde(default)]
    pub is_truncated: bool,
    #[serde(default)]
    pub next_continuation_token: Option<String>,
}

/// Parse a ListObjectsV2 XML body.
pub fn parse_list_response(xml: &str) -> GoesResult<ListBucketResult> {
    quick_xml::de::from_str(xml)
        .map_err(|e| GoesError::Upstream(format!("invalid S3 listing: {}", e)))
}

/// AWS S3 data source fetcher (for NOAA Open Data). Requests are anonymous.
pub struct AwsDataSource {
    client: Client,
    /// Path-style endpoint replacing `https://{bucket}.s3.amazonaws.com`
    endpoint: Option<String>,
}

impl AwsDataSource {
    pub fn new() -> GoesResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .user_agent(concat!("goes-btd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GoesError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: None,
        })
    }

    /// Use a path-style S3 endpoint (`{endpoint}/{bucket}/{key}`), e.g. a
    /// local mirror.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    fn bucket_url(&self, bucket: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint, bucket),
            None => format!("https://{}.s3.amazonaws.com", bucket),
        }
    }

    fn build_s3_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}", self.bucket_url(bucket), key)
    }
}

#[async_trait]
impl DataSourceFetcher for AwsDataSource {
    #[instrument(skip(self), fields(bucket = %request.satellite.bucket()))]
    async fn list_files(&self, request: &ScanRequest) -> GoesResult<Vec<RemoteFile>> {
        let bucket = request.satellite.bucket();
        let prefix = request.s3_prefix();
        let list_url = format!("{}/", self.bucket_url(&bucket));

        let mut files = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut query = vec![("list-type", "2".to_string()), ("prefix", prefix.clone())];
            if let Some(token) = &token {
                query.push(("continuation-token", token.clone()));
            }

            debug!(url = %list_url, prefix = %prefix, "Listing S3 bucket");
            let response = self
                .client
                .get(&list_url)
                .query(&query)
                .send()
                .await
                .map_err(|e| GoesError::Upstream(format!("S3 list request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(GoesError::Upstream(format!("S3 list failed: {}", status)));
            }

            let body = response
                .text()
                .await
                .map_err(|e| GoesError::Upstream(format!("S3 list body: {}", e)))?;
            let page = parse_list_response(&body)?;
            files.extend(page.contents);

            match (page.is_truncated, page.next_continuation_token) {
                (true, Some(next)) => token = Some(next),
                _ => break,
            }
        }

        info!(count = files.len(), prefix = %prefix, "Listed files");
        Ok(files)
    }

    #[instrument(skip(self, file), fields(key = %file.key))]
    async fn fetch_file(&self, satellite: Satellite, file: &RemoteFile) -> GoesResult<Bytes> {
        let url = self.build_s3_url(&satellite.bucket(), &file.key);
        debug!(url = %url, "Fetching file");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GoesError::Upstream(format!("S3 fetch request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GoesError::Upstream(format!("S3 fetch failed: {} ({})", status, file.key)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GoesError::Upstream(format!("S3 fetch body: {}", e)))?;

        info!(size = bytes.len(), "Downloaded file");
        Ok(bytes)
    }
}

// =============================================================================
// Local mirror
// =============================================================================

/// Reads files from a directory laid out like the buckets:
/// `{root}/noaa-goes19/ABI-L1b-RadF/2025/071/06/OR_...nc`.
pub struct LocalDataSource {
    root: PathBuf,
}

impl LocalDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, satellite: Satellite, key: &str) -> PathBuf {
        self.root.join(satellite.bucket()).join(key)
    }
}

#[async_trait]
impl DataSourceFetcher for LocalDataSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn list_files(&self, request: &ScanRequest) -> GoesResult<Vec<RemoteFile>> {
        let prefix = request.s3_prefix();
        let dir = self.object_path(request.satellite, &prefix);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GoesError::DataNotAvailable(format!(
                    "no directory {}",
                    dir.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(RemoteFile {
                key: format!("{}{}", prefix, name),
                size: Some(metadata.len()),
                last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        debug!(count = files.len(), dir = %dir.display(), "Listed local files");
        Ok(files)
    }

    async fn fetch_file(&self, satellite: Satellite, file: &RemoteFile) -> GoesResult<Bytes> {
        let path = self.object_path(satellite, &file.key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                GoesError::DataNotAvailable(format!("no file {}", path.display())),
            ),
            Err(e) => Err(e.into()),
        }
    }
}
