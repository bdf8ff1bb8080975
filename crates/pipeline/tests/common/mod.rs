//! In-memory doubles for the fetch / upload / encode / adapter seams.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use charsync_core::diff::PendingAvatar;
use charsync_core::paths::{document_path, join_url, override_path, version_path};
use charsync_core::{
    compute_fingerprint, Adapter, Fetcher, FingerprintAlgorithm, SeriesCollection, SyncError,
    SyncResult, Uploader,
};
use charsync_pipeline::{AvatarEncoder, Rendition, UpdateOptions};

pub const SERIES: &str = "test";
pub const STATIC: &str = "https://static.example";
pub const SOURCE: &str = "https://source.example";

pub fn options(upload_concurrency: usize) -> UpdateOptions {
    UpdateOptions {
        static_url: STATIC.to_string(),
        algorithm: FingerprintAlgorithm::Md5,
        upload_concurrency,
    }
}

pub fn version_url() -> String {
    join_url(STATIC, &version_path(SERIES))
}

pub fn document_url() -> String {
    join_url(STATIC, &document_path(SERIES))
}

pub fn override_url() -> String {
    join_url(STATIC, &override_path(SERIES))
}

pub fn source_url(kind: &str, avatar_id: &str) -> String {
    format!("{SOURCE}/{kind}/{avatar_id}.png")
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

enum Reply {
    Body(Vec<u8>),
    Fail,
}

/// Serves registered URLs; anything else is a 404.
#[derive(Default)]
pub struct MemoryFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, url: &str, body: &str) {
        self.bytes(url, body.as_bytes());
    }

    pub fn bytes(&self, url: &str, body: &[u8]) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Body(body.to_vec()));
    }

    /// Answer `url` with a non-404 server error.
    pub fn fail(&self, url: &str) {
        self.replies.lock().unwrap().insert(url.to_string(), Reply::Fail);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn reply(&self, url: &str) -> SyncResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.replies.lock().unwrap().get(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Fail) => Err(SyncError::Transport(format!("GET {url} returned HTTP 500"))),
            None => Err(SyncError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch_text(&self, url: &str) -> SyncResult<String> {
        let body = self.reply(url)?;
        String::from_utf8(body).map_err(|e| SyncError::MalformedResponse(e.to_string()))
    }

    async fn fetch_bytes(&self, url: &str) -> SyncResult<Vec<u8>> {
        self.reply(url)
    }
}

// ---------------------------------------------------------------------------
// Uploader
// ---------------------------------------------------------------------------

/// Records every put in order; paths registered with `fail_on` error out.
#[derive(Default)]
pub struct RecordingUploader {
    puts: Mutex<Vec<(String, Vec<u8>)>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, path: &str) {
        self.failing.lock().unwrap().insert(path.to_string());
    }

    pub fn paths(&self) -> Vec<String> {
        self.puts.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, b)| b.clone())
    }

    pub fn clear(&self) {
        self.puts.lock().unwrap().clear();
    }

    /// Expose the uploaded version marker and document through `fetcher`,
    /// as the static store would.
    pub fn mirror_into(&self, fetcher: &MemoryFetcher) {
        if let Some(version) = self.get(&version_path(SERIES)) {
            fetcher.bytes(&version_url(), &version);
        }
        if let Some(document) = self.get(&document_path(SERIES)) {
            fetcher.bytes(&document_url(), &document);
        }
    }
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> SyncResult<()> {
        if self.failing.lock().unwrap().contains(path) {
            return Err(SyncError::Transport(format!("upload {path} failed [500]")));
        }
        self.puts.lock().unwrap().push((path.to_string(), bytes));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Keeps the raw bytes as `png` and prefixes them with `webp:` for the
/// second rendition.
pub struct StubEncoder;

impl AvatarEncoder for StubEncoder {
    fn encode(&self, raw: &[u8]) -> SyncResult<Vec<Rendition>> {
        let mut webp = b"webp:".to_vec();
        webp.extend_from_slice(raw);
        Ok(vec![
            Rendition {
                extension: "png".to_string(),
                bytes: raw.to_vec(),
            },
            Rendition {
                extension: "webp".to_string(),
                bytes: webp,
            },
        ])
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

type Populate = Box<dyn Fn(&mut SeriesCollection) + Send + Sync>;

/// Populates the collection from a closure; avatars come from
/// `{SOURCE}/{kind}/{avatar_id}.png`.
pub struct TestAdapter {
    populate: Populate,
    fail: bool,
}

impl TestAdapter {
    pub fn new(populate: impl Fn(&mut SeriesCollection) + Send + Sync + 'static) -> Self {
        Self {
            populate: Box::new(populate),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            populate: Box::new(|_| {}),
            fail: true,
        }
    }

    /// Collection as the adapter alone would produce it, pruned.
    pub fn collection(&self) -> SeriesCollection {
        let mut collection = SeriesCollection::new(SERIES);
        (self.populate)(&mut collection);
        collection.clean();
        collection
    }

    pub fn fingerprint(&self) -> String {
        compute_fingerprint(&self.collection(), FingerprintAlgorithm::Md5)
    }
}

#[async_trait]
impl Adapter for TestAdapter {
    fn series(&self) -> &str {
        SERIES
    }

    async fn populate(
        &self,
        _fetcher: &dyn Fetcher,
        collection: &mut SeriesCollection,
    ) -> SyncResult<()> {
        if self.fail {
            return Err(SyncError::Transport("source table returned HTTP 503".to_string()));
        }
        (self.populate)(collection);
        Ok(())
    }

    fn avatar_url(&self, avatar: &PendingAvatar) -> SyncResult<String> {
        Ok(source_url(avatar.kind.as_str(), &avatar.avatar_id))
    }
}
