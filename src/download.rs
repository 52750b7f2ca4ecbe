// src/download.rs
//
// Saving an export. The response bytes become a blob with a temporary
// `blob:` URL; a synthetic anchor pointing at it is "clicked", which hands the
// bytes to a `DownloadSink`; the URL is revoked when the guard drops.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::core::sanitize::sanitize_filename;

/* ---------------- Blobs ---------------- */

#[derive(Debug, Default)]
pub struct BlobStore {
    next_id: u64,
    live: HashMap<String, Vec<u8>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&mut self, bytes: Vec<u8>) -> String {
        self.next_id += 1;
        let url = format!("blob:canvas-roster/{}", self.next_id);
        self.live.insert(url.clone(), bytes);
        url
    }

    /// Returns whether the URL was live.
    pub fn revoke_object_url(&mut self, url: &str) -> bool {
        self.live.remove(url).is_some()
    }

    pub fn resolve(&self, url: &str) -> Option<&[u8]> {
        self.live.get(url).map(Vec::as_slice)
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Scoped object URL: revoked on drop, whatever happened in between.
pub struct ObjectUrl<'a> {
    store: &'a mut BlobStore,
    url: String,
}

impl<'a> ObjectUrl<'a> {
    pub fn create(store: &'a mut BlobStore, bytes: Vec<u8>) -> Self {
        let url = store.create_object_url(bytes);
        Self { store, url }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        self.store.resolve(&self.url).unwrap_or_default()
    }
}

impl Drop for ObjectUrl<'_> {
    fn drop(&mut self) {
        self.store.revoke_object_url(&self.url);
        logd!("Download: revoked {}", self.url);
    }
}

/// The invisible link the download goes through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub download: String,
}

/* ---------------- Sinks ---------------- */

pub trait DownloadSink {
    /// Persist `bytes` under (a variant of) `filename`; return where it went.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes into a directory like a browser's download folder: an existing
/// `name.csv` makes the next one `name (2).csv`, then `name (3).csv`, …
#[derive(Clone, Debug)]
pub struct DirDownloads {
    dir: PathBuf,
}

impl DirDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirDownloads {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        ensure_directory(&self.dir)?;
        let name = sanitize_filename(filename, "download");
        let path = resolve_unique_filename(&self.dir, &name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// "Click" an anchor for `bytes`: object URL → sink → revoke.
pub fn save_blob(
    store: &mut BlobStore,
    sink: &mut dyn DownloadSink,
    bytes: Vec<u8>,
    filename: &str,
) -> io::Result<PathBuf> {
    let url = ObjectUrl::create(store, bytes);
    let anchor = Anchor { href: s!(url.as_str()), download: s!(filename) };
    logd!("Download: click {} as {}", anchor.href, anchor.download);
    let saved = sink.save(&anchor.download, url.bytes());
    drop(url);
    saved
}

/* ---------------- Paths ---------------- */

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    fs::create_dir_all(dir)
}

/// First free path among `stem.ext`, `stem (2).ext`, `stem (3).ext`, …
pub fn resolve_unique_filename(dir: &Path, filename: &str) -> PathBuf {
    let first = dir.join(filename);
    if !first.exists() {
        return first;
    }
    let p = Path::new(filename);
    let stem = p.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = p.extension().map(|e| e.to_string_lossy().into_owned());

    (2u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|p| !p.exists())
        .unwrap_or(first)
}
