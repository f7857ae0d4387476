//! On-disk page cache
//!
//! One JSON document per `(domain, page)`. The file name carries the domain's code
//! point rather than the symbol itself, e.g. `domain_0e01_page_001.json` for `ก` page 1.

use crate::crawler::PageResponse;
use crate::storage::traits::CacheResult;
use crate::storage::write_atomic;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the cache entry for a page
pub fn cache_file_name(domain: char, page: u32) -> String {
    format!("domain_{:04x}_page_{:03}.json", domain as u32, page)
}

/// Page cache rooted at a directory
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, domain: char, page: u32) -> PathBuf {
        self.dir.join(cache_file_name(domain, page))
    }

    /// Reads a cached page
    ///
    /// A missing file, or an entry whose stored key disagrees with the requested one,
    /// is `Ok(None)`.
    pub fn get(&self, domain: char, page: u32) -> CacheResult<Option<PageResponse>> {
        let path = self.path_for(domain, page);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: PageResponse = serde_json::from_str(&contents)?;
        if entry.domain != domain || entry.page != page {
            tracing::warn!(
                "Cache entry {} holds {} page {}, ignoring",
                path.display(),
                entry.domain,
                entry.page
            );
            return Ok(None);
        }

        Ok(Some(entry))
    }

    /// Writes a page, replacing any existing entry
    pub fn put(&self, response: &PageResponse) -> CacheResult<()> {
        let path = self.path_for(response.domain, response.page);
        let json = serde_json::to_vec_pretty(response)?;
        write_atomic(&path, &json)?;
        Ok(())
    }

    /// Like [`FileCache::get`], but logs failures and reports them as a miss
    pub fn load(&self, domain: char, page: u32) -> Option<PageResponse> {
        match self.get(domain, page) {
            Ok(Some(entry)) => {
                tracing::debug!("Cache hit: {} page {}", domain, page);
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Cache read error for {} page {}: {}", domain, page, e);
                None
            }
        }
    }

    /// Like [`FileCache::put`], but logs failures instead of returning them
    pub fn store(&self, response: &PageResponse) {
        match self.put(response) {
            Ok(()) => tracing::debug!("Cached: {} page {}", response.domain, response.page),
            Err(e) => tracing::warn!(
                "Cache write error for {} page {}: {}",
                response.domain,
                response.page,
                e
            ),
        }
    }
}
