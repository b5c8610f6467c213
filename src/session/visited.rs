//! Session-scoped URL deduplication.

use parking_lot::Mutex;
use std::collections::HashSet;

/// The set of URLs already claimed for scraping within one session.
///
/// Concurrent gathers race to claim the same URL; `admit_new` performs the
/// check-and-mark for each URL as a single atomic step under one lock, so
/// no two callers ever observe the same URL as newly admitted.
#[derive(Debug, Default)]
pub struct VisitedUrls {
    seen: Mutex<HashSet<String>>,
}

impl VisitedUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the subset of `urls` not previously admitted, marking them
    /// as admitted before returning. Preserves input order and filters
    /// duplicates within the input as well.
    pub fn admit_new<I>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = self.seen.lock();
        urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
    }

    /// Number of URLs admitted so far.
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
