//! Concurrent download registry for rover photo images.
//!
//! A grid showing rover photos kicks off one download per visible cell and
//! cancels it when the cell scrolls away. The registry keys each download by
//! the caller's cell identifier, guarantees at most one in-flight fetch per
//! key and reports every terminal outcome over a channel, so the rendering
//! side applies results from a single place instead of sharing mutable photo
//! state with the fetch tasks.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tokio::sync::{mpsc, Semaphore};

use crate::{client::FetchBytes, models::mars::MarsRoverPhoto};

/// Terminal result of one keyed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(Vec<u8>),
    Failed,
    Cancelled,
}

impl DownloadOutcome {
    /// Folds the outcome into a photo's download state. A cancelled download
    /// leaves the photo untouched at `Placeholder`.
    pub fn apply(self, photo: &mut MarsRoverPhoto) {
        match self {
            Self::Downloaded(bytes) => photo.mark_downloaded(bytes),
            Self::Failed => photo.mark_failed(),
            Self::Cancelled => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEvent<K> {
    pub key: K,
    pub outcome: DownloadOutcome,
}

/// Keyed image download registry with in-flight de-duplication and
/// cooperative cancellation.
pub struct PhotoDownloader<K, F> {
    fetcher: Arc<F>,
    in_flight: Arc<Mutex<HashMap<K, Arc<AtomicBool>>>>,
    events: mpsc::UnboundedSender<DownloadEvent<K>>,
    permits: Option<Arc<Semaphore>>,
}

impl<K, F> PhotoDownloader<K, F>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    F: FetchBytes,
{
    /// A downloader with no concurrency cap, plus the receiving end of its
    /// event channel. The consumer should live on whatever task owns the
    /// photo list.
    pub fn new(fetcher: F) -> (Self, mpsc::UnboundedReceiver<DownloadEvent<K>>) {
        Self::with_concurrency(fetcher, None)
    }

    /// Caps the number of downloads running at once when `max_concurrent`
    /// is set; requests beyond the cap wait for a slot.
    pub fn with_concurrency(
        fetcher: F,
        max_concurrent: Option<usize>,
    ) -> (Self, mpsc::UnboundedReceiver<DownloadEvent<K>>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let downloader = Self {
            fetcher: Arc::new(fetcher),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            events,
            permits: max_concurrent.map(|n| Arc::new(Semaphore::new(n))),
        };
        (downloader, receiver)
    }

    /// Starts downloading `img_src` under `key`. A no-op returning `false`
    /// while a download for the same key is still in flight; once that one
    /// reaches a terminal outcome the key may be requested again.
    pub fn request(&self, key: K, img_src: &str) -> bool {
        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let mut in_flight = self.lock_registry();
            if in_flight.contains_key(&key) {
                return false;
            }
            in_flight.insert(key.clone(), Arc::clone(&cancelled));
        }

        let fetcher = Arc::clone(&self.fetcher);
        let registry = Arc::clone(&self.in_flight);
        let events = self.events.clone();
        let permits = self.permits.clone();
        let url = img_src.to_owned();

        tokio::spawn(async move {
            let _permit = match permits {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    // The semaphore is never closed while tasks hold the
                    // downloader's state, but bail out cleanly regardless.
                    Err(_) => {
                        finish(&registry, &events, key, DownloadOutcome::Cancelled);
                        return;
                    }
                },
                None => None,
            };

            let outcome = run_download(fetcher.as_ref(), &url, &cancelled).await;
            finish(&registry, &events, key, outcome);
        });

        true
    }

    /// Signals cancellation for an in-flight download. The task checks the
    /// flag before and after its network call and mutates nothing once it is
    /// set. Unknown keys are ignored.
    pub fn cancel(&self, key: &K) {
        if let Some(flag) = self.lock_registry().get(key) {
            flag.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.lock_registry().contains_key(key)
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, HashMap<K, Arc<AtomicBool>>> {
        self.in_flight
            .lock()
            .expect("in-flight registry lock poisoned")
    }
}

fn finish<K: Eq + Hash>(
    registry: &Mutex<HashMap<K, Arc<AtomicBool>>>,
    events: &mpsc::UnboundedSender<DownloadEvent<K>>,
    key: K,
    outcome: DownloadOutcome,
) {
    registry
        .lock()
        .expect("in-flight registry lock poisoned")
        .remove(&key);
    // The receiver being gone just means no one is listening any more.
    let _ = events.send(DownloadEvent { key, outcome });
}

async fn run_download<F: FetchBytes>(
    fetcher: &F,
    url: &str,
    cancelled: &AtomicBool,
) -> DownloadOutcome {
    if cancelled.load(Ordering::SeqCst) {
        return DownloadOutcome::Cancelled;
    }

    let result = fetcher.fetch_bytes(url).await;

    if cancelled.load(Ordering::SeqCst) {
        return DownloadOutcome::Cancelled;
    }

    match result {
        Ok(bytes) if !bytes.is_empty() => DownloadOutcome::Downloaded(bytes),
        Ok(_) => DownloadOutcome::Failed,
        Err(err) => {
            tracing::debug!(url, %err, "photo download failed");
            DownloadOutcome::Failed
        }
    }
}
