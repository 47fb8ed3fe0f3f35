//! Polling Cache
//!
//! Keeps a value for a cache key up to date by refetching its URL on a fixed
//! interval, sharing results with every other subscriber through the
//! [`ResponseCache`].
//!
//! A subscription starts with a synchronous freshness check against the
//! cache. A fresh entry is published immediately and the first fetch is
//! skipped; otherwise one fetch is issued right away. After that every poll
//! tick refetches unconditionally. Failures are published as the `error` of
//! the state and retried only on the next tick.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::error::FetchError;
use crate::fetch::{is_empty_payload, Fetch};

/// Smallest accepted poll interval; `tokio::time::interval` rejects zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Conversion applied to every successfully decoded response before caching.
type Transform<R, T> = Arc<dyn Fn(R) -> T + Send + Sync>;

// == Poll Request ==
/// What to fetch, where to cache it, and how often to refresh it.
pub struct PollRequest<R, T> {
    /// Upstream URL; empty means "do not fetch"
    pub url: String,
    /// Sole identity of the cached value
    pub cache_key: String,
    /// Maximum age of a cache entry that may be served at subscription time
    pub cache_duration: Duration,
    /// Delay between unconditional refetches
    pub poll_interval: Duration,
    transform: Transform<R, T>,
}

impl<T: 'static> PollRequest<T, T> {
    /// Creates a request whose decoded body is cached as-is.
    pub fn new(
        url: impl Into<String>,
        cache_key: impl Into<String>,
        cache_duration: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            cache_key: cache_key.into(),
            cache_duration,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            transform: Arc::new(|raw: T| raw),
        }
    }
}

impl<R: 'static, T: 'static> PollRequest<R, T> {
    /// Adds a transform step after decoding. Chained transforms run in order.
    pub fn with_transform<U, F>(self, f: F) -> PollRequest<R, U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.transform;
        PollRequest {
            url: self.url,
            cache_key: self.cache_key,
            cache_duration: self.cache_duration,
            poll_interval: self.poll_interval,
            transform: Arc::new(move |raw: R| f(inner(raw))),
        }
    }
}

impl<R, T> fmt::Debug for PollRequest<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollRequest")
            .field("url", &self.url)
            .field("cache_key", &self.cache_key)
            .field("cache_duration", &self.cache_duration)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

// == Fetch State ==
/// What an observer currently knows about a key.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl<T> FetchState<T> {
    /// Nothing to show and nothing in progress.
    pub fn idle() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
        }
    }

    /// First fetch in progress.
    pub fn loading() -> Self {
        Self {
            value: None,
            loading: true,
            error: None,
        }
    }

    /// Fetch finished; `None` means the upstream had nothing to show.
    pub fn ready(value: Option<T>) -> Self {
        Self {
            value,
            loading: false,
            error: None,
        }
    }

    pub fn failed(error: FetchError) -> Self {
        Self {
            value: None,
            loading: false,
            error: Some(error),
        }
    }
}

// == Subscription ==
/// Handle to one running poll task.
///
/// Dropping the handle cancels the task. Results of a fetch that is in flight
/// at cancellation time are discarded.
pub struct Subscription<T> {
    cache_key: String,
    state: watch::Receiver<FetchState<T>>,
    task: Option<JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
}

impl<T: Clone> Subscription<T> {
    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Waits for the next state update. Returns false once no more updates
    /// can arrive.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// A receiver that follows this subscription while it lives.
    pub fn watch(&self) -> watch::Receiver<FetchState<T>> {
        self.state.clone()
    }
}

impl<T> Subscription<T> {
    /// Stops polling. No fetch is started and no state is published after
    /// this returns. Calling it again is a no-op.
    pub fn cancel(&self) {
        let already_cancelled = self.cancelled.swap(true, Ordering::AcqRel);
        if let Some(task) = &self.task {
            task.abort();
            if !already_cancelled {
                debug!(key = %self.cache_key, "subscription cancelled");
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cache_key", &self.cache_key)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

// == Polling Cache ==
/// Cache service plus the fetcher used to fill it.
#[derive(Clone)]
pub struct PollingCache {
    cache: ResponseCache,
    fetcher: Arc<dyn Fetch>,
}

impl PollingCache {
    pub fn new(cache: ResponseCache, fetcher: Arc<dyn Fetch>) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetch> {
        &self.fetcher
    }

    // == Observe ==
    /// Starts a subscription for `request` on the current tokio runtime.
    ///
    /// The returned handle already carries the result of the cache check:
    /// a fresh value, `loading = true` when a fetch was started, or the idle
    /// state for an empty URL.
    pub fn observe<R, T>(&self, request: PollRequest<R, T>) -> Subscription<T>
    where
        R: DeserializeOwned + 'static,
        T: Clone + Send + Sync + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let cache_key = request.cache_key.clone();

        if request.url.is_empty() {
            let (_tx, rx) = watch::channel(FetchState::idle());
            return Subscription {
                cache_key,
                state: rx,
                task: None,
                cancelled,
            };
        }

        let cached = self
            .cache
            .get_fresh::<T>(&request.cache_key, request.cache_duration);
        let served_from_cache = cached.is_some();
        let initial = match cached {
            Some(value) => FetchState::ready(Some(value)),
            None => FetchState::loading(),
        };

        let (tx, rx) = watch::channel(initial);
        info!(
            key = %request.cache_key,
            interval_ms = request.poll_interval.as_millis() as u64,
            served_from_cache,
            "starting poll subscription"
        );

        let task = tokio::spawn(self.clone().run(request, tx, cancelled.clone(), served_from_cache));

        Subscription {
            cache_key,
            state: rx,
            task: Some(task),
            cancelled,
        }
    }

    // == Fetch Once ==
    /// Serves a fresh cached value or performs a single fetch, caching the
    /// result. No polling.
    pub async fn fetch_once<R, T>(&self, request: &PollRequest<R, T>) -> Result<Option<T>, FetchError>
    where
        R: DeserializeOwned,
        T: Clone + Send + Sync + 'static,
    {
        if request.url.is_empty() {
            return Ok(None);
        }
        if let Some(value) = self
            .cache
            .get_fresh::<T>(&request.cache_key, request.cache_duration)
        {
            return Ok(Some(value));
        }

        let value = self.fetch_uncached(request).await?;
        if let Some(value) = &value {
            self.cache.insert(request.cache_key.clone(), value.clone());
        }
        Ok(value)
    }

    async fn fetch_uncached<R, T>(&self, request: &PollRequest<R, T>) -> Result<Option<T>, FetchError>
    where
        R: DeserializeOwned,
    {
        let raw = self.fetcher.get_json(&request.url).await?;
        if is_empty_payload(&raw) {
            return Ok(None);
        }
        let decoded: R = serde_json::from_value(raw)?;
        Ok(Some((request.transform)(decoded)))
    }

    async fn run<R, T>(
        self,
        request: PollRequest<R, T>,
        tx: watch::Sender<FetchState<T>>,
        cancelled: Arc<AtomicBool>,
        skip_initial_fetch: bool,
    ) where
        R: DeserializeOwned,
        T: Clone + Send + Sync + 'static,
    {
        let first_tick = Instant::now() + request.poll_interval;

        if !skip_initial_fetch {
            self.refresh(&request, &tx, &cancelled).await;
        }

        let mut ticker = time::interval_at(first_tick, request.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if cancelled.load(Ordering::Acquire) || tx.is_closed() {
                break;
            }
            debug!(key = %request.cache_key, "poll tick");
            self.refresh(&request, &tx, &cancelled).await;
        }
    }

    async fn refresh<R, T>(
        &self,
        request: &PollRequest<R, T>,
        tx: &watch::Sender<FetchState<T>>,
        cancelled: &AtomicBool,
    ) where
        R: DeserializeOwned,
        T: Clone + Send + Sync + 'static,
    {
        let result = self.fetch_uncached(request).await;

        if cancelled.load(Ordering::Acquire) {
            debug!(key = %request.cache_key, "discarding result of cancelled subscription");
            return;
        }

        let state = match result {
            Ok(Some(value)) => {
                self.cache.insert(request.cache_key.clone(), value.clone());
                FetchState::ready(Some(value))
            }
            Ok(None) => {
                debug!(key = %request.cache_key, "upstream returned nothing");
                FetchState::ready(None)
            }
            Err(err) => {
                warn!(key = %request.cache_key, error = %err, "fetch failed");
                FetchState::failed(err)
            }
        };
        tx.send_replace(state);
    }
}

impl fmt::Debug for PollingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingCache")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
