//! FetchCoordinator
//!
//! Makes sure every bound slot ends up showing the last-24h series of the
//! asset it owns, while touching the network as little as possible.
//! Responsibilities:
//!   • Serve cache hits synchronously, with no delay
//!   • Collapse concurrent misses for one asset into a single gateway call
//!   • Stagger each call so rows scrolled past are dropped before issuance
//!   • Bound every call with a timeout
//!   • Populate the cache with non-empty results only
//!   • Hand results back to the consumer as `Delivery` values
//!
//! Slots are never touched from worker tasks. Deliveries travel over an mpsc
//! channel and the consumer applies them with `SlotTable::apply`, where the
//! generation check drops anything that went stale in the meantime.
//!
//! The coordinator is an `Arc`-managed service so spawned fetch tasks can
//! own a handle to it. `ensure` / `rebind` must run inside a Tokio runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::AbortHandle;
use tracing::{Instrument, debug, info, warn};

use common::logger::{annotate_span, child_span};
use market::{AssetId, MarketDataGateway, Series, SeriesWindow};

use crate::cache::SeriesCache;
use crate::config::CoordinatorConfig;
use crate::slot::{ChartSink, SlotController, SlotTicket};

/// Result for one slot binding.
#[derive(Debug, Clone)]
pub enum Payload {
    Series(Arc<Series>),
    /// Failure, timeout, or a successful response without points.
    Empty,
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub ticket: SlotTicket,
    pub payload: Payload,
}

/// How `ensure` resolved a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Slot is not bound to any asset; nothing to do.
    Unbound,
    /// Cached series applied immediately.
    CacheHit,
    /// Attached to a fetch already in flight for the same asset.
    Joined,
    /// New fetch scheduled after the stagger delay.
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting out the stagger delay; may still be cancelled.
    Scheduled,
    /// Gateway call issued; runs to completion.
    Issued,
}

/// In-flight marker: at most one per asset id.
struct FetchRequest {
    seq: u64,
    phase: Phase,
    waiters: Vec<SlotTicket>,
    abort: Option<AbortHandle>,
}

pub struct FetchCoordinator<G> {
    gateway: Arc<G>,
    cache: Arc<SeriesCache>,
    inflight: Mutex<HashMap<AssetId, FetchRequest>>,
    deliveries: Sender<Delivery>,
    cfg: CoordinatorConfig,
    next_seq: AtomicU64,
}

impl<G: MarketDataGateway> FetchCoordinator<G> {
    /// Create the coordinator and the receiving end of its delivery channel.
    pub fn new(
        gateway: Arc<G>,
        cache: Arc<SeriesCache>,
        cfg: CoordinatorConfig,
    ) -> (Arc<Self>, Receiver<Delivery>) {
        let (tx, rx) = mpsc::channel(cfg.delivery_capacity.max(1));

        let coordinator = Arc::new(Self {
            gateway,
            cache,
            inflight: Mutex::new(HashMap::new()),
            deliveries: tx,
            cfg,
            next_seq: AtomicU64::new(0),
        });

        (coordinator, rx)
    }

    pub fn cache(&self) -> &Arc<SeriesCache> {
        &self.cache
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.cfg
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.inflight.lock().contains_key(id)
    }

    pub fn in_flight_len(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Number of slot bindings waiting on the fetch for `id`.
    pub fn waiters(&self, id: &str) -> usize {
        self.inflight
            .lock()
            .get(id)
            .map(|r| r.waiters.len())
            .unwrap_or(0)
    }

    /// Make sure `slot` will show the series of the asset it currently owns.
    pub fn ensure<S: ChartSink>(self: &Arc<Self>, slot: &mut SlotController<S>) -> EnsureOutcome {
        let Some(ticket) = slot.ticket() else {
            return EnsureOutcome::Unbound;
        };
        let id = ticket.asset_id.clone();

        // Cache is checked under the in-flight lock: a finishing fetch stores
        // its series before it takes this lock to clear its entry, so a miss
        // here means the entry (if any) can still accept waiters.
        let mut inflight = self.inflight.lock();

        // ---- 1. Cache hit ----
        if let Some(series) = self.cache.get_non_empty(&id) {
            drop(inflight);
            slot.deliver(&ticket, series);
            return EnsureOutcome::CacheHit;
        }

        // ---- 2. Join an in-flight fetch ----
        if let Some(req) = inflight.get_mut(&id) {
            if !req.waiters.contains(&ticket) {
                req.waiters.push(ticket);
            }
            debug!(
                asset_id = %id,
                waiters = req.waiters.len(),
                "joined in-flight series fetch"
            );
            return EnsureOutcome::Joined;
        }

        // ---- 3. Schedule a new fetch ----
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        inflight.insert(
            id.clone(),
            FetchRequest {
                seq,
                phase: Phase::Scheduled,
                waiters: vec![ticket],
                abort: None,
            },
        );

        let coordinator = Arc::clone(self);
        let task_id = id.clone();
        let handle = tokio::spawn(
            async move { coordinator.run_request(task_id, seq).await }
                .instrument(child_span("series_fetch")),
        );

        if let Some(req) = inflight.get_mut(&id) {
            req.abort = Some(handle.abort_handle());
        }

        debug!(
            asset_id = %id,
            stagger_ms = self.cfg.stagger.as_millis() as u64,
            "series fetch scheduled"
        );

        EnsureOutcome::Scheduled
    }

    /// Recycle `slot` for `id`: release its previous binding, assign, ensure.
    pub fn rebind<S: ChartSink>(
        self: &Arc<Self>,
        slot: &mut SlotController<S>,
        id: impl Into<AssetId>,
    ) -> EnsureOutcome {
        if let Some(previous) = slot.ticket() {
            self.detach(&previous);
        }
        slot.assign(id);
        self.ensure(slot)
    }

    /// Remove one binding from the waiters of its asset's fetch.
    ///
    /// A fetch left without waiters is cancelled if it has not been issued
    /// yet. Once issued it runs to completion and still warms the cache.
    pub fn detach(&self, ticket: &SlotTicket) {
        let mut inflight = self.inflight.lock();

        let Some(req) = inflight.get_mut(&ticket.asset_id) else {
            return;
        };

        req.waiters.retain(|t| t != ticket);

        if req.waiters.is_empty() && req.phase == Phase::Scheduled {
            if let Some(req) = inflight.remove(&ticket.asset_id) {
                if let Some(abort) = req.abort {
                    abort.abort();
                }
            }
            info!(asset_id = %ticket.asset_id, "scheduled series fetch cancelled (no waiters)");
        }
    }

    /// Drop a scheduled fetch for `id` before it reaches the gateway.
    ///
    /// Returns false when nothing is scheduled or the call is already issued.
    /// Waiters of a cancelled fetch receive nothing.
    pub fn cancel(&self, id: &str) -> bool {
        let mut inflight = self.inflight.lock();

        match inflight.get(id) {
            Some(req) if req.phase == Phase::Scheduled => {
                if let Some(req) = inflight.remove(id) {
                    if let Some(abort) = req.abort {
                        abort.abort();
                    }
                }
                info!(asset_id = %id, "scheduled series fetch cancelled");
                true
            }
            _ => false,
        }
    }

    async fn run_request(self: Arc<Self>, id: AssetId, seq: u64) {
        annotate_span(&id);

        tokio::time::sleep(self.cfg.stagger).await;

        if !self.mark_issued(&id, seq) {
            debug!("series fetch dropped before issuance");
            return;
        }

        let result = tokio::time::timeout(
            self.cfg.fetch_timeout,
            self.gateway.fetch_series(&id, SeriesWindow::Last24Hours),
        )
        .await;

        let payload = match result {
            Ok(Ok(series)) if !series.is_empty() => {
                let points = series.len();
                let stored = self.cache.put(&id, series);
                info!(points, "series fetched and cached");
                Payload::Series(stored)
            }
            Ok(Ok(_)) => {
                info!("series fetch returned no points; not cached");
                Payload::Empty
            }
            Ok(Err(e)) => {
                warn!(error = %e, "series fetch failed");
                Payload::Empty
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.cfg.fetch_timeout.as_millis() as u64,
                    "series fetch timed out"
                );
                Payload::Empty
            }
        };

        let waiters = self.finish(&id, seq);

        for ticket in waiters {
            let delivery = Delivery {
                ticket,
                payload: payload.clone(),
            };
            if self.deliveries.send(delivery).await.is_err() {
                debug!("delivery receiver dropped");
                break;
            }
        }
    }

    /// Flip a scheduled request to issued. False if it was cancelled or
    /// replaced while the stagger delay ran.
    fn mark_issued(&self, id: &str, seq: u64) -> bool {
        let mut inflight = self.inflight.lock();
        match inflight.get_mut(id) {
            Some(req) if req.seq == seq => {
                req.phase = Phase::Issued;
                req.abort = None;
                true
            }
            _ => false,
        }
    }

    /// Clear the in-flight entry and take its waiters.
    fn finish(&self, id: &str, seq: u64) -> Vec<SlotTicket> {
        let mut inflight = self.inflight.lock();
        match inflight.get(id) {
            Some(req) if req.seq == seq => inflight
                .remove(id)
                .map(|req| req.waiters)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}
