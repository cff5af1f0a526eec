use crate::api::FetchResult;
use crate::pins::PinSet;
use crate::prelude::{Scope, StatsResult, StatsSource};
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};
use crate::view::builder::build;
use crate::view::node::DisplayNode;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Marks one refresh; only the newest ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RefreshOutcome {
    /// The tree was replaced; `revision` is the new change-notification value.
    Published { revision: u64, nodes: usize },
    /// A newer refresh started while this one was in flight.
    Superseded,
}

struct Published {
    nodes: Vec<DisplayNode>,
    data: Option<Arc<FetchResult>>,
}

/// Holds the display tree for one scope and republishes it on refresh.
///
/// The tree is swapped as a whole and a change notification is sent only
/// after the swap, so readers never see a half-built tree.
pub struct StatsProvider {
    scope: Scope,
    pins: RwLock<PinSet>,
    published: RwLock<Published>,
    generation: AtomicU64,
    revision: watch::Sender<u64>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl StatsProvider {
    pub fn new(scope: Scope) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            scope,
            pins: RwLock::new(PinSet::new()),
            published: RwLock::new(Published {
                nodes: Vec::new(),
                data: None,
            }),
            generation: AtomicU64::new(0),
            revision,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(format!("{scope}-provider")),
        }
    }

    /// Provider for [`Scope::Pinned`] seeded with the registry's current pins.
    pub fn pinned(pins: PinSet) -> Self {
        let provider = Self::new(Scope::Pinned);
        provider.set_pins(pins);
        provider
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn root_nodes(&self) -> Vec<DisplayNode> {
        self.published
            .read()
            .map(|p| p.nodes.clone())
            .unwrap_or_default()
    }

    pub fn children<'n>(&self, node: &'n DisplayNode) -> &'n [DisplayNode] {
        &node.children
    }

    /// Data behind the current tree, if any refresh has succeeded.
    pub fn latest(&self) -> Option<Arc<FetchResult>> {
        self.published.read().ok().and_then(|p| p.data.clone())
    }

    /// Receives the revision number after every successful publish.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Replaces the pin snapshot used on the next refresh.
    pub fn set_pins(&self, pins: PinSet) {
        if let Ok(mut guard) = self.pins.write() {
            *guard = pins;
        }
    }

    pub fn pins(&self) -> PinSet {
        self.pins.read().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    /// Fetches from `source` and publishes the result unless a newer
    /// refresh has started in the meantime.
    pub async fn refresh<S: StatsSource>(&self, source: &S) -> StatsResult<RefreshOutcome> {
        let ticket = self.begin_refresh();
        let result = source.fetch().await;
        self.complete_refresh(ticket, result)
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.logger
            .detail(&format!("refresh #{generation} started"));
        RefreshTicket { generation }
    }

    pub fn complete_refresh(
        &self,
        ticket: RefreshTicket,
        result: StatsResult<FetchResult>,
    ) -> StatsResult<RefreshOutcome> {
        if ticket.generation != self.generation.load(Ordering::SeqCst) {
            self.metrics.record_superseded();
            self.logger.detail(&format!(
                "refresh #{} superseded, discarding its result",
                ticket.generation
            ));
            return Ok(RefreshOutcome::Superseded);
        }

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                self.metrics.record_failed();
                self.logger
                    .warn(&format!("refresh #{} failed: {err}", ticket.generation));
                return Err(err);
            }
        };

        let pins = self.pins();
        let nodes = build(self.scope, &data.locations, &data.latest, Some(&pins));
        let count = nodes.len();
        {
            let mut guard = match self.published.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if ticket.generation != self.generation.load(Ordering::SeqCst) {
                self.metrics.record_superseded();
                return Ok(RefreshOutcome::Superseded);
            }
            *guard = Published {
                nodes,
                data: Some(Arc::new(data)),
            };
        }

        self.revision.send_modify(|revision| *revision += 1);
        let revision = self.revision();
        self.metrics.record_published();
        self.logger.record(&format!(
            "published {count} root nodes (revision {revision})"
        ));
        Ok(RefreshOutcome::Published {
            revision,
            nodes: count,
        })
    }
}
