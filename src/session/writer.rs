//! Snapshot Writer
//!
//! Fire-and-forget saves of whole snapshots. Each save carries a revision;
//! a save that reaches the store after a newer one has been written (or after
//! a clear) is dropped, so the stored value always converges to the latest
//! committed snapshot.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::Collection;
use crate::repository::{CollectionGateway, StorageResult};

pub(crate) struct SnapshotWriter {
    gateway: CollectionGateway,
    revision: u64,
    /// Revision of the last write (or clear) that reached the store
    written: Arc<Mutex<u64>>,
    pending: Vec<JoinHandle<()>>,
}

impl SnapshotWriter {
    pub(crate) fn new(gateway: CollectionGateway) -> Self {
        Self {
            gateway,
            revision: 0,
            written: Arc::new(Mutex::new(0)),
            pending: Vec::new(),
        }
    }

    pub(crate) fn gateway(&self) -> &CollectionGateway {
        &self.gateway
    }

    /// Spawn a background save of `snapshot`. Failures are logged only.
    pub(crate) fn save(&mut self, snapshot: Arc<Collection>) {
        self.pending.retain(|handle| !handle.is_finished());

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("[Writer] no runtime to save on: {}", e);
                return;
            }
        };

        self.revision += 1;
        let revision = self.revision;
        let gateway = self.gateway.clone();
        let written = self.written.clone();

        self.pending.push(handle.spawn(async move {
            let mut last = written.lock().await;
            if *last >= revision {
                log::debug!("[Writer] skipping stale save r{} (stored r{})", revision, *last);
                return;
            }
            if let Err(e) = gateway.save(&snapshot).await {
                log::error!("[Writer] save r{} failed, memory stays authoritative: {}", revision, e);
            }
            *last = revision;
        }));
    }

    /// Remove the stored value. Saves still in flight are invalidated.
    pub(crate) async fn clear(&mut self) -> StorageResult<()> {
        self.revision += 1;
        let mut last = self.written.lock().await;
        *last = self.revision;
        self.gateway.clear().await
    }

    /// Wait for every spawned save to finish
    pub(crate) async fn flush(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                log::error!("[Writer] save task aborted: {}", e);
            }
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.iter().filter(|handle| !handle.is_finished()).count()
    }
}
