//! Keeps a [`CarList`] in step with the record service: one initial `find`,
//! then the push notifications in delivery order.

use std::sync::Arc;

use shared::domain::Car;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{list::CarList, RecordService};

/// Live view of the remote collection. The background task stops when the
/// subscription is dropped or unmounted.
pub struct ListSubscription {
    state: watch::Receiver<CarList>,
    task: JoinHandle<()>,
}

impl ListSubscription {
    /// Subscribes to notifications and issues the initial load. Must be called
    /// from within a tokio runtime.
    pub fn mount(service: Arc<dyn RecordService>) -> Self {
        // Subscribe before the initial find so nothing emitted while it is in
        // flight gets lost.
        let events = service.subscribe_events();
        let (state_tx, state) = watch::channel(CarList::new());
        let task = tokio::spawn(run_list_sync(service, events, state_tx));
        Self { state, task }
    }

    pub fn cars(&self) -> Vec<Car> {
        self.state.borrow().as_slice().to_vec()
    }

    /// Another handle on the same state cell, for readers on other threads.
    pub fn watch(&self) -> watch::Receiver<CarList> {
        self.state.clone()
    }

    /// Waits for the next change. Returns `false` once the sync task is gone.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Waits until `predicate` holds for the current list.
    pub async fn wait_until(&mut self, predicate: impl FnMut(&CarList) -> bool) -> Option<CarList> {
        self.state
            .wait_for(predicate)
            .await
            .ok()
            .map(|list| list.clone())
    }

    pub fn unmount(self) {}
}

impl Drop for ListSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_list_sync(
    service: Arc<dyn RecordService>,
    mut events: broadcast::Receiver<shared::protocol::ServiceEvent>,
    state: watch::Sender<CarList>,
) {
    load_page(service.as_ref(), &state).await;

    loop {
        match events.recv().await {
            Ok(event) => {
                state.send_if_modified(|list| {
                    let changed = list.apply(&event);
                    debug!(
                        event = event.kind(),
                        car_id = event.car().id.0,
                        changed,
                        "applied car notification"
                    );
                    changed
                });
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "car notifications dropped; reloading list");
                load_page(service.as_ref(), &state).await;
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("car notification source closed");
                break;
            }
        }
    }
}

async fn load_page(service: &dyn RecordService, state: &watch::Sender<CarList>) {
    match service.find().await {
        Ok(page) => {
            info!(count = page.data.len(), total = page.total, "loaded cars");
            state.send_modify(|list| list.replace(page.data));
        }
        Err(err) => {
            warn!(error = %err, "failed to load cars; keeping current list");
        }
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
