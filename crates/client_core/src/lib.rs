use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Car, CarDraft, CarId},
    error::ApiError,
    protocol::{FindResponse, Page, ServiceEvent},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod form;
pub mod list;
pub mod nav;
pub mod sync;
pub mod view;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use error::{ServiceError, ServiceResult};
pub use form::{CarForm, FormField, PlateStatus, ValidationError};
pub use list::CarList;
pub use nav::Route;
pub use sync::ListSubscription;
pub use view::{CarsView, SubmitOutcome};

/// Remote collection of cars plus its change notifications.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn find(&self) -> ServiceResult<Page<Car>>;
    async fn create(&self, draft: &CarDraft) -> ServiceResult<Car>;
    async fn remove(&self, id: CarId) -> ServiceResult<Car>;
    /// Every receiver sees every notification, whichever client caused it.
    fn subscribe_events(&self) -> broadcast::Receiver<ServiceEvent>;
}

/// HTTP proxy for the cars collection. Successful `create`/`remove` calls are
/// echoed to local subscribers; changes made by other clients arrive through
/// the optional WebSocket feed.
pub struct CarsClient {
    http: Client,
    settings: ClientSettings,
    events: broadcast::Sender<ServiceEvent>,
    event_feed: Mutex<Option<JoinHandle<()>>>,
}

impl CarsClient {
    pub fn new(settings: ClientSettings) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        let (events, _) = broadcast::channel(settings.event_buffer.max(1));
        Ok(Self {
            http,
            settings,
            events,
            event_feed: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn emit(&self, event: ServiceEvent) {
        // No subscribers is fine: nobody is looking at the list.
        let _ = self.events.send(event);
    }

    /// Opens the realtime feed unless it is already running. The handshake is
    /// bounded by the configured request timeout.
    pub async fn connect_event_feed(&self) -> ServiceResult<()> {
        if self.event_feed_active().await {
            return Ok(());
        }

        let ws_url = self
            .settings
            .events_url()
            .map_err(|err| ServiceError::InvalidUrl {
                url: self.settings.service_url.clone(),
                reason: err.to_string(),
            })?;
        let timeout = self.settings.request_timeout();
        let (ws_stream, _) = tokio::time::timeout(timeout, connect_async(ws_url.as_str()))
            .await
            .map_err(|_| {
                ServiceError::EventFeed(format!(
                    "{ws_url}: handshake timed out after {}s",
                    timeout.as_secs()
                ))
            })?
            .map_err(|err| ServiceError::EventFeed(format!("{ws_url}: {err}")))?;

        let mut guard = self.event_feed.lock().await;
        if guard.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!(url = %ws_url, "car event feed already running; dropping new connection");
            return Ok(());
        }
        let (_, mut ws_reader) = ws_stream.split();
        info!(url = %ws_url, "car event feed connected");

        let events = self.events.clone();
        *guard = Some(tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServiceEvent>(&text) {
                        Ok(event) => {
                            debug!(
                                event = event.kind(),
                                car_id = event.car().id.0,
                                "car event received"
                            );
                            let _ = events.send(event);
                        }
                        Err(err) => warn!(error = %err, "skipping malformed car event"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(error = %err, "car event feed receive failed");
                        break;
                    }
                }
            }
            info!("car event feed closed");
        }));
        Ok(())
    }

    pub async fn event_feed_active(&self) -> bool {
        self.event_feed
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub async fn disconnect_event_feed(&self) {
        if let Some(task) = self.event_feed.lock().await.take() {
            task.abort();
        }
    }

    fn item_url(&self, id: CarId) -> String {
        format!("{}/{}", self.settings.collection_url(), id.0)
    }
}

impl Drop for CarsClient {
    fn drop(&mut self) {
        if let Some(task) = self.event_feed.get_mut().take() {
            task.abort();
        }
    }
}

/// Reads the body and maps non-success answers to a rejection when the body
/// is a service error document.
async fn decode_response<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(match serde_json::from_str::<ApiError>(&body) {
            Ok(api) => ServiceError::Rejected(api),
            Err(_) => ServiceError::Status {
                status: status.as_u16(),
                body,
            },
        });
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl RecordService for CarsClient {
    async fn find(&self) -> ServiceResult<Page<Car>> {
        let response = self
            .http
            .get(self.settings.collection_url())
            .send()
            .await?;
        let found: FindResponse<Car> = decode_response(response).await?;
        Ok(found.into())
    }

    async fn create(&self, draft: &CarDraft) -> ServiceResult<Car> {
        let response = self
            .http
            .post(self.settings.collection_url())
            .json(draft)
            .send()
            .await?;
        let car: Car = decode_response(response).await?;
        debug!(car_id = car.id.0, "create acknowledged");
        self.emit(ServiceEvent::Created(car.clone()));
        Ok(car)
    }

    async fn remove(&self, id: CarId) -> ServiceResult<Car> {
        let response = self.http.delete(self.item_url(id)).send().await?;
        let car: Car = decode_response(response).await?;
        debug!(car_id = car.id.0, "remove acknowledged");
        self.emit(ServiceEvent::Removed(car.clone()));
        Ok(car)
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ServiceEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
