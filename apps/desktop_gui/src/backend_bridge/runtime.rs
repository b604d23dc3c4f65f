//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{CarsClient, ClientSettings, ListSubscription, RecordService};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::task::JoinHandle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// The mounted cars list and the task relaying its changes to the UI.
struct MountedCars {
    _subscription: ListSubscription,
    relay: JoinHandle<()>,
}

impl Drop for MountedCars {
    fn drop(&mut self) {
        self.relay.abort();
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match CarsClient::new(settings) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to build record service client: {err}");
                    return;
                }
            };
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            let mut mounted: Option<MountedCars> = None;
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command");
                match cmd {
                    BackendCommand::MountCars => {
                        if mounted.is_some() {
                            continue;
                        }
                        mounted = Some(mount_cars(&client, &ui_tx));
                        if client.settings().realtime_events {
                            let client = Arc::clone(&client);
                            let ui_tx = ui_tx.clone();
                            tokio::spawn(async move {
                                if let Err(err) = client.connect_event_feed().await {
                                    tracing::warn!(error = %err, "car event feed unavailable");
                                    send_ui_event(
                                        &ui_tx,
                                        UiEvent::Error(UiError::from_message(
                                            UiErrorContext::EventFeed,
                                            err.to_string(),
                                        )),
                                    );
                                }
                            });
                        }
                    }
                    BackendCommand::UnmountCars => {
                        mounted = None;
                        client.disconnect_event_feed().await;
                    }
                    BackendCommand::CreateCar { draft } => {
                        let client = Arc::clone(&client);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match client.create(&draft).await {
                                Ok(car) => UiEvent::CarCreated(car),
                                Err(err) => {
                                    tracing::warn!(error = %err, "car create rejected");
                                    UiEvent::CreateRejected(err.user_message())
                                }
                            };
                            send_ui_event(&ui_tx, event);
                        });
                    }
                    BackendCommand::DeleteCar { id } => {
                        let client = Arc::clone(&client);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if let Err(err) = client.remove(id).await {
                                tracing::warn!(car_id = id.0, error = %err, "car delete failed");
                                send_ui_event(
                                    &ui_tx,
                                    UiEvent::Error(UiError::from_message(
                                        UiErrorContext::DeleteCar,
                                        err.user_message(),
                                    )),
                                );
                            }
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    });
}

fn mount_cars(client: &Arc<CarsClient>, ui_tx: &Sender<UiEvent>) -> MountedCars {
    let subscription = ListSubscription::mount(Arc::clone(client) as Arc<dyn RecordService>);
    let mut state = subscription.watch();
    let ui_tx = ui_tx.clone();
    let relay = tokio::spawn(async move {
        loop {
            let cars = state.borrow_and_update().as_slice().to_vec();
            match ui_tx.try_send(UiEvent::CarsChanged(cars)) {
                Ok(()) => {}
                // The next change carries the whole list again.
                Err(TrySendError::Full(_)) => tracing::warn!("ui queue full; list update dropped"),
                Err(TrySendError::Disconnected(_)) => break,
            }
            if state.changed().await.is_err() {
                break;
            }
        }
    });
    MountedCars {
        _subscription: subscription,
        relay,
    }
}

/// Never blocks a runtime worker on a full UI queue.
fn send_ui_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(TrySendError::Full(event)) = ui_tx.try_send(event) {
        tracing::warn!(?event, "ui queue full; dropping backend event");
    }
}
