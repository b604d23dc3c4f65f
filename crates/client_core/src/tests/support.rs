use std::{
    future::Future,
    sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{Car, CarDraft, CarId},
    error::{ApiError, ErrorCode},
    protocol::{Page, ServiceEvent},
};
use tokio::sync::broadcast;

use crate::{error::ServiceResult, RecordService, ServiceError};

pub fn car(id: i64, make: &str, model: &str, year: i32, plate: &str) -> Car {
    Car {
        id: CarId(id),
        make: make.to_string(),
        model: model.to_string(),
        year,
        plate: plate.to_string(),
    }
}

pub fn focus() -> Car {
    car(1, "Ford", "Focus", 2015, "AB12")
}

pub async fn within<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("timed out waiting for list state")
}

/// In-memory stand-in for the record service.
pub struct FakeCarService {
    events: broadcast::Sender<ServiceEvent>,
    stored: Mutex<Vec<Car>>,
    fail_find: bool,
    echo_mutations: bool,
    reject_create_with: Option<String>,
    next_id: AtomicI64,
    pub find_calls: AtomicUsize,
    pub created: Mutex<Vec<CarDraft>>,
    pub removed: Mutex<Vec<CarId>>,
}

impl FakeCarService {
    pub fn with_cars(cars: Vec<Car>) -> Self {
        Self::with_capacity(cars, 64)
    }

    pub fn with_capacity(cars: Vec<Car>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        let next_id = cars.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        Self {
            events,
            stored: Mutex::new(cars),
            fail_find: false,
            echo_mutations: true,
            reject_create_with: None,
            next_id: AtomicI64::new(next_id),
            find_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_find(mut self) -> Self {
        self.fail_find = true;
        self
    }

    /// Mutations succeed but send no notification.
    pub fn silent(mut self) -> Self {
        self.echo_mutations = false;
        self
    }

    pub fn rejecting_create(mut self, message: &str) -> Self {
        self.reject_create_with = Some(message.to_string());
        self
    }

    /// Simulates a change made by another client.
    pub fn push(&self, event: ServiceEvent) {
        {
            let mut stored = self.stored.lock().expect("stored");
            match &event {
                ServiceEvent::Created(car) => stored.push(car.clone()),
                ServiceEvent::Removed(car) => stored.retain(|c| c.id != car.id),
            }
        }
        let _ = self.events.send(event);
    }

    pub fn events_receiver_count(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn find_count(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordService for FakeCarService {
    async fn find(&self) -> ServiceResult<Page<Car>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find {
            return Err(ServiceError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let data = self.stored.lock().expect("stored").clone();
        Ok(Page::unpaginated(data))
    }

    async fn create(&self, draft: &CarDraft) -> ServiceResult<Car> {
        self.created.lock().expect("created").push(draft.clone());
        if let Some(message) = &self.reject_create_with {
            return Err(ApiError::new(ErrorCode::BadRequest, 400, message.clone()).into());
        }
        let id = CarId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let car = draft.clone().into_car(id);
        self.stored.lock().expect("stored").push(car.clone());
        if self.echo_mutations {
            let _ = self.events.send(ServiceEvent::Created(car.clone()));
        }
        Ok(car)
    }

    async fn remove(&self, id: CarId) -> ServiceResult<Car> {
        self.removed.lock().expect("removed").push(id);
        let car = {
            let mut stored = self.stored.lock().expect("stored");
            let index = stored.iter().position(|c| c.id == id).ok_or_else(|| {
                ServiceError::Rejected(ApiError::new(
                    ErrorCode::NotFound,
                    404,
                    format!("No record found for id '{}'", id.0),
                ))
            })?;
            stored.remove(index)
        };
        if self.echo_mutations {
            let _ = self.events.send(ServiceEvent::Removed(car.clone()));
        }
        Ok(car)
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ServiceEvent> {
        self.events.subscribe()
    }
}
