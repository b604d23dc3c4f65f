use serde::{Deserialize, Serialize};

use crate::domain::Car;

/// One page of a `find` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub skip: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps an unpaginated result set.
    pub fn unpaginated(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            total,
            limit: total,
            skip: 0,
            data,
        }
    }
}

/// `find` answers with a page, or with a bare array when pagination is
/// switched off on the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FindResponse<T> {
    Paginated(Page<T>),
    Plain(Vec<T>),
}

impl<T> From<FindResponse<T>> for Page<T> {
    fn from(value: FindResponse<T>) -> Self {
        match value {
            FindResponse::Paginated(page) => page,
            FindResponse::Plain(data) => Page::unpaginated(data),
        }
    }
}

/// Change notification pushed to every connected view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServiceEvent {
    Created(Car),
    Removed(Car),
}

impl ServiceEvent {
    pub fn car(&self) -> &Car {
        match self {
            Self::Created(car) | Self::Removed(car) => car,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Removed(_) => "removed",
        }
    }
}
