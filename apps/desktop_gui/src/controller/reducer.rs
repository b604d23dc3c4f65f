//! State transitions for the cars page, driven by backend events.

use client_core::CarForm;
use shared::domain::{Car, CarDraft};

use super::events::{UiError, UiEvent};

/// Everything the cars page renders. Recreated on every mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarsPageState {
    pub cars: Vec<Car>,
    pub form: CarForm,
    /// Raw text of the year input; parsed into `form.year` on edit.
    pub year_input: String,
    pub create_in_flight: bool,
}

impl Default for CarsPageState {
    fn default() -> Self {
        let form = CarForm::new();
        Self {
            cars: Vec::new(),
            year_input: form.year_text(),
            form,
            create_in_flight: false,
        }
    }
}

impl CarsPageState {
    pub fn set_year_input(&mut self, text: String) {
        self.form.set_year_text(&text);
        self.year_input = text;
    }

    /// Validates the form; returns the draft to send when it passes.
    pub fn begin_submit(&mut self) -> Option<CarDraft> {
        if self.create_in_flight {
            return None;
        }
        let draft = self.form.begin_submit().ok()?;
        self.create_in_flight = true;
        Some(draft)
    }
}

/// App-wide state touched by backend events.
#[derive(Debug, Default)]
pub struct ShellState {
    pub page: CarsPageState,
    pub status: String,
    pub banner: Option<UiError>,
}

pub fn apply_ui_event(state: &mut ShellState, event: UiEvent) {
    match event {
        UiEvent::Info(message) => state.status = message,
        UiEvent::CarsChanged(cars) => {
            state.status = format!("{} car(s)", cars.len());
            state.page.cars = cars;
        }
        UiEvent::CarCreated(car) => {
            state.page.create_in_flight = false;
            state.page.form.apply_created();
            state.page.year_input = state.page.form.year_text();
            state.status = format!("Added {} {} ({})", car.make, car.model, car.plate);
        }
        UiEvent::CreateRejected(message) => {
            state.page.create_in_flight = false;
            state.page.form.apply_rejected(message);
        }
        UiEvent::Error(err) => {
            tracing::warn!(context = ?err.context(), "{}", err.message());
            state.banner = Some(err);
        }
    }
}
