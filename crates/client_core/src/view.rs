//! Controller behind the cars page: list rows, the add form, and delete
//! actions. The list only ever changes through service notifications.

use std::sync::Arc;

use shared::domain::{Car, CarId};
use tracing::{info, warn};

use crate::{
    error::ServiceResult,
    form::{CarForm, ValidationError},
    sync::ListSubscription,
    RecordService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side constraints failed; nothing was sent.
    Invalid(Vec<ValidationError>),
    Created(Car),
    /// The service refused the draft with this message.
    Rejected(String),
}

pub struct CarsView {
    service: Arc<dyn RecordService>,
    list: ListSubscription,
    form: CarForm,
}

impl CarsView {
    /// Seeds the list with one `find` and starts following notifications.
    pub fn mount(service: Arc<dyn RecordService>) -> Self {
        let list = ListSubscription::mount(Arc::clone(&service));
        Self {
            service,
            list,
            form: CarForm::new(),
        }
    }

    pub fn cars(&self) -> Vec<Car> {
        self.list.cars()
    }

    pub fn list_mut(&mut self) -> &mut ListSubscription {
        &mut self.list
    }

    pub fn form(&self) -> &CarForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CarForm {
        &mut self.form
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let draft = match self.form.begin_submit() {
            Ok(draft) => draft,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };

        match self.service.create(&draft).await {
            Ok(car) => {
                info!(car_id = car.id.0, plate = %car.plate, "car created");
                self.form.apply_created();
                SubmitOutcome::Created(car)
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %err, plate = %draft.plate, "car create rejected");
                self.form.apply_rejected(message.clone());
                SubmitOutcome::Rejected(message)
            }
        }
    }

    /// Asks the service to remove `id`. The row disappears when the removal
    /// notification arrives.
    pub async fn delete(&self, id: CarId) -> ServiceResult<()> {
        match self.service.remove(id).await {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(car_id = id.0, error = %err, "car delete failed");
                Err(err)
            }
        }
    }

    pub fn unmount(self) {
        self.list.unmount();
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
