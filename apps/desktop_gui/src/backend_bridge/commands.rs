//! Backend commands queued from UI to backend worker.

use shared::domain::{CarDraft, CarId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// The cars page became visible: load the list and follow notifications.
    MountCars,
    /// The cars page was left: release the list subscription.
    UnmountCars,
    CreateCar {
        draft: CarDraft,
    },
    DeleteCar {
        id: CarId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MountCars => "mount_cars",
            Self::UnmountCars => "unmount_cars",
            Self::CreateCar { .. } => "create_car",
            Self::DeleteCar { .. } => "delete_car",
        }
    }
}
