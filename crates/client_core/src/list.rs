use shared::{
    domain::{Car, CarId},
    protocol::ServiceEvent,
};

/// Ordered local mirror of the remote collection. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarList {
    cars: Vec<Car>,
}

impl CarList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cars(cars: Vec<Car>) -> Self {
        let mut list = Self::new();
        list.replace(cars);
        list
    }

    /// Replaces the whole list, e.g. with the result of an initial `find`.
    /// A repeated id keeps its first occurrence.
    pub fn replace(&mut self, cars: Vec<Car>) {
        self.cars.clear();
        for car in cars {
            self.insert(car);
        }
    }

    /// Appends `car` unless its id is already present.
    pub fn insert(&mut self, car: Car) -> bool {
        if self.contains(car.id) {
            tracing::debug!(car_id = car.id.0, "ignoring duplicate car");
            return false;
        }
        self.cars.push(car);
        true
    }

    /// Drops the entry with `id`; the rest keep their relative order.
    pub fn remove(&mut self, id: CarId) -> Option<Car> {
        let index = self.cars.iter().position(|car| car.id == id)?;
        Some(self.cars.remove(index))
    }

    /// Applies a notification and reports whether the list changed.
    pub fn apply(&mut self, event: &ServiceEvent) -> bool {
        match event {
            ServiceEvent::Created(car) => self.insert(car.clone()),
            ServiceEvent::Removed(car) => self.remove(car.id).is_some(),
        }
    }

    pub fn contains(&self, id: CarId) -> bool {
        self.cars.iter().any(|car| car.id == id)
    }

    pub fn get(&self, id: CarId) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == id)
    }

    pub fn ids(&self) -> Vec<CarId> {
        self.cars.iter().map(|car| car.id).collect()
    }

    pub fn as_slice(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
