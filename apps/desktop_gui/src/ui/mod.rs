pub mod app;

pub use app::CarsApp;
