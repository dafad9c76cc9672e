pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// A single temperature probe. Each call yields one reading in degrees Celsius.
pub trait Thermometer {
    fn read_celsius(&mut self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Thermometer + ?Sized> Thermometer for Box<T> {
    fn read_celsius(&mut self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_celsius()
    }
}
