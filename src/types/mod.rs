pub mod domain;

pub use domain::{AdminLevel, BookingStatus, BookingType, Language, Role, ServiceType};
