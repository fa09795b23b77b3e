//! Command implementations for telematics-cli

pub mod controls;
pub mod doors;
pub mod health;
pub mod nickname;
pub mod poi;
pub mod status;
pub mod vehicles;

pub use controls::{charge, engine, hazards, Switch};
pub use doors::{lock, unlock};
pub use health::health;
pub use nickname::nickname;
pub use poi::poi;
pub use status::status;
pub use vehicles::vehicles;
