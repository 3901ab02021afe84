//! Domain models for the mail routing platform

mod post_office;
mod route;
mod schedule;
mod telemetry;

pub use post_office::*;
pub use route::*;
pub use schedule::*;
pub use telemetry::*;
