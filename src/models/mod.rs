//! Domain types and pure validation.

pub mod chat;
pub mod day;
pub mod request;
pub mod schedule;
pub mod slot;
pub mod time;
pub mod validation;

pub use chat::*;
pub use day::*;
pub use request::*;
pub use schedule::*;
pub use slot::*;
pub use time::*;
pub use validation::*;
