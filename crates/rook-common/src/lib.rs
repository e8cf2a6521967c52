pub mod config;
pub mod ir;
pub mod message;
pub mod names;
pub mod pretty;

mod driver;

pub use driver::{Driver, IrOutput};
