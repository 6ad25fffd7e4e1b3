pub mod aggregator;
pub mod api_football;
pub mod cards;
pub mod discord;
pub mod error;
pub mod form;
pub mod handler;
pub mod model;
pub mod render;
pub mod summary;

pub use error::{FixtureError, Result};
