pub mod fixture;
pub mod form_symbol;
pub mod record;
pub mod team;

pub use fixture::{Fixture, FixtureStatus};
pub use form_symbol::FormSymbol;
pub use team::Team;
