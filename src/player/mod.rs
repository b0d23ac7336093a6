//! Player records: types, validation and persistence.

pub mod repository;
pub mod types;
pub mod validator;

pub use repository::PlayerRepository;
pub use types::{PlayerRecord, Skill, TrackProgress, Unlock};
pub use validator::{normalize, Normalized};
