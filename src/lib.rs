pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod service;
pub mod types;

pub use domain::{Account, NewAccount, NewRecipe, Recipe};
pub use error::{PantryError, ValidationError};
pub use service::PantryHandle;
