//! Validated domain records.
//!
//! - `account.rs`: accounts, usernames
//! - `recipe.rs`: recipes, titles, instructions
//! - `password.rs`: write-only password hash

pub mod account;
pub mod password;
pub mod recipe;

pub use account::{Account, AccountId, NewAccount, Username};
pub use password::PasswordHash;
pub use recipe::{Instructions, NewRecipe, Recipe, RecipeId, Title};
