pub mod views;

pub use views::{AccountSummary, AccountView, RecipeSummary, RecipeView};
