//! Serialized output shapes.
//!
//! An account embeds its recipes without their `user`; a recipe embeds its
//! owner without the owner's `recipes`. Password hashes never appear.

use crate::domain::{Account, AccountId, Recipe, RecipeId};
use serde::Serialize;

/// Account fields only, as embedded inside a [`RecipeView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Recipe fields only, as embedded inside an [`AccountView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i64>,
    pub user_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    #[serde(flatten)]
    pub account: AccountSummary,
    pub recipes: Vec<RecipeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    pub user: AccountSummary,
}

impl From<&Account> for AccountSummary {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id(),
            username: a.username().to_string(),
            image_url: a.image_url().map(str::to_owned),
            bio: a.bio().map(str::to_owned),
        }
    }
}

impl From<&Recipe> for RecipeSummary {
    fn from(r: &Recipe) -> Self {
        Self {
            id: r.id(),
            title: r.title().to_string(),
            instructions: r.instructions().as_str().to_owned(),
            minutes_to_complete: r.minutes_to_complete(),
            user_id: r.user_id(),
        }
    }
}

impl AccountView {
    /// Recipes owned by someone else are skipped.
    pub fn new(account: &Account, recipes: &[Recipe]) -> Self {
        Self {
            account: account.into(),
            recipes: recipes
                .iter()
                .filter(|r| r.user_id() == account.id())
                .map(RecipeSummary::from)
                .collect(),
        }
    }
}

impl RecipeView {
    /// `owner` must be the account `recipe.user_id()` points at.
    pub fn new(recipe: &Recipe, owner: &Account) -> Self {
        debug_assert_eq!(
            owner.id(),
            recipe.user_id(),
            "recipe #{} rendered with the wrong owner",
            recipe.id()
        );
        Self {
            recipe: recipe.into(),
            user: owner.into(),
        }
    }
}
