use crate::domain::{
    Account, Instructions, NewAccount, NewRecipe, PasswordHash, Recipe, Title, Username,
};
use crate::error::ValidationError;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbAccount {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbRecipe {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i64>,
    pub user_id: i64,
}

impl TryFrom<DbAccount> for Account {
    type Error = sqlx::Error;

    fn try_from(d: DbAccount) -> Result<Self, Self::Error> {
        let username = Username::parse(d.username).map_err(decode_err)?;
        Ok(Account::from_parts(
            d.id,
            NewAccount {
                username,
                password_hash: PasswordHash::from_stored(d.password_hash),
                image_url: d.image_url,
                bio: d.bio,
            },
        ))
    }
}

impl TryFrom<DbRecipe> for Recipe {
    type Error = sqlx::Error;

    fn try_from(d: DbRecipe) -> Result<Self, Self::Error> {
        Ok(Recipe::from_parts(
            d.id,
            NewRecipe {
                title: Title::parse(d.title).map_err(decode_err)?,
                instructions: Instructions::parse(d.instructions).map_err(decode_err)?,
                minutes_to_complete: d.minutes_to_complete,
                user_id: d.user_id,
            },
        ))
    }
}

// A row that fails validation was written around this crate; surface it as a decode error.
fn decode_err(e: ValidationError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}
