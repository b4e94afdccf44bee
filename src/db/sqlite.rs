use crate::db::models::{DbAccount, DbRecipe};
use crate::db::schema::SQLITE_INIT;
use crate::domain::{Account, AccountId, NewAccount, NewRecipe, Recipe, RecipeId};
use crate::error::PantryError;
use crate::types::{AccountView, RecipeView};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, image_url, bio";
const RECIPE_COLUMNS: &str = "id, title, instructions, minutes_to_complete, user_id";

#[derive(Clone)]
pub struct PantryStorage {
    pool: SqlitePool,
}

impl PantryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and initialize the schema.
    pub async fn connect(database_url: &str) -> Result<Self, PantryError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PantryError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn create_account(&self, new: NewAccount) -> Result<Account, PantryError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, image_url, bio) VALUES (?, ?, ?, ?)",
        )
        .bind(new.username.as_str())
        .bind(new.password_hash.as_stored())
        .bind(new.image_url.as_deref())
        .bind(new.bio.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| username_conflict(e, new.username.as_str()))?;

        let account = Account::from_parts(result.last_insert_rowid(), new);
        info!(id = account.id(), username = %account.username(), "account created");
        Ok(account)
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, PantryError> {
        let row: Option<DbAccount> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let row = row.ok_or(PantryError::AccountNotFound(id))?;
        Ok(row.try_into()?)
    }

    pub async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, PantryError> {
        let row: Option<DbAccount> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::try_from).transpose()?)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, PantryError> {
        let rows: Vec<DbAccount> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .map(|row| Account::try_from(row).map_err(PantryError::from))
            .collect()
    }

    /// Persist every field of `account` (except id itself).
    pub async fn update_account(&self, account: &Account) -> Result<(), PantryError> {
        let result = sqlx::query(
            r#"UPDATE users SET
                username = ?,
                password_hash = ?,
                image_url = ?,
                bio = ?
              WHERE id = ?"#,
        )
        .bind(account.username().as_str())
        .bind(account.stored_hash().as_stored())
        .bind(account.image_url())
        .bind(account.bio())
        .bind(account.id())
        .execute(&self.pool)
        .await
        .map_err(|e| username_conflict(e, account.username().as_str()))?;

        if result.rows_affected() == 0 {
            return Err(PantryError::AccountNotFound(account.id()));
        }
        debug!(id = account.id(), "account updated");
        Ok(())
    }

    /// Refuses while the account still owns recipes.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), PantryError> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE user_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Err(PantryError::AccountHasRecipes { id, count });
        }

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(PantryError::AccountNotFound(id));
        }

        tx.commit().await?;
        info!(id, "account deleted");
        Ok(())
    }

    pub async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, PantryError> {
        let result = sqlx::query(
            r#"INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(new.title.as_str())
        .bind(new.instructions.as_str())
        .bind(new.minutes_to_complete)
        .bind(new.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_owner(e, new.user_id))?;

        let recipe = Recipe::from_parts(result.last_insert_rowid(), new);
        info!(
            id = recipe.id(),
            user_id = recipe.user_id(),
            title = %recipe.title(),
            "recipe created"
        );
        Ok(recipe)
    }

    pub async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, PantryError> {
        let row: Option<DbRecipe> =
            sqlx::query_as(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let row = row.ok_or(PantryError::RecipeNotFound(id))?;
        Ok(row.try_into()?)
    }

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, PantryError> {
        let rows: Vec<DbRecipe> =
            sqlx::query_as(&format!("SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        rows_to_recipes(rows)
    }

    /// Recipes owned by `user_id`, oldest first. Fails if the account does not exist.
    pub async fn recipes_for_account(&self, user_id: AccountId) -> Result<Vec<Recipe>, PantryError> {
        let (exists,): (i64,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(PantryError::AccountNotFound(user_id));
        }

        let rows: Vec<DbRecipe> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows_to_recipes(rows)
    }

    /// Persist every field of `recipe`, including a changed owner.
    pub async fn update_recipe(&self, recipe: &Recipe) -> Result<(), PantryError> {
        let result = sqlx::query(
            r#"UPDATE recipes SET
                title = ?,
                instructions = ?,
                minutes_to_complete = ?,
                user_id = ?
              WHERE id = ?"#,
        )
        .bind(recipe.title().as_str())
        .bind(recipe.instructions().as_str())
        .bind(recipe.minutes_to_complete())
        .bind(recipe.user_id())
        .bind(recipe.id())
        .execute(&self.pool)
        .await
        .map_err(|e| missing_owner(e, recipe.user_id()))?;

        if result.rows_affected() == 0 {
            return Err(PantryError::RecipeNotFound(recipe.id()));
        }
        debug!(id = recipe.id(), user_id = recipe.user_id(), "recipe updated");
        Ok(())
    }

    pub async fn delete_recipe(&self, id: RecipeId) -> Result<(), PantryError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(PantryError::RecipeNotFound(id));
        }
        info!(id, "recipe deleted");
        Ok(())
    }

    pub async fn recipe_owner(&self, recipe: &Recipe) -> Result<Account, PantryError> {
        self.get_account(recipe.user_id()).await
    }

    pub async fn account_view(&self, id: AccountId) -> Result<AccountView, PantryError> {
        let account = self.get_account(id).await?;
        let recipes = self.recipes_for_account(id).await?;
        Ok(AccountView::new(&account, &recipes))
    }

    pub async fn recipe_view(&self, id: RecipeId) -> Result<RecipeView, PantryError> {
        let recipe = self.get_recipe(id).await?;
        let owner = self.recipe_owner(&recipe).await?;
        Ok(RecipeView::new(&recipe, &owner))
    }
}

fn rows_to_recipes(rows: Vec<DbRecipe>) -> Result<Vec<Recipe>, PantryError> {
    rows.into_iter()
        .map(|row| Recipe::try_from(row).map_err(PantryError::from))
        .collect()
}

fn username_conflict(e: sqlx::Error, username: &str) -> PantryError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        PantryError::UsernameTaken(username.to_string())
    } else {
        e.into()
    }
}

fn missing_owner(e: sqlx::Error, user_id: AccountId) -> PantryError {
    let fk = e
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if fk {
        PantryError::AccountNotFound(user_id)
    } else {
        e.into()
    }
}
