use crate::db::sqlite::PantryStorage;
use crate::domain::{Account, AccountId, NewAccount, NewRecipe, Recipe, RecipeId};
use crate::error::PantryError;
use crate::types::{AccountView, RecipeView};

use ractor::{Actor, ActorProcessingErr, ActorRef, RactorErr, RpcReplyPort};
use tracing::{debug, info};

type Reply<T> = RpcReplyPort<Result<T, PantryError>>;

/// Messages handled by the pantry actor. Every variant is an RPC that
/// answers with the storage result.
#[derive(Debug)]
pub enum PantryActorMessage {
    CreateAccount(NewAccount, Reply<Account>),
    GetAccount(AccountId, Reply<Account>),
    GetAccountByUsername(String, Reply<Option<Account>>),
    ListAccounts(Reply<Vec<Account>>),
    UpdateAccount(Account, Reply<()>),
    /// Refused while the account still owns recipes.
    DeleteAccount(AccountId, Reply<()>),

    CreateRecipe(NewRecipe, Reply<Recipe>),
    GetRecipe(RecipeId, Reply<Recipe>),
    ListRecipes(Reply<Vec<Recipe>>),
    RecipesForAccount(AccountId, Reply<Vec<Recipe>>),
    UpdateRecipe(Recipe, Reply<()>),
    DeleteRecipe(RecipeId, Reply<()>),
    RecipeOwner(Recipe, Reply<Account>),

    AccountView(AccountId, Reply<AccountView>),
    RecipeView(RecipeId, Reply<RecipeView>),
}

/// Handle for interacting with the pantry actor.
#[derive(Clone)]
pub struct PantryHandle {
    actor: ActorRef<PantryActorMessage>,
}

impl PantryHandle {
    pub async fn create_account(&self, new: NewAccount) -> Result<Account, PantryError> {
        flatten(
            "CreateAccount",
            ractor::call!(self.actor, PantryActorMessage::CreateAccount, new),
        )
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, PantryError> {
        flatten(
            "GetAccount",
            ractor::call!(self.actor, PantryActorMessage::GetAccount, id),
        )
    }

    pub async fn get_account_by_username(
        &self,
        username: impl AsRef<str>,
    ) -> Result<Option<Account>, PantryError> {
        flatten(
            "GetAccountByUsername",
            ractor::call!(
                self.actor,
                PantryActorMessage::GetAccountByUsername,
                username.as_ref().to_string()
            ),
        )
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, PantryError> {
        flatten(
            "ListAccounts",
            ractor::call!(self.actor, PantryActorMessage::ListAccounts),
        )
    }

    pub async fn update_account(&self, account: Account) -> Result<(), PantryError> {
        flatten(
            "UpdateAccount",
            ractor::call!(self.actor, PantryActorMessage::UpdateAccount, account),
        )
    }

    pub async fn delete_account(&self, id: AccountId) -> Result<(), PantryError> {
        flatten(
            "DeleteAccount",
            ractor::call!(self.actor, PantryActorMessage::DeleteAccount, id),
        )
    }

    pub async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, PantryError> {
        flatten(
            "CreateRecipe",
            ractor::call!(self.actor, PantryActorMessage::CreateRecipe, new),
        )
    }

    pub async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, PantryError> {
        flatten(
            "GetRecipe",
            ractor::call!(self.actor, PantryActorMessage::GetRecipe, id),
        )
    }

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, PantryError> {
        flatten(
            "ListRecipes",
            ractor::call!(self.actor, PantryActorMessage::ListRecipes),
        )
    }

    pub async fn recipes_for_account(&self, id: AccountId) -> Result<Vec<Recipe>, PantryError> {
        flatten(
            "RecipesForAccount",
            ractor::call!(self.actor, PantryActorMessage::RecipesForAccount, id),
        )
    }

    pub async fn update_recipe(&self, recipe: Recipe) -> Result<(), PantryError> {
        flatten(
            "UpdateRecipe",
            ractor::call!(self.actor, PantryActorMessage::UpdateRecipe, recipe),
        )
    }

    pub async fn delete_recipe(&self, id: RecipeId) -> Result<(), PantryError> {
        flatten(
            "DeleteRecipe",
            ractor::call!(self.actor, PantryActorMessage::DeleteRecipe, id),
        )
    }

    pub async fn recipe_owner(&self, recipe: Recipe) -> Result<Account, PantryError> {
        flatten(
            "RecipeOwner",
            ractor::call!(self.actor, PantryActorMessage::RecipeOwner, recipe),
        )
    }

    pub async fn account_view(&self, id: AccountId) -> Result<AccountView, PantryError> {
        flatten(
            "AccountView",
            ractor::call!(self.actor, PantryActorMessage::AccountView, id),
        )
    }

    pub async fn recipe_view(&self, id: RecipeId) -> Result<RecipeView, PantryError> {
        flatten(
            "RecipeView",
            ractor::call!(self.actor, PantryActorMessage::RecipeView, id),
        )
    }

    /// Look up `username` and check `candidate` against its password.
    /// `Ok(None)` covers both an unknown username and a wrong password.
    pub async fn authenticate(
        &self,
        username: impl AsRef<str>,
        candidate: impl Into<String>,
    ) -> Result<Option<Account>, PantryError> {
        let Some(account) = self.get_account_by_username(username).await? else {
            debug!("authenticate: unknown username");
            return Ok(None);
        };

        // bcrypt is CPU-bound; keep it off the async workers
        let candidate = candidate.into();
        let (account, matched) = tokio::task::spawn_blocking(move || {
            let matched = account.authenticate(&candidate);
            (account, matched)
        })
        .await?;

        if !matched {
            debug!(id = account.id(), "authenticate: password mismatch");
        }
        Ok(matched.then_some(account))
    }

    /// Stop the actor. Outstanding handles start failing with `RactorError`.
    pub fn shutdown(&self) {
        self.actor.stop(None);
    }
}

fn flatten<T>(
    op: &str,
    result: Result<Result<T, PantryError>, RactorErr<PantryActorMessage>>,
) -> Result<T, PantryError> {
    result.map_err(|e| PantryError::RactorError(format!("{op} RPC failed: {e}")))?
}

/// Internal state held by the ractor-driven pantry actor
struct PantryActorState {
    storage: PantryStorage,
}

/// ractor-based pantry actor; owns the storage and serves one request at a time
struct PantryActor;

#[ractor::async_trait]
impl Actor for PantryActor {
    type Msg = PantryActorMessage;
    type State = PantryActorState;
    type Arguments = PantryStorage;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        storage: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let accounts = storage
            .list_accounts()
            .await
            .map_err(|e| ActorProcessingErr::from(format!("DB load accounts failed: {}", e)))?
            .len();
        info!(accounts, "PantryActor started");
        Ok(PantryActorState { storage })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let storage = &state.storage;
        // A dropped reply port only means the caller gave up; nothing to do.
        match message {
            PantryActorMessage::CreateAccount(new, rp) => {
                let _ = rp.send(storage.create_account(new).await);
            }
            PantryActorMessage::GetAccount(id, rp) => {
                let _ = rp.send(storage.get_account(id).await);
            }
            PantryActorMessage::GetAccountByUsername(username, rp) => {
                let _ = rp.send(storage.get_account_by_username(&username).await);
            }
            PantryActorMessage::ListAccounts(rp) => {
                let _ = rp.send(storage.list_accounts().await);
            }
            PantryActorMessage::UpdateAccount(account, rp) => {
                let _ = rp.send(storage.update_account(&account).await);
            }
            PantryActorMessage::DeleteAccount(id, rp) => {
                let _ = rp.send(storage.delete_account(id).await);
            }
            PantryActorMessage::CreateRecipe(new, rp) => {
                let _ = rp.send(storage.create_recipe(new).await);
            }
            PantryActorMessage::GetRecipe(id, rp) => {
                let _ = rp.send(storage.get_recipe(id).await);
            }
            PantryActorMessage::ListRecipes(rp) => {
                let _ = rp.send(storage.list_recipes().await);
            }
            PantryActorMessage::RecipesForAccount(id, rp) => {
                let _ = rp.send(storage.recipes_for_account(id).await);
            }
            PantryActorMessage::UpdateRecipe(recipe, rp) => {
                let _ = rp.send(storage.update_recipe(&recipe).await);
            }
            PantryActorMessage::DeleteRecipe(id, rp) => {
                let _ = rp.send(storage.delete_recipe(id).await);
            }
            PantryActorMessage::RecipeOwner(recipe, rp) => {
                let _ = rp.send(storage.recipe_owner(&recipe).await);
            }
            PantryActorMessage::AccountView(id, rp) => {
                let _ = rp.send(storage.account_view(id).await);
            }
            PantryActorMessage::RecipeView(id, rp) => {
                let _ = rp.send(storage.recipe_view(id).await);
            }
        }
        Ok(())
    }
}

/// Open the database at `database_url` and start the actor that owns it.
pub async fn spawn(database_url: &str) -> Result<PantryHandle, PantryError> {
    let storage = PantryStorage::connect(database_url).await?;
    spawn_with_storage(storage).await
}

pub async fn spawn_with_storage(storage: PantryStorage) -> Result<PantryHandle, PantryError> {
    let (actor, _jh) = Actor::spawn(None, PantryActor, storage)
        .await
        .map_err(|e| PantryError::RactorError(format!("spawn PantryActor failed: {e}")))?;
    Ok(PantryHandle { actor })
}
