mod common;

use common::{TEST_COST, TOAST_INSTRUCTIONS, account, storage};
use pantry::domain::{NewAccount, NewRecipe};
use pantry::{PantryError, ValidationError};

#[tokio::test]
async fn created_account_authenticates_with_its_password() {
    let (_db, storage) = storage("auth").await;

    let created = account(&storage, "chef1", "secret123").await;
    assert!(created.id() > 0);

    let loaded = storage.get_account(created.id()).await.unwrap();
    assert_eq!(loaded.username().as_str(), "chef1");
    assert!(loaded.authenticate("secret123"));
    assert!(!loaded.authenticate("wrong"));
    assert!(matches!(
        loaded.password_hash(),
        Err(PantryError::WriteOnlyField("password_hash"))
    ));
}

#[tokio::test]
async fn optional_profile_fields_round_trip() {
    let (_db, storage) = storage("profile").await;

    let new = NewAccount::with_cost("baker", "flour", TEST_COST)
        .unwrap()
        .image_url("https://example.com/baker.png")
        .bio("Sourdough only");
    let created = storage.create_account(new).await.unwrap();

    let loaded = storage.get_account(created.id()).await.unwrap();
    assert_eq!(loaded.image_url(), Some("https://example.com/baker.png"));
    assert_eq!(loaded.bio(), Some("Sourdough only"));

    let plain = account(&storage, "plain", "pw").await;
    let plain = storage.get_account(plain.id()).await.unwrap();
    assert_eq!(plain.image_url(), None);
    assert_eq!(plain.bio(), None);
}

#[tokio::test]
async fn duplicate_username_is_rejected_by_storage() {
    let (_db, storage) = storage("unique").await;
    account(&storage, "chef1", "secret123").await;

    let dup = NewAccount::with_cost("chef1", "other", TEST_COST).unwrap();
    let err = storage.create_account(dup).await.unwrap_err();
    assert!(matches!(err, PantryError::UsernameTaken(ref name) if name == "chef1"));
    assert!(err.is_validation());

    assert_eq!(storage.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn renaming_onto_existing_username_fails() {
    let (_db, storage) = storage("rename").await;
    account(&storage, "chef1", "a").await;
    let mut second = account(&storage, "chef2", "b").await;

    second.set_username("chef1").unwrap();
    let err = storage.update_account(&second).await.unwrap_err();
    assert!(matches!(err, PantryError::UsernameTaken(_)));

    let reloaded = storage.get_account(second.id()).await.unwrap();
    assert_eq!(reloaded.username().as_str(), "chef2");
}

#[tokio::test]
async fn updated_password_and_profile_are_persisted() {
    let (_db, storage) = storage("update").await;
    let mut chef = account(&storage, "chef1", "secret123").await;

    chef.set_password_with_cost("new-secret", TEST_COST).unwrap();
    chef.set_bio(Some("Now with a bio".to_string()));
    storage.update_account(&chef).await.unwrap();

    let loaded = storage.get_account(chef.id()).await.unwrap();
    assert!(loaded.authenticate("new-secret"));
    assert!(!loaded.authenticate("secret123"));
    assert_eq!(loaded.bio(), Some("Now with a bio"));
}

#[tokio::test]
async fn empty_username_never_reaches_storage() {
    let (_db, storage) = storage("empty").await;
    let err = NewAccount::with_cost("", "pw", TEST_COST).unwrap_err();
    assert!(matches!(
        err,
        PantryError::Validation(ValidationError::Required("username"))
    ));

    let mut chef = account(&storage, "chef1", "pw").await;
    assert!(chef.set_username("").is_err());
    storage.update_account(&chef).await.unwrap();
    assert_eq!(
        storage
            .get_account(chef.id())
            .await
            .unwrap()
            .username()
            .as_str(),
        "chef1"
    );
}

#[tokio::test]
async fn lookup_by_username() {
    let (_db, storage) = storage("lookup").await;
    let chef = account(&storage, "chef1", "pw").await;

    let found = storage.get_account_by_username("chef1").await.unwrap();
    assert_eq!(found.map(|a| a.id()), Some(chef.id()));
    assert!(
        storage
            .get_account_by_username("nobody")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn missing_account_is_reported() {
    let (_db, storage) = storage("missing").await;
    assert!(matches!(
        storage.get_account(42).await,
        Err(PantryError::AccountNotFound(42))
    ));
    assert!(matches!(
        storage.delete_account(42).await,
        Err(PantryError::AccountNotFound(42))
    ));
}

#[tokio::test]
async fn account_with_recipes_cannot_be_deleted() {
    let (_db, storage) = storage("restrict").await;
    let chef = account(&storage, "chef1", "pw").await;
    let recipe = storage
        .create_recipe(NewRecipe::new("Toast", TOAST_INSTRUCTIONS, chef.id()).unwrap())
        .await
        .unwrap();

    let err = storage.delete_account(chef.id()).await.unwrap_err();
    assert!(matches!(
        err,
        PantryError::AccountHasRecipes { id, count: 1 } if id == chef.id()
    ));
    assert!(storage.get_account(chef.id()).await.is_ok());

    storage.delete_recipe(recipe.id()).await.unwrap();
    storage.delete_account(chef.id()).await.unwrap();
    assert!(matches!(
        storage.get_account(chef.id()).await,
        Err(PantryError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn stored_hash_is_not_the_plaintext() {
    let (_db, storage) = storage("hash").await;
    account(&storage, "chef1", "secret123").await;

    let (stored,): (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE username = 'chef1'")
            .fetch_one(storage.pool())
            .await
            .unwrap();
    assert_ne!(stored, "secret123");
    assert!(!stored.contains("secret123"));
}
