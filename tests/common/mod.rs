#![allow(dead_code)]

use pantry::db::PantryStorage;
use pantry::domain::{Account, NewAccount};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// bcrypt's minimum work factor.
pub const TEST_COST: u32 = 4;

pub const TOAST_INSTRUCTIONS: &str =
    "Put bread in toaster and wait until it is golden brown and crispy.";

/// A throwaway SQLite file, removed on drop.
pub struct TempDb {
    path: PathBuf,
    pub url: String,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "pantry-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let url = format!("sqlite:{}", path.display());
        Self { path, url }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub async fn storage(tag: &str) -> (TempDb, PantryStorage) {
    let db = TempDb::new(tag);
    let storage = PantryStorage::connect(&db.url)
        .await
        .expect("failed to open test database");
    (db, storage)
}

pub async fn account(storage: &PantryStorage, username: &str, password: &str) -> Account {
    let new = NewAccount::with_cost(username, password, TEST_COST).expect("valid account");
    storage
        .create_account(new)
        .await
        .expect("failed to create account")
}
