use super::password::PasswordHash;
use crate::error::{PantryError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type AccountId = i64;

/// Non-empty account name. Uniqueness is enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Required("username"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(u: Username) -> Self {
        u.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An account that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub password_hash: PasswordHash,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, PantryError> {
        let username = Username::parse(username)?;
        Ok(Self::from_parts(username, PasswordHash::new(password)?))
    }

    pub fn with_cost(
        username: impl Into<String>,
        password: &str,
        cost: u32,
    ) -> Result<Self, PantryError> {
        let username = Username::parse(username)?;
        Ok(Self::from_parts(
            username,
            PasswordHash::with_cost(password, cost)?,
        ))
    }

    fn from_parts(username: Username, password_hash: PasswordHash) -> Self {
        Self {
            username,
            password_hash,
            image_url: None,
            bio: None,
        }
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// A persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    username: Username,
    password_hash: PasswordHash,
    image_url: Option<String>,
    bio: Option<String>,
}

impl Account {
    pub(crate) fn from_parts(id: AccountId, new: NewAccount) -> Self {
        Self {
            id,
            username: new.username,
            password_hash: new.password_hash,
            image_url: new.image_url,
            bio: new.bio,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// The password hash is write-only; this always fails.
    pub fn password_hash(&self) -> Result<&str, PantryError> {
        Err(PantryError::WriteOnlyField("password_hash"))
    }

    pub fn authenticate(&self, candidate: &str) -> bool {
        self.password_hash.verify(candidate)
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<(), PantryError> {
        self.username = Username::parse(username)?;
        Ok(())
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), PantryError> {
        self.password_hash = PasswordHash::new(password)?;
        Ok(())
    }

    pub fn set_password_with_cost(&mut self, password: &str, cost: u32) -> Result<(), PantryError> {
        self.password_hash = PasswordHash::with_cost(password, cost)?;
        Ok(())
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
    }

    pub(crate) fn stored_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{} {}!>", self.id, self.username)
    }
}
