use super::account::AccountId;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type RecipeId = i64;

/// Minimum instruction length, counted in characters.
pub const MIN_INSTRUCTIONS_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Required("title"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Title> for String {
    fn from(t: Title) -> Self {
        t.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instructions(String);

impl Instructions {
    /// Empty input and short input are reported as different errors.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Required("instructions"));
        }
        let len = value.chars().count();
        if len < MIN_INSTRUCTIONS_LEN {
            return Err(ValidationError::TooShort {
                field: "instructions",
                min: MIN_INSTRUCTIONS_LEN,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Instructions {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Instructions> for String {
    fn from(i: Instructions) -> Self {
        i.0
    }
}

/// A recipe that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: Title,
    pub instructions: Instructions,
    pub minutes_to_complete: Option<i64>,
    pub user_id: AccountId,
}

impl NewRecipe {
    pub fn new(
        title: impl Into<String>,
        instructions: impl Into<String>,
        user_id: AccountId,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: Title::parse(title)?,
            instructions: Instructions::parse(instructions)?,
            minutes_to_complete: None,
            user_id,
        })
    }

    pub fn minutes_to_complete(mut self, minutes: i64) -> Self {
        self.minutes_to_complete = Some(minutes);
        self
    }
}

/// A persisted recipe. Always owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id: RecipeId,
    title: Title,
    instructions: Instructions,
    minutes_to_complete: Option<i64>,
    user_id: AccountId,
}

impl Recipe {
    pub(crate) fn from_parts(id: RecipeId, new: NewRecipe) -> Self {
        Self {
            id,
            title: new.title,
            instructions: new.instructions,
            minutes_to_complete: new.minutes_to_complete,
            user_id: new.user_id,
        }
    }

    pub fn id(&self) -> RecipeId {
        self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn instructions(&self) -> &Instructions {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> Option<i64> {
        self.minutes_to_complete
    }

    pub fn user_id(&self) -> AccountId {
        self.user_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.title = Title::parse(title)?;
        Ok(())
    }

    pub fn set_instructions(
        &mut self,
        instructions: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.instructions = Instructions::parse(instructions)?;
        Ok(())
    }

    pub fn set_minutes_to_complete(&mut self, minutes: Option<i64>) {
        self.minutes_to_complete = minutes;
    }

    /// Hand the recipe to another account. Checked against storage on update.
    pub fn set_owner(&mut self, user_id: AccountId) {
        self.user_id = user_id;
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Recipe #{} {}!>", self.id, self.title)
    }
}
