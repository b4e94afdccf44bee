use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Rejected field assignment. Raised before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("{} required", required_subject(.0))]
    Required(&'static str),

    #[error("{} must be at least {min} characters long", capitalize(.field))]
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required(field) => field,
            ValidationError::TooShort { field, .. } => field,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum PantryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("username `{0}` is already taken")]
    UsernameTaken(String),

    #[error("{0} is not a readable attribute.")]
    WriteOnlyField(&'static str),

    #[error("account #{0} not found")]
    AccountNotFound(i64),

    #[error("recipe #{0} not found")]
    RecipeNotFound(i64),

    #[error("account #{id} still owns {count} recipe(s)")]
    AccountHasRecipes { id: i64, count: i64 },

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Blocking task failed: {0}")]
    TaskJoin(String),
}

impl PantryError {
    /// True for rejected writes: bad field values, over-long passwords, taken
    /// usernames, reads of write-only fields and deletes blocked by owned records.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PantryError::Validation(_)
                | PantryError::Hashing(bcrypt::BcryptError::Truncation(_))
                | PantryError::UsernameTaken(_)
                | PantryError::WriteOnlyField(_)
                | PantryError::AccountHasRecipes { .. }
        )
    }
}

impl From<tokio::task::JoinError> for PantryError {
    fn from(e: tokio::task::JoinError) -> Self {
        PantryError::TaskJoin(e.to_string())
    }
}

// "Username is required", "Instructions are required"
fn required_subject(field: &str) -> String {
    let verb = if field.ends_with('s') { "are" } else { "is" };
    format!("{} {verb}", capitalize(field))
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
