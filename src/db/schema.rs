//! SQL DDL for initializing the pantry storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `users.username` UNIQUE (creates an index implicitly)
/// - `recipes.user_id` NOT NULL foreign key, RESTRICT on account delete
/// - emptiness checks on the BLOB form; `length()` on TEXT stops at the first NUL.
///   Instruction length is left to `Instructions::parse`, which counts characters.
/// - Separate index on `recipes.user_id` for per-account listings
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE CHECK (length(CAST(username AS BLOB)) > 0),
    password_hash TEXT NOT NULL,
    image_url TEXT NULL,
    bio TEXT NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(CAST(title AS BLOB)) > 0),
    instructions TEXT NOT NULL CHECK (length(CAST(instructions AS BLOB)) > 0),
    minutes_to_complete INTEGER NULL,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_recipes_user_id ON recipes(user_id);
"#;
