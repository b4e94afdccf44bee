pub mod pantry_actor;

pub use pantry_actor::{PantryActorMessage, PantryHandle, spawn, spawn_with_storage};
