//! Data models for cardbox.
//!
//! This module contains the core data structures used throughout the system.

mod card;
mod folder;
mod keyword;
mod list;
pub mod slug;
mod user;

pub use card::Card;
pub use folder::{Folder, FolderId};
pub use keyword::Keyword;
pub use list::{List, ListId, NewCard};
pub use slug::slugify;
pub use user::{User, UserId};
