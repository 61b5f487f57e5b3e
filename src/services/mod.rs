//! Business logic services.
//!
//! One service per operation family, each a thin validation-and-logging
//! layer over an `Arc<dyn StudyBackend>`. Services are the surface the web
//! (or CLI) layer calls; every operation takes the authenticated user id
//! explicitly rather than reading ambient session state.

mod account;
mod card;
mod folder;
mod keyword;
mod list;

pub use account::AccountService;
pub use card::CardService;
pub use folder::{FolderService, filter_by_folder};
pub use keyword::KeywordService;
pub use list::ListService;
