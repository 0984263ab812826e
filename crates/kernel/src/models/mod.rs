//! Database models.

pub mod block;
pub mod entity;
pub mod interaction;
pub mod user;

pub use block::{BlockContent, BlockSettings, CONTENT_LIST_BUNDLE};
pub use entity::{EntityRecord, EntityReference, EntityType, UnknownEntityType};
pub use interaction::{Comment, GroupContent, PostRecipient, Vote};
pub use user::{ANONYMOUS_USER_ID, User};
