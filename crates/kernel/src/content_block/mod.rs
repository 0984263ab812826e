//! Content list blocks: plugins, alter callbacks, and the block builder.

pub mod alter;
pub mod builder;
pub mod manager;
pub mod plugin;
pub mod view;

pub use alter::QueryAlterRegistry;
pub use builder::{BLOCK_CONTENT_ENTITY_TYPE, ContentBuilder};
pub use manager::ContentBlockManager;
pub use plugin::{ContentBlockPlugin, EventContentBlock, GroupContentBlock, TopicContentBlock};
pub use view::{EntityViewBuilder, SMALL_TEASER, TeaserViewBuilder};
