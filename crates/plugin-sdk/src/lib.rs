//! Commons Plugin SDK
//!
//! Types shared between the kernel and the plugins registered into it:
//! content block definitions and the JSON render tree every builder returns.

pub mod render;
pub mod types;

pub mod prelude {
    pub use crate::render;
    pub use crate::types::*;
}
