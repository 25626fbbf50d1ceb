//! Domain types for the Mushaf reader
//!
//! - `page`: page identity and navigation bounds
//! - `asset`: image and audio asset keys derived from a page
//! - `chapter`: the read-only chapter index
//! - `common`: shared traits and utilities

mod asset;
mod chapter;
mod common;
mod page;

pub use asset::{AssetCatalog, AssetKey, AssetKind};
pub use chapter::{Chapter, ChapterIndex};
pub use common::{Duration, Validator};
pub use page::{NavigationBounds, PageNumber};
