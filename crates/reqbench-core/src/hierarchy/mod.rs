//! Hierarchy builder.
//!
//! Turns the flat record list into the nested, sorted view the sidebar
//! renders: collections first, then requests, each level by creation time.

mod cache;
mod nest;
mod view;

pub use cache::ViewCache;
pub use nest::{compare_records, nest_records};
pub use view::{HierarchyView, build_view};
