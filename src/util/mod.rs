//! Supporting allocator types from `spec.md` §4.6, kept as named,
//! documented constructs even where Rust's ownership model makes the
//! original's runtime structure unnecessary.

pub mod item_pool;
pub mod item_stack;
pub mod mem_stack;

pub use item_pool::{ItemId, ItemPool};
pub use item_stack::ScopeStack;
pub use mem_stack::MemStack;
