//! The playlist store.

mod store;

pub use store::*;
