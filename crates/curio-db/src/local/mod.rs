//! Client-side persisted storage

mod token_file;

pub use token_file::FileTokenStore;
