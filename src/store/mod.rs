//! Store module
//!
//! Persists the bank between runs.
//!
//! # Components
//!
//! - `text_format` - Line format handling (parsing, validation, serialization)
//! - `text_store` - File-backed implementation of `AccountStore`

pub mod text_format;
pub mod text_store;

pub use text_format::{read_store, write_store, AccountLine, StoreLine};
pub use text_store::{TextStore, DEFAULT_STORE_PATH};
