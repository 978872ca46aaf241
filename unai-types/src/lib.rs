#![deny(missing_docs)]
//! Shared types for the unai chat client.
//!
//! Provides the conversation [`Message`] and [`Role`], the static model
//! catalog, the [`ChatError`] taxonomy, the streaming [`StreamEvent`] /
//! [`StreamHandle`] pair, and the [`StateStore`] trait used to persist a
//! conversation between runs.

pub mod error;
pub mod models;
pub mod store;
pub mod stream;
pub mod types;

pub use error::*;
pub use models::*;
pub use store::*;
pub use stream::*;
pub use types::*;
