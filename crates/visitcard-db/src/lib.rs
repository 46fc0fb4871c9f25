//! sqlite ORM layer for visitcard.
//!
//! Statements are built with sea-query and executed through an sqlx
//! `SqlitePool`. Models implement [`Model`]; table access goes through a
//! [`Manager`] obtained from [`Database::objects`], and reads through
//! chainable [`QuerySet`]s.
//!
//! Saving or deleting an instance through a manager sends the database's
//! `post_save` / `post_delete` [signals](crate::signals).

pub mod connection;
pub mod error;
pub mod fields;
pub mod model;
pub mod query;
pub mod registry;
pub mod schema;
pub mod signals;

pub use connection::Database;
pub use error::{DbError, DbResult};
pub use model::{Manager, Model, PK_COLUMN};
pub use query::QuerySet;
pub use registry::{ModelInfo, ModelRegistry};
pub use signals::{ModelSignals, PostDelete, PostSave};

pub use sea_query;
pub use sqlx;
