//! Derives SQL statements and row mapping from plain Rust records.
//!
//! ```rust,ignore
//! use quarry::Entity;
//!
//! #[derive(Default, Entity)]
//! #[quarry(name = "users")]
//! pub struct User {
//!     pub id: i64,
//!     pub name: String,
//!     pub email: Option<String>,
//! }
//!
//! let mut user = User { name: "Ada".into(), ..Default::default() };
//! user.save(&mut connection)?; // INSERT INTO users(name,email) VALUES ('Ada',NULL)
//! let users = User::select(&mut connection)?
//!     .filter("name LIKE 'A%'")
//!     .collect::<quarry::Result<Vec<_>>>()?;
//! ```
pub use quarry_core::*;
pub use quarry_macros::Entity;
