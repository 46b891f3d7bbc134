//! # sqlbridge
//!
//! A compatibility-first MySQL access layer: callers written against a
//! legacy string-built SQL interface keep their calling conventions while
//! the underlying connection technology evolves behind a driver contract.
//!
//! ## Features
//!
//! - **Loosely-typed inputs**: fields, tables, WHERE bodies and value sets
//!   arrive as strings, lists or ordered maps ([`Value`]) and render to
//!   deterministic SQL fragments
//! - **Pluggable drivers**: one capability trait ([`Driver`]), independent
//!   backends (single connection, pooled) with identical SQL-text behavior
//! - **Legacy result shapes**: string-typed rows fetched associatively,
//!   positionally, as JSON objects, or both
//! - **Telemetry**: per-statement records with timing, row counts and
//!   caller tags, toggleable at runtime
//! - **Uniform errors**: one typed taxonomy over heterogeneous native
//!   failures, with a caller-configured allow-list that degrades ignorable
//!   failures to falsy results instead of raising
//!
//! ## Example
//!
//! ```ignore
//! use sqlbridge::{Config, Database, MysqlDriver, Value};
//!
//! let config = Config::new("localhost", "modx", "homestead", "secret")
//!     .prefix("modx_")
//!     .method("SET NAMES");
//! let mut db: Database<MysqlDriver> = Database::new(config)?;
//! db.set_debug(true);
//! db.connect().await?;
//!
//! let table = db.get_full_table_name("site_content")?;
//! let id = db
//!     .insert(Value::mapping([("pagetitle", "hello"), ("parent", "0")]), &table)
//!     .await?;
//!
//! let result = db.select("*", &table, "parent = 0", "pagetitle", "10").await?;
//! if let Some(rows) = result.into_rows() {
//!     for (key, row) in db.make_array(rows, Some("id")).await? {
//!         println!("{key}: {row:?}");
//!     }
//! }
//! ```

pub mod builder;
pub mod config;
pub mod database;
pub mod debug;
pub mod driver;
pub mod error;
pub mod result;
pub mod value;

#[cfg(feature = "mysql")]
pub mod drivers;

pub use builder::InsertFragment;
pub use config::Config;
pub use database::{Database, QueryOutcome, ResultSource, SaveResult, SqlText};
pub use debug::{QueryLog, QueryRecord, format_seconds};
pub use driver::Driver;
pub use error::{DbError, DbResult};
pub use result::{FetchMode, RawResult, ResultSet, RowData};
pub use value::{Coerced, Value, convert_value};

#[cfg(feature = "mysql")]
pub use drivers::{MysqlDriver, PoolDriver};
