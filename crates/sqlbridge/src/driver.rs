//! The backend capability contract.

use std::future::Future;

use crate::config::Config;
use crate::error::{DbError, DbResult};
use crate::result::{RawResult, ResultSet};

/// A backend adapter owning one live native connection.
///
/// Implementations differ only in how they satisfy this contract (native
/// protocol, pooled checkout, ...); the SQL text they receive is identical,
/// since all fragment rendering happens above the driver in
/// [`Database`](crate::Database).
///
/// Failure states: `connect` must leave the adapter disconnected on error
/// (no partial handle), `query` must refresh the last-error fields before
/// returning, and `disconnect` is idempotent.
pub trait Driver: Send + Sized {
    /// Build an adapter from configuration without connecting.
    fn new(config: &Config) -> DbResult<Self>;

    /// Establish the native handle. Fails with [`DbError::Connect`].
    fn connect(&mut self) -> impl Future<Output = DbResult<()>> + Send;

    /// Pure state query; never triggers a connection attempt.
    fn is_connected(&self) -> bool;

    /// Connect first if not yet connected (lazy-connect convenience).
    fn ensure_connected(&mut self) -> impl Future<Output = DbResult<()>> + Send {
        async move {
            if !self.is_connected() {
                self.connect().await?;
            }
            Ok(())
        }
    }

    /// Close the native handle. Safe to call when already disconnected.
    fn disconnect(&mut self) -> impl Future<Output = DbResult<()>> + Send;

    /// Backend-native escaping of one scalar for interpolation into a
    /// quoted literal. Composite recursion happens one layer up.
    fn escape(&self, data: &str) -> String;

    /// Execute raw SQL text. Row-returning statements yield a buffered
    /// [`RawResult::Rows`]; mutations yield [`RawResult::Done`] with the
    /// affected-row count and insert id readable until the next statement.
    /// Native failures are a [`DbError::Query`] carrying the statement text
    /// and SQLSTATE.
    fn query(&mut self, sql: &str) -> impl Future<Output = DbResult<RawResult>> + Send;

    /// Identifier of the last inserted row, as the backend reports it.
    /// String-typed so connectors with string ids fit; numeric coercion is
    /// the façade's concern. Valid only immediately after a mutating query.
    fn insert_id(&self) -> Option<String>;

    /// Rows affected by the last mutating query.
    fn affected_rows(&self) -> u64;

    /// Most recent native error message, persisting until the next statement.
    fn last_error(&self) -> Option<String>;

    /// Most recent native SQLSTATE, persisting until the next statement.
    fn last_error_no(&self) -> Option<String>;

    /// Issue the backend-appropriate charset statement. `method` falls back
    /// to the configured verb.
    fn set_charset(
        &mut self,
        charset: &str,
        collation: &str,
        method: Option<&str>,
    ) -> impl Future<Output = DbResult<bool>> + Send;

    /// Switch the active database.
    fn select_db(&mut self, name: &str) -> impl Future<Output = DbResult<bool>> + Send;

    /// Server version string.
    fn version(&mut self) -> impl Future<Output = DbResult<String>> + Send;

    /// Move a result cursor to an absolute row position.
    ///
    /// Buffered backends support this via the set itself; forward-only
    /// backends should override with a [`DbError::Driver`].
    fn data_seek(&self, result: &mut ResultSet, position: usize) -> DbResult<bool> {
        Ok(result.data_seek(position))
    }
}

/// Convenience guard for implementations that hold an `Option` handle.
pub(crate) fn not_connected() -> DbError {
    DbError::driver("not connected")
}
