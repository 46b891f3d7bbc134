//! Pooled MySQL backend.
//!
//! Wraps a `mysql_async::Pool` instead of owning a single connection, so
//! several façades can share one explicit, caller-supplied pool. There is no
//! hidden process-wide registry: share connections by sharing the pool
//! handle.

use mysql_async::{Conn, Pool};

use super::{error_parts, escape_text, opts_from_config, run_query};
use crate::config::Config;
use crate::driver::{Driver, not_connected};
use crate::error::{DbError, DbResult};
use crate::result::{FetchMode, RawResult};

/// A checkout from a `mysql_async::Pool`.
///
/// `connect` checks a connection out; `disconnect` returns it. The pool
/// itself outlives the adapter.
pub struct PoolDriver {
    config: Config,
    pool: Pool,
    conn: Option<Conn>,
    insert_id: Option<u64>,
    affected: u64,
    last_error: Option<String>,
    last_error_no: Option<String>,
}

impl PoolDriver {
    /// Wrap an existing pool. Connections are drawn from and returned to it;
    /// `config` still supplies prefix, charset and collation.
    pub fn with_pool(pool: Pool, config: &Config) -> Self {
        Self {
            config: config.clone(),
            pool,
            conn: None,
            insert_id: None,
            affected: 0,
            last_error: None,
            last_error_no: None,
        }
    }

    /// The underlying pool, for sharing with other adapters.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

impl Driver for PoolDriver {
    fn new(config: &Config) -> DbResult<Self> {
        let pool = Pool::new(opts_from_config(config));
        Ok(Self::with_pool(pool, config))
    }

    async fn connect(&mut self) -> DbResult<()> {
        match self.pool.get_conn().await {
            Ok(conn) => {
                self.conn = Some(conn);
                Ok(())
            }
            Err(err) => {
                let (message, code) = error_parts(&err);
                self.last_error = Some(message.clone());
                self.last_error_no = code.clone();
                Err(DbError::Connect { message, code })
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    async fn disconnect(&mut self) -> DbResult<()> {
        // Dropping the checkout hands the connection back to the pool.
        self.conn.take();
        Ok(())
    }

    fn escape(&self, data: &str) -> String {
        escape_text(data)
    }

    async fn query(&mut self, sql: &str) -> DbResult<RawResult> {
        self.ensure_connected().await?;
        let conn = self.conn.as_mut().ok_or_else(not_connected)?;
        match run_query(conn, sql).await {
            Ok((raw, affected, insert_id)) => {
                self.affected = affected;
                self.insert_id = insert_id;
                self.last_error = None;
                self.last_error_no = None;
                Ok(raw)
            }
            Err(err) => {
                let (message, code) = error_parts(&err);
                self.last_error = Some(message.clone());
                self.last_error_no = code.clone();
                Err(DbError::Query {
                    message,
                    code,
                    sql: sql.to_string(),
                })
            }
        }
    }

    fn insert_id(&self) -> Option<String> {
        self.insert_id.map(|id| id.to_string())
    }

    fn affected_rows(&self) -> u64 {
        self.affected
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }

    fn last_error_no(&self) -> Option<String> {
        self.last_error_no.clone()
    }

    async fn set_charset(
        &mut self,
        charset: &str,
        collation: &str,
        method: Option<&str>,
    ) -> DbResult<bool> {
        let method = method.unwrap_or(self.config.method.as_str()).to_string();
        let sql = format!("{method} {charset} COLLATE {collation}");
        self.query(&sql).await.map(|_| true)
    }

    async fn select_db(&mut self, name: &str) -> DbResult<bool> {
        let sql = format!("USE `{name}`");
        self.query(&sql).await.map(|_| true)
    }

    async fn version(&mut self) -> DbResult<String> {
        match self.query("SELECT VERSION()").await? {
            RawResult::Rows(mut rows) => Ok(rows
                .fetch(FetchMode::Num)
                .and_then(|row| row.index(0).flatten().map(str::to_string))
                .unwrap_or_default()),
            RawResult::Done => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver as _;

    #[test]
    fn shares_a_caller_supplied_pool() {
        let config = Config::new("localhost", "modx", "u", "p");
        let first = PoolDriver::new(&config).unwrap();
        let second = PoolDriver::with_pool(first.pool().clone(), &config);
        assert!(!first.is_connected());
        assert!(!second.is_connected());
    }
}
