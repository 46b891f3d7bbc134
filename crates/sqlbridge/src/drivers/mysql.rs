//! Native single-connection MySQL backend.

use mysql_async::Conn;

use super::{error_parts, escape_text, opts_from_config, run_query};
use crate::config::Config;
use crate::driver::{Driver, not_connected};
use crate::error::{DbError, DbResult};
use crate::result::{FetchMode, RawResult};

/// One owned `mysql_async` connection, created lazily on first use.
pub struct MysqlDriver {
    config: Config,
    conn: Option<Conn>,
    insert_id: Option<u64>,
    affected: u64,
    last_error: Option<String>,
    last_error_no: Option<String>,
}

impl Driver for MysqlDriver {
    fn new(config: &Config) -> DbResult<Self> {
        Ok(Self {
            config: config.clone(),
            conn: None,
            insert_id: None,
            affected: 0,
            last_error: None,
            last_error_no: None,
        })
    }

    async fn connect(&mut self) -> DbResult<()> {
        match Conn::new(opts_from_config(&self.config)).await {
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
        if let Some(conn) = self.conn.take() {
            conn.disconnect()
                .await
                .map_err(|err| DbError::driver(err.to_string()))?;
        }
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

    #[test]
    fn starts_disconnected() {
        let config = Config::new("localhost", "modx", "u", "p");
        let driver = MysqlDriver::new(&config).unwrap();
        assert!(!driver.is_connected());
        assert_eq!(driver.insert_id(), None);
        assert_eq!(driver.affected_rows(), 0);
        assert_eq!(driver.last_error(), None);
    }
}
