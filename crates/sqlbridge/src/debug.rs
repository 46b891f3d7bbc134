//! Telemetry for executed statements.
//!
//! The log is owned by one [`Database`](crate::Database) instance and is
//! only appended to or wholesale-cleared. The executed counter and the
//! accumulated query time are always maintained; per-statement
//! [`QueryRecord`]s are captured only while debug mode is on.

use std::time::Duration;

use serde::Serialize;

/// One logged statement: sequence number, SQL, timing and row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRecord {
    /// 1-based execution index. Contiguous; reset only by a flush or a
    /// disconnect.
    pub seq: usize,
    /// The executed statement text.
    pub sql: String,
    /// Wall-clock time of the native round-trip.
    pub duration: Duration,
    /// Row count for row-returning statements, affected count otherwise.
    pub rows: u64,
    /// Caller-supplied context string, when the statement was tagged.
    pub tag: Option<String>,
}

/// Append-only log of executed statements plus aggregate counters.
#[derive(Debug, Default)]
pub struct QueryLog {
    enabled: bool,
    records: Vec<QueryRecord>,
    executed: usize,
    query_time: Duration,
    connection_time: Duration,
    last_query: String,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle per-statement capture.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Account one executed statement. The record itself is kept only in
    /// debug mode; counters always advance.
    pub fn record(&mut self, sql: &str, duration: Duration, rows: u64, tag: Option<&str>) {
        self.executed += 1;
        self.query_time += duration;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlbridge.sql",
            seq = self.executed,
            rows,
            duration_us = duration.as_micros() as u64,
            tag = tag.unwrap_or("-"),
            sql,
        );

        if self.enabled {
            self.records.push(QueryRecord {
                seq: self.executed,
                sql: sql.to_string(),
                duration,
                rows,
                tag: tag.map(str::to_string),
            });
        }
    }

    /// Remember the statement text before execution, so it is available even
    /// when the statement fails.
    pub fn set_last_query(&mut self, sql: String) {
        self.last_query = sql;
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn records(&self) -> &[QueryRecord] {
        &self.records
    }

    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn query_time(&self) -> Duration {
        self.query_time
    }

    /// Add driver-level time (charset statements, database switches) that
    /// bypasses the statement log.
    pub fn add_query_time(&mut self, duration: Duration) {
        self.query_time += duration;
    }

    pub fn set_connection_time(&mut self, duration: Duration) {
        self.connection_time = duration;
    }

    pub fn connection_time(&self) -> Duration {
        self.connection_time
    }

    pub fn reset_connection_time(&mut self) {
        self.connection_time = Duration::ZERO;
    }

    /// Drop all records and reset every counter.
    pub fn flush(&mut self) {
        self.records.clear();
        self.executed = 0;
        self.query_time = Duration::ZERO;
        self.last_query.clear();
    }
}

/// Render a duration as fractional seconds, `%2.5f` style.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.5}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_advance_without_debug() {
        let mut log = QueryLog::new();
        log.record("SELECT 1", Duration::from_millis(3), 1, None);
        assert_eq!(log.executed(), 1);
        assert_eq!(log.query_time(), Duration::from_millis(3));
        assert!(log.records().is_empty());
    }

    #[test]
    fn records_are_sequenced_from_one() {
        let mut log = QueryLog::new();
        log.set_enabled(true);
        log.record("SELECT 1", Duration::from_millis(1), 1, None);
        log.record("SELECT 2", Duration::from_millis(2), 2, Some("caller"));
        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq, 1);
        assert_eq!(records[1].seq, 2);
        assert_eq!(records[1].tag.as_deref(), Some("caller"));
    }

    #[test]
    fn flush_is_idempotent() {
        let mut log = QueryLog::new();
        log.set_enabled(true);
        log.set_last_query("SELECT 1".to_string());
        log.record("SELECT 1", Duration::from_millis(1), 1, None);

        log.flush();
        assert!(log.records().is_empty());
        assert_eq!(log.executed(), 0);
        assert_eq!(log.last_query(), "");

        log.flush();
        assert!(log.records().is_empty());
        assert_eq!(log.executed(), 0);
        assert_eq!(log.query_time(), Duration::ZERO);
    }

    #[test]
    fn seconds_formatting() {
        assert_eq!(format_seconds(Duration::from_millis(1234)), "1.23400");
        assert_eq!(format_seconds(Duration::ZERO), "0.00000");
    }
}
