//! Backend implementations of the [`Driver`](crate::driver::Driver) contract.
//!
//! Both variants speak to MySQL through `mysql_async` and share the row,
//! error and escaping plumbing below; they differ only in connection
//! mechanics (one owned connection vs. a pooled checkout).

mod mysql;
mod pool;

pub use mysql::MysqlDriver;
pub use pool::PoolDriver;

use mysql_async::{Conn, Opts, OptsBuilder, Value as MysqlValue};
use mysql_async::prelude::Queryable;

use crate::config::Config;
use crate::result::{RawResult, ResultSet};

pub(crate) fn opts_from_config(config: &Config) -> Opts {
    let (host, port) = config.host_and_port();
    OptsBuilder::default()
        .ip_or_hostname(host)
        .tcp_port(port)
        .user(Some(config.username.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some(config.database.clone()))
        .into()
}

/// Execute one statement and buffer whatever it returns.
pub(crate) async fn run_query(
    conn: &mut Conn,
    sql: &str,
) -> Result<(RawResult, u64, Option<u64>), mysql_async::Error> {
    let result = conn.query_iter(sql).await?;
    let affected = result.affected_rows();
    let insert_id = result.last_insert_id();
    let columns = result.columns();
    let rows: Vec<mysql_async::Row> = result.collect_and_drop().await?;

    let raw = match columns {
        Some(columns) => {
            let names = columns
                .iter()
                .map(|column| column.name_str().into_owned())
                .collect();
            let data = rows
                .iter()
                .map(|row| (0..row.len()).map(|i| cell_text(row.as_ref(i))).collect())
                .collect();
            RawResult::Rows(ResultSet::new(names, data))
        }
        None => RawResult::Done,
    };
    Ok((raw, affected, insert_id))
}

/// Message and SQLSTATE of a native error. Client-side failures (io, url,
/// protocol) carry no state.
pub(crate) fn error_parts(err: &mysql_async::Error) -> (String, Option<String>) {
    match err {
        mysql_async::Error::Server(server) => {
            (server.message.clone(), Some(server.state.clone()))
        }
        other => (other.to_string(), None),
    }
}

/// Render one protocol value as the string cell legacy callers expect.
pub(crate) fn cell_text(value: Option<&MysqlValue>) -> Option<String> {
    match value? {
        MysqlValue::NULL => None,
        MysqlValue::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        MysqlValue::Int(n) => Some(n.to_string()),
        MysqlValue::UInt(n) => Some(n.to_string()),
        MysqlValue::Float(f) => Some(f.to_string()),
        MysqlValue::Double(d) => Some(d.to_string()),
        MysqlValue::Date(year, month, day, hour, minute, second, micro) => {
            Some(if *micro > 0 {
                format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micro:06}"
                )
            } else {
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")
            })
        }
        MysqlValue::Time(negative, days, hours, minutes, seconds, micro) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u32::from(*hours) + days * 24;
            Some(if *micro > 0 {
                format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{micro:06}")
            } else {
                format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
            })
        }
    }
}

/// MySQL string escaping for interpolation into a quoted literal: the same
/// character set `mysql_real_escape_string` handles.
pub(crate) fn escape_text(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for ch in data.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{1a}' => out.push_str("\\Z"),
            _ => out.push(ch),
        }
    }
    out
}
