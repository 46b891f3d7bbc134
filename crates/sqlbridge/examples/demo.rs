//! End-to-end walkthrough against a live MySQL server.
//!
//! Reads the connection parameters from the environment (or a `.env` file):
//! DB_HOST, DB_BASE, DB_USER, DB_PASSWORD, DB_PREFIX, DB_CHARSET, DB_METHOD.
//!
//! ```sh
//! cargo run --example demo
//! ```

use std::env;

use sqlbridge::{Config, Database, DbResult, MysqlDriver};

fn var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> DbResult<()> {
    dotenvy::dotenv().ok();

    let config = Config::new(
        var("DB_HOST", "localhost"),
        var("DB_BASE", "modx"),
        var("DB_USER", "homestead"),
        var("DB_PASSWORD", "secret"),
    )
    .prefix(var("DB_PREFIX", "modx_"))
    .charset(var("DB_CHARSET", "utf8mb4"))
    .method(var("DB_METHOD", "SET NAMES"));

    let mut db: Database<MysqlDriver> = Database::new(config)?;
    db.set_debug(true);

    db.connect().await?;
    println!(
        " [ CONNECTION TIME ] {} s.",
        db.get_connection_time_formatted()
    );
    println!(" [ VERSION ] {}", db.get_version().await?);

    let table = db.get_full_table_name("site_content")?;
    let result = db
        .query(format!("SELECT * FROM {table} WHERE parent = 0"))
        .await?;
    if let Some(rows) = result.into_rows() {
        for (_, item) in db.make_array(rows, Some("id")).await? {
            println!(
                " [ DOCUMENT #ID {} ] {}",
                item.get("id").flatten().unwrap_or("?"),
                item.get("pagetitle").flatten().unwrap_or("")
            );
        }
    }

    for record in db.get_all_executed_query() {
        println!(" [ QUERY #{} ] ", record.seq);
        println!("\t [sql] {}", record.sql);
        println!("\t [time] {:?}", record.duration);
        println!("\t [rows] {}", record.rows);
    }
    println!(" [ DONE ] ");

    db.disconnect().await?;
    Ok(())
}
