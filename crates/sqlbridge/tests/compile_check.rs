//! Compile-only checks for the generic façade API.

#![allow(dead_code)]

use sqlbridge::{
    Config, Database, DbResult, Driver, FetchMode, QueryOutcome, ResultSet, SaveResult, Value,
};

async fn _facade_is_generic_over_drivers<D: Driver>(db: &mut Database<D>) -> DbResult<()> {
    db.connect().await?;

    let outcome = db
        .select("*", "site_content", "parent = 0", "menuindex", "10")
        .await?;
    let _rows = db.get_record_count(&outcome);

    if let Some(mut set) = outcome.into_rows() {
        while let Some(_row) = db.get_row_mode(&mut set, FetchMode::Both) {}
        db.data_seek(&mut set, 0)?;
    }

    let _id = db
        .insert(Value::mapping([("pagetitle", "hello")]), "site_content")
        .await?;

    match db
        .save(Value::mapping([("pagetitle", "hi")]), "site_content", "id = 1")
        .await?
    {
        SaveResult::Inserted(_) | SaveResult::Updated(_) => {}
    }

    db.disconnect().await?;
    Ok(())
}

async fn _helpers_accept_sets_and_sql<D: Driver>(db: &mut Database<D>) -> DbResult<()> {
    let _names = db.get_column_names("SELECT * FROM site_content").await?;
    let set = ResultSet::new(Vec::new(), Vec::new());
    let _value = db.get_value(set).await?;
    let _meta = db.get_table_meta_data("site_content").await?;
    Ok(())
}

#[cfg(feature = "mysql")]
async fn _mysql_drivers_satisfy_the_contract() -> DbResult<()> {
    use sqlbridge::{MysqlDriver, PoolDriver};

    let config = Config::new("localhost", "modx", "homestead", "secret").prefix("modx_");
    let mut native: Database<MysqlDriver> = Database::new(config.clone())?;
    let mut pooled: Database<PoolDriver> = Database::new(config)?;

    _facade_is_generic_over_drivers(&mut native).await?;
    _facade_is_generic_over_drivers(&mut pooled).await?;
    Ok(())
}

#[test]
fn query_outcome_defaults_are_defensive() {
    let outcome = QueryOutcome::Done;
    assert_eq!(outcome.record_count(), 0);
    assert_eq!(outcome.num_fields(), 0);
    assert_eq!(outcome.field_name(0), None);
    assert!(!outcome.is_result());
}
