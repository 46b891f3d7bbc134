//! The query façade.
//!
//! [`Database`] composes the fragment builder and a [`Driver`] into the
//! public operation surface: statement builders (`select`, `insert`,
//! `update`, `delete`, `save`), raw execution with telemetry and
//! ignorable-error filtering, result-normalization helpers, and the
//! maintenance/metadata operations.

use std::time::{Duration, Instant};

use crate::builder;
use crate::config::Config;
use crate::debug::{QueryLog, QueryRecord, format_seconds};
use crate::driver::Driver;
use crate::error::{DbError, DbResult};
use crate::result::{FetchMode, RawResult, ResultSet, RowData};
use crate::value::{Coerced, Value, convert_value};

/// Statement text: a ready string, or lines joined with newlines for
/// readability at the call site.
#[derive(Debug, Clone)]
pub struct SqlText(pub(crate) String);

impl From<&str> for SqlText {
    fn from(s: &str) -> Self {
        SqlText(s.to_string())
    }
}

impl From<String> for SqlText {
    fn from(s: String) -> Self {
        SqlText(s)
    }
}

impl From<&String> for SqlText {
    fn from(s: &String) -> Self {
        SqlText(s.clone())
    }
}

impl From<Vec<String>> for SqlText {
    fn from(lines: Vec<String>) -> Self {
        SqlText(lines.join("\n"))
    }
}

impl From<Vec<&str>> for SqlText {
    fn from(lines: Vec<&str>) -> Self {
        SqlText(lines.join("\n"))
    }
}

impl From<&[&str]> for SqlText {
    fn from(lines: &[&str]) -> Self {
        SqlText(lines.join("\n"))
    }
}

/// Outcome of a statement after ignorable-error filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// A row-returning statement: the buffered result set.
    Rows(ResultSet),
    /// A successful mutation; counts live on the driver until the next
    /// statement.
    Done,
    /// A native failure whose SQLSTATE is in the ignore list, degraded to a
    /// non-error result.
    Ignored,
}

impl QueryOutcome {
    /// Whether a result set was produced.
    pub fn is_result(&self) -> bool {
        matches!(self, QueryOutcome::Rows(_))
    }

    /// Whether the statement was downgraded by the ignore list.
    pub fn is_ignored(&self) -> bool {
        matches!(self, QueryOutcome::Ignored)
    }

    /// Row count; zero for anything that is not a result set.
    pub fn record_count(&self) -> usize {
        match self {
            QueryOutcome::Rows(set) => set.record_count(),
            _ => 0,
        }
    }

    /// Column count; zero for anything that is not a result set.
    pub fn num_fields(&self) -> usize {
        match self {
            QueryOutcome::Rows(set) => set.num_fields(),
            _ => 0,
        }
    }

    /// Column name lookup; `None` for anything that is not a result set.
    pub fn field_name(&self, col: usize) -> Option<&str> {
        match self {
            QueryOutcome::Rows(set) => set.field_name(col),
            _ => None,
        }
    }

    /// Take the result set out, if any.
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            QueryOutcome::Rows(set) => Some(set),
            _ => None,
        }
    }

    /// Borrow the result set mutably, if any.
    pub fn as_rows_mut(&mut self) -> Option<&mut ResultSet> {
        match self {
            QueryOutcome::Rows(set) => Some(set),
            _ => None,
        }
    }
}

impl From<RawResult> for QueryOutcome {
    fn from(raw: RawResult) -> Self {
        match raw {
            RawResult::Rows(set) => QueryOutcome::Rows(set),
            RawResult::Done => QueryOutcome::Done,
        }
    }
}

/// Input to the result helpers: an already-executed result set, or SQL to
/// execute first.
#[derive(Debug)]
pub enum ResultSource {
    Set(ResultSet),
    Sql(String),
}

impl From<ResultSet> for ResultSource {
    fn from(set: ResultSet) -> Self {
        ResultSource::Set(set)
    }
}

impl From<&str> for ResultSource {
    fn from(sql: &str) -> Self {
        ResultSource::Sql(sql.to_string())
    }
}

impl From<String> for ResultSource {
    fn from(sql: String) -> Self {
        ResultSource::Sql(sql)
    }
}

/// Which branch [`Database::save`] took, with that branch's result.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveResult {
    /// The insert branch ran; carries the new row id when one was produced.
    Inserted(Option<u64>),
    /// The update branch ran; `false` means the statement was downgraded by
    /// the ignore list.
    Updated(bool),
}

/// The public query façade over one driver instance.
///
/// One logical connection per instance; operations take `&mut self` and
/// block (await) for the duration of the native round-trip. Nothing is
/// retried internally.
pub struct Database<D> {
    config: Config,
    driver: D,
    log: QueryLog,
    ignore_errors: Vec<String>,
    safe_loop_count: usize,
}

impl<D: Driver> Database<D> {
    /// The ignore list the historical layer shipped with: unknown column,
    /// duplicate column name, duplicate key name / can't drop, duplicate
    /// entry. Opt in via [`Database::set_ignore_errors`].
    pub const LEGACY_IGNORE_ERRORS: [&'static str; 4] = ["42S22", "42S21", "42000", "23000"];

    /// Build a façade, constructing the driver from `config`.
    pub fn new(config: Config) -> DbResult<Self> {
        let driver = D::new(&config)?;
        Ok(Self::with_driver(driver, config))
    }

    /// Build a façade around an existing driver (pre-built pool, test
    /// double, ...).
    pub fn with_driver(driver: D, config: Config) -> Self {
        Self {
            config,
            driver,
            log: QueryLog::new(),
            ignore_errors: Vec::new(),
            safe_loop_count: 1000,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Bound for `escape` recursion depth (default 1000).
    pub fn set_safe_loop_count(&mut self, limit: usize) {
        self.safe_loop_count = limit;
    }

    // ==================== Connection lifecycle ====================

    /// Establish the connection and apply the configured charset/collation.
    /// Timed into the connection-time counter when debug is on.
    pub async fn connect(&mut self) -> DbResult<()> {
        let start = Instant::now();
        self.driver.connect().await?;
        if self.log.is_enabled() {
            self.log.set_connection_time(start.elapsed());
        }
        let charset = self.config.charset.clone();
        let collation = self.config.collation.clone();
        let method = self.config.method.clone();
        self.set_charset(&charset, &collation, Some(&method)).await?;
        Ok(())
    }

    /// Close the connection and flush all telemetry. Safe when already
    /// disconnected; reconnecting afterwards creates a fresh handle.
    pub async fn disconnect(&mut self) -> DbResult<()> {
        self.driver.disconnect().await?;
        self.log.reset_connection_time();
        self.flush_executed_query();
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    // ==================== Raw execution ====================

    /// Execute raw SQL. Times the round-trip, appends a [`QueryRecord`] in
    /// debug mode, and degrades allow-listed native failures to
    /// [`QueryOutcome::Ignored`].
    pub async fn query(&mut self, sql: impl Into<SqlText>) -> DbResult<QueryOutcome> {
        let SqlText(sql) = sql.into();
        self.run(sql, None).await
    }

    /// Like [`Database::query`], with a caller-context string recorded in
    /// the telemetry entry.
    pub async fn query_tagged(
        &mut self,
        tag: &str,
        sql: impl Into<SqlText>,
    ) -> DbResult<QueryOutcome> {
        let SqlText(sql) = sql.into();
        self.run(sql, Some(tag)).await
    }

    async fn run(&mut self, sql: String, tag: Option<&str>) -> DbResult<QueryOutcome> {
        let start = Instant::now();
        self.log.set_last_query(sql.clone());
        match self.driver.query(&sql).await {
            Ok(raw) => {
                let duration = start.elapsed();
                let rows = match &raw {
                    RawResult::Rows(set) => set.record_count() as u64,
                    RawResult::Done => self.driver.affected_rows(),
                };
                self.log.record(&sql, duration, rows, tag);
                Ok(raw.into())
            }
            Err(err) => self.filter_query_error(err),
        }
    }

    fn filter_query_error(&self, err: DbError) -> DbResult<QueryOutcome> {
        if err.is_query() {
            if let Some(code) = err.code() {
                if self.ignore_errors.iter().any(|ignored| ignored == code) {
                    return Ok(QueryOutcome::Ignored);
                }
            }
        }
        Err(err)
    }

    /// Turn the driver's current error state into a typed failure, honoring
    /// the ignore list.
    pub fn check_last_error(&self, sql: &str) -> DbResult<()> {
        match self.driver.last_error_no() {
            Some(code) if self.ignore_errors.iter().any(|ignored| *ignored == code) => Ok(()),
            Some(code) => Err(DbError::query(
                self.driver.last_error().unwrap_or_default(),
                Some(code),
                sql,
            )),
            None => Ok(()),
        }
    }

    // ==================== Statement builders ====================

    /// `SELECT <fields> FROM <tables> <where> <orderBy> <limit>`.
    ///
    /// `tables` may be a single reference or a sequence of `table alias`
    /// references for the multi-table form.
    pub async fn select(
        &mut self,
        fields: impl Into<Value>,
        tables: impl Into<Value>,
        where_clause: impl Into<Value>,
        order_by: impl Into<Value>,
        limit: impl Into<Value>,
    ) -> DbResult<QueryOutcome> {
        let fields = builder::fields(&fields.into());
        let tables = builder::from(&tables.into(), true)?;
        let where_clause = builder::where_clause(&where_clause.into());
        let order_by = builder::order(&order_by.into());
        let limit = builder::limit(&limit.into());
        let sql = join_sql(&[
            "SELECT",
            &fields,
            "FROM",
            &tables,
            &where_clause,
            &order_by,
            &limit,
        ]);
        self.query(sql).await
    }

    /// Direct-value insert. Returns the new row's identifier, or `None` when
    /// the statement was downgraded by the ignore list. Fails with
    /// [`DbError::GetData`] when the backend produced no identifier.
    pub async fn insert(
        &mut self,
        fields: impl Into<Value>,
        table: &str,
    ) -> DbResult<Option<u64>> {
        let table = builder::from(&Value::from(table), false)?;
        let fields = fields.into();
        let use_fields = match &fields {
            Value::Scalar(s) => s.clone(),
            Value::Null => String::new(),
            composite => builder::values_for_insert(composite, 1, false)?.into_inline(),
        };
        if use_fields.is_empty() {
            return Err(DbError::invalid_field(
                "invalid insert fields",
                format!("{fields:?}"),
            ));
        }
        let sql = join_sql(&["INSERT INTO", &table, &use_fields]);
        match self.query(sql).await? {
            QueryOutcome::Ignored => Ok(None),
            _ => match self.get_insert_id() {
                Some(id) => Ok(Some(id)),
                None => Err(DbError::GetData(
                    "couldn't get the last insert key".to_string(),
                )),
            },
        }
    }

    /// `INSERT INTO <table> (<fields>) SELECT <fromFields> FROM <fromTable>
    /// <where> <limit>`. Returns `false` when downgraded by the ignore list.
    pub async fn insert_from(
        &mut self,
        fields: impl Into<Value>,
        table: &str,
        from_fields: impl Into<Value>,
        from_table: &str,
        where_clause: impl Into<Value>,
        limit: impl Into<Value>,
    ) -> DbResult<bool> {
        let table = builder::from(&Value::from(table), false)?;
        let from_table = builder::from(&Value::from(from_table), false)?;

        let fields = fields.into();
        let use_fields = match &fields {
            Value::Scalar(s) => s.clone(),
            Value::Null => String::new(),
            composite => builder::fields(composite),
        };
        if use_fields.is_empty() || use_fields == "*" {
            return Err(DbError::invalid_field(
                "invalid insert fields",
                format!("{fields:?}"),
            ));
        }

        let from_fields = from_fields.into();
        let from_fields = if from_fields.is_empty_input() || from_fields.as_scalar() == Some("*") {
            // Mirror the target field list when the source list is elided.
            builder::fields(&fields)
        } else {
            builder::fields(&from_fields)
        };

        let where_clause = builder::where_clause(&where_clause.into());
        let limit = builder::limit(&limit.into());
        let select = join_sql(&["SELECT", &from_fields, "FROM", &from_table, &where_clause, &limit]);
        let sql = format!("INSERT INTO {table} ({use_fields}) {select}");
        Ok(!self.query(sql).await?.is_ignored())
    }

    /// `UPDATE <table> SET <values> <where>`. A mapping builds the SET body;
    /// a string passes through, `SET` prepended when missing. Zero affected
    /// rows is still success.
    pub async fn update(
        &mut self,
        values: impl Into<Value>,
        table: &str,
        where_clause: impl Into<Value>,
    ) -> DbResult<bool> {
        let table = builder::from(&Value::from(table), false)?;
        let mut values = builder::set_clause(&values.into())?;
        let prefixed = values
            .get(0..4)
            .map(|head| head.eq_ignore_ascii_case("SET "))
            .unwrap_or(false);
        if !prefixed {
            values = format!("SET {values}");
        }
        let where_clause = builder::where_clause(&where_clause.into());
        let sql = join_sql(&["UPDATE", &table, &values, &where_clause]);
        Ok(!self.query(sql).await?.is_ignored())
    }

    /// `DELETE FROM <table> <where> <orderBy> <limit>`.
    pub async fn delete(
        &mut self,
        table: &str,
        where_clause: impl Into<Value>,
        order_by: impl Into<Value>,
        limit: impl Into<Value>,
    ) -> DbResult<bool> {
        let table = builder::from(&Value::from(table), false)?;
        let where_clause = builder::where_clause(&where_clause.into());
        let order_by = builder::order(&order_by.into());
        let limit = builder::limit(&limit.into());
        let sql = join_sql(&["DELETE FROM", &table, &where_clause, &order_by, &limit]);
        Ok(!self.query(sql).await?.is_ignored())
    }

    /// Insert-or-update: empty `where` inserts; otherwise a `SELECT *` probe
    /// with that `where` decides (zero rows insert, nonzero update).
    ///
    /// The probe and the write are two separate statements with no
    /// transaction around them: a concurrent writer can slip a matching row
    /// in between, producing a duplicate-key failure or a lost update. That
    /// is the historical contract of this operation; callers needing
    /// atomicity must arrange it themselves.
    pub async fn save(
        &mut self,
        fields: impl Into<Value>,
        table: &str,
        where_clause: impl Into<Value>,
    ) -> DbResult<SaveResult> {
        let fields = fields.into();
        let where_clause = where_clause.into();

        let update_mode = if where_clause.is_empty_input() {
            false
        } else {
            let probe = self
                .select("*", table, where_clause.clone(), "", "")
                .await?;
            probe.record_count() > 0
        };

        if update_mode {
            Ok(SaveResult::Updated(
                self.update(fields, table, where_clause).await?,
            ))
        } else {
            Ok(SaveResult::Inserted(self.insert(fields, table).await?))
        }
    }

    // ==================== Escaping ====================

    /// Escape every scalar leaf of `data` through the driver, preserving the
    /// input's shape. Recursion is bounded by the safe loop count.
    pub fn escape(&self, data: impl Into<Value>) -> DbResult<Value> {
        self.escape_guarded(data.into(), 1)
    }

    /// Escape one scalar through the driver.
    pub fn escape_str(&self, data: &str) -> String {
        self.driver.escape(data)
    }

    // Only composite levels consume depth: nesting at exactly the limit
    // still escapes, one level deeper fails.
    fn escape_guarded(&self, data: Value, depth: usize) -> DbResult<Value> {
        Ok(match data {
            Value::Sequence(items) => {
                if depth > self.safe_loop_count {
                    return Err(DbError::TooManyLoops(depth));
                }
                if items.is_empty() {
                    Value::Scalar(String::new())
                } else {
                    Value::Sequence(
                        items
                            .into_iter()
                            .map(|item| self.escape_guarded(item, depth + 1))
                            .collect::<DbResult<_>>()?,
                    )
                }
            }
            Value::Mapping(pairs) => {
                if depth > self.safe_loop_count {
                    return Err(DbError::TooManyLoops(depth));
                }
                if pairs.is_empty() {
                    Value::Scalar(String::new())
                } else {
                    Value::Mapping(
                        pairs
                            .into_iter()
                            .map(|(key, item)| {
                                Ok((key, self.escape_guarded(item, depth + 1)?))
                            })
                            .collect::<DbResult<_>>()?,
                    )
                }
            }
            Value::Scalar(s) => Value::Scalar(self.driver.escape(&s)),
            Value::Null => Value::Scalar(self.driver.escape("")),
        })
    }

    // ==================== Result helpers ====================

    /// Fetch the next row of a result set, associative shape.
    pub fn get_row(&self, result: &mut ResultSet) -> Option<RowData> {
        result.fetch(FetchMode::Assoc)
    }

    /// Fetch the next row in an explicit shape.
    pub fn get_row_mode(&self, result: &mut ResultSet, mode: FetchMode) -> Option<RowData> {
        result.fetch(mode)
    }

    /// First remaining row of a result set or of freshly executed SQL.
    pub async fn get_first_row(
        &mut self,
        source: impl Into<ResultSource>,
        mode: FetchMode,
    ) -> DbResult<Option<RowData>> {
        let Some(mut set) = self.resolve(source.into()).await? else {
            return Ok(None);
        };
        Ok(set.fetch(mode))
    }

    /// First cell of the next row, with legacy numeric coercion applied.
    pub async fn get_value(
        &mut self,
        source: impl Into<ResultSource>,
    ) -> DbResult<Option<Coerced>> {
        let Some(mut set) = self.resolve(source.into()).await? else {
            return Ok(None);
        };
        Ok(set
            .fetch(FetchMode::Num)
            .and_then(|row| match row {
                RowData::Num(cells) => cells.into_iter().next(),
                _ => None,
            })
            .map(|cell| convert_value(cell.as_deref())))
    }

    /// One column of all remaining rows.
    pub async fn get_column(
        &mut self,
        name: &str,
        source: impl Into<ResultSource>,
    ) -> DbResult<Vec<Option<String>>> {
        let Some(mut set) = self.resolve(source.into()).await? else {
            return Ok(Vec::new());
        };
        Ok(set.take_column(name))
    }

    /// Column names of a result.
    pub async fn get_column_names(
        &mut self,
        source: impl Into<ResultSource>,
    ) -> DbResult<Vec<String>> {
        let Some(set) = self.resolve(source.into()).await? else {
            return Ok(Vec::new());
        };
        Ok(set.column_names().to_vec())
    }

    /// Collect remaining rows into an ordered mapping. Keys come from
    /// `index` when that column is present in a row, falling back to the
    /// zero-based row ordinal per row.
    pub async fn make_array(
        &mut self,
        source: impl Into<ResultSource>,
        index: Option<&str>,
    ) -> DbResult<Vec<(String, RowData)>> {
        let Some(mut set) = self.resolve(source.into()).await? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(set.record_count());
        let mut ordinal = 0usize;
        while let Some(row) = set.fetch(FetchMode::Assoc) {
            let key = index
                .and_then(|column| row.get(column).flatten().map(str::to_string))
                .unwrap_or_else(|| ordinal.to_string());
            out.push((key, row));
            ordinal += 1;
        }
        Ok(out)
    }

    /// Row count of an outcome; zero when there is no result set.
    pub fn get_record_count(&self, outcome: &QueryOutcome) -> usize {
        outcome.record_count()
    }

    /// Column count of an outcome; zero when there is no result set.
    pub fn num_fields(&self, outcome: &QueryOutcome) -> usize {
        outcome.num_fields()
    }

    /// Column name of an outcome; `None` when there is no result set.
    pub fn field_name<'a>(&self, outcome: &'a QueryOutcome, col: usize) -> Option<&'a str> {
        outcome.field_name(col)
    }

    /// Whether the outcome carries a result set.
    pub fn is_result(&self, outcome: &QueryOutcome) -> bool {
        outcome.is_result()
    }

    /// Move a result cursor to an absolute position (driver capability).
    pub fn data_seek(&self, result: &mut ResultSet, position: usize) -> DbResult<bool> {
        self.driver.data_seek(result, position)
    }

    async fn resolve(&mut self, source: ResultSource) -> DbResult<Option<ResultSet>> {
        match source {
            ResultSource::Set(set) => Ok(Some(set)),
            ResultSource::Sql(sql) => Ok(self.query(sql).await?.into_rows()),
        }
    }

    // ==================== Metadata and maintenance ====================

    /// `SHOW FIELDS FROM <table>`, keyed by column name. An empty table name
    /// yields an empty mapping.
    pub async fn get_table_meta_data(
        &mut self,
        table: &str,
    ) -> DbResult<Vec<(String, RowData)>> {
        if table.trim().is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SHOW FIELDS FROM {table}");
        let Some(mut set) = self.resolve(ResultSource::Sql(sql)).await? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(set.record_count());
        while let Some(row) = set.fetch(FetchMode::Assoc) {
            let name = row
                .get("Field")
                .flatten()
                .unwrap_or_default()
                .to_string();
            out.push((name, row));
        }
        Ok(out)
    }

    /// `OPTIMIZE TABLE` followed by a rebuild via `ALTER TABLE`.
    pub async fn optimize(&mut self, table: &str) -> DbResult<bool> {
        let sql = format!("OPTIMIZE TABLE {table}");
        if self.query(sql).await?.is_ignored() {
            return Ok(false);
        }
        self.alter_table(table).await
    }

    /// Bare `ALTER TABLE` (a MySQL no-op rebuild).
    pub async fn alter_table(&mut self, table: &str) -> DbResult<bool> {
        let sql = format!("ALTER TABLE {table}");
        Ok(!self.query(sql).await?.is_ignored())
    }

    /// `TRUNCATE <table>`.
    pub async fn truncate(&mut self, table: &str) -> DbResult<bool> {
        let sql = format!("TRUNCATE {table}");
        Ok(!self.query(sql).await?.is_ignored())
    }

    /// Server version string.
    pub async fn get_version(&mut self) -> DbResult<String> {
        self.driver.version().await
    }

    /// Switch the active database. Timed into the query-time counter.
    pub async fn select_db(&mut self, name: &str) -> DbResult<bool> {
        let start = Instant::now();
        let out = self.driver.select_db(name).await?;
        self.log.add_query_time(start.elapsed());
        Ok(out)
    }

    /// Issue the charset statement. Timed into the query-time counter.
    pub async fn set_charset(
        &mut self,
        charset: &str,
        collation: &str,
        method: Option<&str>,
    ) -> DbResult<bool> {
        let start = Instant::now();
        let out = self.driver.set_charset(charset, collation, method).await?;
        self.log.add_query_time(start.elapsed());
        Ok(out)
    }

    /// Identifier of the last inserted row, numerically coerced.
    pub fn get_insert_id(&self) -> Option<u64> {
        let raw = self.driver.insert_id()?;
        match convert_value(Some(&raw)) {
            Coerced::Int(id) => u64::try_from(id).ok(),
            _ => None,
        }
    }

    /// Rows affected by the last mutation.
    pub fn get_affected_rows(&self) -> u64 {
        self.driver.affected_rows()
    }

    /// Most recent native error message.
    pub fn get_last_error(&self) -> Option<String> {
        self.driver.last_error()
    }

    /// Most recent native SQLSTATE.
    pub fn get_last_error_no(&self) -> Option<String> {
        self.driver.last_error_no()
    }

    // ==================== Naming ====================

    /// Fully qualified, quoted `` `database`.`prefix+table` `` name.
    pub fn get_full_table_name(&self, table: &str) -> DbResult<String> {
        if table.is_empty() {
            return Err(DbError::TableNotDefined(table.to_string()));
        }
        Ok(format!(
            "`{}`.`{}{}`",
            self.config.database, self.config.prefix, table
        ))
    }

    // ==================== Telemetry and debug ====================

    /// Toggle per-statement telemetry capture.
    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.log.set_enabled(debug);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.log.is_enabled()
    }

    /// All captured statement records, in execution order.
    pub fn get_all_executed_query(&self) -> &[QueryRecord] {
        self.log.records()
    }

    /// Text of the most recently executed (or attempted) statement.
    pub fn get_last_query(&self) -> &str {
        self.log.last_query()
    }

    /// Drop all records and reset the executed counter and timers.
    pub fn flush_executed_query(&mut self) -> &mut Self {
        self.log.flush();
        self
    }

    /// Statements executed since the last flush.
    pub fn get_executed_count(&self) -> usize {
        self.log.executed()
    }

    /// Accumulated native round-trip time.
    pub fn get_query_time(&self) -> Duration {
        self.log.query_time()
    }

    /// Time the connection handshake took (captured in debug mode).
    pub fn get_connection_time(&self) -> Duration {
        self.log.connection_time()
    }

    /// Connection time as fractional seconds text.
    pub fn get_connection_time_formatted(&self) -> String {
        format_seconds(self.log.connection_time())
    }

    // ==================== Ignorable errors ====================

    /// The configured ignorable SQLSTATEs.
    pub fn get_ignore_errors(&self) -> &[String] {
        &self.ignore_errors
    }

    /// Add one ignorable SQLSTATE.
    pub fn add_ignore_errors(&mut self, code: impl Into<String>) -> &mut Self {
        self.ignore_errors.push(code.into());
        self
    }

    /// Replace the ignorable SQLSTATEs.
    pub fn set_ignore_errors<I, S>(&mut self, codes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flush_ignore_errors();
        for code in codes {
            self.add_ignore_errors(code);
        }
        self
    }

    /// Clear the ignorable SQLSTATEs.
    pub fn flush_ignore_errors(&mut self) -> &mut Self {
        self.ignore_errors.clear();
        self
    }
}

fn join_sql(parts: &[&str]) -> String {
    let mut out = String::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}
