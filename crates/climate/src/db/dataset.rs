use log::{debug, warn};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow},
    ConnectOptions, Connection, FromRow,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query dataset: {0}")]
    DataSource(#[from] sqlx::Error),
    #[error("No rows found in {0}")]
    EmptyResult(String),
    #[error("Failed to parse date string: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Date out of range: {0}")]
    DateRange(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    Measurement,
    Station,
}

impl Table {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Table::Measurement => "measurement",
            Table::Station => "station",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Station,
    Date,
    Precipitation,
    TemperatureObservation,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::Station => "station",
            Column::Date => "date",
            Column::Precipitation => "prcp",
            Column::TemperatureObservation => "tobs",
        }
    }
}

/// Row filter, several predicates are combined with AND.
///
/// Dates are compared as ISO `YYYY-MM-DD` strings, which order the same way as the
/// calendar. Nothing here checks the format of the values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    DateEquals(String),
    DateFrom(String),
    /// Inclusive on both ends
    DateBetween(String, String),
    StationEquals(String),
}

impl Predicate {
    fn clause(&self) -> &'static str {
        match self {
            Predicate::DateEquals(_) => "date = ?",
            Predicate::DateFrom(_) => "date >= ?",
            Predicate::DateBetween(_, _) => "date BETWEEN ? AND ?",
            Predicate::StationEquals(_) => "station = ?",
        }
    }

    fn params(&self) -> Vec<&str> {
        match self {
            Predicate::DateEquals(date) | Predicate::DateFrom(date) => vec![date.as_str()],
            Predicate::DateBetween(start, end) => vec![start.as_str(), end.as_str()],
            Predicate::StationEquals(station) => vec![station.as_str()],
        }
    }
}

fn where_clause(predicates: &[Predicate]) -> String {
    if predicates.is_empty() {
        return String::new();
    }
    let clauses: Vec<&str> = predicates.iter().map(Predicate::clause).collect();
    format!(" WHERE {}", clauses.join(" AND "))
}

fn bind_params(predicates: &[Predicate]) -> Vec<&str> {
    predicates.iter().flat_map(Predicate::params).collect()
}

/// MIN/MAX/AVG of `tobs`, every field is NULL when no row matched
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TemperatureAggregate {
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub tavg: Option<f64>,
}

/// Read-only handle to the SQLite dataset.
///
/// Holds only connection options; every query opens its own connection and closes it
/// before returning, whether the query succeeded or not.
pub struct Dataset {
    path: String,
    options: SqliteConnectOptions,
}

impl Dataset {
    pub fn new(path: &str) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);
        Self {
            path: path.to_owned(),
            options,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn open_connection(&self) -> Result<SqliteConnection, sqlx::Error> {
        self.options.connect().await
    }

    pub async fn fetch_all<T>(&self, sql: &str, params: &[&str]) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        debug!("fetch_all: {} {:?}", sql, params);
        let mut conn = self.open_connection().await?;
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = query.bind(*param);
        }
        let rows = query.fetch_all(&mut conn).await;
        release(conn).await;
        Ok(rows?)
    }

    pub async fn fetch_optional<T>(&self, sql: &str, params: &[&str]) -> Result<Option<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        debug!("fetch_optional: {} {:?}", sql, params);
        let mut conn = self.open_connection().await?;
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = query.bind(*param);
        }
        let row = query.fetch_optional(&mut conn).await;
        release(conn).await;
        Ok(row?)
    }

    pub async fn query_all<T>(&self, table: Table, columns: &[Column]) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        self.query_filtered(table, columns, &[]).await
    }

    pub async fn query_filtered<T>(
        &self,
        table: Table,
        columns: &[Column],
        predicates: &[Predicate],
    ) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let columns: Vec<&str> = columns.iter().map(Column::as_sql).collect();
        let sql = format!(
            "SELECT {} FROM {}{}",
            columns.join(", "),
            table.as_sql(),
            where_clause(predicates)
        );
        self.fetch_all(&sql, &bind_params(predicates)).await
    }

    pub async fn aggregate(&self, predicates: &[Predicate]) -> Result<TemperatureAggregate, Error> {
        let sql = format!(
            "SELECT CAST(MIN(tobs) AS REAL) AS tmin, CAST(MAX(tobs) AS REAL) AS tmax, \
             CAST(AVG(tobs) AS REAL) AS tavg FROM measurement{}",
            where_clause(predicates)
        );
        let aggregate = self
            .fetch_optional(&sql, &bind_params(predicates))
            .await?
            .unwrap_or(TemperatureAggregate {
                tmin: None,
                tmax: None,
                tavg: None,
            });
        Ok(aggregate)
    }

    /// Station with the most measurement rows, ties go to the smallest station id
    pub async fn most_active_station(&self) -> Result<Option<String>, Error> {
        let row: Option<(String,)> = self
            .fetch_optional(
                "SELECT station FROM measurement GROUP BY station \
                 ORDER BY COUNT(station) DESC, station ASC LIMIT 1",
                &[],
            )
            .await?;
        Ok(row.map(|(station,)| station))
    }

    /// Latest `date` over the whole measurement table
    pub async fn most_recent_date(&self) -> Result<Option<String>, Error> {
        let row: Option<(Option<String>,)> = self
            .fetch_optional("SELECT MAX(date) AS date FROM measurement", &[])
            .await?;
        Ok(row.and_then(|(date,)| date))
    }

    /// Check that the file opens and both tables can be read.
    pub async fn health_check(&self) -> Result<(), Error> {
        for table in [Table::Measurement, Table::Station] {
            let sql = format!("SELECT 1 FROM {} LIMIT 1", table.as_sql());
            let _: Option<(i64,)> = self.fetch_optional(&sql, &[]).await?;
        }
        Ok(())
    }
}

async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("failed to close dataset connection: {}", e);
    }
}
