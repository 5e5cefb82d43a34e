use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate::{
    app, AppState, ClimateAccess, ClimateData, Dataset, DateRange, Error, Measurement,
    PrecipitationReading, TemperatureObservation, TemperatureStats,
};
use hyper::Method;
use mockall::mock;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, Connection};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
}

mock! {
    pub ClimateStore {}
    #[async_trait]
    impl ClimateData for ClimateStore {
        async fn precipitation(&self) -> Result<Vec<PrecipitationReading>, Error>;
        async fn stations(&self) -> Result<Vec<String>, Error>;
        async fn most_active_station(&self) -> Result<String, Error>;
        async fn most_recent_date(&self) -> Result<String, Error>;
        async fn station_observations(
            &self,
            station: &str,
            since: &str,
        ) -> Result<Vec<TemperatureObservation>, Error>;
        async fn temperature_stats(
            &self,
            range: &DateRange,
        ) -> Result<Option<TemperatureStats>, Error>;
    }
}

pub async fn spawn_app(climate_db: Arc<dyn ClimateData>) -> TestApp {
    let app_state = AppState {
        remote_url: String::from("http://127.0.0.1:5000"),
        climate_db,
    };
    TestApp {
        app: app(app_state),
    }
}

/// Serves a real SQLite file through the production data access layer
pub async fn spawn_app_with_dataset(path: &str) -> TestApp {
    let climate_db = ClimateAccess::new(Dataset::new(path));
    spawn_app(Arc::new(climate_db)).await
}

/// Sends a GET and returns the status with the raw body
pub async fn get(test_app: &TestApp, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get_json(test_app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(test_app, uri).await;
    let value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, value)
}

pub fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

/// Temporary SQLite file laid out like hawaii.sqlite, removed on drop
pub struct DatasetFixture {
    _dir: TempDir,
    pub path: String,
}

pub async fn create_dataset(measurements: &[Measurement], stations: &[&str]) -> DatasetFixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");
    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE measurement (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station TEXT,
            date TEXT,
            prcp FLOAT,
            tobs FLOAT
        )",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TABLE station (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station TEXT,
            name TEXT,
            latitude FLOAT,
            longitude FLOAT,
            elevation FLOAT
        )",
    )
    .execute(&mut conn)
    .await
    .unwrap();

    for m in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(m.station.as_str())
            .bind(m.date.as_str())
            .bind(m.prcp)
            .bind(m.tobs)
            .execute(&mut conn)
            .await
            .unwrap();
    }
    for station in stations {
        sqlx::query("INSERT INTO station (station, name) VALUES (?, ?)")
            .bind(*station)
            .bind(format!("{} station", station))
            .execute(&mut conn)
            .await
            .unwrap();
    }

    conn.close().await.unwrap();

    DatasetFixture {
        path: path.to_str().unwrap().to_string(),
        _dir: dir,
    }
}

/// SQLite file holding only the station table
pub async fn create_dataset_without_measurements() -> DatasetFixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");
    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::query("CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT)")
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();

    DatasetFixture {
        path: path.to_str().unwrap().to_string(),
        _dir: dir,
    }
}
