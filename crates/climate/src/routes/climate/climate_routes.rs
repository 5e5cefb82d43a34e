use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::{error, info};
use std::{collections::HashMap, sync::Arc};

use crate::{
    most_active_station_tobs, AppState, DateRange, Error, PrecipitationReading,
    TemperatureObservation, TemperatureStats,
};

fn internal_error(err: Error) -> (StatusCode, String) {
    error!("error querying climate dataset: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to query climate dataset: {}", err),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "One single-key object per measurement row, mapping its date to precipitation (null when not recorded)", content_type = "application/json", body = Vec<HashMap<String, f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PrecipitationReading>>, (StatusCode, String)> {
    let readings = state
        .climate_db
        .precipitation()
        .await
        .map_err(internal_error)?;
    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Identifier of every row in the station table", content_type = "application/json", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let stations = state.climate_db.stations().await.map_err(internal_error)?;
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station over the last year of data, empty when the dataset has no measurements", content_type = "application/json", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, (StatusCode, String)> {
    match most_active_station_tobs(state.climate_db.as_ref()).await {
        Ok(observations) => Ok(Json(observations)),
        Err(Error::EmptyResult(table)) => {
            info!("no rows in {}, returning empty tobs", table);
            Ok(Json(vec![]))
        }
        Err(e) => Err(internal_error(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, max and average temperature for every date on or after start, empty when nothing matched", content_type = "application/json", body = Vec<TemperatureStats>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, (StatusCode, String)> {
    temperature_summary(&state, DateRange::starting(start)).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, max and average temperature between start and end inclusive, empty when nothing matched", content_type = "application/json", body = Vec<TemperatureStats>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>, (StatusCode, String)> {
    temperature_summary(&state, DateRange::between(start, end)).await
}

// Dates are compared as strings and never validated, malformed input is not rejected
async fn temperature_summary(
    state: &AppState,
    range: DateRange,
) -> Result<Json<Vec<TemperatureStats>>, (StatusCode, String)> {
    let stats = state
        .climate_db
        .temperature_stats(&range)
        .await
        .map_err(internal_error)?;
    Ok(Json(stats.into_iter().collect()))
}
