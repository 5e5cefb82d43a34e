use async_trait::async_trait;
use log::debug;
use time::{macros::format_description, Date, Duration};

use super::{
    Column, Dataset, DateRange, Error, PrecipitationReading, Predicate, Station, Table,
    TemperatureObservation, TemperatureStats,
};

/// Number of calendar dates, counting the most recent one, covered by `/tobs`
pub const TOBS_WINDOW_DAYS: i64 = 366;

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Every (date, prcp) row, one entry per row
    async fn precipitation(&self) -> Result<Vec<PrecipitationReading>, Error>;
    /// Every row of the station table, repeats included
    async fn stations(&self) -> Result<Vec<String>, Error>;
    async fn most_active_station(&self) -> Result<String, Error>;
    async fn most_recent_date(&self) -> Result<String, Error>;
    async fn station_observations(
        &self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// `None` when no measurement falls in the range
    async fn temperature_stats(&self, range: &DateRange)
        -> Result<Option<TemperatureStats>, Error>;
}

pub struct ClimateAccess {
    dataset: Dataset,
}

impl ClimateAccess {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation(&self) -> Result<Vec<PrecipitationReading>, Error> {
        self.dataset
            .query_all(Table::Measurement, &[Column::Date, Column::Precipitation])
            .await
    }

    async fn stations(&self) -> Result<Vec<String>, Error> {
        let stations: Vec<Station> = self
            .dataset
            .query_all(Table::Station, &[Column::Station])
            .await?;
        Ok(stations.into_iter().map(|s| s.station).collect())
    }

    async fn most_active_station(&self) -> Result<String, Error> {
        self.dataset
            .most_active_station()
            .await?
            .ok_or_else(|| Error::EmptyResult(Table::Measurement.as_sql().to_string()))
    }

    async fn most_recent_date(&self) -> Result<String, Error> {
        self.dataset
            .most_recent_date()
            .await?
            .ok_or_else(|| Error::EmptyResult(Table::Measurement.as_sql().to_string()))
    }

    async fn station_observations(
        &self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        self.dataset
            .query_filtered(
                Table::Measurement,
                &[Column::Date, Column::TemperatureObservation],
                &[
                    Predicate::StationEquals(station.to_owned()),
                    Predicate::DateFrom(since.to_owned()),
                ],
            )
            .await
    }

    async fn temperature_stats(
        &self,
        range: &DateRange,
    ) -> Result<Option<TemperatureStats>, Error> {
        let aggregate = self.dataset.aggregate(&range.predicates()).await?;
        Ok(TemperatureStats::from_aggregate(aggregate))
    }
}

/// First date of the `/tobs` window that ends on `most_recent`
pub fn tobs_window_start(most_recent: &str) -> Result<String, Error> {
    let format = format_description!("[year]-[month]-[day]");
    let latest = Date::parse(most_recent, &format)?;
    let start = latest
        .checked_sub(Duration::days(TOBS_WINDOW_DAYS - 1))
        .ok_or_else(|| Error::DateRange(most_recent.to_owned()))?;
    Ok(start.format(&format)?)
}

/// Temperature observations of the most active station over the last year of data.
///
/// The year is measured back from the latest date in the whole dataset, not from the
/// station's own latest reading.
pub async fn most_active_station_tobs(
    climate_db: &dyn ClimateData,
) -> Result<Vec<TemperatureObservation>, Error> {
    let station = climate_db.most_active_station().await?;
    let most_recent = climate_db.most_recent_date().await?;
    let since = tobs_window_start(&most_recent)?;
    debug!(
        "most active station {}, observations since {} (latest {})",
        station, since, most_recent
    );
    climate_db.station_observations(&station, &since).await
}
