//! OpenFlights dataset access: HTTP fetch, optional on-disk cache, CSV parsing.

use crate::adapters::storage::LocalStorage;
use crate::domain::model::{Airline, Airport, Route};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, StringRecord};
use reqwest::Client;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat";
pub const ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";
pub const AIRLINES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airlines.dat";

/// OpenFlights marker for a missing value.
pub const MISSING: &str = "\\N";

/// Dataset bodies stored under a directory, one file per URL.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    storage: LocalStorage,
}

impl DatasetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: LocalStorage::new(dir),
        }
    }

    pub fn key(url: &str) -> String {
        url.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    pub async fn load(&self, url: &str) -> Result<Option<Vec<u8>>> {
        match self.storage.read_file(&Self::key(url)).await {
            Ok(data) => Ok(Some(data)),
            Err(EtlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn store(&self, url: &str, data: &[u8]) -> Result<()> {
        self.storage.write_file(&Self::key(url), data).await
    }
}

pub struct DatasetClient {
    client: Client,
    cache: Option<DatasetCache>,
    timeout: Option<Duration>,
}

impl DatasetClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            cache: None,
            timeout: None,
        }
    }

    pub fn with_cache(mut self, cache: DatasetCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(cache) = &self.cache {
            if let Some(data) = cache.load(url).await? {
                tracing::debug!("Cache hit for {} ({} bytes)", url, data.len());
                return Ok(data);
            }
        }

        tracing::debug!("Making request to: {}", url);
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await?.to_vec();
        if let Some(cache) = &self.cache {
            cache.store(url, &data).await?;
        }
        Ok(data)
    }

    pub async fn fetch_airports(&self, url: &str) -> Result<Vec<Airport>> {
        let airports = parse_airports(&self.fetch_bytes(url).await?)?;
        tracing::info!("📥 Loaded {} airports", airports.len());
        Ok(airports)
    }

    pub async fn fetch_routes(&self, url: &str) -> Result<Vec<Route>> {
        let routes = parse_routes(&self.fetch_bytes(url).await?)?;
        tracing::info!("📥 Loaded {} routes", routes.len());
        Ok(routes)
    }

    pub async fn fetch_airlines(&self, url: &str) -> Result<Vec<Airline>> {
        let airlines = parse_airlines(&self.fetch_bytes(url).await?)?;
        tracing::info!("📥 Loaded {} airlines", airlines.len());
        Ok(airlines)
    }
}

impl Default for DatasetClient {
    fn default() -> Self {
        Self::new()
    }
}

fn records(data: &[u8]) -> csv::StringRecordsIntoIter<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data)
        .into_records()
}

fn parse_error(dataset: &str, record: &StringRecord, message: String) -> EtlError {
    EtlError::ParseError {
        dataset: dataset.to_string(),
        line: record.position().map(|p| p.line()).unwrap_or(0),
        message,
    }
}

fn field<'r>(dataset: &str, record: &'r StringRecord, index: usize) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| parse_error(dataset, record, format!("missing column {}", index)))
}

fn number<T>(dataset: &str, record: &StringRecord, index: usize) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = field(dataset, record, index)?;
    raw.trim().parse().map_err(|e| {
        parse_error(
            dataset,
            record,
            format!("column {} value '{}': {}", index, raw, e),
        )
    })
}

fn code(value: &str) -> Option<String> {
    if value.is_empty() || value == MISSING {
        None
    } else {
        Some(value.to_string())
    }
}

/// `id, name, city, country, IATA, ICAO, latitude, longitude, altitude, ...`
pub fn parse_airports(data: &[u8]) -> Result<Vec<Airport>> {
    const DATASET: &str = "airports";
    let mut airports = Vec::new();

    for result in records(data) {
        let record = result?;
        airports.push(Airport {
            airport_id: number(DATASET, &record, 0)?,
            name: field(DATASET, &record, 1)?.to_string(),
            city: field(DATASET, &record, 2)?.to_string(),
            country: field(DATASET, &record, 3)?.to_string(),
            iata: code(field(DATASET, &record, 4)?),
            icao: code(field(DATASET, &record, 5)?),
            latitude: number(DATASET, &record, 6)?,
            longitude: number(DATASET, &record, 7)?,
            altitude: number(DATASET, &record, 8)?,
        });
    }

    Ok(airports)
}

/// `airline, airline_id, source, source_id, destination, destination_id, ...`
///
/// Rows with a missing value in any of those six columns are skipped.
pub fn parse_routes(data: &[u8]) -> Result<Vec<Route>> {
    const DATASET: &str = "routes";
    let mut routes = Vec::new();
    let mut skipped = 0usize;

    for result in records(data) {
        let record = result?;
        let incomplete = (0..6).any(|i| {
            record
                .get(i)
                .map_or(true, |value| value.is_empty() || value == MISSING)
        });
        if incomplete {
            skipped += 1;
            continue;
        }

        routes.push(Route {
            airline: field(DATASET, &record, 0)?.to_string(),
            airline_id: number(DATASET, &record, 1)?,
            source_airport: field(DATASET, &record, 2)?.to_string(),
            source_airport_id: number(DATASET, &record, 3)?,
            destination_airport: field(DATASET, &record, 4)?.to_string(),
            destination_airport_id: number(DATASET, &record, 5)?,
        });
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} routes with missing fields", skipped);
    }
    Ok(routes)
}

/// Columns 0, 1, 3, 4: `id, name, IATA, ICAO`.
pub fn parse_airlines(data: &[u8]) -> Result<Vec<Airline>> {
    const DATASET: &str = "airlines";
    let mut airlines = Vec::new();

    for result in records(data) {
        let record = result?;
        airlines.push(Airline {
            airline_id: number(DATASET, &record, 0)?,
            name: field(DATASET, &record, 1)?.to_string(),
            iata: code(field(DATASET, &record, 3)?),
            icao: code(field(DATASET, &record, 4)?),
        });
    }

    Ok(airlines)
}
