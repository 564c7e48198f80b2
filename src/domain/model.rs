use geo::{Coord, LineString};
use serde::Serialize;
use std::fmt;

/// Planar (easting, northing) pair; `x` is easting, `y` is northing.
pub type ProjectedCoordinate = Coord<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub airport_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub airline: String,
    pub airline_id: i64,
    pub source_airport: String,
    pub source_airport_id: i64,
    pub destination_airport: String,
    pub destination_airport_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Airline {
    pub airline_id: i64,
    pub name: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

/// How the user picks the airline to map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirlineSelector {
    Name(String),
    Id(i64),
}

impl fmt::Display for AirlineSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirlineSelector::Name(name) => write!(f, "{}", name),
            AirlineSelector::Id(id) => write!(f, "airline #{}", id),
        }
    }
}

/// A route with both endpoints resolved (`_dep` / `_arr` sides).
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRoute {
    pub route: Route,
    pub departure: Airport,
    pub arrival: Airport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitedAirport {
    pub airport: Airport,
    pub visits: usize,
    pub position: ProjectedCoordinate,
    pub size: u32,
}

/// One summary-table row, flattened for CSV output.
#[derive(Debug, Clone, Serialize)]
pub struct VisitedAirportRow<'a> {
    pub airport_id: i64,
    pub name: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub iata: Option<&'a str>,
    pub icao: Option<&'a str>,
    pub visits: usize,
    pub size: u32,
    pub easting: f64,
    pub northing: f64,
}

impl<'a> From<&'a VisitedAirport> for VisitedAirportRow<'a> {
    fn from(visited: &'a VisitedAirport) -> Self {
        Self {
            airport_id: visited.airport.airport_id,
            name: &visited.airport.name,
            city: &visited.airport.city,
            country: &visited.airport.country,
            iata: visited.airport.iata.as_deref(),
            icao: visited.airport.icao.as_deref(),
            visits: visited.visits,
            size: visited.size,
            easting: visited.position.x,
            northing: visited.position.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub source_airport_id: i64,
    pub destination_airport_id: i64,
    pub line: LineString<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    /// The selected airline has no usable routes.
    EmptyResult { airline: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::EmptyResult { airline } => {
                write!(f, "no usable routes found for {}", airline)
            }
        }
    }
}

/// The three OpenFlights tables, as fetched.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub airports: Vec<Airport>,
    pub routes: Vec<Route>,
    pub airlines: Vec<Airline>,
}

/// Everything the renderer needs for one airline.
#[derive(Debug, Clone)]
pub struct RouteMap {
    pub airline: Airline,
    pub routes: Vec<JoinedRoute>,
    pub visited: Vec<VisitedAirport>,
    pub geometries: Vec<RouteGeometry>,
    pub warnings: Vec<PipelineWarning>,
}

impl RouteMap {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
