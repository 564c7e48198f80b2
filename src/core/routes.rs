//! Airline network extraction: selection, joins, visit counts and marker sizes.

use crate::core::geometry::{project_to_plane, route_polyline};
use crate::domain::model::{
    Airline, AirlineSelector, Airport, Datasets, JoinedRoute, PipelineWarning, Route,
    RouteGeometry, RouteMap, VisitedAirport,
};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

pub const MIN_MARKER_SIZE: f64 = 3.0;
pub const MARKER_SIZE_RANGE: f64 = 10.0;

/// Finds the airline to map. Names must match exactly one airline.
pub fn resolve_airline<'a>(airlines: &'a [Airline], selector: &AirlineSelector) -> Result<&'a Airline> {
    match selector {
        AirlineSelector::Id(id) => airlines
            .iter()
            .find(|airline| airline.airline_id == *id)
            .ok_or_else(|| EtlError::AirlineNotFound {
                name: selector.to_string(),
            }),
        AirlineSelector::Name(name) => {
            let matches: Vec<&Airline> = airlines.iter().filter(|a| &a.name == name).collect();
            match matches.as_slice() {
                [] => Err(EtlError::AirlineNotFound { name: name.clone() }),
                [airline] => Ok(*airline),
                many => Err(EtlError::AmbiguousAirline {
                    name: name.clone(),
                    ids: many.iter().map(|a| a.airline_id).collect(),
                }),
            }
        }
    }
}

pub fn filter_routes(routes: &[Route], airline_id: i64) -> Vec<&Route> {
    routes
        .iter()
        .filter(|route| route.airline_id == airline_id)
        .collect()
}

/// Inner join of routes against airports, once per endpoint.
pub fn join_airports(routes: &[&Route], airports: &[Airport]) -> Vec<JoinedRoute> {
    let mut by_id: HashMap<i64, &Airport> = HashMap::with_capacity(airports.len());
    for airport in airports {
        by_id.entry(airport.airport_id).or_insert(airport);
    }

    routes
        .iter()
        .filter_map(|route| {
            let departure = by_id.get(&route.source_airport_id)?;
            let arrival = by_id.get(&route.destination_airport_id)?;
            Some(JoinedRoute {
                route: (*route).clone(),
                departure: (*departure).clone(),
                arrival: (*arrival).clone(),
            })
        })
        .collect()
}

/// `round(3 + 10 * visits / max_visits)`, ties to even.
pub fn marker_size(visits: usize, max_visits: usize) -> u32 {
    if max_visits == 0 {
        return MIN_MARKER_SIZE as u32;
    }
    let scaled = MIN_MARKER_SIZE + MARKER_SIZE_RANGE * visits as f64 / max_visits as f64;
    scaled.round_ties_even() as u32
}

/// Airports that are the origin of at least one joined route, busiest first.
pub fn visited_airports(routes: &[JoinedRoute]) -> Vec<VisitedAirport> {
    let mut counts: HashMap<i64, (&Airport, usize)> = HashMap::new();
    for joined in routes {
        counts
            .entry(joined.departure.airport_id)
            .or_insert((&joined.departure, 0))
            .1 += 1;
    }

    let mut counted: Vec<(&Airport, usize)> = counts.into_values().collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.airport_id.cmp(&b.0.airport_id)));

    let max_visits = counted.first().map(|(_, visits)| *visits).unwrap_or(0);

    counted
        .into_iter()
        .map(|(airport, visits)| VisitedAirport {
            position: project_to_plane(airport.longitude, airport.latitude),
            size: marker_size(visits, max_visits),
            airport: airport.clone(),
            visits,
        })
        .collect()
}

pub fn route_geometries(routes: &[JoinedRoute], arc_points: usize) -> Vec<RouteGeometry> {
    routes
        .iter()
        .map(|joined| RouteGeometry {
            source_airport_id: joined.departure.airport_id,
            destination_airport_id: joined.arrival.airport_id,
            line: route_polyline(
                joined.departure.longitude,
                joined.departure.latitude,
                joined.arrival.longitude,
                joined.arrival.latitude,
                arc_points,
            ),
        })
        .collect()
}

/// Runs the whole transform for one airline.
pub fn build_route_map(
    datasets: &Datasets,
    selector: &AirlineSelector,
    arc_points: usize,
) -> Result<RouteMap> {
    let airline = resolve_airline(&datasets.airlines, selector)?;
    tracing::info!(
        "✈️  Selected airline '{}' (id {})",
        airline.name,
        airline.airline_id
    );

    let filtered = filter_routes(&datasets.routes, airline.airline_id);
    let routes = join_airports(&filtered, &datasets.airports);
    tracing::debug!(
        "{} routes for airline, {} with both airports known",
        filtered.len(),
        routes.len()
    );

    let mut warnings = Vec::new();
    if routes.is_empty() {
        let warning = PipelineWarning::EmptyResult {
            airline: airline.name.clone(),
        };
        tracing::warn!("⚠️  {}", warning);
        warnings.push(warning);
    }

    let visited = visited_airports(&routes);
    let geometries = route_geometries(&routes, arc_points);

    Ok(RouteMap {
        airline: airline.clone(),
        routes,
        visited,
        geometries,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(id: i64, code: &str, lon: f64, lat: f64) -> Airport {
        Airport {
            airport_id: id,
            name: format!("{} International", code),
            city: format!("{} City", code),
            country: "Testland".to_string(),
            iata: Some(code.to_string()),
            icao: None,
            latitude: lat,
            longitude: lon,
            altitude: 0.0,
        }
    }

    fn airline(id: i64, name: &str) -> Airline {
        Airline {
            airline_id: id,
            name: name.to_string(),
            iata: None,
            icao: None,
        }
    }

    fn route(airline_id: i64, from: i64, to: i64) -> Route {
        Route {
            airline: format!("L{}", airline_id),
            airline_id,
            source_airport: format!("A{}", from),
            source_airport_id: from,
            destination_airport: format!("A{}", to),
            destination_airport_id: to,
        }
    }

    // 3 airlines, 5 airports, 6 routes; "X" flies twice out of A1
    fn synthetic() -> Datasets {
        Datasets {
            airports: vec![
                airport(1, "A1", 2.55, 49.01),
                airport(2, "A2", -0.46, 51.47),
                airport(3, "A3", -73.78, 40.64),
                airport(4, "A4", 139.78, 35.55),
                airport(5, "A5", 28.81, 40.98),
            ],
            airlines: vec![airline(10, "X"), airline(20, "Y"), airline(30, "Z")],
            routes: vec![
                route(10, 1, 2),
                route(10, 1, 3),
                route(20, 2, 1),
                route(20, 3, 4),
                route(20, 4, 5),
                route(20, 5, 2),
            ],
        }
    }

    #[test]
    fn test_single_origin_airline() {
        let map = build_route_map(&synthetic(), &AirlineSelector::Name("X".into()), 10).unwrap();

        assert_eq!(map.airline.airline_id, 10);
        assert_eq!(map.routes.len(), 2);
        assert_eq!(map.visited.len(), 1);
        assert_eq!(map.visited[0].airport.iata.as_deref(), Some("A1"));
        assert_eq!(map.visited[0].visits, 2);
        assert_eq!(map.visited[0].size, 13);
        assert!(map.warnings.is_empty());
    }

    #[test]
    fn test_join_keeps_both_endpoints() {
        let data = synthetic();
        let filtered = filter_routes(&data.routes, 10);
        let joined = join_airports(&filtered, &data.airports);

        assert_eq!(joined[1].departure.airport_id, 1);
        assert_eq!(joined[1].arrival.airport_id, 3);
        assert_eq!(joined[1].arrival.city, "A3 City");
    }

    #[test]
    fn test_unresolved_airports_are_dropped() {
        let mut data = synthetic();
        data.routes.push(route(10, 1, 99));
        data.routes.push(route(10, 98, 2));

        let map = build_route_map(&data, &AirlineSelector::Id(10), 0).unwrap();
        assert_eq!(map.routes.len(), 2);
        assert_eq!(map.geometries.len(), 2);
    }

    #[test]
    fn test_marker_sizes() {
        let data = synthetic();
        // visits: A2 -> 1, A3 -> 2, A4 -> 4
        let plan = [(2, 1), (3, 1), (3, 5), (4, 1), (4, 2), (4, 3), (4, 5)];
        let routes: Vec<Route> = plan.iter().map(|&(from, to)| route(10, from, to)).collect();
        let refs: Vec<&Route> = routes.iter().collect();
        let visited = visited_airports(&join_airports(&refs, &data.airports));

        let visits: Vec<usize> = visited.iter().map(|v| v.visits).collect();
        assert_eq!(visits, vec![4, 2, 1]);

        let sizes: Vec<u32> = visited.iter().map(|v| v.size).collect();
        assert_eq!(sizes, vec![13, 8, 6]);
        assert!(visited.iter().all(|v| (3..=13).contains(&v.size)));
    }

    #[test]
    fn test_marker_size_is_non_decreasing() {
        let max = 37;
        let sizes: Vec<u32> = (1..=max).map(|v| marker_size(v, max)).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*sizes.last().unwrap(), 13);
        assert_eq!(marker_size(0, 0), 3);
    }

    #[test]
    fn test_visited_airports_are_projected() {
        let map = build_route_map(&synthetic(), &AirlineSelector::Name("X".into()), 0).unwrap();
        assert_eq!(map.visited[0].position, project_to_plane(2.55, 49.01));
    }

    #[test]
    fn test_unknown_airline_name() {
        let err = build_route_map(&synthetic(), &AirlineSelector::Name("W".into()), 10).unwrap_err();
        assert!(matches!(err, EtlError::AirlineNotFound { name } if name == "W"));
    }

    #[test]
    fn test_unknown_airline_id() {
        let err = build_route_map(&synthetic(), &AirlineSelector::Id(404), 10).unwrap_err();
        assert!(matches!(err, EtlError::AirlineNotFound { .. }));
    }

    #[test]
    fn test_ambiguous_airline_name() {
        let mut data = synthetic();
        data.airlines.push(airline(40, "Y"));

        let err = resolve_airline(&data.airlines, &AirlineSelector::Name("Y".into())).unwrap_err();
        assert!(matches!(err, EtlError::AmbiguousAirline { ids, .. } if ids == vec![20, 40]));

        let picked = resolve_airline(&data.airlines, &AirlineSelector::Id(40)).unwrap();
        assert_eq!(picked.airline_id, 40);
    }

    #[test]
    fn test_airline_without_routes_is_empty_not_error() {
        let map = build_route_map(&synthetic(), &AirlineSelector::Name("Z".into()), 10).unwrap();

        assert!(map.is_empty());
        assert!(map.visited.is_empty());
        assert!(map.geometries.is_empty());
        assert_eq!(
            map.warnings,
            vec![PipelineWarning::EmptyResult {
                airline: "Z".to_string()
            }]
        );
    }

    #[test]
    fn test_geometry_per_route() {
        let map = build_route_map(&synthetic(), &AirlineSelector::Name("Y".into()), 7).unwrap();
        assert_eq!(map.geometries.len(), 4);
        assert!(map.geometries.iter().all(|g| g.line.0.len() == 9));
        assert_eq!(map.geometries[0].source_airport_id, 2);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let data = synthetic();
        let selector = AirlineSelector::Name("Y".into());
        let first = build_route_map(&data, &selector, 25).unwrap();
        let second = build_route_map(&data, &selector, 25).unwrap();

        assert_eq!(first.visited, second.visited);
        assert_eq!(first.geometries, second.geometries);
    }
}
