use airline_routes::adapters::http::{parse_airlines, parse_airports, parse_routes};
use airline_routes::core::geometry::project_to_plane;
use airline_routes::core::routes::build_route_map;
use airline_routes::domain::model::{AirlineSelector, Datasets};
use airline_routes::utils::error::EtlError;

// 3 airlines, 5 airports, 6 routes. Airline X flies A1 -> A2 and A1 -> A3.
const AIRPORTS: &str = "1,\"Alpha\",\"Aville\",\"Testland\",\"AA1\",\"TAA1\",10.0,20.0,100
2,\"Bravo\",\"Bville\",\"Testland\",\"AA2\",\"TAA2\",-10.0,30.0,200
3,\"Charlie\",\"Cville\",\"Testland\",\"AA3\",\"TAA3\",45.0,-60.0,300
4,\"Delta\",\"Dville\",\"Testland\",\"AA4\",\"TAA4\",0.0,0.0,0
5,\"Echo\",\"Eville\",\"Testland\",\"AA5\",\"TAA5\",-33.9,151.2,20
";

const ROUTES: &str = "XX,1,AA1,1,AA2,2,,0,320
XX,1,AA1,1,AA3,3,,0,320
YY,2,AA2,2,AA1,1,,0,320
YY,2,AA4,4,AA5,5,,0,320
ZZ,3,AA5,5,AA4,4,,0,320
ZZ,3,AA3,3,AA2,2,,0,320
";

const AIRLINES: &str = "1,\"X\",\\N,\"XX\",\"XXX\",\"EX\",\"Testland\",\"Y\"
2,\"Y\",\\N,\"YY\",\"YYY\",\"WHY\",\"Testland\",\"Y\"
3,\"Z\",\\N,\"ZZ\",\"ZZZ\",\"ZED\",\"Testland\",\"N\"
";

fn datasets() -> Datasets {
    Datasets {
        airports: parse_airports(AIRPORTS.as_bytes()).unwrap(),
        routes: parse_routes(ROUTES.as_bytes()).unwrap(),
        airlines: parse_airlines(AIRLINES.as_bytes()).unwrap(),
    }
}

#[test]
fn test_only_departure_airports_are_visited() {
    let map = build_route_map(&datasets(), &AirlineSelector::Name("X".to_string()), 50).unwrap();

    assert_eq!(map.visited.len(), 1);
    let alpha = &map.visited[0];
    assert_eq!(alpha.airport.iata.as_deref(), Some("AA1"));
    assert_eq!(alpha.visits, 2);
    assert_eq!(alpha.size, 13);
    assert_eq!(alpha.position, project_to_plane(20.0, 10.0));

    assert_eq!(map.geometries.len(), 2);
    for geometry in &map.geometries {
        assert_eq!(geometry.line.0.len(), 52);
        assert_eq!(geometry.line.0[0], project_to_plane(20.0, 10.0));
    }
    assert_eq!(map.geometries[1].line.0[51], project_to_plane(-60.0, 45.0));
}

#[test]
fn test_route_map_is_deterministic() {
    let data = datasets();
    let selector = AirlineSelector::Name("Z".to_string());

    let first = build_route_map(&data, &selector, 30).unwrap();
    let second = build_route_map(&data, &selector, 30).unwrap();

    assert_eq!(first.routes, second.routes);
    assert_eq!(first.visited, second.visited);
    assert_eq!(first.geometries, second.geometries);
}

#[test]
fn test_unknown_airline() {
    let err = build_route_map(&datasets(), &AirlineSelector::Name("Q".to_string()), 5).unwrap_err();
    assert!(matches!(err, EtlError::AirlineNotFound { .. }));
}
