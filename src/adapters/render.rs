//! Static HTML output: an inline SVG map of the network plus the airport table.

use crate::core::geometry::{map_bounds, SEMI_MAJOR_AXIS};
use crate::domain::model::{RouteMap, VisitedAirport, VisitedAirportRow};
use crate::utils::error::{EtlError, Result};
use geo::{Coord, Rect};

pub const DEFAULT_TILE_URL: &str = "https://maps.wikimedia.org/osm-intl/{Z}/{X}/{Y}@2x.png";
pub const DEFAULT_WIDTH: u32 = 1060;
pub const DEFAULT_HEIGHT: u32 = 800;

const ROUTE_COLOR: &str = "#1f77b4";
// Half the projected width of the world
const HALF_WORLD: f64 = std::f64::consts::PI * SEMI_MAJOR_AXIS;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub tile_url: Option<String>,
    pub tile_zoom: u8,
    pub route_opacity: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tile_url: Some(DEFAULT_TILE_URL.to_string()),
            tile_zoom: 2,
            route_opacity: 0.2,
        }
    }
}

/// Maps projected coordinates onto SVG pixels (y grows downwards).
struct Viewport {
    bounds: Rect<f64>,
    width: f64,
    height: f64,
}

impl Viewport {
    fn new(bounds: Rect<f64>, width: u32, height: u32) -> Self {
        Self {
            bounds,
            width: width as f64,
            height: height as f64,
        }
    }

    fn to_pixel(&self, c: Coord<f64>) -> (f64, f64) {
        let x = (c.x - self.bounds.min().x) / self.bounds.width() * self.width;
        let y = (self.bounds.max().y - c.y) / self.bounds.height() * self.height;
        (x, y)
    }

    /// 極點投影為無窮大，無法畫進 SVG
    fn to_drawable_pixel(&self, c: Coord<f64>) -> Option<(f64, f64)> {
        let (x, y) = self.to_pixel(c);
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn page_title(map: &RouteMap) -> String {
    format!("All registered routes for {}", map.airline.name)
}

/// Background tiles intersecting the view, as `<image>` elements.
fn render_tiles(viewport: &Viewport, template: &str, zoom: u8) -> String {
    let count = 1u32 << zoom;
    let tile_size = 2.0 * HALF_WORLD / count as f64;
    let bounds = viewport.bounds;
    let last = count as i64 - 1;

    let clamp = |v: f64| (v as i64).clamp(0, last);
    let x_first = clamp(((bounds.min().x + HALF_WORLD) / tile_size).floor());
    let x_last = clamp(((bounds.max().x + HALF_WORLD) / tile_size).ceil() - 1.0);
    let y_first = clamp(((HALF_WORLD - bounds.max().y) / tile_size).floor());
    let y_last = clamp(((HALF_WORLD - bounds.min().y) / tile_size).ceil() - 1.0);

    let mut out = String::new();
    for ty in y_first..=y_last {
        for tx in x_first..=x_last {
            let top_left = Coord {
                x: -HALF_WORLD + tx as f64 * tile_size,
                y: HALF_WORLD - ty as f64 * tile_size,
            };
            let bottom_right = Coord {
                x: top_left.x + tile_size,
                y: top_left.y - tile_size,
            };
            let (x0, y0) = viewport.to_pixel(top_left);
            let (x1, y1) = viewport.to_pixel(bottom_right);
            let href = template
                .replace("{Z}", &zoom.to_string())
                .replace("{X}", &tx.to_string())
                .replace("{Y}", &ty.to_string());
            out.push_str(&format!(
                "<image href=\"{}\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" preserveAspectRatio=\"none\"/>\n",
                escape_html(&href),
                x0,
                y0,
                x1 - x0,
                y1 - y0
            ));
        }
    }
    out
}

fn render_svg(map: &RouteMap, options: &RenderOptions) -> String {
    let viewport = Viewport::new(map_bounds(), options.width, options.height);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = options.width,
        h = options.height
    );
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#dfe9f2\"/>\n");

    if let Some(template) = &options.tile_url {
        svg.push_str("<g class=\"tiles\">\n");
        svg.push_str(&render_tiles(&viewport, template, options.tile_zoom));
        svg.push_str("</g>\n");
    }

    svg.push_str(&format!(
        "<g class=\"routes\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"1\">\n",
        ROUTE_COLOR, options.route_opacity
    ));
    for geometry in &map.geometries {
        let points: Vec<String> = geometry
            .line
            .coords()
            .filter_map(|c| viewport.to_drawable_pixel(*c))
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect();
        if points.len() < 2 {
            continue;
        }
        svg.push_str(&format!("<polyline points=\"{}\"/>\n", points.join(" ")));
    }
    svg.push_str("</g>\n");

    svg.push_str(&format!(
        "<g class=\"airports\" fill=\"{}\" fill-opacity=\"0.8\" stroke=\"{}\">\n",
        ROUTE_COLOR, ROUTE_COLOR
    ));
    for visited in &map.visited {
        let Some((cx, cy)) = viewport.to_drawable_pixel(visited.position) else {
            tracing::debug!("Skipping marker for {}: not drawable", visited.airport.name);
            continue;
        };
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\"><title>{} ({}): {}</title></circle>\n",
            cx,
            cy,
            visited.size as f64 / 2.0,
            escape_html(&visited.airport.name),
            escape_html(&visited.airport.city),
            visited.visits
        ));
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

fn render_table(visited: &[VisitedAirport]) -> String {
    let mut table = String::from(
        "<table>\n<thead><tr><th>Airport</th><th class=\"city\">City</th><th class=\"count\">Count</th></tr></thead>\n<tbody>\n",
    );
    for row in visited {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"count\">{}</td></tr>\n",
            escape_html(&row.airport.name),
            escape_html(&row.airport.city),
            row.visits
        ));
    }
    table.push_str("</tbody>\n</table>\n");
    table
}

/// Renders the whole page. An empty map still yields a valid document.
pub fn render_html(map: &RouteMap, options: &RenderOptions) -> String {
    let title = escape_html(&page_title(map));
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(
        "<style>\n\
body { font-family: sans-serif; margin: 16px; }\n\
.layout { display: flex; gap: 16px; align-items: flex-start; }\n\
table { border-collapse: collapse; width: 500px; font-size: 13px; }\n\
th, td { border-bottom: 1px solid #ddd; padding: 4px 6px; text-align: left; }\n\
th.city, th.count { width: 100px; }\n\
td.count { text-align: right; }\n\
</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str("<div class=\"layout\">\n<div class=\"map\">\n");
    html.push_str(&render_svg(map, options));
    html.push_str("</div>\n<div class=\"table\">\n");
    html.push_str(&render_table(&map.visited));
    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    html
}

/// The visited-airport table as CSV, in table order.
pub fn render_summary_csv(visited: &[VisitedAirport]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for airport in visited {
        writer.serialize(VisitedAirportRow::from(airport))?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::project_to_plane;
    use crate::domain::model::{Airline, Airport, RouteGeometry};
    use geo::LineString;

    fn airport(id: i64, name: &str, city: &str) -> Airport {
        Airport {
            airport_id: id,
            name: name.to_string(),
            city: city.to_string(),
            country: "France".to_string(),
            iata: Some("CDG".to_string()),
            icao: None,
            latitude: 49.0,
            longitude: 2.5,
            altitude: 392.0,
        }
    }

    fn route_map(visited: Vec<VisitedAirport>, geometries: Vec<RouteGeometry>) -> RouteMap {
        RouteMap {
            airline: Airline {
                airline_id: 137,
                name: "Air <France>".to_string(),
                iata: Some("AF".to_string()),
                icao: Some("AFR".to_string()),
            },
            routes: vec![],
            visited,
            geometries,
            warnings: vec![],
        }
    }

    fn visited(id: i64, name: &str, visits: usize, size: u32) -> VisitedAirport {
        VisitedAirport {
            airport: airport(id, name, "Paris"),
            visits,
            position: project_to_plane(2.5, 49.0),
            size,
        }
    }

    #[test]
    fn test_empty_map_is_valid_document() {
        let html = render_html(&route_map(vec![], vec![]), &RenderOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("All registered routes for Air &lt;France&gt;"));
        assert!(!html.contains("<circle"));
        assert!(!html.contains("<polyline"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_polar_airport_is_listed_but_not_drawn() {
        let mut pole = visited(3, "South Pole Station", 1, 6);
        pole.airport.latitude = -90.0;
        pole.position = project_to_plane(0.0, -90.0);
        let line = LineString::new(vec![
            project_to_plane(0.0, -90.0),
            project_to_plane(10.0, -80.0),
            project_to_plane(20.0, -70.0),
        ]);
        let map = route_map(
            vec![visited(1, "Charles de Gaulle", 2, 13), pole],
            vec![RouteGeometry {
                source_airport_id: 3,
                destination_airport_id: 1,
                line,
            }],
        );

        let html = render_html(&map, &RenderOptions::default());
        assert!(!html.contains("inf"));
        assert!(!html.contains("NaN"));
        assert_eq!(html.matches("<circle").count(), 1);
        assert_eq!(html.matches("<polyline").count(), 1);
        assert!(html.contains("<td>South Pole Station</td>"));
    }

    #[test]
    fn test_markers_lines_and_table() {
        let line = LineString::new(vec![project_to_plane(2.5, 49.0), project_to_plane(-73.8, 40.6)]);
        let map = route_map(
            vec![visited(1, "Charles de Gaulle", 4, 13), visited(2, "Orly & Co", 1, 6)],
            vec![RouteGeometry {
                source_airport_id: 1,
                destination_airport_id: 3,
                line,
            }],
        );
        let html = render_html(&map, &RenderOptions::default());

        assert_eq!(html.matches("<circle").count(), 2);
        assert_eq!(html.matches("<polyline").count(), 1);
        assert!(html.contains("r=\"6.5\""));
        assert!(html.contains("stroke-opacity=\"0.2\""));
        assert!(html.contains("<td>Orly &amp; Co</td>"));

        let first = html.find("<td>Charles de Gaulle</td>").unwrap();
        let second = html.find("<td>Orly &amp; Co</td>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_viewport_corners() {
        let viewport = Viewport::new(map_bounds(), 1060, 800);
        let (x, y) = viewport.to_pixel(project_to_plane(-180.0, 70.0));
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
        let (x, y) = viewport.to_pixel(project_to_plane(180.0, -66.0));
        assert!((x - 1060.0).abs() < 1e-6 && (y - 800.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiles_cover_world_at_zoom_two() {
        let html = render_html(&route_map(vec![], vec![]), &RenderOptions::default());
        // 4 columns, rows 0..=2 (row 3 lies south of 66S)
        assert_eq!(html.matches("<image ").count(), 12);
        assert!(html.contains("osm-intl/2/3/1@2x.png"));

        let no_tiles = RenderOptions {
            tile_url: None,
            ..RenderOptions::default()
        };
        let html = render_html(&route_map(vec![], vec![]), &no_tiles);
        assert!(!html.contains("<image "));
    }

    #[test]
    fn test_summary_csv() {
        let rows = vec![visited(1, "Charles de Gaulle", 4, 13)];
        let csv = String::from_utf8(render_summary_csv(&rows).unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("airport_id,name,city,country,iata,icao,visits,size,easting,northing")
        );
        assert!(lines.next().unwrap().starts_with("1,Charles de Gaulle,Paris,France,CDG,,4,13,"));
    }
}
