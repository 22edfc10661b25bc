//! Turns a mark's points into an SVG path string.
//!
//! Unclipped marks are drawn as one smoothed closed curve through their
//! points. Clipped marks go through the outline generator first, the
//! outline is unioned with itself to merge self-intersections, and each
//! resulting ring becomes its own closed sub-path.

pub mod outline;

use geo::{BooleanOps, BoundingRect, Contains, Coord, LineString, Polygon, Rect, coord};

use crate::options::Options;
use crate::stroke::Point;

/// Derive the path for `points` under `options`. Pure and deterministic.
///
/// Callers that derive paths for a mark should go through
/// [`Options::for_kind`] first (see [`crate::stroke::Mark::recompute`]).
pub fn compute_path(points: &[Point], options: &Options) -> String {
    if points.is_empty() {
        return String::new();
    }

    if options.clip {
        let outline = outline::stroke_outline(points, options);
        if outline.is_empty() {
            return smooth_closed_path(&to_coords(points));
        }
        flat_path_from_outline(&outline)
    } else {
        // Runs through the centerline, so this path has no width: only
        // `clip` affects it, and a straight stroke encloses no area.
        smooth_closed_path(&to_coords(points))
    }
}

fn to_coords(points: &[Point]) -> Vec<Coord<f64>> {
    points.iter().map(|p| coord! { x: p.x, y: p.y }).collect()
}

/// One closed quadratic curve through the midpoints of consecutive coordinates.
///
/// A single coordinate still yields a complete `Q` segment (onto itself),
/// so the result is always a closed, well-formed path.
pub fn smooth_closed_path(ring: &[Coord<f64>]) -> String {
    let Some(first) = ring.first() else {
        return String::new();
    };

    let mut d = Vec::with_capacity(ring.len() + 2);
    d.push(format!("M {} {} Q", num(first.x), num(first.y)));

    if ring.len() == 1 {
        d.push(format!(
            "{},{} {},{}",
            num(first.x),
            num(first.y),
            num(first.x),
            num(first.y)
        ));
    } else {
        for pair in ring.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            let mid = p0 + (p1 - p0) / 2.0;
            d.push(format!(
                "{},{} {},{}",
                num(p0.x),
                num(p0.y),
                num(mid.x),
                num(mid.y)
            ));
        }
    }

    d.push("Z".to_string());
    d.join(" ")
}

fn flat_path_from_outline(outline: &[Coord<f64>]) -> String {
    let finite = outline.iter().all(|c| c.x.is_finite() && c.y.is_finite());
    if outline.len() < 3 || !finite {
        return smooth_closed_path(outline);
    }

    let shape = Polygon::new(LineString::from(outline.to_vec()), vec![]);
    let merged = shape.union(&Polygon::new(LineString::new(vec![]), vec![]));
    if merged.0.is_empty() {
        return smooth_closed_path(outline);
    }

    merged
        .0
        .iter()
        .flat_map(|face| std::iter::once(face.exterior()).chain(face.interiors()))
        .map(|ring| smooth_closed_path(&ring.0))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a coordinate the way it should appear in a path (`-0` becomes `0`).
fn num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Bounding box of every coordinate mentioned in a path produced by [`compute_path`].
pub fn path_bounds(path: &str) -> Option<Rect<f64>> {
    let values: Vec<f64> = path
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|token| token.parse::<f64>().ok())
        .collect();

    let coords: Vec<Coord<f64>> = values
        .chunks_exact(2)
        .map(|pair| coord! { x: pair[0], y: pair[1] })
        .collect();

    LineString::from(coords).bounding_rect()
}

/// Segments each quadratic curve is flattened into.
const CURVE_STEPS: u32 = 4;

/// Flatten a path produced by [`compute_path`] back into rings, one per sub-path.
pub fn path_rings(path: &str) -> Vec<LineString<f64>> {
    let mut rings = Vec::new();
    let mut ring: Vec<Coord<f64>> = Vec::new();
    let mut tokens = path.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "M" => {
                let x = tokens.next().and_then(|t| t.parse::<f64>().ok());
                let y = tokens.next().and_then(|t| t.parse::<f64>().ok());
                if let (Some(x), Some(y)) = (x, y) {
                    ring = vec![coord! { x: x, y: y }];
                }
            }
            "Q" => {}
            "Z" => {
                if !ring.is_empty() {
                    rings.push(LineString::from(std::mem::take(&mut ring)));
                }
            }
            control => {
                let (Some(control), Some(end)) = (
                    parse_pair(control),
                    tokens.next().and_then(parse_pair),
                ) else {
                    continue;
                };
                let Some(&start) = ring.last() else {
                    continue;
                };
                ring.extend((1..=CURVE_STEPS).map(|step| {
                    let t = f64::from(step) / f64::from(CURVE_STEPS);
                    let u = 1.0 - t;
                    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
                }));
            }
        }
    }

    rings
}

/// Group the rings of a path into polygons. A ring starting inside an
/// earlier polygon becomes one of its holes.
pub fn path_polygons(path: &str) -> Vec<Polygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    for ring in path_rings(path) {
        let Some(&first) = ring.0.first() else {
            continue;
        };
        match polygons.iter_mut().find(|polygon| polygon.contains(&first)) {
            Some(polygon) => polygon.interiors_push(ring),
            None => polygons.push(Polygon::new(ring, vec![])),
        }
    }
    polygons
}

fn parse_pair(token: &str) -> Option<Coord<f64>> {
    let (x, y) = token.split_once(',')?;
    Some(coord! { x: x.parse().ok()?, y: y.parse().ok()? })
}
