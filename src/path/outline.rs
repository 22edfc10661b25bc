//! Variable-width outline around a freehand stroke.
//!
//! The input points are first streamlined (each sample is pulled toward
//! the previous one) and tagged with direction and running length. The
//! outline then walks those points, offsetting left and right by a radius
//! that depends on pressure (real or simulated from speed), and closes the
//! shape with round caps. Sharp turns get a half-circle of points so the
//! outline doesn't fold over itself.

use std::f64::consts::PI;

use geo::{Coord, coord};

use crate::options::Options;
use crate::stroke::Point;

const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;
const FIXED_PI: f64 = PI + 0.0001;
const CORNER_STEPS: u32 = 13;
const END_CAP_STEPS: u32 = 29;
/// Points closer than this to the end of the stroke are skipped.
const END_NOISE_LENGTH: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
struct StrokePoint {
    point: Coord<f64>,
    pressure: f64,
    /// Unit vector pointing back toward the previous point.
    vector: Coord<f64>,
    distance: f64,
    running_length: f64,
}

/// Outline polygon (not closed) for `points` under `options`.
pub fn stroke_outline(points: &[Point], options: &Options) -> Vec<Coord<f64>> {
    let stroke = stroke_points(points, options);
    outline_points(&stroke, options)
}

fn stroke_points(points: &[Point], options: &Options) -> Vec<StrokePoint> {
    let t = 0.15 + (1.0 - options.streamline) * 0.85;

    let mut samples: Vec<(Coord<f64>, f64)> = points
        .iter()
        .map(|p| (coord! { x: p.x, y: p.y }, p.pressure))
        .collect();

    match samples.len() {
        0 => return Vec::new(),
        1 => {
            let (point, pressure) = samples[0];
            samples.push((point + coord! { x: 1.0, y: 1.0 }, pressure));
        }
        2 => {
            // Too few samples to streamline; fill in between.
            let (start, start_pressure) = samples[0];
            let (end, end_pressure) = samples[1];
            samples.truncate(1);
            for i in 1..5 {
                let t = f64::from(i) / 4.0;
                samples.push((
                    lrp(start, end, t),
                    start_pressure + (end_pressure - start_pressure) * t,
                ));
            }
        }
        _ => {}
    }

    let (first, first_pressure) = samples[0];
    let mut result = vec![StrokePoint {
        point: first,
        pressure: if first_pressure >= 0.0 { first_pressure } else { 0.25 },
        vector: coord! { x: 1.0, y: 1.0 },
        distance: 0.0,
        running_length: 0.0,
    }];

    let max = samples.len() - 1;
    let mut running_length = 0.0;
    let mut has_reached_minimum_length = false;

    for (i, &(target, pressure)) in samples.iter().enumerate().skip(1) {
        let prev = result[result.len() - 1];
        let point = lrp(prev.point, target, t);
        if point == prev.point {
            continue;
        }

        let distance = dist(point, prev.point);
        running_length += distance;

        if i < max && !has_reached_minimum_length {
            if running_length < options.size {
                continue;
            }
            has_reached_minimum_length = true;
        }

        result.push(StrokePoint {
            point,
            pressure: if pressure >= 0.0 { pressure } else { 0.5 },
            vector: uni(prev.point - point),
            distance,
            running_length,
        });
    }

    result[0].vector = result
        .get(1)
        .map_or(coord! { x: 0.0, y: 0.0 }, |next| next.vector);

    result
}

fn outline_points(points: &[StrokePoint], options: &Options) -> Vec<Coord<f64>> {
    let size = options.size;
    if points.is_empty() || size <= 0.0 {
        return Vec::new();
    }

    let n = points.len();
    let total_length = points[n - 1].running_length;
    let min_distance = (size * options.smoothing).powi(2);

    let mut left = Vec::new();
    let mut right = Vec::new();

    let mut prev_pressure = points.iter().take(10).fold(points[0].pressure, |acc, curr| {
        let pressure = if options.simulate_pressure {
            simulated_pressure(acc, curr.distance, size)
        } else {
            curr.pressure
        };
        (acc + pressure) / 2.0
    });

    let mut radius = stroke_radius(size, options.thinning, points[n - 1].pressure);
    let mut first_radius = None;
    let mut prev_vector = points[0].vector;
    let mut pl = points[0].point;
    let mut pr = pl;
    let mut is_prev_point_sharp_corner = false;

    for (i, current) in points.iter().enumerate() {
        let StrokePoint {
            mut pressure,
            point,
            vector,
            distance,
            running_length,
        } = *current;

        if i < n - 1 && total_length - running_length < END_NOISE_LENGTH {
            continue;
        }

        if options.thinning != 0.0 {
            if options.simulate_pressure {
                pressure = simulated_pressure(prev_pressure, distance, size);
            }
            radius = stroke_radius(size, options.thinning, pressure);
        } else {
            radius = size / 2.0;
        }
        radius = radius.max(0.01);
        first_radius.get_or_insert(radius);

        let next_vector = if i < n - 1 { points[i + 1].vector } else { vector };
        let next_dpr = if i < n - 1 { dpr(vector, next_vector) } else { 1.0 };
        let prev_dpr = dpr(vector, prev_vector);

        let is_point_sharp_corner = prev_dpr < 0.0 && !is_prev_point_sharp_corner;
        let is_next_point_sharp_corner = next_dpr < 0.0;

        if is_point_sharp_corner || is_next_point_sharp_corner {
            let offset = per(prev_vector) * radius;
            for step in 0..=CORNER_STEPS {
                let t = f64::from(step) / f64::from(CORNER_STEPS);
                pl = rot_around(point - offset, point, FIXED_PI * t);
                left.push(pl);
                pr = rot_around(point + offset, point, -FIXED_PI * t);
                right.push(pr);
            }
            if is_next_point_sharp_corner {
                is_prev_point_sharp_corner = true;
            }
            continue;
        }

        is_prev_point_sharp_corner = false;

        if i == n - 1 {
            let offset = per(vector) * radius;
            left.push(point - offset);
            right.push(point + offset);
            continue;
        }

        let offset = per(lrp(next_vector, vector, next_dpr)) * radius;

        let tl = point - offset;
        if i <= 1 || dist2(pl, tl) > min_distance {
            left.push(tl);
            pl = tl;
        }

        let tr = point + offset;
        if i <= 1 || dist2(pr, tr) > min_distance {
            right.push(tr);
            pr = tr;
        }

        prev_pressure = pressure;
        prev_vector = vector;
    }

    let first_point = points[0].point;
    let last_point = if n > 1 {
        points[n - 1].point
    } else {
        first_point + coord! { x: 1.0, y: 1.0 }
    };

    if n == 1 {
        // A dot: a full circle around the only point.
        let r = first_radius.unwrap_or(radius);
        let start = prj(first_point, uni(per(first_point - last_point)), -r);
        return (1..=CORNER_STEPS)
            .map(|step| {
                let t = f64::from(step) / f64::from(CORNER_STEPS);
                rot_around(start, first_point, FIXED_PI * 2.0 * t)
            })
            .collect();
    }

    let start_cap: Vec<Coord<f64>> = match right.first() {
        Some(&first_right) => (0..=CORNER_STEPS)
            .map(|step| {
                let t = f64::from(step) / f64::from(CORNER_STEPS);
                rot_around(first_right, first_point, FIXED_PI * t)
            })
            .collect(),
        None => Vec::new(),
    };

    let direction = per(-points[n - 1].vector);
    let end_start = prj(last_point, direction, radius);
    let end_cap = (1..END_CAP_STEPS).map(|step| {
        let t = f64::from(step) / f64::from(END_CAP_STEPS);
        rot_around(end_start, last_point, FIXED_PI * 3.0 * t)
    });

    left.extend(end_cap);
    left.extend(right.into_iter().rev());
    left.extend(start_cap);
    left
}

fn simulated_pressure(prev_pressure: f64, distance: f64, size: f64) -> f64 {
    let sp = (distance / size).min(1.0);
    let rp = (1.0 - sp).min(1.0);
    (prev_pressure + (rp - prev_pressure) * (sp * RATE_OF_PRESSURE_CHANGE)).min(1.0)
}

fn stroke_radius(size: f64, thinning: f64, pressure: f64) -> f64 {
    size * (0.5 - thinning * (0.5 - pressure))
}

fn per(a: Coord<f64>) -> Coord<f64> {
    coord! { x: a.y, y: -a.x }
}

fn dpr(a: Coord<f64>, b: Coord<f64>) -> f64 {
    a.x * b.x + a.y * b.y
}

fn uni(a: Coord<f64>) -> Coord<f64> {
    a / a.x.hypot(a.y)
}

fn lrp(a: Coord<f64>, b: Coord<f64>, t: f64) -> Coord<f64> {
    a + (b - a) * t
}

fn prj(a: Coord<f64>, b: Coord<f64>, c: f64) -> Coord<f64> {
    a + b * c
}

fn dist2(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}

fn dist(a: Coord<f64>, b: Coord<f64>) -> f64 {
    dist2(a, b).sqrt()
}

fn rot_around(a: Coord<f64>, c: Coord<f64>, r: f64) -> Coord<f64> {
    let (s, co) = r.sin_cos();
    let p = a - c;
    coord! {
        x: p.x * co - p.y * s + c.x,
        y: p.x * s + p.y * co + c.y,
    }
}
