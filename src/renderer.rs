// src/renderer.rs
use eframe::egui::{self, Color32, Mesh, Pos2, Rect, Shape, Stroke};
use geo::{LineString, Polygon, TriangulateEarcut};

use crate::path::path_polygons;
use crate::state::Session;
use crate::stroke::Mark;

/// Draws the session's marks onto the canvas.
#[derive(Debug)]
pub struct Renderer {
    /// Width of the line drawn around each filled path
    outline_width: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { outline_width: 1.0 }
    }

    /// Renders the committed marks, then the mark being drawn on top.
    ///
    /// Args:
    ///     painter (egui::Painter): The painter to draw with
    ///     rect (egui::Rect): The canvas rectangle; mark coordinates are relative to its corner
    ///     session (Session): The session to draw
    pub fn render(&self, painter: &egui::Painter, rect: Rect, session: &Session) {
        let settings = session.settings();
        let (background, ink, trace) = if settings.dark_mode {
            (Color32::from_gray(24), Color32::WHITE, Color32::LIGHT_RED)
        } else {
            (Color32::WHITE, Color32::BLACK, Color32::RED)
        };

        painter.rect_filled(rect, 0.0, background);

        for mark in session.marks().iter().chain(session.current_mark()) {
            painter.extend(self.mark_shapes(rect.min, mark, ink));
            if settings.show_trace {
                self.render_trace(painter, rect.min, mark, trace);
            }
        }
    }

    /// The filled shapes for a mark's cached path.
    fn mark_shapes(&self, origin: Pos2, mark: &Mark, color: Color32) -> Vec<Shape> {
        let mut shapes = Vec::new();
        for polygon in path_polygons(mark.path()) {
            let mesh = fill_mesh(origin, &polygon, color);
            if !mesh.is_empty() {
                shapes.push(Shape::mesh(mesh));
            }
            // Keeps zero-area paths visible as a hairline
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                shapes.push(Shape::closed_line(
                    screen_ring(origin, ring),
                    Stroke::new(self.outline_width, color),
                ));
            }
        }
        shapes
    }

    fn render_trace(&self, painter: &egui::Painter, origin: Pos2, mark: &Mark, color: Color32) {
        let points = screen_points(origin, mark);
        for point in &points {
            painter.circle_filled(*point, 1.5, color);
        }
        if points.len() > 1 {
            painter.add(Shape::line(points, Stroke::new(1.0, color)));
        }
    }
}

fn fill_mesh(origin: Pos2, polygon: &Polygon<f64>, color: Color32) -> Mesh {
    let triangulation = polygon.earcut_triangles_raw();
    let mut mesh = Mesh::default();
    for xy in triangulation.vertices.chunks_exact(2) {
        mesh.colored_vertex(origin + egui::vec2(xy[0] as f32, xy[1] as f32), color);
    }
    for triangle in triangulation.triangle_indices.chunks_exact(3) {
        mesh.add_triangle(triangle[0] as u32, triangle[1] as u32, triangle[2] as u32);
    }
    mesh
}

fn screen_ring(origin: Pos2, ring: &LineString<f64>) -> Vec<Pos2> {
    ring.coords()
        .map(|c| origin + egui::vec2(c.x as f32, c.y as f32))
        .collect()
}

fn screen_points(origin: Pos2, mark: &Mark) -> Vec<Pos2> {
    mark.points()
        .iter()
        .map(|p| origin + egui::vec2(p.x as f32, p.y as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::stroke::{Point, PointerKind};

    fn scribble(options: &Options) -> Mark {
        let points = (0..12)
            .map(|i| {
                let t = i as f64;
                Point::new(t * 10.0, (t * 0.8).sin() * 20.0, 0.5)
            })
            .collect();
        Mark::from_points(PointerKind::Mouse, points, options)
    }

    fn mesh_positions(shapes: &[Shape]) -> Vec<Pos2> {
        shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Mesh(mesh) => Some(mesh.vertices.iter().map(|v| v.pos).collect::<Vec<_>>()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_render_basics() {
        let renderer = Renderer::new();
        let ctx = egui::Context::default();
        let layer_id = egui::LayerId::background();
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let painter = egui::Painter::new(ctx.clone(), layer_id, rect);

        renderer.render(&painter, rect, &Session::new());
    }

    #[test]
    fn test_mark_is_drawn_from_its_path() {
        let renderer = Renderer::new();
        let options = Options {
            thinning: 0.0,
            ..Options::default()
        };
        let points = (0..10).map(|i| Point::new(i as f64 * 10.0, 0.0, 0.5)).collect();
        let mark = Mark::from_points(PointerKind::Mouse, points, &options);

        let shapes = renderer.mark_shapes(Pos2::ZERO, &mark, Color32::BLACK);
        let positions = mesh_positions(&shapes);

        // A straight centerline, filled out to the stroke's width
        assert!(!positions.is_empty());
        let max_y = positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let min_y = positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!(max_y >= 7.0 && min_y <= -7.0, "y range {min_y}..{max_y}");
    }

    #[test]
    fn test_shapes_follow_thinning() {
        let renderer = Renderer::new();
        let thick = scribble(&Options {
            thinning: 0.0,
            ..Options::default()
        });
        let thin = scribble(&Options {
            thinning: 0.9,
            ..Options::default()
        });

        let thick_shapes = renderer.mark_shapes(Pos2::ZERO, &thick, Color32::BLACK);
        let thin_shapes = renderer.mark_shapes(Pos2::ZERO, &thin, Color32::BLACK);

        assert_ne!(mesh_positions(&thick_shapes), mesh_positions(&thin_shapes));
    }

    #[test]
    fn test_unclipped_mark_still_has_an_outline() {
        let renderer = Renderer::new();
        let mark = scribble(&Options {
            clip: false,
            ..Options::default()
        });

        let shapes = renderer.mark_shapes(egui::pos2(10.0, 10.0), &mark, Color32::BLACK);

        assert!(shapes.iter().any(|shape| matches!(shape, Shape::Path(_))));
    }

    #[test]
    fn test_screen_points_offset_by_origin() {
        let options = Options::default();
        let mark = Mark::begin(Point::new(3.0, 4.0, 0.5), PointerKind::Mouse, &options);
        assert_eq!(screen_points(egui::pos2(10.0, 10.0), &mark), vec![egui::pos2(13.0, 14.0)]);
    }
}
