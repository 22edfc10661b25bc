use super::{Bounds, ExportTarget, Frame};
use crate::error::ExportError;
use crate::path::path_bounds;
use crate::state::Session;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// An SVG document mirroring what is on screen: one `<path>` per mark.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgCanvas {
    frame: Frame,
    paths: Vec<String>,
    fill: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            frame: Frame {
                view_box: None,
                width: Some(width.to_string()),
                height: Some(height.to_string()),
            },
            paths: Vec::new(),
            fill: light_fill().to_string(),
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.frame.width = Some(width.to_string());
        self.frame.height = Some(height.to_string());
    }

    /// Mirror the session's committed marks and current mark.
    pub fn sync(&mut self, session: &Session) {
        self.paths.clear();
        self.paths.extend(
            session
                .marks()
                .iter()
                .chain(session.current_mark())
                .map(|mark| mark.path().to_string())
                .filter(|path| !path.is_empty()),
        );
        self.fill = if session.settings().dark_mode {
            dark_fill()
        } else {
            light_fill()
        }
        .to_string();
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

fn light_fill() -> &'static str {
    "#000000"
}

fn dark_fill() -> &'static str {
    "#ffffff"
}

impl ExportTarget for SvgCanvas {
    fn content_bounds(&self) -> Bounds {
        let rects: Vec<_> = self.paths.iter().filter_map(|p| path_bounds(p)).collect();
        let Some(first) = rects.first() else {
            return Bounds::default();
        };

        let (mut min, mut max) = (first.min(), first.max());
        for rect in &rects[1..] {
            min.x = min.x.min(rect.min().x);
            min.y = min.y.min(rect.min().y);
            max.x = max.x.max(rect.max().x);
            max.y = max.y.max(rect.max().y);
        }

        Bounds {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    fn frame(&self) -> Frame {
        self.frame.clone()
    }

    fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    fn serialize(&self) -> Result<String, ExportError> {
        if let Some(bad) = self
            .paths
            .iter()
            .find(|p| p.contains("NaN") || p.contains("inf"))
        {
            return Err(ExportError::Serialization(format!(
                "path has a non-finite coordinate: {}",
                bad
            )));
        }

        let mut out = format!("<svg xmlns=\"{}\"", SVG_NAMESPACE);
        for (name, value) in [
            ("width", &self.frame.width),
            ("height", &self.frame.height),
            ("viewBox", &self.frame.view_box),
        ] {
            if let Some(value) = value {
                out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
            }
        }
        out.push('>');

        for path in &self.paths {
            out.push_str(&format!(
                "<path d=\"{}\" fill=\"{}\"/>",
                escape_attribute(path),
                escape_attribute(&self.fill)
            ));
        }

        out.push_str("</svg>");
        Ok(out)
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
