use crate::options::Options;
use crate::stroke::{Mark, Point, PointerKind};

/// Committed marks plus the one being drawn, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    marks: Vec<Mark>,
    current_mark: Option<Mark>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn current_mark(&self) -> Option<&Mark> {
        self.current_mark.as_ref()
    }

    /// Start a new current mark. Any unfinished mark is dropped.
    pub fn begin_mark(&mut self, point: Point, kind: PointerKind, options: &Options) -> &Mark {
        if self.current_mark.is_some() {
            log::warn!("Beginning a mark while another is still in progress, dropping it");
        }
        self.current_mark.insert(Mark::begin(point, kind, options))
    }

    /// Append a sample to the current mark.
    ///
    /// Samples from a different kind of pointer than the one that started
    /// the mark are ignored, as are samples arriving with no mark in progress.
    /// Returns whether the point was added.
    pub fn add_point(&mut self, point: Point, kind: PointerKind, options: &Options) -> bool {
        match &mut self.current_mark {
            Some(mark) if mark.kind == kind => {
                mark.push_point(point, options);
                true
            }
            Some(mark) => {
                log::trace!("Ignoring {:?} sample during a {:?} mark", kind, mark.kind);
                false
            }
            None => false,
        }
    }

    /// Freeze the current mark into the committed list.
    pub fn commit_mark(&mut self, options: &Options) -> Option<&Mark> {
        let mut mark = self.current_mark.take()?;
        // The path may have been derived under an older option set.
        mark.recompute(options);
        self.marks.push(mark);
        self.marks.last()
    }

    /// Rebuild every cached path, including the current mark's.
    pub fn recompute_all(&mut self, options: &Options) {
        for mark in &mut self.marks {
            mark.recompute(options);
        }
        if let Some(mark) = &mut self.current_mark {
            mark.recompute(options);
        }
    }

    /// Replace the committed marks wholesale.
    pub fn set_marks(&mut self, marks: Vec<Mark>) {
        self.marks = marks;
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub(crate) fn marks_mut(&mut self) -> &mut Vec<Mark> {
        &mut self.marks
    }
}
