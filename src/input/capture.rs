use egui::{Context, Event, Key, Pos2, Rect, Response};

use super::PointerSample;
use crate::command::{Command, KeyModifiers, ShortcutKey};
use crate::stroke::PointerKind;

/// Pressure reported for devices that don't measure it.
const DEFAULT_PRESSURE: f64 = 0.5;

/// Handles converting raw egui input into session commands
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the canvas rectangle. Returns true if its size changed.
    pub fn set_canvas_rect(&mut self, rect: Rect) -> bool {
        let resized = self
            .canvas_rect
            .is_none_or(|old| old.size() != rect.size());
        self.canvas_rect = Some(rect);
        resized
    }

    /// Pointer lifecycle commands for this frame, from the canvas response.
    ///
    /// Positions are relative to the canvas' top-left corner.
    pub fn pointer_commands(&mut self, ctx: &Context, response: &Response) -> Vec<Command> {
        let mut commands = Vec::new();

        let Some(pos) = response.interact_pointer_pos().or(self.last_pointer_pos) else {
            return commands;
        };
        let (kind, pressure) = ctx.input(|input| device_of(&input.events));
        let sample = self.sample_at(pos, kind, pressure);

        if response.drag_started() {
            commands.push(Command::DownedPointer(sample));
        } else if response.dragged() && Some(pos) != self.last_pointer_pos {
            commands.push(Command::MovedPointer(sample));
        }

        if response.drag_stopped() {
            commands.push(Command::LiftedPointer(sample));
            self.last_pointer_pos = None;
        } else if response.dragged() {
            self.last_pointer_pos = Some(pos);
        }

        commands
    }

    /// Key presses bound to a shortcut. Nothing while a text field has focus.
    pub fn shortcut_commands(&self, ctx: &Context) -> Vec<Command> {
        if ctx.wants_keyboard_input() {
            return Vec::new();
        }

        ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => {
                        let key = match key {
                            Key::Z => ShortcutKey::Z,
                            Key::D => ShortcutKey::D,
                            Key::E => ShortcutKey::E,
                            _ => return None,
                        };
                        Some(Command::PressedKey {
                            key,
                            modifiers: KeyModifiers {
                                meta: modifiers.command,
                                shift: modifiers.shift,
                            },
                        })
                    }
                    _ => None,
                })
                .collect()
        })
    }

    fn sample_at(&self, pos: Pos2, kind: PointerKind, pressure: f64) -> PointerSample {
        let origin = self.canvas_rect.map_or(Pos2::ZERO, |rect| rect.min);
        let local = pos - origin;
        PointerSample::new(f64::from(local.x), f64::from(local.y), pressure, kind)
    }
}

/// Touch events carry their own force; everything else is treated as a mouse.
fn device_of(events: &[Event]) -> (PointerKind, f64) {
    events
        .iter()
        .find_map(|event| match event {
            Event::Touch { force, .. } => Some((
                PointerKind::Touch,
                force.map_or(DEFAULT_PRESSURE, f64::from),
            )),
            _ => None,
        })
        .unwrap_or((PointerKind::Mouse, DEFAULT_PRESSURE))
}
