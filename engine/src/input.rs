//! Pointer input normalization.
//!
//! Mouse and touch arrive as different window events but games only want one stream of
//! "press here / move here / release here". `PointerTracker` folds both into `PointerEvent`s,
//! queued in arrival order until the run loop drains them at the next frame.

use serde::{Deserialize, Serialize};

use crate::ui::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerSource {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pos: Point2,
    pub source: PointerSource,
}

impl PointerEvent {
    pub fn down(pos: Point2) -> Self {
        Self {
            phase: PointerPhase::Down,
            pos,
            source: PointerSource::Mouse,
        }
    }

    pub fn moved(pos: Point2) -> Self {
        Self {
            phase: PointerPhase::Move,
            pos,
            source: PointerSource::Mouse,
        }
    }

    pub fn up(pos: Point2) -> Self {
        Self {
            phase: PointerPhase::Up,
            pos,
            source: PointerSource::Mouse,
        }
    }
}

/// Touch lifecycle, decoupled from the windowing crate so it can be driven from tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Option<Point2>,
    mouse_down: bool,
    primary_touch: Option<u64>,
    queue: Vec<PointerEvent>,
}

impl PointerTracker {
    pub fn cursor_moved(&mut self, pos: Point2) {
        self.cursor = Some(pos);
        self.queue.push(PointerEvent::moved(pos));
    }

    /// Primary mouse button. Presses before the cursor has ever been seen carry no coordinate
    /// and are dropped.
    pub fn mouse_button(&mut self, pressed: bool) {
        let Some(pos) = self.cursor else {
            return;
        };
        if pressed == self.mouse_down {
            return;
        }
        self.mouse_down = pressed;
        self.queue.push(if pressed {
            PointerEvent::down(pos)
        } else {
            PointerEvent::up(pos)
        });
    }

    /// Only the first finger down is followed until it lifts; other touches are ignored.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, pos: Point2) {
        let source = PointerSource::Touch(id);
        let phase = match phase {
            TouchPhase::Started => {
                if self.primary_touch.is_some() {
                    return;
                }
                self.primary_touch = Some(id);
                PointerPhase::Down
            }
            TouchPhase::Moved => {
                if self.primary_touch != Some(id) {
                    return;
                }
                PointerPhase::Move
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.primary_touch != Some(id) {
                    return;
                }
                self.primary_touch = None;
                PointerPhase::Up
            }
        };
        self.queue.push(PointerEvent { phase, pos, source });
    }

    pub fn pending(&self) -> &[PointerEvent] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.queue)
    }
}
