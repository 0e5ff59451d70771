//! Input events fed into the scene
//!
//! Platform code translates DOM pointer/touch/resize events into these;
//! coordinates are logical pixels relative to the canvas.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp,
    TouchStart(Vec2),
    TouchMove(Vec2),
    TouchEnd,
    /// New viewport size
    Resize(Vec2),
}
