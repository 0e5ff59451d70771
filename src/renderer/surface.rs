//! Immediate-mode 2D drawing surface
//!
//! The simulation draws through this trait the way it would draw on an HTML
//! canvas: a transform/alpha/blend state stack, solid and radial-gradient
//! paints, circles and Bézier paths. Coordinates are logical pixels with y
//! pointing down.

use glam::Vec2;

/// Straight (non-premultiplied) RGBA color, components in `0..=1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From 8-bit channels plus an alpha (clamped to `0..=1`)
    pub fn from_rgb8(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            alpha.clamp(0.0, 1.0),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise linear interpolation
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// How new pixels combine with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Normal alpha compositing
    #[default]
    SourceOver,
    /// Additive ("lighter")
    Lighter,
}

/// Two-circle radial gradient with two color stops (offsets 0 and 1).
///
/// Semantics follow the canvas `createRadialGradient`: the gradient is the
/// family of circles interpolated from `(start, start_radius)` to
/// `(end, end_radius)`; a point takes the color of the largest `t` whose
/// circle passes through it, padded outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub start: Vec2,
    pub start_radius: f32,
    pub end: Vec2,
    pub end_radius: f32,
    pub inner: Rgba,
    pub outer: Rgba,
}

impl RadialGradient {
    /// Concentric gradient around `center`
    pub fn centered(center: Vec2, radius: f32, inner: Rgba, outer: Rgba) -> Self {
        Self {
            start: center,
            start_radius: 0.0,
            end: center,
            end_radius: radius,
            inner,
            outer,
        }
    }

    /// Gradient parameter for point `p`, clamped to `[0, 1]`
    pub fn param_at(&self, p: Vec2) -> f32 {
        let dc = self.end - self.start;
        let dr = self.end_radius - self.start_radius;
        let q = p - self.start;

        // |q - t*dc|^2 = (r0 + t*dr)^2
        let a = dc.dot(dc) - dr * dr;
        let b = q.dot(dc) + self.start_radius * dr;
        let c = q.dot(q) - self.start_radius * self.start_radius;

        let t = if a.abs() < 1e-6 {
            if b.abs() < 1e-6 {
                return 0.0;
            }
            c / (2.0 * b)
        } else {
            let disc = b * b - a * c;
            if disc < 0.0 {
                return 1.0;
            }
            let root = disc.sqrt();
            let t1 = (b + root) / a;
            let t2 = (b - root) / a;
            let radius_ok = |t: f32| self.start_radius + t * dr >= 0.0;
            match (radius_ok(t1), radius_ok(t2)) {
                (true, true) => t1.max(t2),
                (true, false) => t1,
                (false, true) => t2,
                (false, false) => return 1.0,
            }
        };

        t.clamp(0.0, 1.0)
    }

    /// Interpolated color at point `p`
    pub fn color_at(&self, p: Vec2) -> Rgba {
        self.inner.lerp(self.outer, self.param_at(p))
    }
}

/// Fill style
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    /// Color of this paint at a point in the current (local) space
    pub fn color_at(&self, p: Vec2) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Radial(gradient) => gradient.color_at(p),
        }
    }
}

/// Soft shadow drawn beneath fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
}

/// One path construction command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    /// Cubic Bézier: two control points, end point
    CubicTo(Vec2, Vec2, Vec2),
    /// Quadratic curve: control point, end point
    QuadTo(Vec2, Vec2),
    Close,
}

/// A closed fill path built from commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.cmds.push(PathCmd::MoveTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) -> &mut Self {
        self.cmds.push(PathCmd::CubicTo(c1, c2, p));
        self
    }

    pub fn quad_to(&mut self, c: Vec2, p: Vec2) -> &mut Self {
        self.cmds.push(PathCmd::QuadTo(c, p));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    /// Flatten curves into a polyline, `steps` segments per curve.
    ///
    /// Only the first subpath is kept; fills never use more than one.
    pub fn flatten(&self, steps: u32) -> Vec<Vec2> {
        let steps = steps.max(1);
        let mut points: Vec<Vec2> = Vec::new();
        let mut cursor = Vec2::ZERO;

        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    if !points.is_empty() {
                        break;
                    }
                    points.push(p);
                    cursor = p;
                }
                PathCmd::CubicTo(c1, c2, p) => {
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let u = 1.0 - t;
                        points.push(
                            cursor * (u * u * u)
                                + c1 * (3.0 * u * u * t)
                                + c2 * (3.0 * u * t * t)
                                + p * (t * t * t),
                        );
                    }
                    cursor = p;
                }
                PathCmd::QuadTo(c, p) => {
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let u = 1.0 - t;
                        points.push(cursor * (u * u) + c * (2.0 * u * t) + p * (t * t));
                    }
                    cursor = p;
                }
                PathCmd::Close => break,
            }
        }

        // Drop a duplicated closing point
        if points.len() > 2 && points.first() == points.last() {
            points.pop();
        }
        points
    }
}

/// A 2D immediate-mode raster target
pub trait Surface {
    /// Logical size of the drawable area
    fn size(&self) -> Vec2;

    /// Push the transform/alpha/blend/shadow state
    fn save(&mut self);
    /// Pop the state pushed by the matching `save`
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_blend(&mut self, blend: Blend);
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, paint: &Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
}
