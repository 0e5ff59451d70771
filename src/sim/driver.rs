//! Animation driver
//!
//! Turns wall-clock frame timestamps into scene ticks: computes the frame
//! scale, fires the startup bursts, paints the trail overlay and keeps a
//! rolling FPS estimate.

use glam::Vec2;

use super::scene::Scene;
use crate::consts::*;
use crate::renderer::{Paint, Rgba, Surface};

/// Frames in the FPS window
const FPS_WINDOW: usize = 60;

/// Convert elapsed milliseconds into a frame scale (1.0 = one 60 Hz tick)
pub fn frame_scale(elapsed_ms: f64) -> f32 {
    let scale = (elapsed_ms / FRAME_MS) as f32;
    if scale.is_finite() {
        scale.clamp(0.0, MAX_FRAME_SCALE)
    } else {
        1.0
    }
}

#[derive(Debug, Clone)]
pub struct Driver {
    /// Fade the previous frame instead of clearing it
    pub trails: bool,
    last_time: Option<f64>,
    start_time: Option<f64>,
    intro_fired: bool,
    frames: u64,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Driver {
    pub fn new(trails: bool) -> Self {
        Self {
            trails,
            last_time: None,
            start_time: None,
            intro_fired: false,
            frames: 0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame at timestamp `now_ms`, painting onto `surface`.
    ///
    /// Returns the frame scale the scene was advanced by.
    pub fn frame(&mut self, scene: &mut Scene, surface: &mut dyn Surface, now_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => frame_scale(now_ms - last),
            None => 1.0,
        };
        self.last_time = Some(now_ms);

        self.run_schedule(scene, now_ms);
        self.paint_overlay(surface);
        scene.tick(surface, dt);

        self.track_fps(now_ms);
        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!(
                "frame {}: {} fps, {} particles",
                self.frames,
                self.fps,
                scene.particle_count()
            );
        }

        dt
    }

    /// Startup bursts: one immediately, one after the intro delay
    fn run_schedule(&mut self, scene: &mut Scene, now_ms: f64) {
        let start = match self.start_time {
            Some(start) => start,
            None => {
                self.start_time = Some(now_ms);
                scene.trigger_burst(scene.source, BURST_SPARKS);
                now_ms
            }
        };

        if !self.intro_fired && now_ms - start >= INTRO_DELAY_MS {
            self.intro_fired = true;
            let source = scene.recenter();
            scene.trigger_burst(source - Vec2::new(0.0, INTRO_BURST_LIFT), BURST_SPARKS);
            log::info!("Intro burst at ({:.0}, {:.0})", source.x, source.y);
        }
    }

    /// Fade (or wipe) what was drawn last frame
    fn paint_overlay(&self, surface: &mut dyn Surface) {
        let alpha = if self.trails { TRAIL_FADE_ALPHA } else { 1.0 };
        let size = surface.size();
        surface.fill_rect(Vec2::ZERO, size, &Paint::Solid(Rgba::BLACK.with_alpha(alpha)));
    }

    fn track_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample sits at the next write position
        let oldest = self.frame_times[self.frame_index];
        if self.frames + 1 >= FPS_WINDOW as u64 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Blend, MeshSurface};
    use crate::settings::PoolSizes;
    use crate::sim::scene::SceneConfig;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn empty_scene() -> Scene {
        Scene::with_config(
            VIEWPORT,
            SceneConfig {
                pools: PoolSizes {
                    flames: 0,
                    embers: 0,
                    smoke: 0,
                },
                light_glow: false,
            },
            11,
        )
    }

    #[test]
    fn test_frame_scale_clamps() {
        assert_eq!(frame_scale(FRAME_MS), 1.0);
        assert!((frame_scale(FRAME_MS / 2.0) - 0.5).abs() < 1e-6);
        assert_eq!(frame_scale(10_000.0), MAX_FRAME_SCALE);
        assert_eq!(frame_scale(-5.0), 0.0);
        assert_eq!(frame_scale(f64::NAN), 1.0);
    }

    #[test]
    fn test_first_frame_is_one_tick_and_bursts() {
        let mut scene = empty_scene();
        let mut driver = Driver::default();
        let mut mesh = MeshSurface::new(VIEWPORT);

        let dt = driver.frame(&mut scene, &mut mesh, 12_345.0);
        assert_eq!(dt, 1.0);
        // Burst is added before the tick, so some sparks may already be gone
        assert!(!scene.sparks().is_empty());
        assert!(scene.sparks().len() <= BURST_SPARKS);
        assert_eq!(scene.source, Vec2::new(400.0, 550.0));
    }

    #[test]
    fn test_intro_recenters_once() {
        let mut scene = empty_scene();
        let mut driver = Driver::default();
        let mut mesh = MeshSurface::new(VIEWPORT);

        driver.frame(&mut scene, &mut mesh, 0.0);
        driver.frame(&mut scene, &mut mesh, 400.0);
        assert_eq!(scene.source, Vec2::new(400.0, 550.0));

        driver.frame(&mut scene, &mut mesh, 500.0);
        assert_eq!(scene.source, Vec2::new(400.0, 500.0));

        // A later pointer move is not overridden
        scene.handle_input(crate::sim::input::InputEvent::PointerMove(Vec2::new(1.0, 1.0)));
        driver.frame(&mut scene, &mut mesh, 1000.0);
        assert_eq!(scene.source, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_overlay_alpha_follows_trails() {
        let mut scene = empty_scene();
        let mut mesh = MeshSurface::new(VIEWPORT);

        let mut driver = Driver::new(true);
        driver.frame(&mut scene, &mut mesh, 0.0);
        let overlay = mesh.batches()[0].vertices[0];
        assert_eq!(mesh.batches()[0].blend, Blend::SourceOver);
        assert_eq!(overlay.position, [400.0, 300.0]);
        assert_eq!(overlay.color, [0.0, 0.0, 0.0, TRAIL_FADE_ALPHA]);

        mesh.clear();
        let mut driver = Driver::new(false);
        driver.frame(&mut scene, &mut mesh, 0.0);
        assert_eq!(mesh.batches()[0].vertices[0].color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut scene = empty_scene();
        let mut driver = Driver::default();
        let mut mesh = MeshSurface::new(VIEWPORT);
        driver.frame(&mut scene, &mut mesh, 0.0);
        let dt = driver.frame(&mut scene, &mut mesh, 60_000.0);
        assert_eq!(dt, MAX_FRAME_SCALE);
    }

    #[test]
    fn test_fps_estimate() {
        let mut scene = empty_scene();
        let mut driver = Driver::default();
        let mut mesh = MeshSurface::new(VIEWPORT);
        for i in 0..120 {
            mesh.clear();
            driver.frame(&mut scene, &mut mesh, i as f64 * FRAME_MS);
        }
        assert_eq!(driver.fps(), 60);
        assert_eq!(driver.frames(), 120);
    }
}
