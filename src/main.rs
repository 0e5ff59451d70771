//! Hearth entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_fire {
    use std::cell::RefCell;
    use std::rc::Rc;

    use hearth::SetupError;
    use hearth::platform::web;
    use hearth::renderer::{GpuRenderer, MeshSurface};
    use hearth::settings::Settings;
    use hearth::sim::{Driver, InputEvent, Scene};

    /// Element id of the drawing canvas
    const CANVAS_ID: &str = "canvas";
    /// Refresh the FPS readout every this many frames
    const FPS_REFRESH_FRAMES: u64 = 30;

    /// Everything one running fire needs
    struct App {
        scene: Scene,
        driver: Driver,
        mesh: MeshSurface,
        renderer: Option<GpuRenderer>,
        canvas: web_sys::HtmlCanvasElement,
        settings: Settings,
    }

    impl App {
        fn handle_input(&mut self, event: InputEvent) {
            if let InputEvent::Resize(_) = event {
                // Re-measure so the backing store follows the device pixel ratio
                let (logical, width, height) = web::fit_canvas(&self.canvas);
                self.mesh.resize(logical);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(logical, width, height);
                }
                self.scene.handle_input(InputEvent::Resize(logical));
                return;
            }
            self.scene.handle_input(event);
        }

        fn frame(&mut self, time: f64) {
            self.mesh.clear();
            self.driver.frame(&mut self.scene, &mut self.mesh, time);
            self.render();

            if self.settings.show_fps && self.driver.frames() % FPS_REFRESH_FRAMES == 0 {
                web::set_text("fps", &format!("{} fps", self.driver.fps()));
            }
        }

        fn render(&mut self) {
            let Some(renderer) = self.renderer.as_mut() else {
                return;
            };
            match renderer.render(self.mesh.batches()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    pub async fn run() -> Result<(), SetupError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {}", e).into());
        }

        log::info!("Hearth starting...");

        // Defaults, then LocalStorage, then this page's URL
        let mut settings = Settings::load();
        if settings.apply_query(&web::query_string()) {
            settings.save();
        }
        log::info!(
            "Quality {}, trails {}, glow {}",
            settings.quality.as_str(),
            settings.trails,
            settings.light_glow
        );

        let canvas = web::canvas_by_id(CANVAS_ID)?;
        let (logical, width, height) = web::fit_canvas(&canvas);

        let seed = web::now_ms() as u64;
        let scene = Scene::new(logical, &settings, seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = GpuRenderer::new(surface, &adapter, logical, width, height).await?;

        let app = Rc::new(RefCell::new(App {
            scene,
            driver: Driver::new(settings.trails),
            mesh: MeshSurface::new(logical),
            renderer: Some(renderer),
            canvas: canvas.clone(),
            settings,
        }));

        {
            let app = app.clone();
            web::attach_input(&canvas, move |event| app.borrow_mut().handle_input(event))?;
        }

        web::hide_element("loading");
        request_animation_frame(app);

        log::info!("Hearth running!");
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        web::request_animation_frame(move |time: f64| fire_loop(app, time));
    }

    fn fire_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_fire::run().await {
        log::error!("Hearth failed to start: {}", e);
        web_sys::console::error_1(&format!("Hearth failed to start: {}", e).into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Hearth (native) starting...");
    log::info!("Native mode renders headless - run with `trunk serve` for the web version");

    run_headless(600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate `frames` frames into a throwaway mesh and report what was drawn
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(frames: u32) {
    use glam::Vec2;
    use hearth::consts::FRAME_MS;
    use hearth::renderer::MeshSurface;
    use hearth::settings::Settings;
    use hearth::sim::{Driver, Scene};

    let viewport = Vec2::new(1280.0, 720.0);
    let settings = Settings::load();
    let mut scene = Scene::new(viewport, &settings, 0x5eed);
    let mut driver = Driver::new(settings.trails);
    let mut mesh = MeshSurface::new(viewport);

    let mut peak_vertices = 0;
    for frame in 0..frames {
        mesh.clear();
        driver.frame(&mut scene, &mut mesh, frame as f64 * FRAME_MS);
        peak_vertices = peak_vertices.max(mesh.vertex_count());
    }

    log::info!(
        "{} frames: {} particles live ({} sparks), peak {} vertices/frame",
        driver.frames(),
        scene.particle_count(),
        scene.sparks().len(),
        peak_vertices
    );
}
