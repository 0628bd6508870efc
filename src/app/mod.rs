//! Winit application shell.
//!
//! [`App`] owns the window, renderer, scene and [`Piano`] state and drives
//! them from winit's [`ApplicationHandler`] callbacks:
//!
//! - every frame: deliver a finished model load, fire due key releases,
//!   advance animations by the fixed step, update the orbit camera, draw
//! - on left-button release: pick the key under the cursor and press it
//!
//! ```rust,ignore
//! use piano::App;
//!
//! fn main() -> anyhow::Result<()> {
//!     App::new().with_model_path("assets/piano.glb").run()
//! }
//! ```

pub mod input;
pub mod input_adapter;

use std::path::PathBuf;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::assets::ModelLoad;
use crate::audio::KiraNotePlayer;
use crate::errors::PianoError;
use crate::interaction::{NoteSink, SilentNotes};
use crate::piano::Piano;
use crate::renderer::Renderer;
use crate::scene::{Camera, Light, NodeHandle, Scene};
use crate::settings::PianoSettings;
use crate::utils::{OrbitControls, Timer};

use self::input::Input;

/// Position of the directional light.
const KEY_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 1.0, -2.0);

pub struct App {
    settings: PianoSettings,
    window: Option<Arc<Window>>,
    renderer: Renderer,
    scene: Scene,
    camera_node: NodeHandle,
    orbit: OrbitControls,
    piano: Piano,
    notes: Option<KiraNotePlayer>,
    model_load: Option<ModelLoad>,
    input: Input,
    timer: Timer,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(PianoSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: PianoSettings) -> Self {
        let (w, h) = settings.window_size;
        let (scene, camera_node) = build_scene(&settings, (w / h) as f32);

        Self {
            renderer: Renderer::new(settings.renderer.clone()),
            orbit: OrbitControls::with_settings(Vec3::ZERO, settings.camera.distance, &settings.orbit),
            piano: Piano::new(&settings),
            settings,
            window: None,
            scene,
            camera_node,
            notes: None,
            model_load: None,
            input: Input::new(),
            timer: Timer::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.window_title = title.into();
        self
    }

    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.model_path = path.into();
        self
    }

    #[must_use]
    pub fn with_sounds_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.sounds_dir = dir.into();
        self.piano = Piano::new(&self.settings);
        self
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width, height);
        self.input.handle_resize(width, height);
        if let Some((_, camera)) = self.scene.query_main_camera_bundle() {
            camera.set_aspect(width as f32 / height as f32);
        }
    }

    fn poll_model(&mut self) {
        let Some(load) = &mut self.model_load else {
            return;
        };
        let Some(result) = load.poll() else {
            return;
        };
        let path = load.path().to_path_buf();
        self.model_load = None;

        match result {
            Ok(model) => {
                self.piano.on_model_loaded(&model, &mut self.scene);
                log::info!("Model {} ready", path.display());
                if let Some(notes) = &self.notes {
                    notes.preload(self.piano.note_paths());
                }
            }
            Err(e) => log::error!("Failed to load model {}: {e}", path.display()),
        }
    }

    fn frame(&mut self) {
        self.timer.tick();
        self.poll_model();

        self.piano.tick(self.timer.elapsed, &mut self.scene);

        let fov = self.settings.camera.fov;
        let dt = self.timer.dt_seconds();
        if let Some(node) = self.scene.get_node_mut(self.camera_node) {
            self.orbit.update(&mut node.transform, &self.input, fov, dt);
        }
        self.input.end_frame();

        self.scene.update_matrix_world();
        self.renderer.render(&self.scene);
    }

    fn click(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();
        let viewport = Vec2::new(size.width as f32, size.height as f32);
        let mut silent = SilentNotes;
        let notes: &mut dyn NoteSink = match &mut self.notes {
            Some(player) => player,
            None => &mut silent,
        };
        self.piano
            .click(self.input.cursor_position, viewport, &self.scene, self.timer.now(), notes);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera, ambient light and key light; the model is added once loaded.
fn build_scene(settings: &PianoSettings, aspect: f32) -> (Scene, NodeHandle) {
    let mut scene = Scene::new();

    let cam = &settings.camera;
    let camera_node = scene.add_camera(Camera::new_perspective(cam.fov, aspect, cam.near, cam.far));
    if let Some(node) = scene.get_node_mut(camera_node) {
        node.transform.position = Vec3::new(0.0, 0.0, cam.distance);
    }
    scene.active_camera = Some(camera_node);

    scene.add_light(Light::new_ambient(Vec3::ONE, 1.0));
    let key_light = scene.add_light(Light::new_directional(Vec3::ONE, 5.0));
    if let Some(node) = scene.get_node_mut(key_light) {
        node.transform.position = KEY_LIGHT_POSITION;
    }

    scene.update_matrix_world();
    (scene, camera_node)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (w, h) = self.settings.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(&self.settings.window_title)
            .with_inner_size(winit::dpi::LogicalSize::new(w, h));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("{}", PianoError::from(e));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(Arc::clone(&window));

        log::info!("Initializing Renderer Backend...");
        let size = window.inner_size();
        if let Err(e) = pollster::block_on(self.renderer.init(Arc::clone(&window), size.width, size.height)) {
            log::error!("Fatal Renderer Error: {e}");
            event_loop.exit();
            return;
        }
        self.resize(size.width, size.height);

        self.notes = Some(KiraNotePlayer::new_or_silent());

        match ModelLoad::spawn(self.settings.model_path.clone()) {
            Ok(load) => self.model_load = Some(load),
            Err(e) => log::error!("Failed to start model load: {e}"),
        }

        self.timer = Timer::new();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        input_adapter::process_window_event(&mut self.input, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => self.click(),
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.renderer.is_initialized()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
