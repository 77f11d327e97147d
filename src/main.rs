//! Mow Meadow entry point
//!
//! Handles platform-specific initialization and runs the demo loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_demo {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use mow_meadow::consts::*;
    use mow_meadow::renderer::GrassRenderState;
    use mow_meadow::settings::{QualityPreset, Settings};
    use mow_meadow::sim::{Avatar, FieldConfig, GrassState, TickInput, tick};

    /// Held-key state sampled into a `TickInput` each frame
    #[derive(Debug, Clone, Copy, Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
        forward: bool,
        back: bool,
        cutting: bool,
    }

    /// Demo instance holding all state
    struct Demo {
        state: GrassState,
        avatar: Avatar,
        settings: Settings,
        render_state: Option<GrassRenderState>,
        accumulator: f32,
        last_time: f64,
        start_time: f64,
        keys: HeldKeys,
        /// Orbit deltas accumulated from mouse drags since the last frame
        pending_orbit: (f32, f32),
        dragging: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Demo {
        fn new(seed: u64, settings: Settings) -> Self {
            let config = FieldConfig {
                seed,
                blade_count: settings.quality.blade_count(),
                ..Default::default()
            };
            Self {
                state: GrassState::new(config),
                avatar: Avatar::default(),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                start_time: 0.0,
                keys: HeldKeys::default(),
                pending_orbit: (0.0, 0.0),
                dragging: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Seconds since demo start for the sim/shader clock
        fn now_secs(&self, time: f64) -> f32 {
            ((time - self.start_time) / 1000.0) as f32
        }

        /// Run simulation substeps, then per-frame ledger upkeep
        fn update(&mut self, dt: f32, time: f64) {
            let input = TickInput {
                move_x: (self.keys.right as i32 - self.keys.left as i32) as f32,
                move_z: (self.keys.back as i32 - self.keys.forward as i32) as f32,
                cutting: self.keys.cutting,
                orbit_dx: self.pending_orbit.0,
                orbit_dy: self.pending_orbit.1,
            };
            if let Some(ref mut render_state) = self.render_state {
                render_state.camera.orbit(input.orbit_dx, input.orbit_dy);
            }
            self.pending_orbit = (0.0, 0.0);

            let dt = dt.min(0.1);
            self.accumulator += dt;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let now = self.now_secs(time) - self.accumulator;
                tick(&mut self.state, &mut self.avatar, &input, SIM_DT, now);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Frame-order contract: prune expired cuts before the renderer
            // resyncs the transport buffer
            self.state.advance(self.now_secs(time));

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let now = self.now_secs(time);
            let Demo {
                state,
                avatar,
                settings,
                render_state,
                ..
            } = self;
            if let Some(render_state) = render_state {
                match render_state.render(state, avatar, settings, now) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Mowing status indicator
            if let Some(el) = document.get_element_by_id("hud-status") {
                if self.keys.cutting {
                    let _ = el.set_attribute("class", "hud-item mowing");
                    el.set_text_content(Some("MOWING"));
                } else {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some("IDLE"));
                }
            }

            // Active cut patches
            if let Some(el) = document.query_selector("#hud-cuts .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.ledger().len().to_string()));
            }

            // Quality preset
            if let Some(el) = document
                .query_selector("#hud-quality .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(self.settings.quality.as_str()));
            }

            // FPS
            if self.settings.show_fps
                && let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten()
            {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mow Meadow starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize demo state; ?quality=low|medium|high overrides the
        // saved preset
        let mut settings = Settings::load();
        if let Some(preset) = window
            .location()
            .search()
            .ok()
            .and_then(|s| query_param(&s, "quality"))
            .and_then(|v| QualityPreset::from_str(&v))
        {
            settings.quality = preset;
            settings.save();
        }
        log::info!("Quality preset: {}", settings.quality.as_str());

        let seed = js_sys::Date::now() as u64;
        let demo = Rc::new(RefCell::new(Demo::new(seed, settings)));
        log::info!("Field generated with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = {
            let d = demo.borrow();
            GrassRenderState::new(surface, &adapter, width, height, &d.state).await
        };
        {
            let mut d = demo.borrow_mut();
            d.render_state = Some(render_state);
            d.start_time = js_sys::Date::now();
        }

        setup_input_handlers(&canvas, demo.clone());
        setup_resize_handler(&canvas, demo.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame_loop(demo);

        log::info!("Mow Meadow running!");
    }

    /// Pull a single `key=value` pair out of a location search string
    fn query_param(search: &str, key: &str) -> Option<String> {
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }

    fn set_key(keys: &mut HeldKeys, code: &str, down: bool) -> bool {
        match code {
            "KeyA" | "ArrowLeft" => keys.left = down,
            "KeyD" | "ArrowRight" => keys.right = down,
            "KeyW" | "ArrowUp" => keys.forward = down,
            "KeyS" | "ArrowDown" => keys.back = down,
            "Space" => keys.cutting = down,
            _ => return false,
        }
        true
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, demo: Rc<RefCell<Demo>>) {
        let window = web_sys::window().unwrap();

        // Keyboard: WASD/arrows move, Space engages the mower
        {
            let demo = demo.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut d = demo.borrow_mut();
                let code = event.code();
                if code == "KeyV" && !event.repeat() {
                    d.settings.wind = !d.settings.wind;
                    d.settings.save();
                    log::info!("Wind {}", if d.settings.wind { "on" } else { "off" });
                    event.prevent_default();
                } else if set_key(&mut d.keys, &code, true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let demo = demo.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut d = demo.borrow_mut();
                if set_key(&mut d.keys, &event.code(), false) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse drag orbits the camera
        {
            let demo = demo.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                demo.borrow_mut().dragging = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let demo = demo.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                demo.borrow_mut().dragging = false;
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let demo = demo.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut d = demo.borrow_mut();
                if d.dragging {
                    let sensitivity = 0.008;
                    d.pending_orbit.0 += event.movement_x() as f32 * sensitivity;
                    d.pending_orbit.1 += event.movement_y() as f32 * sensitivity;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, demo: Rc<RefCell<Demo>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(ref mut rs) = demo.borrow_mut().render_state {
                rs.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame_loop(demo: Rc<RefCell<Demo>>) {
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        *g.borrow_mut() = Some(Closure::new(move |time: f64| {
            {
                let mut d = demo.borrow_mut();
                let dt = if d.last_time > 0.0 {
                    ((time - d.last_time) / 1000.0) as f32
                } else {
                    0.0
                };
                d.last_time = time;
                d.update(dt, time);
                d.render(time);
                d.update_hud();
            }

            let window = web_sys::window().unwrap();
            let _ = window.request_animation_frame(
                f.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
            );
        }));

        let window = web_sys::window().unwrap();
        let _ = window
            .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_demo::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mow Meadow (native) starting...");
    log::info!("Native mode requires winit integration - run with `trunk serve` for web version");

    // Headless smoke run of the sim loop
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use mow_meadow::consts::*;
    use mow_meadow::sim::{Avatar, FieldConfig, GrassState, TickInput, tick};

    let mut state = GrassState::new(FieldConfig {
        seed: 42,
        ..Default::default()
    });
    let mut avatar = Avatar::default();
    let input = TickInput {
        move_x: 1.0,
        cutting: true,
        ..Default::default()
    };

    // Mow a strip across the field for five simulated seconds
    for i in 0..300 {
        let now = i as f32 * SIM_DT;
        tick(&mut state, &mut avatar, &input, SIM_DT, now);
        state.advance(now);
    }

    println!(
        "blades: {}, active cuts: {}, growth at origin: {:.2}",
        state.field.blades.len(),
        state.ledger().len(),
        state.growth_at(glam::Vec2::ZERO, 5.0),
    );
}
