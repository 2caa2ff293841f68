use std::cell::Cell;
use std::ffi::CString;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use renderer::{
    log_driver_info, FileShaderSource, FlyCamera, FrameClock, FrameRenderer, GlApi,
    ImageFaceDecoder, NativeGl, RenderContext, ScreenSize,
};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::input::{action_for, HeldKeys, InputAction};
use crate::run::SessionConfig;

const DEPTH_BITS: u8 = 24;

/// Scene plus the GL objects it renders into.
///
/// Field order is drop order: the render context releases its programs,
/// buffers and texture while the GL context is still current.
struct WindowState {
    scene: RenderContext,
    frame: FrameRenderer,
    camera: FlyCamera,
    held: HeldKeys,
    clock: FrameClock,
    move_speed: f32,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl WindowState {
    fn handle_key(&mut self, action: InputAction, pressed: bool, repeat: bool) -> bool {
        if self.held.update(action, pressed) || !pressed || repeat {
            return true;
        }
        match action {
            InputAction::SetWaves(count) => self.scene.set_wave_count(count),
            InputAction::TogglePolygonMode => {
                let mode = self.scene.toggle_polygon_mode();
                info!(%mode, "polygon mode");
            }
            InputAction::Quit => return false,
            _ => {}
        }
        true
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.window.resize_surface(&self.surface, &self.context);
        self.scene.resize(ScreenSize::new(size.width, size.height));
        debug!(width = size.width, height = size.height, "surface resized");
    }

    fn render_frame(&mut self) -> Result<()> {
        self.held.apply_movement(&mut self.camera, self.move_speed);
        let elapsed = self.clock.elapsed_seconds(Instant::now());
        self.frame.render(&self.scene, &self.camera, elapsed)?;
        self.surface
            .swap_buffers(&self.context)
            .context("failed to present frame")?;
        Ok(())
    }
}

pub fn run_window(session: SessionConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let screen = session.renderer.screen;
    let window_builder = WindowBuilder::new()
        .with_title(session.title.as_str())
        .with_inner_size(PhysicalSize::new(screen.width, screen.height));
    let template = ConfigTemplateBuilder::new().with_depth_size(DEPTH_BITS);
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(window_builder))
        .build(&event_loop, template, pick_config)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = window.ok_or_else(|| anyhow!("display did not create a window"))?;

    let gl_display = gl_config.display();
    let attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 1))))
        .with_profile(GlProfile::Core)
        .build(None);
    let not_current = unsafe { gl_display.create_context(&gl_config, &attributes) }
        .context("failed to create an OpenGL 4.1 core context")?;

    let surface_attributes = window.build_surface_attributes(Default::default());
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
        .context("failed to create window surface")?;
    let context = not_current
        .make_current(&surface)
        .context("failed to make the GL context current")?;
    if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
        warn!("vsync unavailable: {err}");
    }

    let gl: Rc<dyn GlApi> = Rc::new(NativeGl::load_with(|symbol| match CString::new(symbol) {
        Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()),
        Err(_) => std::ptr::null(),
    }));
    log_driver_info(gl.as_ref());

    let sources = FileShaderSource::new(&session.shader_dir);
    let scene = RenderContext::new(gl, &session.renderer, &sources, &ImageFaceDecoder)
        .context("failed to initialise the ocean scene")?;

    grab_cursor(&window);

    let mut state = WindowState {
        scene,
        frame: FrameRenderer::new(),
        camera: FlyCamera::new(session.eye, session.look_sensitivity),
        held: HeldKeys::default(),
        clock: FrameClock::start(Instant::now()),
        move_speed: session.move_speed,
        surface,
        context,
        window,
    };

    let failed = Rc::new(Cell::new(false));
    let failed_in_loop = Rc::clone(&failed);
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(code),
                                    state: key_state,
                                    repeat,
                                    ..
                                },
                            ..
                        } => {
                            let Some(action) = action_for(code) else {
                                return;
                            };
                            let pressed = key_state == ElementState::Pressed;
                            if !state.handle_key(action, pressed, repeat) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::Resized(size) => state.resize(size),
                        WindowEvent::RedrawRequested => {
                            if let Err(err) = state.render_frame() {
                                error!("frame failed: {err:#}");
                                failed_in_loop.set(true);
                                elwt.exit();
                            }
                        }
                        _ => {}
                    }
                }
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                    ..
                } => state.camera.mouse_look(dx as f32, dy as f32),
                Event::AboutToWait => state.window.request_redraw(),
                _ => {}
            }
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    if failed.get() {
        return Err(anyhow!("rendering stopped after a frame error"));
    }
    Ok(())
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    // glutin only calls the picker with a non-empty set.
    configs
        .max_by_key(|config| config.depth_size())
        .expect("display offered no GL configs")
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(err) = grabbed {
        warn!("could not grab the cursor: {err}");
    }
    window.set_cursor_visible(false);
}
