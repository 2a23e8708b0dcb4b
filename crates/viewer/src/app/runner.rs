use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mesh::GesturePhase;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::context::GpuContext;

pub trait App: 'static {
    type Settings;

    fn init(ctx: &GpuContext, settings: Self::Settings) -> Self;

    /// Advance the simulation. Called by the interval timer and once after
    /// every presented frame.
    fn tick(&mut self);
    fn tick_interval(&self) -> Duration;

    /// Prepare GPU data for the next frame.
    fn update(&mut self, ctx: &GpuContext);
    fn render(
        &mut self,
        ctx: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    );

    fn on_key(&mut self, _key: KeyCode, _pressed: bool) {}
    fn on_resize(&mut self, _ctx: &GpuContext) {}
    /// Pointer positions in physical pixels, ordered by when each finger
    /// went down.
    fn on_pointer(&mut self, _phase: GesturePhase, _points: &[PhysicalPosition<f64>]) {}
    fn on_file_dropped(&mut self, _ctx: &GpuContext, _path: &Path) {}
    fn status(&self) -> Option<String> {
        None
    }
    fn title() -> &'static str {
        "App"
    }
}

pub fn run<A: App>(settings: A::Settings) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut runner = AppRunner::<A>::new(settings);
    event_loop.run_app(&mut runner)?;
    Ok(())
}

/// Folds mouse and touch input into gesture updates. The mouse acts as a
/// single finger while the left button is held.
#[derive(Debug, Default)]
struct PointerTracker {
    cursor: Option<PhysicalPosition<f64>>,
    mouse_down: bool,
    fingers: Vec<(u64, PhysicalPosition<f64>)>,
}

type PointerUpdate = (GesturePhase, Vec<PhysicalPosition<f64>>);

impl PointerTracker {
    fn mouse_button(&mut self, pressed: bool) -> Option<PointerUpdate> {
        if pressed {
            self.mouse_down = true;
            self.cursor.map(|p| (GesturePhase::Began, vec![p]))
        } else if self.mouse_down {
            self.mouse_down = false;
            Some((GesturePhase::Ended, Vec::new()))
        } else {
            None
        }
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<PointerUpdate> {
        self.cursor = Some(position);
        self.mouse_down
            .then(|| (GesturePhase::Changed, vec![position]))
    }

    fn cursor_left(&mut self) -> Option<PointerUpdate> {
        self.cursor = None;
        self.mouse_button(false)
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> PointerUpdate {
        let gesture = match phase {
            TouchPhase::Started => {
                let began = self.fingers.is_empty();
                self.fingers.push((id, location));
                if began {
                    GesturePhase::Began
                } else {
                    GesturePhase::Changed
                }
            }
            TouchPhase::Moved => {
                if let Some(f) = self.fingers.iter_mut().find(|(fid, _)| *fid == id) {
                    f.1 = location;
                }
                GesturePhase::Changed
            }
            TouchPhase::Ended => {
                self.fingers.retain(|(fid, _)| *fid != id);
                if self.fingers.is_empty() {
                    GesturePhase::Ended
                } else {
                    GesturePhase::Changed
                }
            }
            TouchPhase::Cancelled => {
                self.fingers.retain(|(fid, _)| *fid != id);
                GesturePhase::Cancelled
            }
        };
        (gesture, self.fingers.iter().map(|(_, p)| *p).collect())
    }
}

struct AppRunner<A: App> {
    settings: Option<A::Settings>,
    window: Option<Arc<Window>>,
    ctx: Option<GpuContext>,
    app: Option<A>,
    pointer: PointerTracker,
    next_tick: Option<Instant>,
    status: Option<String>,
}

impl<A: App> AppRunner<A> {
    fn new(settings: A::Settings) -> Self {
        Self {
            settings: Some(settings),
            window: None,
            ctx: None,
            app: None,
            pointer: PointerTracker::default(),
            next_tick: None,
            status: None,
        }
    }

    fn redraw(&mut self) {
        let (Some(ctx), Some(app)) = (&self.ctx, &mut self.app) else {
            return;
        };

        app.update(ctx);

        let surface_texture = match ctx.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                ctx.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Failed to acquire frame: {e}");
                return;
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        app.render(ctx, &mut encoder, &view);

        ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        app.tick();
    }
}

impl<A: App> ApplicationHandler for AppRunner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(settings) = self.settings.take() else {
            return;
        };

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(A::title())
                .with_inner_size(winit::dpi::LogicalSize::new(960, 720)),
        ) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let ctx = match pollster::block_on(GpuContext::new(window)) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("Failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };
        self.app = Some(A::init(&ctx, settings));
        self.ctx = Some(ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::RedrawRequested = event {
            self.redraw();
            return;
        }

        let (Some(ctx), Some(app)) = (&mut self.ctx, &mut self.app) else {
            return;
        };

        let pointer = match event {
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    ctx.resize(size.width, size.height);
                    app.on_resize(ctx);
                }
                None
            }
            WindowEvent::KeyboardInput {
                event,
                is_synthetic: false,
                ..
            } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if !event.repeat {
                        app.on_key(code, event.state == ElementState::Pressed);
                    }
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } => self.pointer.cursor_moved(position),
            WindowEvent::CursorLeft { .. } => self.pointer.cursor_left(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.pointer.mouse_button(state == ElementState::Pressed),
            WindowEvent::Touch(touch) => {
                Some(self.pointer.touch(touch.id, touch.phase, touch.location))
            }
            WindowEvent::DroppedFile(path) => {
                app.on_file_dropped(ctx, &path);
                None
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
                None
            }
            _ => None,
        };

        if let Some((phase, points)) = pointer {
            app.on_pointer(phase, &points);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = &mut self.app else {
            return;
        };

        let now = Instant::now();
        let interval = app.tick_interval();
        let next = self.next_tick.get_or_insert(now + interval);
        if now >= *next {
            app.tick();
            *next = now + interval;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(*next));

        if let Some(window) = &self.window {
            let status = app.status();
            if status != self.status {
                match &status {
                    Some(s) => window.set_title(&format!("{} - {s}", A::title())),
                    None => window.set_title(A::title()),
                }
                self.status = status;
            }
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    #[test]
    fn test_mouse_drag_is_one_finger_gesture() {
        let mut pointer = PointerTracker::default();
        assert!(pointer.cursor_moved(px(10.0, 20.0)).is_none());

        let (phase, points) = pointer.mouse_button(true).unwrap();
        assert_eq!(phase, GesturePhase::Began);
        assert_eq!(points, vec![px(10.0, 20.0)]);

        let (phase, points) = pointer.cursor_moved(px(15.0, 25.0)).unwrap();
        assert_eq!(phase, GesturePhase::Changed);
        assert_eq!(points, vec![px(15.0, 25.0)]);

        let (phase, points) = pointer.mouse_button(false).unwrap();
        assert_eq!(phase, GesturePhase::Ended);
        assert!(points.is_empty());
        assert!(pointer.mouse_button(false).is_none());
    }

    #[test]
    fn test_leaving_window_ends_drag() {
        let mut pointer = PointerTracker::default();
        pointer.cursor_moved(px(1.0, 1.0));
        pointer.mouse_button(true);
        let (phase, _) = pointer.cursor_left().unwrap();
        assert_eq!(phase, GesturePhase::Ended);
        assert!(pointer.cursor_moved(px(2.0, 2.0)).is_none());
    }

    #[test]
    fn test_touches_keep_start_order() {
        let mut pointer = PointerTracker::default();
        let (phase, _) = pointer.touch(7, TouchPhase::Started, px(1.0, 1.0));
        assert_eq!(phase, GesturePhase::Began);

        let (phase, points) = pointer.touch(3, TouchPhase::Started, px(2.0, 2.0));
        assert_eq!(phase, GesturePhase::Changed);
        assert_eq!(points, vec![px(1.0, 1.0), px(2.0, 2.0)]);

        let (_, points) = pointer.touch(7, TouchPhase::Moved, px(5.0, 5.0));
        assert_eq!(points, vec![px(5.0, 5.0), px(2.0, 2.0)]);
    }

    #[test]
    fn test_lifting_fingers() {
        let mut pointer = PointerTracker::default();
        pointer.touch(1, TouchPhase::Started, px(1.0, 1.0));
        pointer.touch(2, TouchPhase::Started, px(2.0, 2.0));

        let (phase, points) = pointer.touch(1, TouchPhase::Ended, px(1.0, 1.0));
        assert_eq!(phase, GesturePhase::Changed);
        assert_eq!(points, vec![px(2.0, 2.0)]);

        let (phase, points) = pointer.touch(2, TouchPhase::Ended, px(2.0, 2.0));
        assert_eq!(phase, GesturePhase::Ended);
        assert!(points.is_empty());
    }

    #[test]
    fn test_cancelled_touch() {
        let mut pointer = PointerTracker::default();
        pointer.touch(4, TouchPhase::Started, px(1.0, 1.0));
        let (phase, points) = pointer.touch(4, TouchPhase::Cancelled, px(1.0, 1.0));
        assert_eq!(phase, GesturePhase::Cancelled);
        assert!(points.is_empty());
    }
}
