//! Windowed host implementing the winit application lifecycle.
//!
//! Owns the engine, the mission source, and whichever rendering backend
//! the capability probe selected at mount. One `RedrawRequested` drives
//! one frame: measure wall dt, advance the simulation, forward events to
//! the sinks, sync and render.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use skywatch_core::events::SimEvent;
use skywatch_core::status::SimStatus;
use skywatch_render::Renderer;
use skywatch_sim::{PursuitEngine, SimConfig};

use crate::mission::MissionSource;

/// Telemetry and status callbacks owned by the surrounding application.
/// The simulation hands them one-way snapshots; nothing flows back.
pub struct Sinks {
    pub telemetry: Box<dyn FnMut(f32, f32)>,
    pub status: Box<dyn FnMut(SimStatus)>,
}

impl Sinks {
    /// Sinks that log through tracing.
    pub fn logging() -> Self {
        Self {
            telemetry: Box::new(|distance, interceptor_speed| {
                debug!(distance, interceptor_speed, "telemetry");
            }),
            status: Box::new(|status| {
                info!(%status, "mission complete");
            }),
        }
    }

    /// Forward a frame's events to the appropriate sinks.
    pub fn dispatch(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::Telemetry {
                    distance,
                    interceptor_speed,
                } => (self.telemetry)(*distance, *interceptor_speed),
                SimEvent::MissionEnded { status } => (self.status)(*status),
                SimEvent::MissionStarted { mission_name } => {
                    info!(mission = %mission_name, "mission active");
                }
                SimEvent::Burst { .. } => {}
            }
        }
    }
}

pub struct HostConfig {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

/// The windowed application.
pub struct SimApp {
    config: HostConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    engine: PursuitEngine,
    missions: MissionSource,
    sinks: Sinks,
    last_frame: Option<Instant>,
}

impl SimApp {
    pub fn new(config: HostConfig) -> Self {
        let engine = PursuitEngine::new(SimConfig { seed: config.seed });
        let missions = MissionSource::new(config.seed);
        Self {
            config,
            window: None,
            renderer: None,
            engine,
            missions,
            sinks: Sinks::logging(),
            last_frame: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title("SKYWATCH")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                warn!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        // Capability probe: 3D preferred, 2D canvas on failure. Made
        // once; the choice holds until unmount.
        self.renderer = Some(Renderer::windowed(window));

        self.new_mission();
    }

    fn new_mission(&mut self) {
        let params = self.missions.next_mission();
        info!(
            mission = %params.mission_name,
            briefing = %params.briefing,
            "mission briefing"
        );
        self.engine.start_mission(&params);
    }

    /// One rendered frame.
    fn frame(&mut self) {
        let now = Instant::now();
        let wall_dt = self
            .last_frame
            .map(|t| now.duration_since(t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let snapshot = self.engine.frame(wall_dt);
        self.sinks.dispatch(&snapshot.events);

        if let Some(renderer) = &mut self.renderer {
            renderer.sync(&snapshot);
            if let Err(e) = renderer.render() {
                // Transient surface losses resolve on a later frame.
                debug!("render skipped: {e}");
            }
        }
    }

    /// Release the renderer and leave the event loop. Teardown failures
    /// are reported but never block the unmount.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.take() {
            if let Err(e) = renderer.teardown() {
                warn!("renderer teardown: {e}");
            }
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for SimApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => self.shutdown(event_loop),
                    PhysicalKey::Code(KeyCode::KeyN) => self.new_mission(),
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use skywatch_core::types::Vec3;

    #[test]
    fn test_sinks_receive_matching_events() {
        let telemetry_calls = Rc::new(RefCell::new(Vec::new()));
        let status_calls = Rc::new(RefCell::new(Vec::new()));

        let t = telemetry_calls.clone();
        let s = status_calls.clone();
        let mut sinks = Sinks {
            telemetry: Box::new(move |d, v| t.borrow_mut().push((d, v))),
            status: Box::new(move |st| s.borrow_mut().push(st)),
        };

        sinks.dispatch(&[
            SimEvent::MissionStarted {
                mission_name: "IRON ARROW".to_string(),
            },
            SimEvent::Telemetry {
                distance: 12.0,
                interceptor_speed: 3.5,
            },
            SimEvent::Burst {
                position: Vec3::ZERO,
            },
            SimEvent::MissionEnded {
                status: SimStatus::Failure,
            },
        ]);

        assert_eq!(*telemetry_calls.borrow(), vec![(12.0, 3.5)]);
        assert_eq!(*status_calls.borrow(), vec![SimStatus::Failure]);
    }
}
