//=========================================================================
// Platform Subsystem
//
// Owns the OS window and services winit cooperatively from the mode loops.
//
// Architecture:
// ```text
//  Mode loop (main thread)
//   │
//   └─ Platform::pump()
//        ├─ EventLoop::pump_app_events(0ms) ─► WindowShell (ApplicationHandler)
//        │                                      ├─ InputProcessor
//        │                                      ├─ InputBuffer
//        │                                      └─ about_to_wait: flush ─┐
//        │                                                               │
//        └─ EventCollector::collect_frame() ◄── crossbeam channel ◄──────┘
//              └─► PlatformFrame { inputs, close_requested }
// ```
//
// Key Design Decisions:
// - **Pump, don't run**: the control loop owns the thread, so winit is
//   pumped with a zero timeout instead of `run_app`
// - **about_to_wait = frame boundary**: buffered input is flushed once
//   per pump
// - **Main thread requirement**: winit mandates the main thread on macOS,
//   so the platform lives wherever the control loop runs
//
//=========================================================================

//=== Submodules ==========================================================

mod event_collector;
mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::time::Duration;

use crossbeam_channel::{unbounded, Sender};
use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::input::InputEvent;
use event_collector::EventCollector;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== PlatformFrame =======================================================

/// Everything the platform produced since the previous pump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformFrame {
    pub inputs: Vec<InputEvent>,

    /// The user or the OS asked to close the window.
    pub close_requested: bool,
}

//=== PlatformEvent =======================================================

/// Messages from the winit handler to the collector.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// One flushed input batch. Never empty.
    Inputs(Vec<InputEvent>),

    WindowClosed,
}

//=== PlatformError =======================================================

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[from] EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error("platform used before the window was opened")]
    NotOpen,
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window plus pump-driven event loop.
///
/// # Lifecycle
///
/// 1. `Platform::new(config)`: no OS resources yet
/// 2. `open()`: creates the event loop and pumps until the window exists
/// 3. `pump()`: once per mode-loop iteration
/// 4. `close()`: drops the window and the event loop
///
/// Not `Send`: winit's event loop stays on the thread that created it.
pub struct Platform {
    event_loop: Option<EventLoop<()>>,
    shell: WindowShell,
    collector: EventCollector,
}

impl Platform {
    /// Number of pumps `open()` waits for the window to appear.
    const OPEN_ATTEMPTS: usize = 50;

    pub fn new(config: WindowConfig) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            event_loop: None,
            shell: WindowShell::new(config, sender),
            collector: EventCollector::new(receiver),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Creates the event loop and the window. Idempotent.
    pub fn open(&mut self) -> Result<(), PlatformError> {
        if self.event_loop.is_some() {
            return Ok(());
        }
        debug!(target: "platform", "Creating event loop");
        let mut event_loop = EventLoop::new()?;

        for _ in 0..Self::OPEN_ATTEMPTS {
            let status =
                event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut self.shell);
            if let Some(reason) = self.shell.creation_error.take() {
                return Err(PlatformError::WindowCreation(reason));
            }
            if self.shell.window.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                return Err(PlatformError::WindowCreation(format!(
                    "event loop exited with code {code} before the window opened"
                )));
            }
        }

        if self.shell.window.is_none() {
            return Err(PlatformError::WindowCreation(
                "window did not appear".to_string(),
            ));
        }
        self.event_loop = Some(event_loop);
        Ok(())
    }

    /// Services pending OS events without blocking.
    pub fn pump(&mut self) -> Result<PlatformFrame, PlatformError> {
        let event_loop = self.event_loop.as_mut().ok_or(PlatformError::NotOpen)?;
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.shell);

        let mut frame = self.collector.collect_frame();
        if let PumpStatus::Exit(code) = status {
            debug!(target: "platform", "Event loop exit requested (code {code})");
            frame.close_requested = true;
        }
        Ok(frame)
    }

    pub fn close(&mut self) {
        if self.shell.window.take().is_some() {
            info!(target: "platform", "Window closed");
        }
        self.event_loop = None;
    }

    //--- Queries ----------------------------------------------------------

    pub fn window_id(&self) -> Option<u64> {
        self.shell.window.as_ref().map(|window| u64::from(window.id()))
    }

    pub fn is_open(&self) -> bool {
        self.event_loop.is_some()
    }
}

//=== WindowShell =========================================================

/// The winit-facing half of the platform.
struct WindowShell {
    config: WindowConfig,
    window: Option<Window>,
    creation_error: Option<String>,
    buffer: InputBuffer,
    input_processor: InputProcessor,
    event_sender: Sender<PlatformEvent>,
}

impl WindowShell {
    fn new(config: WindowConfig, event_sender: Sender<PlatformEvent>) -> Self {
        Self {
            config,
            window: None,
            creation_error: None,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            event_sender,
        }
    }

    fn window_attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
    }

    /// Sends buffered input to the collector. Empty buffers send nothing.
    fn flush_input_buffer(&mut self) {
        if let Some(batch) = self.buffer.drain() {
            trace!(target: "platform::input", "Flushing {} events", batch.len());
            if self.event_sender.send(PlatformEvent::Inputs(batch)).is_err() {
                warn!(target: "platform::input", "Collector gone, dropping input batch");
            }
        }
    }

    fn send_close(&self) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowShell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.creation_error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush_input_buffer();
                self.send_close();
                event_loop.exit();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_processor.update_modifiers(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.buffer.push_continuous(event);
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push_discrete(event);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.flush_input_buffer();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
