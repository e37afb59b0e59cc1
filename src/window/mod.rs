//! Spawn a winit window and drive the game from its event loop.

#[cfg(target_arch = "wasm32")]
mod web;

use std::sync::Arc;

use miette::{IntoDiagnostic, Result, WrapErr};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{config::Config, graphics::state::RenderState, Game};

/// Open the window and run the game until the window is closed.
///
/// # Errors
///
/// - When the event loop could not be created.
/// - When the window or the GPU surface could not be set up.
pub(crate) fn run(config: Config, game: Game) -> Result<()> {
    // Create a polling event loop, which redraws the window whenever possible
    let event_loop = EventLoop::<RenderState>::with_user_event()
        .build()
        .into_diagnostic()
        .wrap_err("Error creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::{EventLoopExtWebSys, PollStrategy, WaitUntilStrategy};

        // Ensure the game on the web runs as smooth as possible
        event_loop.set_poll_strategy(PollStrategy::IdleCallback);
        event_loop.set_wait_until_strategy(WaitUntilStrategy::Worker);
    }

    let mut app = App {
        #[cfg(target_arch = "wasm32")]
        event_loop_proxy: Some(event_loop.create_proxy()),
        config,
        game,
        window: None,
        render_state: None,
        error: None,
    };

    event_loop
        .run_app(&mut app)
        .into_diagnostic()
        .wrap_err("Error running event loop")?;

    // Report errors that happened inside of the event loop
    app.error.map_or(Ok(()), Err)
}

/// Window state which is uninitialized until winit resumes the application.
struct App {
    /// User supplied configuration.
    config: Config,
    /// Game state, runs independently of the window.
    game: Game,
    /// Window the game is drawn in.
    ///
    /// `None` if the window still needs to be created.
    window: Option<Arc<Window>>,
    /// GPU state.
    ///
    /// `None` until the GPU is set up, which happens asynchronously on the web.
    render_state: Option<RenderState>,
    /// Error that stopped the event loop.
    error: Option<miette::Report>,
    /// Proxy required to send the render state on the web platform.
    #[cfg(target_arch = "wasm32")]
    event_loop_proxy: Option<winit::event_loop::EventLoopProxy<RenderState>>,
}

impl App {
    /// Create the window and setup the GPU on it.
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        // Define the properties of the window
        #[allow(unused_mut)]
        let mut window_attributes = WindowAttributes::default()
            .with_title(&self.config.title)
            // Apply scaling for the requested size
            .with_inner_size(LogicalSize::new(
                self.config.window_size().width,
                self.config.window_size().height,
            ))
            // Don't allow the window to be smaller than the pixel size
            .with_min_inner_size(LogicalSize::new(
                self.config.grid_width,
                self.config.grid_height,
            ));

        #[cfg(target_arch = "wasm32")]
        {
            window_attributes = web::attach_canvas(window_attributes)?;
        }

        // Spawn a new window using the event loop
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .into_diagnostic()
                .wrap_err("Error creating window")?,
        );

        // Adjust the canvas for proper integer scale rendering
        #[cfg(target_arch = "wasm32")]
        web::style_canvas(&window, &self.config)?;

        self.window = Some(Arc::clone(&window));

        #[cfg(not(target_arch = "wasm32"))]
        {
            // Because pollster returns the value we can set it immediately
            let render_state = pollster::block_on(RenderState::new(&self.config, window))?;

            self.set_render_state(render_state);
        }
        #[cfg(target_arch = "wasm32")]
        {
            // We only need the proxy once to send the render state
            let event_loop_proxy = self
                .event_loop_proxy
                .take()
                .ok_or_else(|| miette::miette!("Window is already being set up"))?;
            let config = self.config.clone();

            wasm_bindgen_futures::spawn_local(async move {
                // Because WASM futures can't block we need to send it with a user event
                match RenderState::new(&config, window).await {
                    Ok(render_state) => {
                        if event_loop_proxy.send_event(render_state).is_err() {
                            log::warn!("Event loop closed before the GPU was set up");
                        }
                    }
                    Err(err) => log::error!("Error setting up GPU: {err:?}"),
                }
            });
        }

        Ok(())
    }

    /// GPU is ready, start ticking.
    fn set_render_state(&mut self, render_state: RenderState) {
        self.render_state = Some(render_state);

        log::info!("Starting game");
        self.game.start(Instant::now());
    }

    /// Whether the window is minimized, drawing can be skipped then.
    fn is_minimized(&self) -> bool {
        self.window
            .as_ref()
            .and_then(|window| window.is_minimized())
            .unwrap_or_default()
    }
}

impl ApplicationHandler<RenderState> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Setup the window
        if let Err(err) = self.create_window(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            // Handle the update loop and render loop
            WindowEvent::RedrawRequested => {
                // Do nothing if the GPU is not set up yet
                if self.render_state.is_none() {
                    return;
                }

                let now = Instant::now();

                // Fire all ticks that are due
                self.game.update(now);

                if !self.is_minimized() {
                    let pixels = self.game.render(now);

                    if let Some(render_state) = &mut self.render_state {
                        render_state.render(pixels);
                    }
                }
            }
            // Resize the render surface
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::Resized(winit::dpi::PhysicalSize { width, height }) => {
                if let Some(render_state) = &mut self.render_state {
                    render_state.resize(glamour::Size2::new(width, height));
                }

                // On MacOS the window needs to be redrawn manually after resizing
                #[cfg(target_os = "macos")]
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            // Close the window if requested
            WindowEvent::CloseRequested => {
                // Tell winit that we want to exit
                event_loop.exit();
            }
            // Quit with escape on the desktop
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed()
                    && event.physical_key
                        == winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape) =>
            {
                event_loop.exit();
            }
            // Handle the arrow keys
            WindowEvent::KeyboardInput { event, .. } => {
                self.game.handle_key_event(&event);
            }
            // Ignore the rest of the events
            _ => (),
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, render_state: RenderState) {
        // We received the render state from initializing, set it
        self.set_render_state(render_state);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        // Ensure the control flow doesn't change
        event_loop.set_control_flow(ControlFlow::Poll);

        // Application is about to wait, request a redraw
        window.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Stopping game after {} ticks", self.game.tick());

        // Release the tick schedule before the GPU and window are destroyed
        self.game.stop();
        self.render_state = None;
        self.window = None;
        #[cfg(target_arch = "wasm32")]
        {
            self.event_loop_proxy = None;
        }
    }
}
