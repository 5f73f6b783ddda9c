use std::sync::Arc;
use std::time::Instant;

use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::config::{Catalog, ClockConfig};
use crate::controller::{ClockController, DeadlineScheduler};
use crate::error::{ClockError, Result};
use crate::raster::{load_font, Canvas, Rasterizer};
use crate::scene::Scene;
use crate::time::{SystemTimeSource, TimeSource};

/// What a key press asks the clock to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    NextTheme,
    NextCity,
    Quit,
}

fn selection_for(event: &KeyEvent) -> Option<Selection> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.logical_key.as_ref() {
        Key::Character(c) if c.eq_ignore_ascii_case("t") => Some(Selection::NextTheme),
        Key::Character(c) if c.eq_ignore_ascii_case("c") => Some(Selection::NextCity),
        Key::Named(NamedKey::Escape) => Some(Selection::Quit),
        _ => None,
    }
}

fn window_title<T: TimeSource>(config: &ClockConfig, controller: &ClockController<T>) -> String {
    format!(
        "{} ({} / {})",
        config.title,
        controller.theme().name,
        controller.city().name
    )
}

/// Opens the clock window and runs until it is closed.
///
/// `T` switches themes, `C` switches cities, `Escape` quits.
pub fn run(config: ClockConfig) -> Result<()> {
    let catalog = Catalog::builtin()?;
    let font = load_font(config.font_path.as_deref())?;
    let mut controller = ClockController::new(catalog, &config, SystemTimeSource)?;

    let width = config.window_width as u32;
    let height = config.window_height as u32;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(window_title(&config, &controller))
        .with_inner_size(LogicalSize::new(f64::from(width), f64::from(height)))
        .with_resizable(false)
        .build(&event_loop)?;
    let window: Arc<Window> = Arc::new(window);

    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(width, height, surface_texture)?;

    let rasterizer = Rasterizer::new(font);
    let mut scene = Scene::new(controller.theme().background);
    let mut scheduler = DeadlineScheduler::new();
    controller.start(&mut scene, &mut scheduler)?;
    info!(width, height, "window open");

    let mut fatal: Option<ClockError> = None;
    let fatal_slot = &mut fatal;
    let window_clone = window.clone();

    event_loop.run(move |event, window_target| {
        let outcome = match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                    Ok(())
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        error!(error = %e, "surface resize failed");
                    }
                    window_clone.request_redraw();
                    Ok(())
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let result = match selection_for(&event) {
                        Some(Selection::NextTheme) => controller.next_theme(&mut scene),
                        Some(Selection::NextCity) => controller.next_city(),
                        Some(Selection::Quit) => {
                            window_target.exit();
                            Ok(())
                        }
                        None => Ok(()),
                    };
                    window_clone.set_title(&window_title(&config, &controller));
                    result
                }
                WindowEvent::RedrawRequested => {
                    let mut canvas = Canvas::new(pixels.frame_mut(), width as usize, height as usize);
                    rasterizer.render(&scene, &mut canvas);
                    pixels.render().map_err(ClockError::from)
                }
                _ => Ok(()),
            },
            Event::AboutToWait => {
                if scheduler.take_due(Instant::now()) {
                    controller.on_tick(&mut scene, &mut scheduler)
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            // a rejected selection leaves the previous state valid
            if !e.is_configuration() {
                error!(error = %e, "fatal error, closing");
                *fatal_slot = Some(e);
                window_target.exit();
                return;
            }
        }

        if scene.take_dirty() {
            window_clone.request_redraw();
        }
        if let Some(deadline) = scheduler.deadline() {
            window_target.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    })?;

    fatal.map_or(Ok(()), Err)
}
