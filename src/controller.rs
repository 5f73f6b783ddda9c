use std::time::{Duration, Instant};

use tracing::{info, trace, warn};

use crate::angles::AngleSet;
use crate::config::{Catalog, CityOffset, ClockConfig, Theme};
use crate::error::Result;
use crate::renderer::SceneRenderer;
use crate::scene::Surface;
use crate::time::{resolve, TimeSource};

/// Re-arms the tick callback.
pub trait Scheduler {
    /// Requests one more tick after `delay`, replacing any pending request.
    fn schedule(&mut self, delay: Duration);
}

/// Deadline-based scheduler polled by the host event loop.
#[derive(Debug, Default, Clone)]
pub struct DeadlineScheduler {
    deadline: Option<Instant>,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the pending deadline has passed. Consumes the deadline.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Scheduler for DeadlineScheduler {
    fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Initializing,
    Running,
}

/// Owns the active theme and city and drives both render passes.
pub struct ClockController<T> {
    catalog: Catalog,
    theme: usize,
    city: usize,
    tick_interval: Duration,
    renderer: SceneRenderer,
    time_source: T,
    state: ClockState,
}

impl<T: TimeSource> ClockController<T> {
    pub fn new(catalog: Catalog, config: &ClockConfig, time_source: T) -> Result<Self> {
        let theme = catalog.theme_index(&config.default_theme)?;
        let city = catalog.city_index(&config.default_city)?;
        Ok(Self {
            catalog,
            theme,
            city,
            tick_interval: config.tick_interval,
            renderer: SceneRenderer::new(config),
            time_source,
            state: ClockState::Initializing,
        })
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn theme(&self) -> &Theme {
        &self.catalog.themes()[self.theme]
    }

    pub fn city(&self) -> &CityOffset {
        &self.catalog.cities()[self.city]
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Draws the face and hands and arms the first tick.
    pub fn start<S: Surface>(&mut self, surface: &mut S, scheduler: &mut impl Scheduler) -> Result<()> {
        info!(theme = %self.theme().name, city = %self.city().name, "clock starting");
        self.redraw_all(surface)?;
        scheduler.schedule(self.tick_interval);
        self.state = ClockState::Running;
        Ok(())
    }

    /// One tick: resolve, compute angles, redraw hands, re-arm.
    ///
    /// A late tick is not compensated; the next one is armed relative to now.
    pub fn on_tick<S: Surface>(&mut self, surface: &mut S, scheduler: &mut impl Scheduler) -> Result<()> {
        self.draw_hands(surface)?;
        scheduler.schedule(self.tick_interval);
        Ok(())
    }

    /// Swaps the theme and repaints everything. Unknown names leave the
    /// current state untouched.
    pub fn select_theme<S: Surface>(&mut self, name: &str, surface: &mut S) -> Result<()> {
        let index = self.catalog.theme_index(name).inspect_err(|e| {
            warn!(error = %e, "theme change rejected");
        })?;
        self.theme = index;
        info!(theme = %name, "theme changed");
        self.redraw_all(surface)
    }

    /// Swaps the city. The hands pick it up on the next tick.
    pub fn select_city(&mut self, name: &str) -> Result<()> {
        let index = self.catalog.city_index(name).inspect_err(|e| {
            warn!(error = %e, "city change rejected");
        })?;
        self.city = index;
        info!(city = %name, offset = self.city().utc_offset_hours, "city changed");
        Ok(())
    }

    pub fn next_theme<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let themes = self.catalog.themes();
        let name = themes[(self.theme + 1) % themes.len()].name.clone();
        self.select_theme(&name, surface)
    }

    pub fn next_city(&mut self) -> Result<()> {
        let cities = self.catalog.cities();
        let name = cities[(self.city + 1) % cities.len()].name.clone();
        self.select_city(&name)
    }

    fn redraw_all<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let theme = &self.catalog.themes()[self.theme];
        self.renderer.draw_face(surface, theme);
        // the face pass cleared the hands
        self.draw_hands(surface)
    }

    fn draw_hands<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let now = self.time_source.now()?;
        let city = &self.catalog.cities()[self.city];
        let time = resolve(now, city.utc_offset_hours)?;
        let angles = AngleSet::from_time(&time);
        trace!(time = %time.display, city = %city.name, "tick");

        let theme = &self.catalog.themes()[self.theme];
        self.renderer
            .draw_hands(surface, theme, &time, &angles, &city.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_scheduler_fires_once() {
        let mut scheduler = DeadlineScheduler::new();
        assert!(!scheduler.take_due(Instant::now()));

        scheduler.schedule(Duration::ZERO);
        let deadline = scheduler.deadline().unwrap();
        assert!(scheduler.take_due(deadline));
        assert!(!scheduler.take_due(deadline));
    }

    #[test]
    fn deadline_scheduler_waits() {
        let mut scheduler = DeadlineScheduler::new();
        scheduler.schedule(Duration::from_secs(60));
        assert!(!scheduler.take_due(Instant::now()));
        assert!(scheduler.deadline().is_some());
    }

    #[test]
    fn rescheduling_replaces_pending_deadline() {
        let mut scheduler = DeadlineScheduler::new();
        scheduler.schedule(Duration::from_secs(60));
        let first = scheduler.deadline().unwrap();
        scheduler.schedule(Duration::ZERO);
        assert!(scheduler.deadline().unwrap() < first);
    }
}
