// ============================================================================
// ZONECLOCK
// ============================================================================
//
// A multi-zone analog clock. Wall-clock time for a fixed whole-hour UTC offset
// is turned into hand angles, the angles into canvas geometry, and the
// geometry into a retained scene that keeps the static face separate from the
// hands redrawn every tick.

pub mod angles;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod time;

pub use angles::AngleSet;
pub use app::run;
pub use config::{Catalog, CityOffset, ClockConfig, Color, Theme};
pub use controller::{ClockController, ClockState, DeadlineScheduler, Scheduler};
pub use error::{ClockError, Result};
pub use geometry::{project, Point, Rect};
pub use renderer::{FaceLayout, HandHandles, SceneRenderer};
pub use scene::{Primitive, PrimitiveId, Scene, Surface};
pub use time::{resolve, FixedTimeSource, ResolvedTime, SystemTimeSource, TimeSource};
