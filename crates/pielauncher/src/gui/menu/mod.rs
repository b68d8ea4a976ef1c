pub mod edit;
pub mod model;
pub mod targets;
pub mod view;

pub use edit::EditSession;
pub use model::{Center, Menu, MenuEntry, Point, Viewport};
pub use targets::{ActionTarget, Axis, Rect, TargetLayout};
pub use view::{Canvas, Frame, RenderError, Surface, draw};

/// Share of the shorter viewport side one icon may take before the menu
/// radius gets capped.
pub const RADIUS_RATIO: f64 = 0.28;
pub const MAX_ICON_SIZE: f64 = 64.0; // dp
pub const TARGET_SIZE: f64 = 48.0; // dp
pub const TARGET_PADDING: f64 = 80.0; // dp
