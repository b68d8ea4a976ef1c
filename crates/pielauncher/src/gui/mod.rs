pub mod controller;
pub mod menu;
#[cfg(feature = "cairo")]
pub mod png;
pub mod theme;
