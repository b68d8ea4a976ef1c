use crate::gui::menu::{ActionTarget, Canvas, MenuEntry, Rect, RenderError, Surface};
use crate::gui::theme::ThemeColors;
use palette::Srgba;

/// Headless surface: every frame goes to the log.
#[derive(Debug, Default)]
pub struct LogSurface {
    frames: u64,
    items: usize,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Canvas for LogSurface {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.items = 0;
        Ok(())
    }

    fn draw_target(
        &mut self,
        target: ActionTarget,
        rect: Rect,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        self.items += 1;
        log::trace!(
            "target {} at ({}, {}) {}x{} alpha {}",
            target,
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            color.alpha
        );
        Ok(())
    }

    fn draw_entry(
        &mut self,
        entry: &MenuEntry,
        tint: Option<Srgba<f64>>,
        _colors: &ThemeColors,
    ) -> Result<(), RenderError> {
        self.items += 1;
        log::trace!(
            "entry '{}' at ({:.1}, {:.1}) size {:.1}{}",
            entry.id,
            entry.x,
            entry.y,
            entry.size,
            if tint.is_some() { " selected" } else { "" }
        );
        Ok(())
    }
}

impl Surface for LogSurface {
    fn acquire(&mut self) -> Option<&mut dyn Canvas> {
        Some(self as &mut dyn Canvas)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.frames += 1;
        log::debug!("Frame {}: {} items", self.frames, self.items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::controller::{Controller, InteractionSettings, TouchEvent, TouchPhase};
    use crate::gui::menu::Viewport;
    use catalogue::EntryId;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_counts_presented_frames() {
        let entries = ["a", "b"]
            .iter()
            .map(|n| MenuEntry::new(EntryId::new(*n), PathBuf::new()))
            .collect();
        let mut controller = Controller::new(
            entries,
            Viewport::new(400.0, 400.0),
            InteractionSettings::default(),
        );
        let mut surface = LogSurface::new();

        controller.handle(TouchEvent::new(TouchPhase::Down, 200.0, 200.0, Duration::ZERO));
        controller.render(&mut surface).unwrap();
        controller.render(&mut surface).unwrap();

        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.items, 2);
    }
}
