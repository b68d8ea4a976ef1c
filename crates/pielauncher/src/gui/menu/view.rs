use super::model::{MenuEntry, Viewport};
use super::targets::{ActionTarget, Rect, TargetLayout};
use crate::gui::theme::ThemeColors;
use palette::Srgba;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Drawing error: {0}")]
    Backend(String),
    #[cfg(feature = "cairo")]
    #[error(transparent)]
    Cairo(#[from] cairo::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Drawing primitives of one frame.
pub trait Canvas {
    /// Clears to fully transparent.
    fn clear(&mut self) -> Result<(), RenderError>;

    fn draw_target(
        &mut self,
        target: ActionTarget,
        rect: Rect,
        color: Srgba<f64>,
    ) -> Result<(), RenderError>;

    /// Draws the entry's icon centered at its position, `size` being the
    /// icon's radius. `tint` replaces the icon's colors when set.
    fn draw_entry(
        &mut self,
        entry: &MenuEntry,
        tint: Option<Srgba<f64>>,
        colors: &ThemeColors,
    ) -> Result<(), RenderError>;
}

/// A double-buffered drawing target.
pub trait Surface {
    /// `None` when no buffer is available; the frame is skipped.
    fn acquire(&mut self) -> Option<&mut dyn Canvas>;

    fn present(&mut self) -> Result<(), RenderError>;

    fn resize(&mut self, _viewport: Viewport) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Everything one frame paints, already laid out.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub visible: bool,
    pub entries: &'a [MenuEntry],
    pub selected: Option<usize>,
    /// Entry following the finger, drawn on top of the others.
    pub placing: Option<usize>,
    /// Present in edit mode only.
    pub targets: Option<&'a TargetLayout>,
    pub hovered_target: Option<ActionTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Placing,
    Selected,
    Idle,
}

impl EntryState {
    fn resolve(index: usize, frame: &Frame<'_>) -> Self {
        if frame.placing == Some(index) {
            Self::Placing
        } else if frame.selected == Some(index) {
            Self::Selected
        } else {
            Self::Idle
        }
    }

    fn tint(&self, colors: &ThemeColors) -> Option<Srgba<f64>> {
        match self {
            Self::Selected => Some(colors.selected),
            Self::Placing | Self::Idle => None,
        }
    }
}

pub fn draw(canvas: &mut dyn Canvas, frame: &Frame<'_>, colors: &ThemeColors) -> Result<(), RenderError> {
    canvas.clear()?;
    if !frame.visible {
        return Ok(());
    }

    if let Some(targets) = frame.targets {
        for (target, rect) in targets.iter() {
            let color = if frame.hovered_target == Some(target) {
                colors.target_hovered
            } else {
                colors.target
            };
            canvas.draw_target(target, rect, color)?;
        }
    }

    let states = frame
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry, EntryState::resolve(i, frame)));

    // the placed entry goes last so it stays on top
    let (placing, others): (Vec<_>, Vec<_>) =
        states.partition(|(_, state)| *state == EntryState::Placing);
    for (entry, state) in others.into_iter().chain(placing) {
        canvas.draw_entry(entry, state.tint(colors), colors)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::{Op, Recorder};
    use super::*;
    use crate::gui::menu::model::Point;
    use crate::gui::menu::targets::Axis;
    use catalogue::EntryId;
    use std::path::PathBuf;

    fn entries() -> Vec<MenuEntry> {
        ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let mut e = MenuEntry::new(EntryId::new(*n), PathBuf::new());
                e.move_to(Point::new(i as f64, 0.0));
                e
            })
            .collect()
    }

    fn frame<'a>(entries: &'a [MenuEntry]) -> Frame<'a> {
        Frame {
            visible: true,
            entries,
            selected: None,
            placing: None,
            targets: None,
            hovered_target: None,
        }
    }

    #[test]
    fn test_hidden_frame_only_clears() {
        let entries = entries();
        let mut recorder = Recorder::default();
        let hidden = Frame {
            visible: false,
            ..frame(&entries)
        };

        draw(&mut recorder, &hidden, &ThemeColors::default()).unwrap();
        recorder.present().unwrap();

        assert_eq!(recorder.ops, vec![Op::Clear]);
    }

    #[test]
    fn test_selected_entry_is_tinted() {
        let entries = entries();
        let mut recorder = Recorder::default();
        let selected = Frame {
            selected: Some(1),
            ..frame(&entries)
        };

        draw(&mut recorder, &selected, &ThemeColors::default()).unwrap();
        recorder.present().unwrap();

        assert_eq!(
            recorder.ops,
            vec![
                Op::Clear,
                Op::Entry("a".into(), 0.0, 0.0, false),
                Op::Entry("b".into(), 1.0, 0.0, true),
                Op::Entry("c".into(), 2.0, 0.0, false),
            ]
        );
    }

    #[test]
    fn test_edit_frame_draws_targets_then_placed_entry_last() {
        let entries = entries();
        let targets =
            TargetLayout::compute(Viewport::new(480.0, 800.0), Axis::Row, 48.0, 80.0);
        let mut recorder = Recorder::default();
        let editing = Frame {
            placing: Some(0),
            targets: Some(&targets),
            hovered_target: Some(ActionTarget::Info),
            ..frame(&entries)
        };

        draw(&mut recorder, &editing, &ThemeColors::default()).unwrap();
        recorder.present().unwrap();

        assert_eq!(
            &recorder.ops[..5],
            &[
                Op::Clear,
                Op::Target(ActionTarget::Add, false),
                Op::Target(ActionTarget::Remove, false),
                Op::Target(ActionTarget::Info, true),
                Op::Target(ActionTarget::Done, false),
            ]
        );
        assert_eq!(recorder.entries(), vec!["b", "c", "a"]);
    }
}
