use crate::gui::menu::{ActionTarget, Canvas, MenuEntry, Rect, RenderError, Surface, Viewport};
use crate::gui::theme::ThemeColors;
use cairo::{Context, Format, ImageSurface, Operator};
use palette::Srgba;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

/// Renders every frame into an image and writes it to `dir` as
/// `frame-NNNNN.png`.
pub struct PngSurface {
    image: ImageSurface,
    cr: Option<Context>,
    dir: PathBuf,
    frame: u64,
    icons: HashMap<PathBuf, Option<ImageSurface>>,
}

impl PngSurface {
    pub fn new(viewport: Viewport, dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let dir = dir.into();
        fs_err::create_dir_all(&dir)?;
        Ok(Self {
            image: Self::create_image(viewport)?,
            cr: None,
            dir,
            frame: 0,
            icons: HashMap::new(),
        })
    }

    pub fn last_frame_path(&self) -> Option<PathBuf> {
        (self.frame > 0).then(|| self.frame_path(self.frame))
    }

    fn create_image(viewport: Viewport) -> Result<ImageSurface, RenderError> {
        let width = viewport.width.round().max(1.0) as i32;
        let height = viewport.height.round().max(1.0) as i32;
        Ok(ImageSurface::create(Format::ARgb32, width, height)?)
    }

    fn frame_path(&self, frame: u64) -> PathBuf {
        self.dir.join(format!("frame-{frame:05}.png"))
    }

    fn context(&self) -> Result<&Context, RenderError> {
        self.cr
            .as_ref()
            .ok_or_else(|| RenderError::Backend("no frame in progress".into()))
    }

    fn icon(&mut self, path: &Path) -> Option<ImageSurface> {
        if path.as_os_str().is_empty() {
            return None;
        }
        self.icons
            .entry(path.to_path_buf())
            .or_insert_with(|| load_png(path))
            .clone()
    }
}

fn load_png(path: &Path) -> Option<ImageSurface> {
    let mut file = match fs_err::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Failed to open icon: {}", e);
            return None;
        }
    };
    match ImageSurface::create_from_png(&mut file) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Failed to decode icon {}: {}", path.display(), e);
            None
        }
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

impl Canvas for PngSurface {
    fn clear(&mut self) -> Result<(), RenderError> {
        let cr = self.context()?;
        cr.save()?;
        cr.set_operator(Operator::Clear);
        cr.paint()?;
        cr.restore()?;
        Ok(())
    }

    fn draw_target(
        &mut self,
        _target: ActionTarget,
        rect: Rect,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        let cr = self.context()?;
        set_color(cr, color);
        cr.arc(
            rect.left + rect.width() / 2.0,
            rect.top + rect.height() / 2.0,
            rect.width().min(rect.height()) / 2.0,
            0.0,
            2.0 * PI,
        );
        cr.fill()?;
        Ok(())
    }

    fn draw_entry(
        &mut self,
        entry: &MenuEntry,
        tint: Option<Srgba<f64>>,
        colors: &ThemeColors,
    ) -> Result<(), RenderError> {
        let icon = self.icon(&entry.icon);
        let cr = self.context()?;

        let Some(icon) = icon else {
            set_color(cr, tint.unwrap_or(colors.placeholder));
            cr.arc(entry.x, entry.y, entry.size, 0.0, 2.0 * PI);
            cr.fill()?;
            return Ok(());
        };

        // fit icon into a square of side 2 * size around the entry
        let side = entry.size * 2.0;
        let scale = side / f64::from(icon.width().max(icon.height()).max(1));

        cr.save()?;
        cr.translate(entry.x - entry.size, entry.y - entry.size);
        cr.scale(scale, scale);
        match tint {
            Some(color) => {
                set_color(cr, color);
                cr.mask_surface(&icon, 0.0, 0.0)?;
            }
            None => {
                cr.set_source_surface(&icon, 0.0, 0.0)?;
                cr.paint()?;
            }
        }
        cr.restore()?;
        Ok(())
    }
}

impl Surface for PngSurface {
    fn acquire(&mut self) -> Option<&mut dyn Canvas> {
        match Context::new(&self.image) {
            Ok(cr) => {
                self.cr = Some(cr);
                Some(self as &mut dyn Canvas)
            }
            Err(e) => {
                log::warn!("Failed to start frame: {}", e);
                None
            }
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        drop(self.cr.take());
        self.image.flush();

        self.frame += 1;
        let path = self.frame_path(self.frame);
        let mut file = fs_err::File::create(&path)?;
        self.image
            .write_to_png(&mut file)
            .map_err(|e| RenderError::Backend(e.to_string()))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.cr = None;
        self.image = Self::create_image(viewport)?;
        // icons are decoded again on demand, picking up replaced files
        self.icons.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::controller::{Controller, InteractionSettings, TouchEvent, TouchPhase};
    use catalogue::EntryId;
    use std::time::Duration;

    #[test]
    fn test_writes_png_frames() {
        let dir = tempfile::tempdir().unwrap();
        let viewport = Viewport::new(320.0, 240.0);
        let mut surface = PngSurface::new(viewport, dir.path()).unwrap();
        let entries = ["a", "b", "c"]
            .iter()
            .map(|n| MenuEntry::new(EntryId::new(*n), PathBuf::from("/nonexistent.png")))
            .collect();
        let mut controller = Controller::new(entries, viewport, InteractionSettings::default());

        controller.handle(TouchEvent::new(TouchPhase::Down, 160.0, 120.0, Duration::ZERO));
        assert!(controller.render(&mut surface).unwrap());

        let path = surface.last_frame_path().unwrap();
        let mut file = fs_err::File::open(&path).unwrap();
        let image = ImageSurface::create_from_png(&mut file).unwrap();
        assert_eq!((image.width(), image.height()), (320, 240));
    }

    #[test]
    fn test_resize_drops_icon_cache() {
        let dir = tempfile::tempdir().unwrap();
        let viewport = Viewport::new(320.0, 240.0);
        let mut surface = PngSurface::new(viewport, dir.path()).unwrap();
        let entries = ["a", "b"]
            .iter()
            .map(|n| MenuEntry::new(EntryId::new(*n), dir.path().join(format!("{n}.png"))))
            .collect();
        let mut controller = Controller::new(entries, viewport, InteractionSettings::default());

        controller.handle(TouchEvent::new(TouchPhase::Down, 160.0, 120.0, Duration::ZERO));
        assert!(controller.render(&mut surface).unwrap());
        assert_eq!(surface.icons.len(), 2);

        surface.resize(Viewport::new(200.0, 100.0)).unwrap();
        assert!(surface.icons.is_empty());
        assert_eq!((surface.image.width(), surface.image.height()), (200, 100));
    }
}
