//! Touch handling for the pie menu.
//!
//! The controller owns the menu and the edit session. Every touch event is
//! handled to completion and may produce intents for the host; painting is
//! a separate step that only happens when the touch state changed since the
//! last frame.

use crate::gui::menu::{
    self, ActionTarget, Axis, Center, EditSession, Frame, Menu, MenuEntry, Point, RenderError,
    Surface, TargetLayout, Viewport, model,
};
use crate::gui::theme::ThemeColors;
use catalogue::EntryId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: Point,
    /// Event time on a monotonic clock.
    pub time: Duration,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, x: f64, y: f64, time: Duration) -> Self {
        Self {
            phase,
            point: Point::new(x, y),
            time,
        }
    }
}

/// What the host should do after a touch event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Show the full app list (or the entry picker while editing).
    OpenCatalogue,
    Launch(EntryId),
    /// Persist this order.
    EditCommitted(Vec<EntryId>),
    /// Show details of this entry.
    ShowDetails(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchState {
    /// No finger down.
    #[default]
    Inactive,
    /// Never equal to a real touch, so the next render paints.
    Invalidated,
    Active(Point),
}

impl TouchState {
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Active(p) => Some(*p),
            Self::Inactive | Self::Invalidated => None,
        }
    }
}

/// Pixel values, already scaled by display density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub tap_timeout: Duration,
    pub touch_slop: f64,
    pub max_icon_size: f64,
    pub target_size: f64,
    pub target_padding: f64,
    /// `None` follows the longer viewport side.
    pub target_axis: Option<Axis>,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            tap_timeout: Duration::from_millis(180),
            touch_slop: 10.0,
            max_icon_size: menu::MAX_ICON_SIZE,
            target_size: menu::TARGET_SIZE,
            target_padding: menu::TARGET_PADDING,
            target_axis: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    point: Point,
    time: Duration,
}

pub struct Controller {
    menu: Menu,
    edit: Option<EditSession>,
    viewport: Viewport,
    radius: f64,
    targets: TargetLayout,
    touch: TouchState,
    last_rendered: TouchState,
    press: Option<Press>,
    settings: InteractionSettings,
    colors: ThemeColors,
}

impl Controller {
    pub fn new(entries: Vec<MenuEntry>, viewport: Viewport, settings: InteractionSettings) -> Self {
        let mut controller = Self {
            menu: Menu::new(entries, settings.max_icon_size),
            edit: None,
            viewport,
            radius: 0.0,
            targets: TargetLayout::default(),
            touch: TouchState::Inactive,
            last_rendered: TouchState::Inactive,
            press: None,
            settings,
            colors: ThemeColors::default(),
        };
        controller.resize(viewport);
        controller
    }

    pub fn with_colors(mut self, colors: ThemeColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn set_colors(&mut self, colors: ThemeColors) {
        self.colors = colors;
        self.invalidate_view();
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn touch(&self) -> TouchState {
        self.touch
    }

    pub fn targets(&self) -> &TargetLayout {
        &self.targets
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Idle and untouched shows nothing.
    pub fn is_visible(&self) -> bool {
        self.touch.point().is_some() || self.is_editing()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.radius = model::menu_radius(viewport, self.settings.max_icon_size);
        let axis = self
            .settings
            .target_axis
            .unwrap_or_else(|| Axis::for_viewport(viewport));
        self.targets = TargetLayout::compute(
            viewport,
            axis,
            self.settings.target_size,
            self.settings.target_padding,
        );
        let center = self.menu.center();
        self.set_center(center.point());
        self.invalidate_view();
        log::debug!(
            "Viewport {}x{}, menu radius {}",
            viewport.width,
            viewport.height,
            self.radius
        );
    }

    pub fn reconfigure(&mut self, settings: InteractionSettings) {
        self.settings = settings;
        self.menu.set_max_icon_size(settings.max_icon_size);
        self.resize(self.viewport);
    }

    pub fn handle(&mut self, event: TouchEvent) -> Vec<Intent> {
        match event.phase {
            TouchPhase::Down => {
                self.touch = TouchState::Active(event.point);
                self.on_down(event);
                Vec::new()
            }
            TouchPhase::Move => {
                self.touch = TouchState::Active(event.point);
                if let Some(session) = self.edit.as_mut() {
                    session.drag(&mut self.menu, event.point);
                }
                Vec::new()
            }
            TouchPhase::Up => {
                self.touch = TouchState::Active(event.point);
                let intents = self.on_up(event);
                self.touch = TouchState::Inactive;
                intents
            }
            TouchPhase::Cancel => {
                self.cancel_gesture();
                Vec::new()
            }
        }
    }

    /// Enters edit mode without lifting anything.
    pub fn begin_edit(&mut self) {
        if self.edit.is_none() {
            self.set_center(self.viewport.center());
            self.edit = Some(EditSession::start(&self.menu));
            self.invalidate_view();
            log::debug!("Entered edit mode");
        }
    }

    /// Enters edit mode with `entry` following the finger from `from`, as
    /// after picking an app to add.
    pub fn begin_add(&mut self, entry: MenuEntry, from: Point) {
        self.begin_edit();
        self.touch = TouchState::Active(from);
        if let Some(session) = self.edit.as_mut() {
            session.place(&mut self.menu, entry, from);
        }
        self.invalidate_view();
    }

    /// Leaves edit mode keeping the current order.
    pub fn end_edit(&mut self) -> Option<Intent> {
        let session = self.edit.take()?;
        let order = session.commit(&self.menu);
        self.invalidate_view();
        log::info!("Menu edited, {} entries", order.len());
        Some(Intent::EditCommitted(order))
    }

    /// Back action: leaves edit mode restoring the order it started with.
    /// Returns `false` when there was nothing to cancel.
    pub fn back(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        session.cancel(&mut self.menu);
        self.touch = TouchState::Inactive;
        self.invalidate_view();
        log::debug!("Edit cancelled");
        true
    }

    /// Takes fresh catalogue data without breaking a gesture or an edit
    /// session in progress. When idle `menu` becomes the menu; while
    /// editing the session keeps its order and drops only entries missing
    /// from `known`, the full set of installed apps.
    pub fn apply_catalogue(&mut self, menu: Vec<MenuEntry>, known: Vec<MenuEntry>) {
        match self.edit.as_mut() {
            Some(session) => {
                let fresh: HashMap<EntryId, PathBuf> =
                    known.into_iter().map(|e| (e.id, e.icon)).collect();
                session.reconcile(&mut self.menu, &fresh);
            }
            None => self.menu.replace(menu),
        }
        self.invalidate_view();
    }

    /// Paints a frame unless nothing changed since the last one. Returns
    /// whether a frame was presented.
    pub fn render(&mut self, surface: &mut dyn Surface) -> Result<bool, RenderError> {
        if self.touch == self.last_rendered {
            return Ok(false);
        }
        let Some(canvas) = surface.acquire() else {
            log::debug!("No drawing buffer, skipping frame");
            return Ok(false);
        };

        self.update_layout();
        let frame = self.frame();
        menu::draw(canvas, &frame, &self.colors)?;
        surface.present()?;

        self.last_rendered = self.touch;
        Ok(true)
    }

    /// Lays the menu out for the current touch; the entry being placed
    /// sits under the finger instead of in its slot.
    pub fn update_layout(&mut self) {
        if !self.is_visible() {
            return;
        }
        self.menu.layout();

        let placing = self.edit.as_ref().and_then(EditSession::placing_index);
        if let (Some(index), Some(touch)) = (placing, self.touch.point())
            && let Some(entry) = self.menu.entry_mut(index)
        {
            entry.move_to(touch);
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        let touch = self.touch.point();
        let editing = self.is_editing();
        Frame {
            visible: self.is_visible(),
            entries: self.menu.entries(),
            selected: touch
                .filter(|_| !editing)
                .and_then(|t| self.menu.selected_index(t)),
            placing: self.edit.as_ref().and_then(EditSession::placing_index),
            targets: editing.then_some(&self.targets),
            hovered_target: touch
                .filter(|_| editing)
                .and_then(|t| self.targets.hit(t)),
        }
    }

    fn on_down(&mut self, event: TouchEvent) {
        if self.edit.is_some() {
            self.menu.layout();
            if let Some(index) = self.menu.entry_at(event.point)
                && let Some(session) = self.edit.as_mut()
            {
                session.lift(&mut self.menu, index, event.point);
            }
        } else {
            self.press = Some(Press {
                point: event.point,
                time: event.time,
            });
            self.set_center(event.point);
        }
    }

    fn on_up(&mut self, event: TouchEvent) -> Vec<Intent> {
        if self.edit.is_some() {
            return self.release_in_edit(event.point);
        }

        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        let elapsed = event.time.saturating_sub(press.time);
        let slop = self.settings.touch_slop;
        if elapsed <= self.settings.tap_timeout && press.point.distance_sq(event.point) <= slop * slop
        {
            return vec![Intent::OpenCatalogue];
        }

        self.menu
            .selected(event.point)
            .map(|entry| vec![Intent::Launch(entry.id.clone())])
            .unwrap_or_default()
    }

    fn release_in_edit(&mut self, point: Point) -> Vec<Intent> {
        let target = self.targets.hit(point);
        let Some(session) = self.edit.as_mut() else {
            return Vec::new();
        };

        match target {
            Some(ActionTarget::Done) => self.end_edit().into_iter().collect(),
            Some(ActionTarget::Remove) => {
                session.discard(&mut self.menu);
                self.end_edit().into_iter().collect()
            }
            Some(ActionTarget::Add) => self
                .end_edit()
                .into_iter()
                .chain([Intent::OpenCatalogue])
                .collect(),
            Some(ActionTarget::Info) => session
                .drop_placement(&self.menu)
                .map(Intent::ShowDetails)
                .into_iter()
                .collect(),
            None => {
                session.drop_placement(&self.menu);
                Vec::new()
            }
        }
    }

    fn cancel_gesture(&mut self) {
        self.touch = TouchState::Inactive;
        self.press = None;
        if let Some(session) = self.edit.as_mut() {
            session.restore_placement(&mut self.menu);
        }
    }

    fn set_center(&mut self, point: Point) {
        self.menu
            .set_center(Center::clamped(point, self.radius, self.viewport));
    }

    fn invalidate_view(&mut self) {
        self.last_rendered = TouchState::Invalidated;
    }
}
