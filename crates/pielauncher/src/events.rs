use crate::gui::controller::TouchEvent;
use crate::gui::menu::{Point, Viewport};
use catalogue::{AppRecord, EntryId};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Touch(TouchEvent),
    /// Host back action.
    Back,
    /// Long press on the menu: enter edit mode.
    Edit,
    /// An app was picked to be added; it follows the finger from `from`.
    Add { id: EntryId, from: Point },
    Resize(Viewport),
    CatalogueUpdated(Vec<AppRecord>),
    ConfigReload,
}
