//! App catalogue for the pie launcher: app records, search, icon-pack
//! overrides and the stored menu order.

pub mod entry;
pub mod iconpack;
pub mod index;
pub mod launch;
mod macros;
pub mod source;
pub mod store;

pub use entry::{AppLabel, AppRecord, EntryId, ExecCommand};
pub use iconpack::{IconName, IconPack, PackError};
pub use index::Catalogue;
pub use launch::LaunchError;
pub use source::{AppSource, ManifestSource, StaticSource};
