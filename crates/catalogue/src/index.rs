use crate::entry::{AppRecord, EntryId};
use crate::iconpack::IconPack;
use crate::launch::{self, LaunchError};
use crate::source::{AppSource, SourceError};
use crate::store;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Upper bound for the menu seeded when nothing was stored yet.
pub const DEFAULT_MENU_SIZE: usize = 6;

/// Index of launchable apps plus the stored menu order.
///
/// Shared between the indexing task and the host, hence the locks.
#[derive(Debug)]
pub struct Catalogue {
    apps: RwLock<HashMap<EntryId, AppRecord>>,
    icon_pack: RwLock<IconPack>,
    menu_path: PathBuf,
    preferred: Vec<EntryId>,
}

impl Catalogue {
    pub fn new(menu_path: impl Into<PathBuf>) -> Self {
        Self {
            apps: RwLock::new(HashMap::new()),
            icon_pack: RwLock::new(IconPack::default()),
            menu_path: menu_path.into(),
            preferred: Vec::new(),
        }
    }

    /// Ids tried first when seeding an initial menu.
    pub fn with_preferred(mut self, preferred: Vec<EntryId>) -> Self {
        self.preferred = preferred;
        self
    }

    pub fn with_icon_pack(self, pack: IconPack) -> Self {
        *self.icon_pack.write() = pack;
        self
    }

    pub fn menu_path(&self) -> &Path {
        &self.menu_path
    }

    pub fn set_icon_pack(&self, pack: IconPack) {
        *self.icon_pack.write() = pack;
    }

    pub fn replace(&self, records: Vec<AppRecord>) {
        let apps = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        *self.apps.write() = apps;
    }

    /// Rescans `source` and swaps the index in one step.
    pub fn refresh(&self, source: &dyn AppSource) -> Result<usize, SourceError> {
        let records = source.scan()?;
        let count = records.len();
        self.replace(records);
        log::info!("Indexed {} apps", count);
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.apps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.read().is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<AppRecord> {
        self.apps.read().get(id).map(|r| self.decorate(r))
    }

    /// Looks up `ids` in order, skipping unknown and repeated ones.
    pub fn resolve(&self, ids: &[EntryId]) -> Vec<AppRecord> {
        let apps = self.apps.read();
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| apps.get(id))
            .map(|r| self.decorate(r))
            .collect()
    }

    /// Every indexed app, sorted by label.
    pub fn records(&self) -> Vec<AppRecord> {
        self.filter_by("")
    }

    /// Apps whose label contains `query`, ignoring case, sorted by label.
    pub fn filter_by(&self, query: &str) -> Vec<AppRecord> {
        let query = query.trim().to_lowercase();
        let mut list: Vec<AppRecord> = self
            .apps
            .read()
            .values()
            .filter(|r| query.is_empty() || r.label.to_lowercase().contains(&query))
            .map(|r| self.decorate(r))
            .collect();
        sort_by_label(&mut list);
        list
    }

    /// The menu in stored order, or a seeded default menu when the stored
    /// order resolves to nothing.
    pub fn list_entries(&self) -> Vec<AppRecord> {
        let stored = store::read_menu(&self.menu_path).unwrap_or_else(|e| {
            log::warn!("Failed to read menu {}: {}", self.menu_path.display(), e);
            Vec::new()
        });

        let entries = self.resolve(&stored);
        if entries.is_empty() {
            self.seed_defaults()
        } else {
            entries
        }
    }

    pub fn seed_defaults(&self) -> Vec<AppRecord> {
        let mut menu = self.resolve(&self.preferred);
        menu.truncate(DEFAULT_MENU_SIZE);

        let taken: HashSet<EntryId> = menu.iter().map(|r| r.id.clone()).collect();
        let mut rest: Vec<AppRecord> = self
            .apps
            .read()
            .values()
            .filter(|r| !taken.contains(&r.id))
            .map(|r| self.decorate(r))
            .collect();
        sort_by_label(&mut rest);

        let room = DEFAULT_MENU_SIZE.saturating_sub(menu.len());
        menu.extend(rest.into_iter().take(room));
        menu
    }

    /// Persists `order`. Failures are logged and reported as `false`; the
    /// caller's in-memory order stays authoritative.
    pub fn save_menu(&self, order: &[EntryId]) -> bool {
        match store::write_menu(&self.menu_path, order) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to store menu {}: {}", self.menu_path.display(), e);
                false
            }
        }
    }

    pub fn launch(&self, id: &EntryId) -> Result<(), LaunchError> {
        let app = self
            .get(id)
            .ok_or_else(|| LaunchError::Unknown(id.clone()))?;
        launch::spawn(&app)
    }

    fn decorate(&self, record: &AppRecord) -> AppRecord {
        let mut record = record.clone();
        if let Some(icon) = self.icon_pack.read().icon_for(&record.id) {
            record.icon = icon.to_path_buf();
        }
        record
    }
}

fn sort_by_label(list: &mut [AppRecord]) {
    list.sort_by_cached_key(|r| r.label.to_lowercase());
}
