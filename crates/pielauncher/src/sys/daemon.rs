use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::controller::{Controller, Intent};
use crate::gui::menu::{MenuEntry, Surface, Viewport};
use catalogue::{Catalogue, IconPack};

/// Owns all menu state. Events are applied one at a time, each followed by
/// at most one frame.
pub struct Daemon {
    controller: Controller,
    catalogue: Catalogue,
    surface: Box<dyn Surface>,
}

impl Daemon {
    pub fn new(config: &Config, catalogue: Catalogue, surface: Box<dyn Surface>) -> Self {
        let controller = Controller::new(
            menu_entries(&catalogue),
            config.viewport(),
            config.interaction(),
        )
        .with_colors(config.colors());
        Self {
            controller,
            catalogue,
            surface,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn handle(&mut self, event: AppEvent) -> Vec<Intent> {
        let intents = match event {
            AppEvent::Touch(touch) => self.controller.handle(touch),
            AppEvent::Back => {
                self.controller.back();
                Vec::new()
            }
            AppEvent::Edit => {
                self.controller.begin_edit();
                Vec::new()
            }
            AppEvent::Add { id, from } => {
                match self.catalogue.get(&id) {
                    Some(record) => self.controller.begin_add(MenuEntry::from(record), from),
                    None => log::warn!("Cannot add unknown app '{}'", id),
                }
                Vec::new()
            }
            AppEvent::Resize(viewport) => {
                self.resize(viewport);
                Vec::new()
            }
            AppEvent::CatalogueUpdated(records) => {
                self.catalogue.replace(records);
                self.refresh_menu();
                Vec::new()
            }
            AppEvent::ConfigReload => {
                self.reload_config();
                Vec::new()
            }
        };

        for intent in &intents {
            self.dispatch(intent);
        }
        if let Err(e) = self.controller.render(self.surface.as_mut()) {
            log::error!("Failed to render menu: {}", e);
        }
        intents
    }

    fn dispatch(&self, intent: &Intent) {
        match intent {
            Intent::Launch(id) => {
                if let Err(e) = self.catalogue.launch(id) {
                    log::error!("Failed to launch '{}': {}", id, e);
                }
            }
            Intent::EditCommitted(order) => {
                self.catalogue.save_menu(order);
            }
            Intent::OpenCatalogue => {
                log::info!("Open app list ({} apps)", self.catalogue.len());
            }
            Intent::ShowDetails(id) => match self.catalogue.get(id) {
                Some(record) => {
                    log::info!("Details: {} ({}) runs '{}'", record.label, id, record.exec)
                }
                None => log::info!("Details: {}", id),
            },
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if let Err(e) = self.surface.resize(viewport) {
            log::error!("Failed to resize surface: {}", e);
        }
        self.controller.resize(viewport);
    }

    fn reload_config(&mut self) {
        let config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        log::info!("Config reloaded");

        if let Some(path) = &config.icon_pack {
            match IconPack::load(path) {
                Ok(pack) => self.catalogue.set_icon_pack(pack),
                Err(e) => log::error!("Failed to load icon pack {}: {}", path.display(), e),
            }
        }
        self.controller.reconfigure(config.interaction());
        self.controller.set_colors(config.colors());
        self.resize(config.viewport());
        self.refresh_menu();
    }

    fn refresh_menu(&mut self) {
        let known = self
            .catalogue
            .records()
            .into_iter()
            .map(MenuEntry::from)
            .collect();
        self.controller
            .apply_catalogue(menu_entries(&self.catalogue), known);
    }
}

pub fn menu_entries(catalogue: &Catalogue) -> Vec<MenuEntry> {
    catalogue
        .list_entries()
        .into_iter()
        .map(MenuEntry::from)
        .collect()
}
