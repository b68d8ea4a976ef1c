use super::model::{Menu, MenuEntry, Point, insertion_index};
use catalogue::EntryId;
use std::collections::HashMap;
use std::path::PathBuf;

/// An entry following the finger until it is dropped.
#[derive(Debug, Clone)]
struct Placement {
    entry: MenuEntry,
    /// Index the entry was lifted from; `None` for an entry being added.
    origin: Option<usize>,
    /// Where it is spliced into the live menu right now.
    index: usize,
}

/// State of one edit session.
///
/// While an entry is being placed the live menu is `icons_before_edit`
/// with that entry spliced in, otherwise it equals `icons_before_edit`.
/// So its length is the snapshot's or one more, and no id shows up twice.
#[derive(Debug, Clone)]
pub struct EditSession {
    icons_before_edit: Vec<MenuEntry>,
    initial_order: Vec<MenuEntry>,
    placement: Option<Placement>,
}

impl EditSession {
    pub fn start(menu: &Menu) -> Self {
        Self {
            icons_before_edit: menu.entries().to_vec(),
            initial_order: menu.entries().to_vec(),
            placement: None,
        }
    }

    pub fn icons_before_edit(&self) -> &[MenuEntry] {
        &self.icons_before_edit
    }

    pub fn placing(&self) -> Option<&MenuEntry> {
        self.placement.as_ref().map(|p| &p.entry)
    }

    /// Index of the entry being placed within the live menu.
    pub fn placing_index(&self) -> Option<usize> {
        self.placement.as_ref().map(|p| p.index)
    }

    /// Takes the entry at `index` out of the menu and starts placing it.
    pub fn lift(&mut self, menu: &mut Menu, index: usize, touch: Point) -> bool {
        self.drop_placement(menu);
        let Some(entry) = menu.remove(index) else {
            return false;
        };
        log::debug!("Lifted '{}' from slot {}", entry.id, index);
        self.icons_before_edit = menu.entries().to_vec();
        self.splice(menu, entry, Some(index), touch);
        true
    }

    /// Starts placing `entry`. An entry with the same id already in the
    /// menu is lifted instead, so the id never shows up twice.
    pub fn place(&mut self, menu: &mut Menu, entry: MenuEntry, touch: Point) {
        self.drop_placement(menu);
        let origin = menu.position_of(&entry.id);
        if let Some(index) = origin {
            menu.remove(index);
        }
        self.icons_before_edit = menu.entries().to_vec();
        self.splice(menu, entry, origin, touch);
    }

    /// Re-splices the entry being placed at the bucket under `touch`.
    pub fn drag(&mut self, menu: &mut Menu, touch: Point) -> Option<usize> {
        let placement = self.placement.take()?;
        self.splice(menu, placement.entry, placement.origin, touch);
        self.placing_index()
    }

    /// Leaves the entry being placed where it is now.
    pub fn drop_placement(&mut self, menu: &Menu) -> Option<EntryId> {
        let placement = self.placement.take()?;
        self.icons_before_edit = menu.entries().to_vec();
        Some(placement.entry.id)
    }

    /// Throws the entry being placed away.
    pub fn discard(&mut self, menu: &mut Menu) -> Option<MenuEntry> {
        let placement = self.placement.take()?;
        menu.replace(self.icons_before_edit.clone());
        log::debug!("Removed '{}' from the menu", placement.entry.id);
        Some(placement.entry)
    }

    /// Undoes the current placement: a lifted entry goes back to its slot,
    /// an entry being added is dropped.
    pub fn restore_placement(&mut self, menu: &mut Menu) {
        let Some(placement) = self.placement.take() else {
            return;
        };
        let mut entries = self.icons_before_edit.clone();
        if let Some(origin) = placement.origin {
            entries.insert(origin.min(entries.len()), placement.entry);
        }
        menu.replace(entries);
        self.icons_before_edit = menu.entries().to_vec();
    }

    /// Ends the session keeping the current order.
    pub fn commit(mut self, menu: &Menu) -> Vec<EntryId> {
        self.drop_placement(menu);
        menu.ids()
    }

    /// Ends the session with the order it started from.
    pub fn cancel(self, menu: &mut Menu) {
        menu.replace(self.initial_order);
    }

    /// Applies fresh catalogue data: icons are refreshed, vanished ids are
    /// dropped, order is kept.
    pub fn reconcile(&mut self, menu: &mut Menu, fresh: &HashMap<EntryId, PathBuf>) {
        refresh_list(&mut self.icons_before_edit, fresh);
        refresh_list(&mut self.initial_order, fresh);

        let mut live = menu.entries().to_vec();
        refresh_list(&mut live, fresh);
        menu.replace(live);

        let Some(placement) = self.placement.as_mut() else {
            return;
        };
        match (fresh.get(&placement.entry.id), menu.position_of(&placement.entry.id)) {
            (Some(icon), Some(index)) => {
                placement.entry.icon = icon.clone();
                placement.index = index;
            }
            _ => {
                self.placement = None;
                menu.replace(self.icons_before_edit.clone());
            }
        }
    }

    fn splice(&mut self, menu: &mut Menu, entry: MenuEntry, origin: Option<usize>, touch: Point) {
        let index = insertion_index(self.icons_before_edit.len(), &menu.center(), touch);
        let mut entries = self.icons_before_edit.clone();
        entries.insert(index, entry.clone());
        menu.replace(entries);
        self.placement = Some(Placement {
            entry,
            origin,
            index,
        });
    }
}

fn refresh_list(list: &mut Vec<MenuEntry>, fresh: &HashMap<EntryId, PathBuf>) {
    list.retain_mut(|entry| match fresh.get(&entry.id) {
        Some(icon) => {
            entry.icon = icon.clone();
            true
        }
        None => false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::menu::model::Center;

    // bucket centers for 3 remaining entries around the origin
    const SLOT_0: Point = Point { x: 50.0, y: 0.0 };
    const SLOT_1: Point = Point { x: 0.0, y: 50.0 };
    const SLOT_2: Point = Point { x: -50.0, y: 0.0 };

    fn entry(name: &str) -> MenuEntry {
        MenuEntry::new(EntryId::new(name), PathBuf::from(format!("/icons/{name}.png")))
    }

    fn menu(names: &[&str]) -> Menu {
        let mut menu = Menu::new(names.iter().map(|n| entry(n)).collect(), 64.0);
        menu.set_center(Center::new(0.0, 0.0, 100.0));
        menu
    }

    fn names(menu: &Menu) -> Vec<String> {
        menu.ids().iter().map(|id| id.to_string()).collect()
    }

    fn assert_invariant(session: &EditSession, menu: &Menu) {
        let expected = session.icons_before_edit().len() + usize::from(session.placing().is_some());
        assert_eq!(menu.len(), expected);
        let mut ids = menu.ids();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        assert_eq!(ids.len(), menu.len());
    }

    #[test]
    fn test_commit_new_entry_at_index_one() {
        let mut menu = menu(&["A", "B", "C"]);
        let mut session = EditSession::start(&menu);

        session.place(&mut menu, entry("D"), SLOT_1);
        assert_eq!(session.placing_index(), Some(1));
        assert_invariant(&session, &menu);

        assert_eq!(session.commit(&menu), ids(&["A", "D", "B", "C"]));
    }

    #[test]
    fn test_drag_reorders_and_drop_keeps_order() {
        let mut menu = menu(&["A", "B", "C", "D"]);
        let mut session = EditSession::start(&menu);

        assert!(session.lift(&mut menu, 0, SLOT_0));
        assert_eq!(names(&menu), vec!["A", "B", "C", "D"]);
        assert_invariant(&session, &menu);

        assert_eq!(session.drag(&mut menu, SLOT_2), Some(2));
        assert_eq!(names(&menu), vec!["B", "C", "A", "D"]);
        assert_invariant(&session, &menu);

        assert_eq!(session.drop_placement(&menu), Some(EntryId::new("A")));
        assert!(session.placing().is_none());
        assert_eq!(names(&menu), vec!["B", "C", "A", "D"]);
        assert_invariant(&session, &menu);
    }

    #[test]
    fn test_discard_removes_entry() {
        let mut menu = menu(&["A", "B", "C", "D"]);
        let mut session = EditSession::start(&menu);

        session.lift(&mut menu, 1, SLOT_0);
        let removed = session.discard(&mut menu).unwrap();

        assert_eq!(removed.id, EntryId::new("B"));
        assert_eq!(names(&menu), vec!["A", "C", "D"]);
        assert_invariant(&session, &menu);
        assert_eq!(session.discard(&mut menu), None);
    }

    #[test]
    fn test_restore_placement_returns_lifted_entry() {
        let mut menu = menu(&["A", "B", "C", "D"]);
        let mut session = EditSession::start(&menu);

        session.lift(&mut menu, 2, SLOT_2);
        session.drag(&mut menu, SLOT_0);
        assert_eq!(names(&menu), vec!["C", "A", "B", "D"]);

        session.restore_placement(&mut menu);
        assert_eq!(names(&menu), vec!["A", "B", "C", "D"]);
        assert_invariant(&session, &menu);

        // a second restore is a no-op
        session.restore_placement(&mut menu);
        assert_eq!(names(&menu), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_restore_placement_drops_new_entry() {
        let mut menu = menu(&["A", "B", "C"]);
        let mut session = EditSession::start(&menu);

        session.place(&mut menu, entry("D"), SLOT_2);
        session.restore_placement(&mut menu);

        assert_eq!(names(&menu), vec!["A", "B", "C"]);
        assert_invariant(&session, &menu);
    }

    #[test]
    fn test_place_existing_id_lifts_it() {
        let mut menu = menu(&["A", "B", "C"]);
        let mut session = EditSession::start(&menu);

        session.place(&mut menu, entry("A"), SLOT_1);

        assert_eq!(names(&menu), vec!["B", "A", "C"]);
        assert_invariant(&session, &menu);
    }

    #[test]
    fn test_cancel_restores_initial_order() {
        let mut menu = menu(&["A", "B", "C", "D"]);
        let mut session = EditSession::start(&menu);

        session.lift(&mut menu, 0, SLOT_2);
        session.drop_placement(&menu);
        session.lift(&mut menu, 3, SLOT_0);
        session.discard(&mut menu);
        assert_ne!(names(&menu), vec!["A", "B", "C", "D"]);

        session.cancel(&mut menu);
        assert_eq!(names(&menu), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_reconcile_drops_vanished_entries() {
        let mut menu = menu(&["A", "B", "C", "D"]);
        let mut session = EditSession::start(&menu);
        session.lift(&mut menu, 0, SLOT_2);

        let fresh: HashMap<EntryId, PathBuf> = ["A", "B", "D"]
            .into_iter()
            .map(|n| (EntryId::new(n), PathBuf::from(format!("/new/{n}.png"))))
            .collect();
        session.reconcile(&mut menu, &fresh);

        assert_eq!(names(&menu), vec!["B", "A", "D"]);
        assert_eq!(session.placing_index(), Some(1));
        assert_eq!(menu.entries()[0].icon, PathBuf::from("/new/B.png"));
        assert_invariant(&session, &menu);

        let fresh: HashMap<EntryId, PathBuf> = fresh
            .into_iter()
            .filter(|(id, _)| id.as_str() != "A")
            .collect();
        session.reconcile(&mut menu, &fresh);

        assert!(session.placing().is_none());
        assert_eq!(names(&menu), vec!["B", "D"]);
        assert_invariant(&session, &menu);
    }

    fn ids(names: &[&str]) -> Vec<EntryId> {
        names.iter().map(|n| EntryId::new(*n)).collect()
    }
}
