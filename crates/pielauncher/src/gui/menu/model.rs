use crate::gui::menu::RADIUS_RATIO;
use catalogue::{AppRecord, EntryId};
use std::collections::HashSet;
use std::f64::consts::{PI, TAU};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(&self, other: Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Center {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Center {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Centers on `point` but keeps the whole circle inside the viewport.
    pub fn clamped(point: Point, radius: f64, viewport: Viewport) -> Self {
        Self {
            x: radius.max((viewport.width - radius).min(point.x)),
            y: radius.max((viewport.height - radius).min(point.y)),
            radius,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Screen angle of `point` as seen from the center; y grows downward so
    /// angles grow clockwise.
    pub fn angle_to(&self, point: Point) -> f64 {
        (point.y - self.y).atan2(point.x - self.x)
    }

    pub fn slot_position(&self, angle: f64) -> Point {
        Point::new(
            self.x + self.radius * angle.cos(),
            self.y + self.radius * angle.sin(),
        )
    }
}

/// Circle radius for a viewport. The shorter side decides, unless icons
/// would outgrow `max_icon_size`, in which case the radius is capped.
pub fn menu_radius(viewport: Viewport, max_icon_size: f64) -> f64 {
    let mut min = viewport.width.min(viewport.height);
    if (min * RADIUS_RATIO).floor() > max_icon_size {
        min = (max_icon_size / RADIUS_RATIO).round();
    }
    (min * 0.5).round()
}

/// Maps `angle` into `[0, 2π)`.
pub fn positive_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Signed difference `a - b` mapped into `(-π, π]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let d = positive_angle(a - b);
    if d > PI { d - TAU } else { d }
}

pub fn slot_angle(index: usize, count: usize) -> f64 {
    index as f64 * TAU / count as f64
}

/// Half the chord between neighbouring slots, so adjacent icons touch at
/// most, bounded by `max_icon_size`.
pub fn icon_size(radius: f64, count: usize, max_icon_size: f64) -> f64 {
    let half_chord = match count {
        0 => return 0.0,
        1 => radius,
        n => radius * (PI / n as f64).sin(),
    };
    half_chord.min(max_icon_size)
}

/// Index of the angle closest to `touch_angle`; ties go to the lower index.
pub fn select_by_angle(angles: impl IntoIterator<Item = f64>, touch_angle: f64) -> Option<usize> {
    angles
        .into_iter()
        .map(|a| angle_difference(touch_angle, a).abs())
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// Where an entry dragged to `touch` lands among `remaining` entries.
///
/// There are `remaining + 1` buckets, shifted by half a bucket so their
/// boundaries fall halfway between the slots. Buckets are half-open, so a
/// touch exactly on a boundary goes to the following bucket.
pub fn insertion_index(remaining: usize, center: &Center, touch: Point) -> usize {
    let step = TAU / (remaining + 1) as f64;
    let angle = positive_angle(center.angle_to(touch) + step * 0.5);
    ((angle / step).floor() as usize).min(remaining)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub id: EntryId,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub icon: PathBuf,
}

impl MenuEntry {
    pub fn new(id: EntryId, icon: PathBuf) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            size: 0.0,
            icon,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn move_to(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }

    /// Hit circle with the icon's own size as radius.
    pub fn contains(&self, point: Point) -> bool {
        point.distance_sq(self.position()) < self.size * self.size
    }
}

impl From<AppRecord> for MenuEntry {
    fn from(record: AppRecord) -> Self {
        Self::new(record.id, record.icon)
    }
}

impl From<&AppRecord> for MenuEntry {
    fn from(record: &AppRecord) -> Self {
        Self::new(record.id.clone(), record.icon.clone())
    }
}

/// Ordered entries around a center. List order is angular order.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
    center: Center,
    max_icon_size: f64,
}

impl Menu {
    pub fn new(entries: Vec<MenuEntry>, max_icon_size: f64) -> Self {
        let mut menu = Self {
            entries: Vec::new(),
            center: Center::default(),
            max_icon_size,
        };
        menu.replace(entries);
        menu
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut MenuEntry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn position_of(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    pub fn center(&self) -> Center {
        self.center
    }

    pub fn set_center(&mut self, center: Center) {
        self.center = center;
    }

    pub fn set_max_icon_size(&mut self, max_icon_size: f64) {
        self.max_icon_size = max_icon_size;
    }

    /// Replaces all entries; later duplicates of an id are dropped.
    pub fn replace(&mut self, entries: Vec<MenuEntry>) {
        let mut seen = HashSet::new();
        self.entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
    }

    pub fn remove(&mut self, index: usize) -> Option<MenuEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Writes every entry's position and size for the current center.
    pub fn layout(&mut self) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }

        let center = self.center;
        let size = icon_size(center.radius, count, self.max_icon_size);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.move_to(center.slot_position(slot_angle(i, count)));
            entry.size = size;
        }
    }

    /// Entry in the direction of `touch`, however far from the circle.
    pub fn selected_index(&self, touch: Point) -> Option<usize> {
        let count = self.entries.len();
        if count == 0 {
            return None;
        }
        select_by_angle(
            (0..count).map(|i| slot_angle(i, count)),
            self.center.angle_to(touch),
        )
    }

    pub fn selected(&self, touch: Point) -> Option<&MenuEntry> {
        self.selected_index(touch).and_then(|i| self.entries.get(i))
    }

    /// First entry whose icon lies under `point`, using the last layout.
    pub fn entry_at(&self, point: Point) -> Option<usize> {
        self.entries.iter().position(|e| e.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn entries(names: &[&str]) -> Vec<MenuEntry> {
        names
            .iter()
            .map(|n| MenuEntry::new(EntryId::new(*n), PathBuf::new()))
            .collect()
    }

    fn menu(count: usize, center: Center) -> Menu {
        let names: Vec<String> = (0..count).map(|i| format!("app{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut menu = Menu::new(entries(&names), 64.0);
        menu.set_center(center);
        menu
    }

    #[test]
    fn test_layout_spacing_and_distance() {
        for count in 1..=12 {
            let center = Center::new(321.5, 198.0, 117.0);
            let mut menu = menu(count, center);
            menu.layout();

            let step = TAU / count as f64;
            for (i, entry) in menu.entries().iter().enumerate() {
                let dist = entry.position().distance_sq(center.point()).sqrt();
                assert!((dist - center.radius).abs() < EPS);

                let angle = positive_angle(center.angle_to(entry.position()));
                let expected = positive_angle(i as f64 * step);
                assert!(angle_difference(angle, expected).abs() < EPS);
            }
            for pair in menu.entries().windows(2) {
                let a = center.angle_to(pair[0].position());
                let b = center.angle_to(pair[1].position());
                assert!((angle_difference(b, a) - step).abs() < EPS || count == 2);
            }
        }
    }

    #[test]
    fn test_layout_of_empty_menu_is_noop() {
        let mut menu = Menu::new(Vec::new(), 64.0);
        menu.set_center(Center::new(10.0, 10.0, 5.0));
        menu.layout();
        assert!(menu.is_empty());
        assert_eq!(menu.selected_index(Point::new(20.0, 10.0)), None);
        assert_eq!(menu.entry_at(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_selection_scenario() {
        let menu = menu(6, Center::new(200.0, 200.0, 100.0));
        assert_eq!(menu.selected_index(Point::new(300.0, 200.0)), Some(0));
        assert_eq!(menu.selected_index(Point::new(100.0, 200.0)), Some(3));
        // direction counts, not distance
        assert_eq!(menu.selected_index(Point::new(1000.0, 201.0)), Some(0));
        assert_eq!(menu.selected_index(Point::new(210.0, 260.0)), Some(1));
    }

    #[test]
    fn test_selection_is_rotation_consistent() {
        let count = 7;
        let angles: Vec<f64> = (0..count).map(|i| slot_angle(i, count)).collect();
        for touch in [0.1, 1.3, 2.9, 4.4, 6.0] {
            let expected = select_by_angle(angles.iter().copied(), touch);
            for rotation in [0.5, -2.0, 3.3, 10.0] {
                let rotated = angles.iter().map(|a| a + rotation);
                assert_eq!(select_by_angle(rotated, touch + rotation), expected);
            }
        }
    }

    #[test]
    fn test_selection_tie_goes_to_lower_index() {
        assert_eq!(select_by_angle([1.0, 3.0], 2.0), Some(0));
        assert_eq!(select_by_angle(std::iter::empty(), 1.0), None);
    }

    #[test]
    fn test_insertion_index_range() {
        let center = Center::new(0.0, 0.0, 50.0);
        for remaining in 0..9 {
            for step in 0..360 {
                let a = (step as f64).to_radians();
                let touch = Point::new(a.cos() * 30.0, a.sin() * 30.0);
                assert!(insertion_index(remaining, &center, touch) <= remaining);
            }
        }
    }

    #[test]
    fn test_insertion_index_buckets() {
        let center = Center::new(0.0, 0.0, 50.0);
        // 3 remaining -> 4 buckets of 90 degrees centered on the slots
        assert_eq!(insertion_index(3, &center, Point::new(10.0, 0.0)), 0);
        assert_eq!(insertion_index(3, &center, Point::new(0.0, 10.0)), 1);
        assert_eq!(insertion_index(3, &center, Point::new(-10.0, 0.0)), 2);
        assert_eq!(insertion_index(3, &center, Point::new(0.0, -10.0)), 3);
        // just above the rightward axis wraps back to the first bucket
        assert_eq!(insertion_index(3, &center, Point::new(10.0, -0.1)), 0);
        // exactly between slot 0 and slot 1 rounds to the higher index
        assert_eq!(insertion_index(3, &center, Point::new(1.0, 1.0)), 1);
        assert_eq!(insertion_index(0, &center, Point::new(-5.0, 3.0)), 0);
    }

    #[test]
    fn test_center_clamped_into_viewport() {
        let viewport = Viewport::new(400.0, 800.0);
        let c = Center::clamped(Point::new(10.0, 790.0), 100.0, viewport);
        assert_eq!((c.x, c.y), (100.0, 700.0));
        let c = Center::clamped(Point::new(250.0, 300.0), 100.0, viewport);
        assert_eq!((c.x, c.y), (250.0, 300.0));
    }

    #[test]
    fn test_menu_radius_is_capped() {
        // 0.28 * 200 = 56 fits under 64
        assert_eq!(menu_radius(Viewport::new(200.0, 500.0), 64.0), 100.0);
        // 0.28 * 1080 is way over 64 -> min becomes round(64 / 0.28) = 229
        assert_eq!(menu_radius(Viewport::new(1080.0, 1920.0), 64.0), 115.0);
    }

    #[test]
    fn test_icon_size_bounds() {
        assert_eq!(icon_size(100.0, 0, 64.0), 0.0);
        assert_eq!(icon_size(100.0, 1, 64.0), 64.0);
        assert!((icon_size(100.0, 6, 64.0) - 50.0).abs() < EPS);
        assert!(icon_size(100.0, 12, 64.0) < icon_size(100.0, 6, 64.0));
        assert!(icon_size(50.0, 6, 64.0) < icon_size(100.0, 6, 64.0));
    }

    #[test]
    fn test_entry_hit_uses_icon_size() {
        let mut menu = menu(4, Center::new(200.0, 200.0, 100.0));
        menu.layout();
        let size = menu.entries()[0].size;

        assert_eq!(menu.entry_at(Point::new(300.0 + size - 1.0, 200.0)), Some(0));
        assert_eq!(menu.entry_at(Point::new(300.0 + size, 200.0)), None);
        assert_eq!(menu.entry_at(Point::new(200.0, 300.0)), Some(1));
        assert_eq!(menu.entry_at(Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_replace_drops_duplicate_ids() {
        let menu = Menu::new(entries(&["a", "b", "a", "c"]), 64.0);
        let ids: Vec<String> = menu.ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
