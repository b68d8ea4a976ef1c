use super::model::{Point, Viewport};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Edit-mode buttons. Declaration order is hit-test order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ActionTarget {
    Add,
    Remove,
    Info,
    Done,
}

impl ActionTarget {
    pub fn as_index(&self) -> usize {
        *self as usize
    }
}

/// Which way the action targets are lined up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, DeserializeFromStr, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Along the bottom edge.
    #[strum(serialize = "row", serialize = "horizontal")]
    Row,
    /// Along the right edge.
    #[strum(serialize = "column", serialize = "vertical")]
    Column,
}

impl Axis {
    /// Follows the longer side of the viewport.
    pub fn for_viewport(viewport: Viewport) -> Self {
        if viewport.is_portrait() {
            Self::Row
        } else {
            Self::Column
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Left and top edges are inside, right and bottom are not.
    pub fn contains(&self, point: Point) -> bool {
        self.left <= point.x && point.x < self.right && self.top <= point.y && point.y < self.bottom
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetLayout {
    rects: [Rect; ActionTarget::COUNT],
}

impl TargetLayout {
    /// Spreads the targets evenly along `axis`, `padding` away from the
    /// bottom (row) or right (column) edge.
    pub fn compute(viewport: Viewport, axis: Axis, size: f64, padding: f64) -> Self {
        let count = ActionTarget::COUNT as f64;
        let total = size * count;
        let mut rects = [Rect::default(); ActionTarget::COUNT];

        match axis {
            Axis::Row => {
                let step = ((viewport.width - total) / (count + 1.0)).round();
                let y = viewport.height - size - padding;
                let mut x = step;
                for rect in rects.iter_mut() {
                    *rect = Rect::new(x, y, size, size);
                    x += step + size;
                }
            }
            Axis::Column => {
                let step = ((viewport.height - total) / (count + 1.0)).round();
                let x = viewport.width - size - padding;
                let mut y = step;
                for rect in rects.iter_mut() {
                    *rect = Rect::new(x, y, size, size);
                    y += step + size;
                }
            }
        }

        Self { rects }
    }

    pub fn rect(&self, target: ActionTarget) -> Rect {
        self.rects[target.as_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionTarget, Rect)> + '_ {
        ActionTarget::iter().map(|t| (t, self.rect(t)))
    }

    /// First target containing `point`, checked add, remove, info, done.
    pub fn hit(&self, point: Point) -> Option<ActionTarget> {
        self.iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(target, _)| target)
    }
}
