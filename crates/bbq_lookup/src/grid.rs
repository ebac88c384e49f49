//! Uniform grid backend.
//!
//! The grid divides its current bounds into `n × n × n` equal cells. Every
//! entry is registered in each cell its box overlaps, so a query only scans
//! the cells overlapping the query item.
//!
//! ## Growth
//!
//! The bounds are the union of every box ever inserted. When an insert falls
//! outside them the bounds grow to fit and every entry is redistributed. With
//! random data this happens a handful of times before the bounds settle.

use std::collections::HashSet;
use std::ops::ControlFlow;

use bbq_math::{BoundingBox, DVec3, QueryItem};
use tracing::debug;

use crate::cache::CachedCount;
use crate::config::GridConfig;
use crate::lookup::{BoundingBoxCollection, BoundingBoxLookup, Entry};

/// A stored pair. Slots are addressed by index from the cells.
#[derive(Debug, Clone)]
struct Slot<T> {
    bounding_box: BoundingBox,
    value: T,
}

/// Inclusive range of cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: [usize; 3],
    max: [usize; 3],
}

impl CellRange {
    /// Linear cell indices covered by this range, x fastest.
    fn indices(self, n: usize) -> impl Iterator<Item = usize> {
        let [x0, y0, z0] = self.min;
        let [x1, y1, z1] = self.max;
        (z0..=z1).flat_map(move |z| {
            (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| x + y * n + z * n * n))
        })
    }

    fn first(self, n: usize) -> usize {
        let [x, y, z] = self.min;
        x + y * n + z * n * n
    }
}

/// A lookup backed by a fixed-resolution grid over growing bounds.
#[derive(Debug, Clone)]
pub struct GridLookup<T> {
    config: GridConfig,
    bounds: Option<BoundingBox>,
    slots: Vec<Option<Slot<T>>>,
    free: Vec<usize>,
    cells: Vec<Vec<usize>>,
    len: CachedCount,
}

impl<T> GridLookup<T> {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            bounds: None,
            slots: Vec::new(),
            free: Vec::new(),
            cells: vec![Vec::new(); config.cell_count()],
            len: CachedCount::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// The region the grid currently spans, or `None` if nothing was ever inserted.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Remove every entry and forget the bounds.
    pub fn clear(&mut self) {
        self.bounds = None;
        self.slots.clear();
        self.free.clear();
        for cell in &mut self.cells {
            cell.clear();
        }
        self.len.invalidate();
    }

    fn cells_per_axis(&self) -> usize {
        self.config.cells_per_axis()
    }

    /// Cells overlapped by `bounding_box`, clamped to the grid.
    fn cell_range(&self, bounds: &BoundingBox, bounding_box: &BoundingBox) -> CellRange {
        let n = self.cells_per_axis();
        let lo = cell_coords(bounds, bounding_box.min(), n);
        let hi = cell_coords(bounds, bounding_box.max(), n);
        CellRange { min: lo, max: hi }
    }

    /// Cells a query can touch, or `None` if it misses the grid entirely.
    fn query_range(&self, query: &QueryItem) -> Option<CellRange> {
        let bounds = self.bounds?;
        let region = bounds.intersection(&query.bounding_box()?)?;
        Some(self.cell_range(&bounds, &region))
    }

    /// Grow the bounds to contain `bounding_box`, redistributing if they change.
    fn expand_to(&mut self, bounding_box: &BoundingBox) {
        match self.bounds {
            Some(bounds) if bounds.contains(bounding_box) => {}
            Some(bounds) => {
                let grown = bounds.union(bounding_box);
                debug!(
                    old_min = ?bounds.min(),
                    old_max = ?bounds.max(),
                    new_min = ?grown.min(),
                    new_max = ?grown.max(),
                    entries = self.slots.len() - self.free.len(),
                    "expanding grid bounds"
                );
                self.bounds = Some(grown);
                self.reindex();
            }
            None => self.bounds = Some(*bounding_box),
        }
    }

    /// Rebuild every cell from the slot arena under the current bounds.
    fn reindex(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for id in 0..self.slots.len() {
            if let Some(bounding_box) = self.slots[id].as_ref().map(|slot| slot.bounding_box) {
                self.index_slot(id, &bounding_box);
            }
        }
    }

    fn index_slot(&mut self, id: usize, bounding_box: &BoundingBox) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let n = self.cells_per_axis();
        for index in self.cell_range(&bounds, bounding_box).indices(n) {
            self.cells[index].push(id);
        }
    }

    fn unindex_slot(&mut self, id: usize, bounding_box: &BoundingBox) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let n = self.cells_per_axis();
        for index in self.cell_range(&bounds, bounding_box).indices(n) {
            let cell = &mut self.cells[index];
            if let Some(position) = cell.iter().position(|&stored| stored == id) {
                cell.swap_remove(position);
            }
        }
    }

    fn allocate(&mut self, slot: Slot<T>) -> usize {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(slot);
                id
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: usize) {
        if let Some(slot) = self.slots[id].take() {
            self.unindex_slot(id, &slot.bounding_box);
            self.free.push(id);
        }
    }
}

impl<T> Default for GridLookup<T> {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

/// Cell coordinates of `point` inside `bounds`, clamped to `[0, n - 1]`.
fn cell_coords(bounds: &BoundingBox, point: DVec3, n: usize) -> [usize; 3] {
    let min = bounds.min();
    let extent = bounds.size();
    let mut coords = [0; 3];
    for (axis, coord) in coords.iter_mut().enumerate() {
        *coord = axis_cell(point[axis], min[axis], extent[axis], n);
    }
    coords
}

fn axis_cell(value: f64, min: f64, extent: f64, n: usize) -> usize {
    if extent <= 0.0 {
        return 0;
    }
    let scaled = ((value - min) / extent * n as f64).floor();
    // NaN and negatives clamp to 0; `as` saturates.
    (scaled.max(0.0) as usize).min(n - 1)
}

impl<T: PartialEq> BoundingBoxCollection<T> for GridLookup<T> {
    fn insert(&mut self, value: T, bounding_box: BoundingBox) {
        self.len.invalidate();
        self.expand_to(&bounding_box);
        let id = self.allocate(Slot {
            bounding_box,
            value,
        });
        self.index_slot(id, &bounding_box);
    }

    fn remove_value(&mut self, value: &T) -> usize {
        let ids: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| match slot {
                Some(slot) if slot.value == *value => Some(id),
                _ => None,
            })
            .collect();
        if ids.is_empty() {
            return 0;
        }

        self.len.invalidate();
        for &id in &ids {
            self.release(id);
        }
        debug!(removed = ids.len(), "removed grid entries by value");
        ids.len()
    }

    fn len(&self) -> usize {
        self.len
            .get(|| self.slots.iter().filter(|slot| slot.is_some()).count())
    }

    fn for_each_intersecting<'a>(
        &'a self,
        query: &QueryItem,
        visitor: &mut dyn FnMut(Entry<'a, T>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if let QueryItem::All = query {
            for slot in self.slots.iter().flatten() {
                visitor(Entry::new(slot.bounding_box, &slot.value))?;
            }
            return ControlFlow::Continue(());
        }

        let Some(range) = self.query_range(query) else {
            return ControlFlow::Continue(());
        };

        let mut seen = HashSet::new();
        for index in range.indices(self.cells_per_axis()) {
            for &id in &self.cells[index] {
                if !seen.insert(id) {
                    continue;
                }
                let Some(slot) = &self.slots[id] else {
                    continue;
                };
                if slot.bounding_box.intersects(query) {
                    visitor(Entry::new(slot.bounding_box, &slot.value))?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}

impl<T: PartialEq> BoundingBoxLookup<T> for GridLookup<T> {
    fn remove(&mut self, value: &T, bounding_box: &BoundingBox) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if !bounds.contains(bounding_box) {
            return false;
        }

        // A stored box is registered in every cell of its range, the first included.
        let first = self.cell_range(&bounds, bounding_box).first(self.cells_per_axis());
        let found = self.cells[first].iter().copied().find(|&id| {
            self.slots[id]
                .as_ref()
                .is_some_and(|slot| slot.bounding_box == *bounding_box && slot.value == *value)
        });

        match found {
            Some(id) => {
                self.len.invalidate();
                self.release(id);
                true
            }
            None => false,
        }
    }
}
