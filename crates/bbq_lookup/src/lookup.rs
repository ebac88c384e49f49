//! The lookup contract shared by every backend.
//!
//! Lookups are multisets of `(bounding box, value)` pairs. Neither the values,
//! the boxes, nor the pairs as a whole are unique: inserting the same pair
//! twice stores two entries, and removing it once leaves one behind.

use std::ops::ControlFlow;

use bbq_math::{BoundingBox, QueryItem};

/// A stored pair, borrowed from the lookup during a visit.
#[derive(Debug, PartialEq)]
pub struct Entry<'a, T> {
    pub bounding_box: BoundingBox,
    pub value: &'a T,
}

// Manual impls: the derives would require `T: Copy`.
impl<T> Clone for Entry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entry<'_, T> {}

impl<'a, T> Entry<'a, T> {
    #[must_use]
    pub fn new(bounding_box: BoundingBox, value: &'a T) -> Self {
        Self {
            bounding_box,
            value,
        }
    }
}

/// A collection of values, each associated with a bounding box.
pub trait BoundingBoxCollection<T: PartialEq> {
    /// Inserts a value with an associated bounding box.
    fn insert(&mut self, value: T, bounding_box: BoundingBox);

    /// Removes every entry whose value equals `value`, returning how many were removed.
    fn remove_value(&mut self, value: &T) -> usize;

    /// The number of entries, counting duplicates.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits each entry whose bounding box intersects `query`.
    ///
    /// The visitor returns [`ControlFlow::Break`] to stop early; the break is
    /// passed back to the caller. Each stored entry is visited at most once.
    /// Visiting order is unspecified.
    fn for_each_intersecting<'a>(
        &'a self,
        query: &QueryItem,
        visitor: &mut dyn FnMut(Entry<'a, T>) -> ControlFlow<()>,
    ) -> ControlFlow<()>;

    /// Visits every entry.
    fn for_each<'a>(
        &'a self,
        visitor: &mut dyn FnMut(Entry<'a, T>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        self.for_each_intersecting(&QueryItem::ALL, visitor)
    }

    /// Collects every entry intersecting `query`.
    fn visit(&self, query: &QueryItem) -> Vec<Entry<'_, T>> {
        let mut entries = Vec::new();
        let _ = self.for_each_intersecting(query, &mut |entry| {
            entries.push(entry);
            ControlFlow::Continue(())
        });
        entries
    }

    /// Collects every stored value.
    fn values(&self) -> Vec<&T> {
        let mut values = Vec::with_capacity(self.len());
        let _ = self.for_each(&mut |entry| {
            values.push(entry.value);
            ControlFlow::Continue(())
        });
        values
    }

    /// Returns any one entry intersecting `query`.
    fn first_intersecting(&self, query: &QueryItem) -> Option<Entry<'_, T>> {
        let mut found = None;
        let _ = self.for_each_intersecting(query, &mut |entry| {
            found = Some(entry);
            ControlFlow::Break(())
        });
        found
    }

    fn count_intersecting(&self, query: &QueryItem) -> usize {
        let mut count = 0;
        let _ = self.for_each_intersecting(query, &mut |_| {
            count += 1;
            ControlFlow::Continue(())
        });
        count
    }
}

/// A [`BoundingBoxCollection`] that can also remove a single exact pair.
pub trait BoundingBoxLookup<T: PartialEq>: BoundingBoxCollection<T> {
    /// Removes one entry equal to `(value, bounding_box)`.
    ///
    /// Returns `false` if no such entry was stored.
    fn remove(&mut self, value: &T, bounding_box: &BoundingBox) -> bool;
}
