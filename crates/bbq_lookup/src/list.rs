//! Flat vector backend.
//!
//! Every query scans every entry. Insert is O(1), remove and query are O(n).
//! For a handful of entries this beats the indexed backends.

use std::ops::ControlFlow;

use bbq_math::{BoundingBox, QueryItem};

use crate::lookup::{BoundingBoxCollection, BoundingBoxLookup, Entry};

/// A lookup backed by a `Vec` in insertion order.
#[derive(Debug, Clone)]
pub struct ListLookup<T> {
    entries: Vec<(BoundingBox, T)>,
}

impl<T> ListLookup<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for ListLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> BoundingBoxCollection<T> for ListLookup<T> {
    fn insert(&mut self, value: T, bounding_box: BoundingBox) {
        self.entries.push((bounding_box, value));
    }

    fn remove_value(&mut self, value: &T) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, stored)| stored != value);
        before - self.entries.len()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn for_each_intersecting<'a>(
        &'a self,
        query: &QueryItem,
        visitor: &mut dyn FnMut(Entry<'a, T>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        for (bounding_box, value) in &self.entries {
            if bounding_box.intersects(query) {
                visitor(Entry::new(*bounding_box, value))?;
            }
        }
        ControlFlow::Continue(())
    }
}

impl<T: PartialEq> BoundingBoxLookup<T> for ListLookup<T> {
    fn remove(&mut self, value: &T, bounding_box: &BoundingBox) -> bool {
        match self
            .entries
            .iter()
            .position(|(stored_box, stored)| stored_box == bounding_box && stored == value)
        {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use bbq_math::DVec3;

    use super::*;

    fn cube(min: f64, max: f64) -> BoundingBox {
        BoundingBox::new(DVec3::splat(min), DVec3::splat(max)).unwrap()
    }

    #[test]
    fn test_visits_in_insertion_order() {
        let mut lookup = ListLookup::new();
        lookup.insert("a", cube(0.0, 1.0));
        lookup.insert("b", cube(0.5, 2.0));
        lookup.insert("c", cube(5.0, 6.0));
        assert_eq!(lookup.values(), vec![&"a", &"b", &"c"]);

        let hits: Vec<_> = lookup
            .visit(&QueryItem::from(cube(0.0, 1.0)))
            .into_iter()
            .map(|e| *e.value)
            .collect();
        assert_eq!(hits, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_takes_one_copy() {
        let mut lookup = ListLookup::new();
        lookup.insert(1, cube(0.0, 1.0));
        lookup.insert(1, cube(0.0, 1.0));
        assert!(lookup.remove(&1, &cube(0.0, 1.0)));
        assert_eq!(lookup.len(), 1);
        assert!(!lookup.remove(&1, &cube(0.0, 2.0)));
    }

    #[test]
    fn test_remove_value_takes_every_box() {
        let mut lookup = ListLookup::new();
        lookup.insert(1, cube(0.0, 1.0));
        lookup.insert(2, cube(0.0, 1.0));
        lookup.insert(1, cube(3.0, 4.0));
        assert_eq!(lookup.remove_value(&1), 2);
        assert_eq!(lookup.values(), vec![&2]);
    }
}
