//! A lookup that speaks host geometry.
//!
//! Neither the values nor the bounding boxes, nor the pairs as a whole are
//! unique. Inserting an entry "A" twice and removing it once leaves one "A"
//! in the lookup.

use std::ops::ControlFlow;

use bbq_lookup::{BoundingBoxCollection, BoundingBoxLookup};

use crate::convert::{BoundingBoxWrapper, QueryItemWrapper};
use crate::error::WrapperError;

/// A stored pair with its box converted back to the host type.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperEntry<'a, T, F> {
    pub bounding_box: F,
    pub value: &'a T,
}

/// A [`BoundingBoxLookup`] accessed through host box and query types.
pub struct WrapperBoundingBoxLookup<T: PartialEq, B, Q> {
    lookup: Box<dyn BoundingBoxLookup<T>>,
    boxes: B,
    queries: Q,
}

/// Wrap `lookup` so it accepts and returns host geometry.
#[must_use]
pub fn wrap<T, B, Q>(
    lookup: Box<dyn BoundingBoxLookup<T>>,
    boxes: B,
    queries: Q,
) -> WrapperBoundingBoxLookup<T, B, Q>
where
    T: PartialEq,
    B: BoundingBoxWrapper,
    Q: QueryItemWrapper,
{
    WrapperBoundingBoxLookup {
        lookup,
        boxes,
        queries,
    }
}

impl<T, B, Q> WrapperBoundingBoxLookup<T, B, Q>
where
    T: PartialEq,
    B: BoundingBoxWrapper,
    Q: QueryItemWrapper,
{
    /// Inserts a value with an associated host bounding box.
    pub fn insert(&mut self, value: T, bounding_box: &B::Foreign) -> Result<(), WrapperError> {
        let bounding_box = self.boxes.to_bounding_box(bounding_box)?;
        self.lookup.insert(value, bounding_box);
        Ok(())
    }

    /// Removes one entry equal to `(value, bounding_box)`.
    pub fn remove(&mut self, value: &T, bounding_box: &B::Foreign) -> Result<bool, WrapperError> {
        let bounding_box = self.boxes.to_bounding_box(bounding_box)?;
        Ok(self.lookup.remove(value, &bounding_box))
    }

    /// Removes every entry holding `value`.
    pub fn remove_value(&mut self, value: &T) -> usize {
        self.lookup.remove_value(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Visits each entry intersecting the host query, stopping on `Break`.
    pub fn for_each_intersecting<'a>(
        &'a self,
        query: &Q::Foreign,
        visitor: &mut dyn FnMut(WrapperEntry<'a, T, B::Foreign>) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, WrapperError> {
        let query = self.queries.to_query_item(query)?;
        let boxes = &self.boxes;
        Ok(self.lookup.for_each_intersecting(&query, &mut |entry| {
            visitor(WrapperEntry {
                bounding_box: boxes.from_bounding_box(&entry.bounding_box),
                value: entry.value,
            })
        }))
    }

    /// Collects each entry intersecting the host query.
    pub fn visit(
        &self,
        query: &Q::Foreign,
    ) -> Result<Vec<WrapperEntry<'_, T, B::Foreign>>, WrapperError> {
        let mut entries = Vec::new();
        let _ = self.for_each_intersecting(query, &mut |entry| {
            entries.push(entry);
            ControlFlow::Continue(())
        })?;
        Ok(entries)
    }

    /// Every stored value.
    #[must_use]
    pub fn values(&self) -> Vec<&T> {
        self.lookup.values()
    }

    /// The underlying lookup.
    #[must_use]
    pub fn inner(&self) -> &dyn BoundingBoxLookup<T> {
        self.lookup.as_ref()
    }

    /// The query converter, for translating lookup queries back to host form.
    #[must_use]
    pub fn queries(&self) -> &Q {
        &self.queries
    }

    #[must_use]
    pub fn into_inner(self) -> Box<dyn BoundingBoxLookup<T>> {
        self.lookup
    }
}

impl<T: PartialEq, B, Q> std::fmt::Debug for WrapperBoundingBoxLookup<T, B, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperBoundingBoxLookup")
            .field("len", &self.lookup.len())
            .finish_non_exhaustive()
    }
}
