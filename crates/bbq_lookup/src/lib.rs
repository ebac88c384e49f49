//! # bbq_lookup
//!
//! Lookups for bounding boxes in 3D space. Every lookup stores
//! `(bounding box, value)` pairs and answers "which entries intersect this
//! query item?".
//!
//! This crate provides:
//!
//! - [`BoundingBoxCollection`] / [`BoundingBoxLookup`]: the contract every
//!   backend satisfies.
//! - [`ListLookup`]: a flat vector, fastest for very small datasets.
//! - [`GridLookup`]: a uniform grid that grows to fit its contents.
//! - [`TreeLookup`]: a bounding volume hierarchy.
//! - [`lookups`]: factories returning boxed backends.
//!
//! ## Usage
//!
//! ```rust
//! use bbq_lookup::{BoundingBoxCollection, lookups};
//! use bbq_math::{BoundingBox, DVec3, QueryItem};
//!
//! let mut lookup = lookups::tree::<&str>();
//! let crate_box = BoundingBox::new(DVec3::ZERO, DVec3::ONE).unwrap();
//! lookup.insert("crate", crate_box);
//!
//! let hits = lookup.visit(&QueryItem::Point(DVec3::splat(0.5)));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(*hits[0].value, "crate");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod grid;
pub mod list;
pub mod lookup;
pub mod lookups;
pub mod tree;

pub use cache::CachedCount;
pub use config::GridConfig;
pub use error::LookupError;
pub use grid::GridLookup;
pub use list::ListLookup;
pub use lookup::{BoundingBoxCollection, BoundingBoxLookup, Entry};
pub use lookups::Backend;
pub use tree::TreeLookup;
