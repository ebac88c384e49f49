//! # bbq_wrapper
//!
//! Exposes a [`BoundingBoxLookup`](bbq_lookup::BoundingBoxLookup) through a
//! host engine's own geometry types. A host supplies two converters:
//!
//! - [`BoundingBoxWrapper`]: between its box type and [`BoundingBox`](bbq_math::BoundingBox).
//! - [`QueryItemWrapper`]: between its query type and [`QueryItem`](bbq_math::QueryItem).
//!
//! [`wrap`] combines a lookup with both converters into a
//! [`WrapperBoundingBoxLookup`]. The [`glam_f32`] module is a ready-made
//! adapter for engines that use single-precision `glam` vectors.

pub mod convert;
pub mod error;
pub mod glam_f32;
pub mod lookup;

pub use convert::{BoundingBoxWrapper, QueryItemWrapper};
pub use error::WrapperError;
pub use lookup::{WrapperBoundingBoxLookup, WrapperEntry, wrap};
