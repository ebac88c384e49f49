//! Seeded random workloads.

use bbq_math::{BoundingBox, DVec3, GeometryError, Line, QueryItem};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::Uuid;

/// Side length of the cube all generated positions lie in.
pub const WORLD_SIZE: f64 = 100.0;

/// Entries to insert and queries to run against every backend.
#[derive(Debug, Clone)]
pub struct Workload {
    pub entries: Vec<(String, BoundingBox)>,
    pub queries: Vec<QueryItem>,
}

impl Workload {
    /// Generate `count` entries and `queries` queries from `seed`.
    ///
    /// Boxes have edges up to `max_extent` long. Queries cycle through
    /// boxes, points and line segments.
    pub fn generate(
        count: usize,
        queries: usize,
        max_extent: f64,
        seed: u64,
    ) -> Result<Self, GeometryError> {
        let mut rng = StdRng::seed_from_u64(seed);

        let entries = (0..count)
            .map(|_| {
                let value = Uuid::from_u64_pair(rng.next_u64(), rng.next_u64()).to_string();
                Ok((value, random_box(&mut rng, max_extent)?))
            })
            .collect::<Result<_, GeometryError>>()?;

        let queries = (0..queries)
            .map(|i| {
                Ok(match i % 3 {
                    0 => QueryItem::BoundingBox(random_box(&mut rng, max_extent)?),
                    1 => QueryItem::Point(random_point(&mut rng)),
                    _ => QueryItem::Line(Line::new(
                        random_point(&mut rng),
                        random_point(&mut rng),
                    )?),
                })
            })
            .collect::<Result<_, GeometryError>>()?;

        Ok(Self { entries, queries })
    }
}

fn random_point(rng: &mut StdRng) -> DVec3 {
    DVec3::new(
        rng.gen_range(0.0..WORLD_SIZE),
        rng.gen_range(0.0..WORLD_SIZE),
        rng.gen_range(0.0..WORLD_SIZE),
    )
}

fn random_box(rng: &mut StdRng, max_extent: f64) -> Result<BoundingBox, GeometryError> {
    let min = random_point(rng);
    let extent = DVec3::new(
        rng.gen_range(0.0..=max_extent),
        rng.gen_range(0.0..=max_extent),
        rng.gen_range(0.0..=max_extent),
    );
    BoundingBox::new(min, min + extent)
}
