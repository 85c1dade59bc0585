//! Hash Grid

use super::radius::RADIUS_EPSILON;
use std::ops::Range;
use vcm_core::geometry::*;
use vcm_core::pbrt::*;

/// Something with a position that can be stored in a `HashGrid`.
pub trait GridPoint {
    /// Returns the position.
    fn position(&self) -> Point3f;
}

impl GridPoint for Point3f {
    fn position(&self) -> Point3f {
        *self
    }
}

/// Spatial index answering fixed radius queries over a point set. Points are
/// bucket sorted into a hashed uniform grid whose cells are twice the query
/// radius wide, so a query only visits 8 cells. The grid stores indices into
/// the point slice it was built from; it never owns the points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HashGrid {
    /// Bounds of all points expanded by the radius.
    bounds: Bounds3f,

    /// Query radius.
    radius: Float,

    /// Squared query radius.
    radius_sqr: Float,

    /// Cell edge length.
    cell_size: Float,

    /// Reciprocal of the cell size.
    inv_cell_size: Float,

    /// End of each bucket's run in `indices` (exclusive).
    cell_ends: Vec<usize>,

    /// Point indices ordered by bucket.
    indices: Vec<usize>,
}

impl HashGrid {
    /// Builds the grid. The number of buckets equals the number of points.
    ///
    /// * `points` - The points.
    /// * `radius` - Query radius.
    pub fn build<P: GridPoint>(points: &[P], radius: Float) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        if !(radius > 0.0) {
            warn!("Hash grid radius {} is not positive; grid left empty", radius);
            return Self::default();
        }

        let bounds = points
            .iter()
            .fold(Bounds3f::default(), |b, p| b.union_point(&p.position()))
            .expand(radius + RADIUS_EPSILON);

        let mut grid = Self {
            bounds,
            radius,
            radius_sqr: radius * radius,
            cell_size: 2.0 * radius,
            inv_cell_size: 1.0 / (2.0 * radius),
            cell_ends: vec![0; points.len()],
            indices: vec![0; points.len()],
        };

        // Count points per bucket.
        let buckets: Vec<usize> = points
            .iter()
            .map(|p| grid.bucket(grid.cell_of(&p.position())))
            .collect();
        for &b in buckets.iter() {
            grid.cell_ends[b] += 1;
        }

        // Exclusive prefix sum gives the start of each bucket.
        let mut sum = 0;
        for end in grid.cell_ends.iter_mut() {
            let count = *end;
            *end = sum;
            sum += count;
        }

        // Scatter; afterwards every entry has advanced to its bucket's end.
        for (i, &b) in buckets.iter().enumerate() {
            grid.indices[grid.cell_ends[b]] = i;
            grid.cell_ends[b] += 1;
        }

        grid
    }

    /// Returns true if the grid holds no points.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns the radius the grid was built for.
    pub fn radius(&self) -> Float {
        self.radius
    }

    /// Returns the cell edge length.
    pub fn cell_size(&self) -> Float {
        self.cell_size
    }

    /// Returns the end of each bucket's run in `indices()`.
    pub fn cell_ends(&self) -> &[usize] {
        &self.cell_ends
    }

    /// Returns the point indices ordered by bucket.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Calls `f` with the index of every point stored in the buckets that may
    /// hold points within the radius of `p`. Each point is reported at most
    /// once; callers filter by distance.
    ///
    /// * `p` - Query position.
    /// * `f` - Callback receiving point indices.
    pub fn for_each_candidate<F: FnMut(usize)>(&self, p: &Point3f, mut f: F) {
        if self.is_empty() || !self.bounds.inside(p) {
            return;
        }

        let cell_pt = (*p - self.bounds.p_min) * self.inv_cell_size;
        let coord = cell_pt.floor();
        let fract = cell_pt - coord;

        let c = [coord.x as i32, coord.y as i32, coord.z as i32];
        let o = [
            if fract.x < 0.5 { c[0] - 1 } else { c[0] + 1 },
            if fract.y < 0.5 { c[1] - 1 } else { c[1] + 1 },
            if fract.z < 0.5 { c[2] - 1 } else { c[2] + 1 },
        ];

        let mut visited = [usize::MAX; 8];
        for j in 0..8 {
            let cell = [
                if j & 1 != 0 { o[0] } else { c[0] },
                if j & 2 != 0 { o[1] } else { c[1] },
                if j & 4 != 0 { o[2] } else { c[2] },
            ];
            let bucket = self.bucket(cell);

            // Different cells may share a bucket.
            if visited[..j].contains(&bucket) {
                continue;
            }
            visited[j] = bucket;

            for &i in &self.indices[self.bucket_range(bucket)] {
                f(i);
            }
        }
    }

    /// Calls `f` for every point within the radius of `p`.
    ///
    /// * `points` - The points the grid was built from.
    /// * `p`      - Query position.
    /// * `f`      - Callback receiving the point index and the point.
    pub fn for_each_within<P: GridPoint, F: FnMut(usize, &P)>(&self, points: &[P], p: &Point3f, mut f: F) {
        debug_assert_eq!(points.len(), self.len());
        self.for_each_candidate(p, |i| {
            let point = &points[i];
            if point.position().distance_squared(p) <= self.radius_sqr {
                f(i, point);
            }
        });
    }

    /// Returns the integer cell coordinates of a position.
    ///
    /// * `p` - Position inside the bounds.
    fn cell_of(&self, p: &Point3f) -> [i32; 3] {
        let c = ((*p - self.bounds.p_min) * self.inv_cell_size).floor();
        [c.x as i32, c.y as i32, c.z as i32]
    }

    /// Hashes cell coordinates to a bucket.
    ///
    /// * `c` - Cell coordinates.
    fn bucket(&self, c: [i32; 3]) -> usize {
        let x = (c[0] as u32).wrapping_mul(73856093);
        let y = (c[1] as u32).wrapping_mul(19349663);
        let z = (c[2] as u32).wrapping_mul(83492791);
        (x ^ y ^ z) as usize % self.cell_ends.len()
    }

    /// Returns the run of `indices` belonging to a bucket.
    ///
    /// * `bucket` - The bucket.
    fn bucket_range(&self, bucket: usize) -> Range<usize> {
        let start = if bucket == 0 { 0 } else { self.cell_ends[bucket - 1] };
        start..self.cell_ends[bucket]
    }
}
