use crate::entity::Entity;
use collisions::GeometryCache;
use common::shapes::Rectangle;
use common::vector::Vec2;
use tracing::trace;

/// Upper bound on columns and rows. A wider span gets coarser chunks
/// instead of more buckets.
pub const MAX_CHUNKS_PER_AXIS: usize = 1024;

/// Anything that has a world position a chunk lookup can start from.
pub trait ChunkAnchor {
    fn anchor(&self) -> Vec2;
}

impl ChunkAnchor for Vec2 {
    fn anchor(&self) -> Vec2 {
        *self
    }
}

impl ChunkAnchor for GeometryCache {
    fn anchor(&self) -> Vec2 {
        self.position()
    }
}

impl ChunkAnchor for Entity {
    fn anchor(&self) -> Vec2 {
        self.cache().position()
    }
}

/// Uniform grid of buckets over the positions of every anchor it was built
/// from. Buckets hold indices into the slice passed to `rebuild`.
///
/// A bucket index is `floor((cols - 1) * (x - min_x) / span_x)`, so the
/// anchors at the extremes land in the first and last column. A zero span
/// gives NaN, which maps to bucket 0.
#[derive(Debug, Default)]
pub struct ChunkGrid {
    min_x: f32,
    min_y: f32,
    span_x: f32,
    span_y: f32,
    cols: usize,
    rows: usize,
    // Column-major, `col * rows + row`.
    buckets: Vec<Vec<u32>>,
}

impl ChunkGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild<A: ChunkAnchor>(&mut self, anchors: &[A], chunk_size: f32) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }

        let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for anchor in anchors {
            let position = anchor.anchor();
            if position.x.is_finite() && position.y.is_finite() {
                min = min.inf(&position);
                max = max.sup(&position);
            }
        }

        if min.x > max.x {
            self.min_x = 0.0;
            self.min_y = 0.0;
            self.span_x = 0.0;
            self.span_y = 0.0;
            self.cols = 0;
            self.rows = 0;
            self.buckets.clear();
            return;
        }

        self.min_x = min.x;
        self.min_y = min.y;
        self.span_x = max.x - min.x;
        self.span_y = max.y - min.y;
        self.cols = chunk_count(self.span_x, chunk_size);
        self.rows = chunk_count(self.span_y, chunk_size);
        self.buckets.resize_with(self.cols * self.rows, Vec::new);

        for (index, anchor) in anchors.iter().enumerate() {
            let position = anchor.anchor();
            let (col, row) = self.bucket_of(position.x, position.y);
            let col = col.clamp(0, self.cols as isize - 1) as usize;
            let row = row.clamp(0, self.rows as isize - 1) as usize;
            self.buckets[col * self.rows + row].push(index as u32);
        }

        trace!(
            cols = self.cols,
            rows = self.rows,
            anchors = anchors.len(),
            "rebuilt chunk grid"
        );
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Extent of the anchors the grid was last built from.
    pub fn bounds(&self) -> Option<Rectangle> {
        if self.is_empty() {
            return None;
        }
        Some(Rectangle::from_min_max(
            self.min_x,
            self.min_y,
            self.min_x + self.span_x,
            self.min_y + self.span_y,
        ))
    }

    /// Bucket coordinates of a world position. May lie outside the grid.
    pub fn bucket_of(&self, x: f32, y: f32) -> (isize, isize) {
        (
            chunk_index(self.cols, x - self.min_x, self.span_x),
            chunk_index(self.rows, y - self.min_y, self.span_y),
        )
    }

    pub fn bucket(&self, col: usize, row: usize) -> &[u32] {
        if col >= self.cols || row >= self.rows {
            return &[];
        }
        &self.buckets[col * self.rows + row]
    }

    /// Appends the contents of every bucket within `radius` (Chebyshev
    /// distance, inclusive) of the reference's bucket. Buckets outside the
    /// grid are skipped.
    pub fn surrounding<A: ChunkAnchor + ?Sized>(
        &self,
        reference: &A,
        radius: usize,
        out: &mut Vec<u32>,
    ) {
        if self.is_empty() {
            return;
        }

        let position = reference.anchor();
        let (col, row) = self.bucket_of(position.x, position.y);
        let radius = isize::try_from(radius).unwrap_or(isize::MAX);

        let col_start = col.saturating_sub(radius).max(0);
        let col_end = col.saturating_add(radius).min(self.cols as isize - 1);
        let row_start = row.saturating_sub(radius).max(0);
        let row_end = row.saturating_add(radius).min(self.rows as isize - 1);

        for col in col_start..=col_end {
            for row in row_start..=row_end {
                out.extend_from_slice(self.bucket(col as usize, row as usize));
            }
        }
    }
}

fn chunk_count(span: f32, chunk_size: f32) -> usize {
    ((span / chunk_size).ceil() as usize).clamp(1, MAX_CHUNKS_PER_AXIS)
}

fn chunk_index(count: usize, offset: f32, span: f32) -> isize {
    let index = (count.saturating_sub(1) as f32 * offset / span).floor();
    if index.is_nan() {
        0
    } else {
        index as isize
    }
}
