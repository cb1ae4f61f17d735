use rand::Rng;

/// Axis-aligned rectangle stored by its center and full extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: (min_x + max_x) / 2.0,
            y: (min_y + max_y) / 2.0,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn top_left(&self) -> (f32, f32) {
        (self.left(), self.top())
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.right(), self.bottom())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// True if `other` lies entirely inside (edges may coincide).
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        self.left() <= other.left()
            && self.right() >= other.right()
            && self.top() <= other.top()
            && self.bottom() >= other.bottom()
    }

    /// Overlap test that also accepts rectangles that only touch.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    pub fn expand_to_include(&mut self, other: &Rectangle) {
        let left = f32::min(self.left(), other.left());
        let right = f32::max(self.right(), other.right());
        let top = f32::min(self.top(), other.top());
        let bottom = f32::max(self.bottom(), other.bottom());
        self.x = (left + right) / 2.0;
        self.y = (top + bottom) / 2.0;
        self.width = right - left;
        self.height = bottom - top;
    }

    /// Splits into the four equally sized quadrants, in nw, ne, sw, se order.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        let quarter_width = half_width / 2.0;
        let quarter_height = half_height / 2.0;
        let west = self.x - quarter_width;
        let east = self.x + quarter_width;
        let north = self.y - quarter_height;
        let south = self.y + quarter_height;
        [
            Rectangle::new(west, north, half_width, half_height),
            Rectangle::new(east, north, half_width, half_height),
            Rectangle::new(west, south, half_width, half_height),
            Rectangle::new(east, south, half_width, half_height),
        ]
    }

    /// Random point inside the rectangle, kept `margin` away from its edges.
    pub fn get_random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> (f32, f32) {
        (
            self._safe_randf32(rng, self.left() + margin, self.right() - margin),
            self._safe_randf32(rng, self.top() + margin, self.bottom() - margin),
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}
