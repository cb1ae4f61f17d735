use crate::shapes::Rectangle;

// Check that Rectangle inner is fully contained in Rectangle outer; shared edges count
pub fn rectangle_contains_rectangle(outer: &Rectangle, inner: &Rectangle) -> bool {
    outer.left() <= inner.left()
        && outer.right() >= inner.right()
        && outer.top() <= inner.top()
        && outer.bottom() >= inner.bottom()
}

// Touching edges count as overlap.
pub fn rectangle_rectangle(a: &Rectangle, b: &Rectangle) -> bool {
    a.left() <= b.right() && a.right() >= b.left() && a.top() <= b.bottom() && a.bottom() >= b.top()
}
