/// Camera: keeps the target centered in a fixed-size viewport.
///
/// `apply` wraps positions modulo the viewport size on each axis, so an
/// entity pushed off one edge reappears on the opposite edge. This is
/// applied uniformly to tiles and the player; nothing is clipped.

use super::geom::Rect;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Camera {
    pub dx: i32,
    pub dy: i32,
    /// Viewport size in pixels. Always positive.
    pub view_w: i32,
    pub view_h: i32,
}

impl Camera {
    pub fn new(view_w: i32, view_h: i32) -> Self {
        Camera { dx: 0, dy: 0, view_w: view_w.max(1), view_h: view_h.max(1) }
    }

    /// Recompute the offset so `target`'s center lands in the viewport center.
    pub fn update(&mut self, target: &Rect) {
        let (cx, cy) = target.center();
        self.dx = self.view_w / 2 - cx;
        self.dy = self.view_h / 2 - cy;
    }

    /// Translate an entity position by the offset, wrapping into the viewport.
    pub fn apply(&self, (x, y): (i32, i32)) -> (i32, i32) {
        (
            (x + self.dx).rem_euclid(self.view_w),
            (y + self.dy).rem_euclid(self.view_h),
        )
    }
}
