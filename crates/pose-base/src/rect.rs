use crate::{Vec2, Vec3};

/// Which corner of the screen the vertical axis starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Window pixel coordinates, y grows downwards.
    #[default]
    TopLeft,
    /// Canvas coordinates with y growing upwards.
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: Default> Rect<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl<T: std::ops::Add<Output = T> + Copy> Rect<T> {
    pub fn min(&self) -> Vec2<T> {
        self.origin
    }

    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl Rect<f32> {
    /// Rectangle covering a `width` by `height` pixel surface at the origin.
    pub fn from_pixels(size: Vec2<usize>) -> Self {
        Self::new(Vec2::zero(), Vec2::new(size.x as f32, size.y as f32))
    }

    /// Map a normalized `[0, 1]` coordinate onto this rectangle.
    ///
    /// `(0, 0)` lands on the corner named by `origin` and `(1, 1)` on the
    /// diagonally opposite one. Depth is scaled by the rectangle width, the
    /// same scale landmark models use for `z`.
    pub fn point_at(&self, normalized: Vec3<f32>, origin: Origin) -> Vec3<f32> {
        let min = self.min();
        let max = self.max();
        let x = lerp(min.x, max.x, normalized.x);
        let y = match origin {
            Origin::TopLeft => lerp(min.y, max.y, normalized.y),
            Origin::BottomLeft => lerp(max.y, min.y, normalized.y),
        };
        Vec3::new(x, y, normalized.z * self.size.x)
    }
}

// exact at both ends, unlike a + (b - a) * t
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}
