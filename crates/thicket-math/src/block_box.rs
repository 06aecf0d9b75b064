use glam::IVec3;

/// Inclusive axis-aligned box in block coordinates.
///
/// Invariant: `min <= max` on every axis. The constructor sorts the corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl BlockBox {
    /// Create a box from two corners, sorting components so `min <= max`.
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A box centered on `center` reaching `half` blocks out on each axis.
    pub fn from_center_half_extents(center: IVec3, half: IVec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Full-height box covering the horizontal square `[x0, x1] x [z0, z1]`.
    pub fn column(x0: i32, z0: i32, x1: i32, z1: i32, height: i32) -> Self {
        Self::new(IVec3::new(x0, 0, z0), IVec3::new(x1, height - 1, z1))
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Horizontal containment, ignoring Y.
    pub fn contains_xz(&self, x: i32, z: i32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    /// Returns true if the boxes overlap, touching faces included.
    pub fn intersects(&self, other: &BlockBox) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Returns true if the box overlaps the horizontal square `[x0, x1] x [z0, z1]`.
    pub fn intersects_xz(&self, x0: i32, z0: i32, x1: i32, z1: i32) -> bool {
        self.max.x >= x0 && self.min.x <= x1 && self.max.z >= z0 && self.min.z <= z1
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &BlockBox) -> BlockBox {
        BlockBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point, truncated toward the min corner.
    pub fn center(&self) -> IVec3 {
        self.min + (self.max - self.min) / 2
    }

    /// Expanded horizontally by `margin` on each side. Y is left alone.
    pub fn expand_xz(&self, margin: i32) -> BlockBox {
        let m = IVec3::new(margin, 0, margin);
        BlockBox {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Block count along each axis.
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(a: i32, b: i32) -> BlockBox {
        BlockBox::new(IVec3::splat(a), IVec3::splat(b))
    }

    #[test]
    fn test_new_sorts_corners() {
        let b = BlockBox::new(IVec3::new(10, 0, -5), IVec3::new(-10, 5, 5));
        assert_eq!(b.min, IVec3::new(-10, 0, -5));
        assert_eq!(b.max, IVec3::new(10, 5, 5));
    }

    #[test]
    fn test_contains_on_edge() {
        let b = cube(0, 10);
        assert!(b.contains(IVec3::ZERO));
        assert!(b.contains(IVec3::splat(10)));
        assert!(!b.contains(IVec3::new(11, 5, 5)));
    }

    #[test]
    fn test_contains_xz_ignores_height() {
        let b = BlockBox::column(0, 0, 15, 15, 256);
        assert!(b.contains_xz(15, 0));
        assert!(!b.contains_xz(16, 0));
        assert!(b.contains(IVec3::new(3, 255, 3)));
        assert!(!b.contains(IVec3::new(3, 256, 3)));
    }

    #[test]
    fn test_intersects_touching() {
        let a = cube(0, 10);
        let b = BlockBox::new(IVec3::new(10, 0, 0), IVec3::new(20, 10, 10));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&cube(11, 20)));
    }

    #[test]
    fn test_union_and_center() {
        let u = cube(0, 5).union(&cube(3, 10));
        assert_eq!(u, cube(0, 10));
        assert_eq!(u.center(), IVec3::splat(5));
    }

    #[test]
    fn test_expand_xz() {
        let b = cube(0, 4).expand_xz(2);
        assert_eq!(b.min, IVec3::new(-2, 0, -2));
        assert_eq!(b.max, IVec3::new(6, 4, 6));
        assert_eq!(b.size(), IVec3::new(9, 5, 9));
    }

    #[test]
    fn test_intersects_xz() {
        let b = BlockBox::column(-8, -8, 8, 8, 64);
        assert!(b.intersects_xz(8, 8, 23, 23));
        assert!(!b.intersects_xz(9, 9, 23, 23));
    }
}
