use glam::{IVec2, IVec3};

/// Inclusive axis-aligned integer rectangle on the horizontal plane.
///
/// The rectangle's `y` axis maps to world `z`. Invariant: `min <= max` on
/// both axes; [`Rect2i::from_min_max`] sorts components to enforce it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect2i {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect2i {
    /// Create a rectangle from two corners, sorting components so that
    /// `min <= max` on every axis.
    pub fn from_min_max(a: IVec2, b: IVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a rectangle from its minimum corner and a positive size.
    ///
    /// # Panics
    ///
    /// Panics if either component of `size` is not positive.
    pub fn from_min_and_size(min: IVec2, size: IVec2) -> Self {
        assert!(
            size.x > 0 && size.y > 0,
            "rectangle size must be positive, got {size}"
        );
        Self {
            min,
            max: min + size - IVec2::ONE,
        }
    }

    /// Number of cells along `x`.
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    /// Number of cells along `y`.
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn encompasses(&self, other: &Rect2i) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Returns a new rectangle grown by `margin` cells on every side.
    pub fn expand(&self, margin: i32) -> Rect2i {
        Rect2i {
            min: self.min - IVec2::splat(margin),
            max: self.max + IVec2::splat(margin),
        }
    }

    /// Row-major index of `p` relative to the minimum corner.
    ///
    /// This is the indexing shared by 2D facets and batched noise arrays, so
    /// arrays computed over the same rectangle can be zipped positionally.
    pub fn world_index(&self, p: IVec2) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let rel = p - self.min;
        Some(rel.y as usize * self.width() as usize + rel.x as usize)
    }

    /// Iterate every cell, `x` fastest.
    pub fn iter(&self) -> impl Iterator<Item = IVec2> + use<> {
        let Rect2i { min, max } = *self;
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| IVec2::new(x, y)))
    }
}

/// Inclusive axis-aligned integer box in world space.
///
/// Invariant: `min <= max` on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region3i {
    pub min: IVec3,
    pub max: IVec3,
}

impl Region3i {
    /// Create a region from two corners. Automatically sorts
    /// components so that `min <= max` on every axis.
    pub fn from_min_max(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a region from its minimum corner and a positive size.
    ///
    /// # Panics
    ///
    /// Panics if any component of `size` is not positive.
    pub fn from_min_and_size(min: IVec3, size: IVec3) -> Self {
        assert!(
            size.x > 0 && size.y > 0 && size.z > 0,
            "region size must be positive, got {size}"
        );
        Self {
            min,
            max: min + size - IVec3::ONE,
        }
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if this region overlaps `other` (touching counts).
    pub fn intersects(&self, other: &Region3i) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Number of cells along each axis.
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Number of cells covered.
    pub fn volume(&self) -> usize {
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    /// Grow the region: `sides` on x and z, `top` above and `bottom` below.
    pub fn expand(&self, top: i32, bottom: i32, sides: i32) -> Region3i {
        Region3i {
            min: self.min - IVec3::new(sides, bottom, sides),
            max: self.max + IVec3::new(sides, top, sides),
        }
    }

    /// Horizontal footprint: world `x` and `z` as rectangle `x` and `y`.
    pub fn xz(&self) -> Rect2i {
        Rect2i {
            min: IVec2::new(self.min.x, self.min.z),
            max: IVec2::new(self.max.x, self.max.z),
        }
    }

    /// Iterate every cell, `x` fastest then `z` then `y`.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + use<> {
        let Region3i { min, max } = *self;
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z)
                .flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}
