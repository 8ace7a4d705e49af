/// Extra cells a facet must cover beyond the region core.
///
/// `sides` applies to both horizontal axes; `top` and `bottom` only matter
/// for 3D facets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FacetBorder {
    pub top: i32,
    pub bottom: i32,
    pub sides: i32,
}

impl FacetBorder {
    /// No border.
    pub const ZERO: Self = Self {
        top: 0,
        bottom: 0,
        sides: 0,
    };

    /// Border on the horizontal sides only.
    pub const fn sides(sides: i32) -> Self {
        Self {
            top: 0,
            bottom: 0,
            sides,
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self {
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
            sides: self.sides.max(other.sides),
        }
    }

    /// Component-wise sum, used when a border requirement passes through a
    /// stage that itself needs a border on its inputs.
    pub fn extend_by(self, other: Self) -> Self {
        Self {
            top: self.top + other.top,
            bottom: self.bottom + other.bottom,
            sides: self.sides + other.sides,
        }
    }
}
