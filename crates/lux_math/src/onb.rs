use crate::Vec3;

/// Orthonormal basis (u, v, w).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a right-handed basis around `w`.
    ///
    /// `w` need not be normalized but must be non-zero.
    pub fn from_w(w: Vec3) -> Self {
        let w = w.normalize();
        let helper = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(helper).normalize();
        let u = v.cross(w);
        Self { u, v, w }
    }

    /// Map local (u, v, w) coordinates to world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
