//! Light Types

use bitflags::bitflags;

bitflags! {
    /// Stores combination of flags for the light types.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct LightType: u8 {
        const DELTA_POSITION_LIGHT = 1;
        const AREA_LIGHT = 2;
        const INFINITE_LIGHT = 4;
    }
}

impl LightType {
    /// Returns true if the light is described by a delta distribution and can
    /// never be hit by a ray.
    pub fn is_delta_light(&self) -> bool {
        self.contains(Self::DELTA_POSITION_LIGHT)
    }

    /// Returns true if the light is located at a finite distance.
    pub fn is_finite_light(&self) -> bool {
        !self.contains(Self::INFINITE_LIGHT)
    }
}
