//! BxDF Type

use bitflags::bitflags;

bitflags! {
    /// Lobes of a `BSDF`.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct BxDFType: u8 {
        const DIFFUSE = 1;
        const GLOSSY = 2;
        const SPECULAR = 4;
    }
}

impl BxDFType {
    /// Returns true if the lobe is described by a delta distribution.
    pub fn is_specular(&self) -> bool {
        self.contains(Self::SPECULAR)
    }
}
