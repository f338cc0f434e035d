// nifheads-parsers/src/scene/texturing.rs
//! Shape properties and texture descriptors

use serde::{Deserialize, Serialize};

/// Property attached to a triangle shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Property {
    /// Texture assignment
    #[serde(rename = "NiTexturingProperty")]
    Texturing(NiTexturingProperty),
    /// Material, alpha, specular and every other property kind
    #[serde(other)]
    Other,
}

impl Property {
    /// Texturing view of this property, if it is one
    pub fn as_texturing(&self) -> Option<&NiTexturingProperty> {
        match self {
            Property::Texturing(texturing) => Some(texturing),
            Property::Other => None,
        }
    }
}

impl From<NiTexturingProperty> for Property {
    fn from(texturing: NiTexturingProperty) -> Self {
        Property::Texturing(texturing)
    }
}

/// Texturing property; only the base slot is consumed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiTexturingProperty {
    /// Base (diffuse) texture slot
    pub base_texture: TexDesc,
}

impl NiTexturingProperty {
    pub fn new(base_texture: TexDesc) -> Self {
        Self { base_texture }
    }
}

/// Texture slot descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TexDesc {
    /// Wrap/clamp bitmask
    #[serde(default)]
    pub clamp_mode: ClampMode,
    /// UV channel the slot samples
    #[serde(default)]
    pub uv_set: u32,
    /// Referenced image
    pub source: NiSourceTexture,
}

impl TexDesc {
    /// Descriptor wrapping on both axes and sampling UV channel 0
    pub fn new(source: NiSourceTexture) -> Self {
        Self {
            clamp_mode: ClampMode::default(),
            uv_set: 0,
            source,
        }
    }

    pub fn with_clamp_mode(mut self, clamp_mode: ClampMode) -> Self {
        self.clamp_mode = clamp_mode;
        self
    }

    pub fn with_uv_set(mut self, uv_set: u32) -> Self {
        self.uv_set = uv_set;
        self
    }
}

/// External image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiSourceTexture {
    /// File name as authored (case and extension not trusted)
    pub file_name: String,
}

impl NiSourceTexture {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Clamp-mode bitmask of a texture slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClampMode(pub u32);

impl ClampMode {
    pub const CLAMP_S_CLAMP_T: Self = Self(0);
    pub const CLAMP_S_WRAP_T: Self = Self(1);
    pub const WRAP_S_CLAMP_T: Self = Self(2);
    pub const WRAP_S_WRAP_T: Self = Self(3);

    /// Repeats along the S (u) axis
    pub fn wraps_s(self) -> bool {
        matches!(self.0, 2 | 3)
    }

    /// Repeats along the T (v) axis
    pub fn wraps_t(self) -> bool {
        matches!(self.0, 1 | 3)
    }
}

impl Default for ClampMode {
    fn default() -> Self {
        Self::WRAP_S_WRAP_T
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_mode_axes() {
        let cases = [
            (0, false, false),
            (1, false, true),
            (2, true, false),
            (3, true, true),
            (4, false, false),
        ];
        for (raw, s, t) in cases {
            let mode = ClampMode(raw);
            assert_eq!(mode.wraps_s(), s, "mode {raw} S axis");
            assert_eq!(mode.wraps_t(), t, "mode {raw} T axis");
        }
    }

    #[test]
    fn test_as_texturing() {
        let texturing = NiTexturingProperty::new(TexDesc::new(NiSourceTexture::new("x.dds")));
        assert!(Property::from(texturing).as_texturing().is_some());
        assert!(Property::Other.as_texturing().is_none());
    }
}
