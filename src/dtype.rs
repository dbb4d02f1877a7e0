//! Data types carried by tensor descriptors
//!
//! The element type is a runtime tag rather than a generic parameter: kernel
//! configuration inspects it to compute element sizes and validate operand
//! compatibility, and quantized types carry their (scale, offset) alongside.

use std::fmt;

/// Element types supported by tensor descriptors
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DataType {
    /// Unknown type; the state of a descriptor before configuration
    #[default]
    Unknown,
    /// Unsigned 8-bit
    U8,
    /// Signed 8-bit
    S8,
    /// Quantized asymmetric unsigned 8-bit
    QAsymm8,
    /// Quantized asymmetric signed 8-bit
    QAsymm8Signed,
    /// Unsigned 16-bit
    U16,
    /// Signed 16-bit
    S16,
    /// Quantized symmetric signed 16-bit
    QSymm16,
    /// Unsigned 32-bit
    U32,
    /// Signed 32-bit
    S32,
    /// Half-precision float
    F16,
    /// Single-precision float
    F32,
    /// Double-precision float
    F64,
}

impl DataType {
    /// Size of one element in bytes; zero for [`DataType::Unknown`]
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Self::Unknown => 0,
            Self::U8 | Self::S8 | Self::QAsymm8 | Self::QAsymm8Signed => 1,
            Self::U16 | Self::S16 | Self::QSymm16 | Self::F16 => 2,
            Self::U32 | Self::S32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Whether this type carries quantization information
    pub fn is_quantized(&self) -> bool {
        matches!(self, Self::QAsymm8 | Self::QAsymm8Signed | Self::QSymm16)
    }

    /// Whether this is a floating-point type
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F16 | Self::F32 | Self::F64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Uniform affine quantization parameters
///
/// `real_value = scale * (quantized_value - offset)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizationInfo {
    scale: f32,
    offset: i32,
}

impl QuantizationInfo {
    /// Create quantization info from a scale and zero-point offset
    pub fn new(scale: f32, offset: i32) -> Self {
        Self { scale, offset }
    }

    /// Quantization scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Quantization zero-point offset
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Whether this is the identity mapping (scale 1, offset 0)
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0
    }
}

impl Default for QuantizationInfo {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0,
        }
    }
}

/// Memory layout of image-like tensors
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataLayout {
    /// Layout not yet decided
    #[default]
    Unknown,
    /// Batch, channels, height, width
    Nchw,
    /// Batch, height, width, channels
    Nhwc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(DataType::Unknown.size_in_bytes(), 0);
        assert_eq!(DataType::QAsymm8.size_in_bytes(), 1);
        assert_eq!(DataType::F16.size_in_bytes(), 2);
        assert_eq!(DataType::F32.size_in_bytes(), 4);
        assert_eq!(DataType::F64.size_in_bytes(), 8);
    }

    #[test]
    fn test_quantized_flags() {
        assert!(DataType::QAsymm8Signed.is_quantized());
        assert!(!DataType::S8.is_quantized());
        assert!(DataType::F32.is_float());
    }

    #[test]
    fn test_quantization_identity() {
        assert!(QuantizationInfo::default().is_identity());
        assert!(!QuantizationInfo::new(0.5, 3).is_identity());
    }
}
