//! Pixel sample types and the runtime type tag used to dispatch the
//! link builder over one of ~10 numeric sample representations.
//!
//! The source system used re-included C translation units parameterised by
//! a `TYPE` macro to get one specialised link builder per pixel type,
//! selected at runtime through a `switch`. Here that becomes a compile-time
//! generic (`PixelSample`) plus a small runtime dispatch table keyed on
//! [`PixelType`] (see `link::build_links_dispatch`).

use bytemuck::Pod;

/// The closed set of pixel sample representations the core recognises.
///
/// `None` is the absence of a concrete pixel type (`spec.md` §6's
/// `NONE = 0`); `Complex32`, `Complex64`, `Rgb`, and `Rgba` are recognised by
/// the type dispatch (so hosts can name them) but, like `None`, are rejected
/// by the segmentation path with [`crate::Error::InvalidArgument`] — the
/// core only operates on single-channel numeric samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    None,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Complex32,
    Complex64,
    Rgb,
    Rgba,
}

impl PixelType {
    /// Whether the segmentation/link-builder path supports this tag.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            PixelType::None
                | PixelType::Complex32
                | PixelType::Complex64
                | PixelType::Rgb
                | PixelType::Rgba
        )
    }
}

/// A numeric pixel sample the link builder can compare under a tolerance.
///
/// `threshold` is expressed in the same numeric space as the sample type;
/// the zero-threshold path uses exact equality (important for integer
/// types, where `threshold == 0` must not go through a floating
/// subtraction), the general path compares an unsigned difference against
/// `threshold` without promoting beyond what is needed to avoid overflow.
pub trait PixelSample: Pod + PartialEq + Copy {
    /// Absolute difference between `self` and `other`, represented in a
    /// type wide enough to never overflow, then compared against
    /// `threshold` (also widened the same way).
    ///
    /// For unsigned integer types this is `max(a,b) - min(a,b)` per
    /// `spec.md` §4.1 rather than a signed subtraction.
    fn within_tolerance(self, other: Self, threshold: f64) -> bool;
}

macro_rules! impl_pixel_sample_int {
    ($t:ty, $wide:ty) => {
        impl PixelSample for $t {
            fn within_tolerance(self, other: Self, threshold: f64) -> bool {
                if threshold <= 0.0 {
                    return self == other;
                }
                let a = self as $wide;
                let b = other as $wide;
                let diff = if a > b { a - b } else { b - a };
                // threshold is in the pixel's numeric space; widen it the
                // same way the difference was widened.
                (diff as f64) <= threshold
            }
        }
    };
}

macro_rules! impl_pixel_sample_float {
    ($t:ty) => {
        impl PixelSample for $t {
            fn within_tolerance(self, other: Self, threshold: f64) -> bool {
                if threshold <= 0.0 {
                    return self == other;
                }
                ((self - other) as f64).abs() <= threshold
            }
        }
    };
}

impl_pixel_sample_int!(i8, i64);
impl_pixel_sample_int!(u8, i64);
impl_pixel_sample_int!(i16, i64);
impl_pixel_sample_int!(u16, i64);
impl_pixel_sample_int!(i32, i64);
impl_pixel_sample_int!(u32, i64);
impl_pixel_sample_int!(i64, i128);
impl_pixel_sample_int!(u64, i128);
impl_pixel_sample_float!(f32);
impl_pixel_sample_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_is_exact_equality() {
        assert!(5u8.within_tolerance(5u8, 0.0));
        assert!(!5u8.within_tolerance(6u8, 0.0));
        assert!(1.0f32.within_tolerance(1.0f32, 0.0));
        assert!(!1.0f32.within_tolerance(1.0000001f32, 0.0));
    }

    #[test]
    fn unsigned_difference_never_underflows() {
        assert!(0u8.within_tolerance(255u8, 255.0));
        assert!(!0u8.within_tolerance(255u8, 254.0));
    }

    #[test]
    fn signed_and_float_tolerance() {
        assert!((-5i32).within_tolerance(5, 10.0));
        assert!(!(-5i32).within_tolerance(6, 10.0));
        assert!(1.0f64.within_tolerance(1.05, 0.1));
        assert!(!1.0f64.within_tolerance(1.2, 0.1));
    }

    #[test]
    fn supported_set_excludes_none_complex_and_colour() {
        assert!(PixelType::F64.is_supported());
        assert!(!PixelType::None.is_supported());
        assert!(!PixelType::Complex64.is_supported());
        assert!(!PixelType::Rgb.is_supported());
        assert!(!PixelType::Rgba.is_supported());
    }
}
