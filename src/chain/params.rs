//! Tuning parameters for the chain-link graph builder (`spec.md` §4.4),
//! bundled into one struct rather than eleven positional arguments —
//! matching the teacher's preference for params/builder structs
//! (`PageEncodeParams`, `PageBuilder`) over long argument lists.

/// The eleven tuning scalars that govern level-1 link admissibility,
/// alignment tolerance, and chain length bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParams {
    /// Absolute tolerance on character height, in pixels.
    pub satol: f64,
    /// Relative tolerance on character height, clamped to `[0, 1]`.
    pub srtol: f64,
    /// Minimum relative horizontal spacing between chained segments.
    pub drmin: f64,
    /// Maximum relative horizontal spacing; swapped with `drmin` if smaller.
    pub drmax: f64,
    /// Maximum tangent of the angle between the chain and the horizontal.
    pub slope: f64,
    /// Absolute residual tolerance in vertical alignment, in pixels.
    pub aatol: f64,
    /// Residual tolerance in vertical alignment, relative to mean height.
    pub artol: f64,
    /// Convergence tolerance for shear fitting, in pixels.
    pub prec: f64,
    /// Minimum chain length in segments (clamped to `>= 2`).
    pub lmin: usize,
    /// Maximum chain length in segments (clamped to `>= lmin`).
    pub lmax: usize,
}

impl Default for ChainParams {
    fn default() -> Self {
        ChainParams {
            satol: 2.0,
            srtol: 0.05,
            drmin: 0.4,
            drmax: 2.5,
            slope: 0.3,
            aatol: 2.0,
            artol: 0.05,
            prec: 0.05,
            lmin: 3,
            lmax: 10,
        }
    }
}

impl ChainParams {
    /// Apply the clamping rules of `spec.md` §4.4: negative tolerances
    /// clamp to zero, `srtol` additionally clamps to `<= 1`, `drmax` and
    /// `drmin` are swapped if `drmax < drmin`, and `lmin`/`lmax` are
    /// clamped to `lmin >= 2` and `lmax >= lmin`.
    pub fn normalized(&self) -> ChainParams {
        let clamp0 = |v: f64| v.max(0.0);
        let mut drmin = clamp0(self.drmin);
        let mut drmax = clamp0(self.drmax);
        if drmax < drmin {
            std::mem::swap(&mut drmin, &mut drmax);
        }
        let lmin = self.lmin.max(2);
        let lmax = self.lmax.max(lmin);

        ChainParams {
            satol: clamp0(self.satol),
            srtol: clamp0(self.srtol).min(1.0),
            drmin,
            drmax,
            slope: clamp0(self.slope),
            aatol: clamp0(self.aatol),
            artol: clamp0(self.artol),
            prec: clamp0(self.prec),
            lmin,
            lmax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let p = ChainParams::default();
        assert_eq!(p.satol, 2.0);
        assert_eq!(p.lmin, 3);
        assert_eq!(p.lmax, 10);
    }

    #[test]
    fn negative_tolerances_clamp_to_zero() {
        let p = ChainParams { satol: -1.0, srtol: -0.5, ..ChainParams::default() }.normalized();
        assert_eq!(p.satol, 0.0);
        assert_eq!(p.srtol, 0.0);
    }

    #[test]
    fn drmax_below_drmin_is_swapped() {
        let p = ChainParams { drmin: 2.0, drmax: 0.5, ..ChainParams::default() }.normalized();
        assert_eq!(p.drmin, 0.5);
        assert_eq!(p.drmax, 2.0);
    }

    #[test]
    fn lmax_floors_to_lmin() {
        let p = ChainParams { lmin: 5, lmax: 3, ..ChainParams::default() }.normalized();
        assert_eq!(p.lmin, 5);
        assert_eq!(p.lmax, 5);
    }
}
