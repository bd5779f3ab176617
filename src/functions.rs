//! Built-in scalar math kernels used by the evaluator.
//!
//! With the default-on `libm` feature every kernel routes through the
//! `libm` crate, picking the single- or double-precision entry point to
//! match the configured scalar type. Without it the std float methods are
//! used instead. Domain errors and division by zero are not caught; the
//! IEEE result (infinity or NaN) propagates.

#[cfg(all(feature = "libm", feature = "f32"))]
use libm::{
    ceilf as libm_ceil, cosf as libm_cos, floorf as libm_floor, fmodf as libm_fmod,
    log10f as libm_log10, log2f as libm_log2, logf as libm_ln, powf as libm_pow,
    sinf as libm_sin, sqrtf as libm_sqrt, tanf as libm_tan,
};

#[cfg(all(feature = "libm", feature = "f64"))]
use libm::{
    ceil as libm_ceil, cos as libm_cos, floor as libm_floor, fmod as libm_fmod,
    log as libm_ln, log10 as libm_log10, log2 as libm_log2, pow as libm_pow, sin as libm_sin,
    sqrt as libm_sqrt, tan as libm_tan,
};

use crate::Real;

pub fn sin(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_sin(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.sin()
    }
}

pub fn cos(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_cos(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.cos()
    }
}

pub fn tan(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_tan(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.tan()
    }
}

pub fn sqrt(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_sqrt(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.sqrt()
    }
}

/// Natural logarithm; `log` in the expression language.
pub fn ln(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_ln(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.ln()
    }
}

pub fn log2(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_log2(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.log2()
    }
}

pub fn log10(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_log10(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.log10()
    }
}

pub fn ceil(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_ceil(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.ceil()
    }
}

pub fn floor(x: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_floor(x)
    }
    #[cfg(not(feature = "libm"))]
    {
        x.floor()
    }
}

pub fn pow(base: Real, exponent: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_pow(base, exponent)
    }
    #[cfg(not(feature = "libm"))]
    {
        base.powf(exponent)
    }
}

/// Floating-point remainder with the sign of the dividend.
pub fn fmod(a: Real, b: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_fmod(a, b)
    }
    #[cfg(not(feature = "libm"))]
    {
        a % b
    }
}

/// Returns the larger of two values.
pub fn max(a: Real, b: Real) -> Real {
    if a > b {
        a
    } else {
        b
    }
}

/// Returns the smaller of two values.
pub fn min(a: Real, b: Real) -> Real {
    if a < b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::constants;

    #[test]
    fn test_trig_identities() {
        assert_approx_eq!(sin(constants::PI / 6.0), 0.5);
        assert_approx_eq!(cos(constants::PI / 3.0), 0.5);
        assert_approx_eq!(tan(constants::PI / 4.0), 1.0);
    }

    #[test]
    fn test_logs_and_roots() {
        assert_approx_eq!(ln(constants::E), 1.0);
        assert_approx_eq!(log2(16.0), 4.0);
        assert_approx_eq!(log10(100.0), 2.0);
        assert_approx_eq!(sqrt(16.0), 4.0);
    }

    #[test]
    fn test_rounding_toward_infinities() {
        assert_eq!(ceil(16.5), 17.0);
        assert_eq!(floor(16.5), 16.0);
        assert_eq!(ceil(-16.5), -16.0);
        assert_eq!(floor(-16.5), -17.0);
    }

    #[test]
    fn test_pow_and_fmod() {
        assert_approx_eq!(pow(2.0, 10.0), 1024.0);
        assert_approx_eq!(fmod(10.0, 4.0), 2.0);
        // fmod keeps the dividend's sign.
        assert_approx_eq!(fmod(-10.0, 4.0), -2.0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(4.0, 8.0), 4.0);
        assert_eq!(max(4.0, 8.0), 8.0);
        assert_eq!(min(-1.0, 1.0), -1.0);
    }

    #[test]
    fn test_domain_errors_propagate_ieee_results() {
        assert!(sqrt(-1.0).is_nan());
        assert!(ln(-1.0).is_nan());
        assert!(ln(0.0).is_infinite());
    }
}
