use crate::RfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, RfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RfError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, RfError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(RfError::InvalidArg { what });
    }
    Ok(v)
}
