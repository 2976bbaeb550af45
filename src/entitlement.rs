//! Entitlement — whether the user has unlocked full content.

/// Codes that unlock full access without a purchase.
pub const PROMO_CODES: &[&str] = &["GRATITUDE"];

/// Answers "has the user unlocked full content?". Consulted once per
/// selection call.
pub trait Entitlement: Send + Sync {
    fn has_full_access(&self) -> bool;
}

impl Entitlement for bool {
    fn has_full_access(&self) -> bool {
        *self
    }
}

/// Case-insensitive promo code check.
#[must_use]
pub fn is_valid_promo_code(code: &str) -> bool {
    let code = code.trim();
    PROMO_CODES.iter().any(|c| c.eq_ignore_ascii_case(code))
}

#[cfg(test)]
#[path = "entitlement_test.rs"]
mod tests;
