//! Phone number utilities

/// Check whether a phone number is acceptable for verification.
///
/// The service only handles 11-digit mobile numbers; anything else is
/// rejected before any store access.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 11 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Mask a phone number for log output (e.g. 138****5678)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() >= 7 {
        format!("{}****{}", &phone[0..3], &phone[phone.len() - 4..])
    } else {
        "****".to_string()
    }
}
