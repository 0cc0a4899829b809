//! Pseudo-random user identifiers.
//!
//! Not cryptographically strong. Collisions are possible in principle and
//! accepted for the number of installations this is used with.

use uuid::Uuid;

pub const USER_ID_PREFIX: &str = "user_";

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `user_` followed by two concatenated base-36 fragments.
pub fn generate_user_id() -> String {
    let bits = Uuid::new_v4().as_u128();
    let high = (bits >> 64) as u64;
    let low = bits as u64;
    format!("{}{}{}", USER_ID_PREFIX, to_base36(high), to_base36(low))
}

/// Lowercase base-36 rendering; a u64 never needs more than 13 digits.
fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// True when `id` has the shape produced by [`generate_user_id`].
pub fn looks_generated(id: &str) -> bool {
    match id.strip_prefix(USER_ID_PREFIX) {
        Some(rest) => {
            (2..=26).contains(&rest.len())
                && rest
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        }
        None => false,
    }
}
