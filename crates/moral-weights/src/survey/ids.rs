use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compact base-36 rendering used in generated identifiers.
pub(crate) fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Current wall clock in milliseconds, base-36 encoded.
pub(crate) fn millis_token() -> String {
    base36(Utc::now().timestamp_millis().max(0) as u128)
}

pub(crate) fn random_token<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(|byte| (byte as char).to_ascii_lowercase())
        .collect()
}

/// Session identifier: millisecond token plus random tail, unique enough for
/// uncoordinated clients.
pub(crate) fn session_token<R: Rng>(rng: &mut R) -> String {
    format!("sess_{}{}", millis_token(), random_token(rng, 9))
}

/// Store record identifier, same construction as session tokens.
pub(crate) fn record_token<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", millis_token(), random_token(rng, 9))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn base36_round_trips_known_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn random_tokens_are_lowercase_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(7);
        let token = random_token(&mut rng, 24);
        assert_eq!(token.len(), 24);
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn session_tokens_are_prefixed_and_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = session_token(&mut rng);
        let second = session_token(&mut rng);
        assert!(first.starts_with("sess_"));
        assert_ne!(first, second);
    }
}
