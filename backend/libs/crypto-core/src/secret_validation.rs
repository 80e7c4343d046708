//! Signing secret strength validation
//!
//! HMAC tokens are only as strong as the key behind them, so secrets are
//! checked before the service will start with them.

pub const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits recommended

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Weak secret - REJECT
    Weak,
    /// Acceptable secret - WARN
    Acceptable,
    /// Strong secret - OK
    Strong,
}

/// Classify an HS256 signing secret.
///
/// **Criteria**:
/// - Minimum 32 bytes (256 bits)
/// - Recommended 64 bytes (512 bits)
/// - Shannon entropy > 4.0 bits/byte
/// - No obvious patterns (repeating characters, sequential)
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = calculate_shannon_entropy(bytes);
    if entropy < 4.0 {
        return SecretStrength::Weak;
    }

    if has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= 5.0 {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Shannon entropy in bits per byte (0-8 scale)
fn calculate_shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    let len = data.len() as f64;

    for &byte in data {
        freq[byte as usize] += 1;
    }

    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Runs of four identical or four ascending bytes ("aaaa", "1234").
fn has_obvious_patterns(data: &[u8]) -> bool {
    let mut consecutive_same = 1;
    let mut consecutive_seq = 1;

    for window in data.windows(2) {
        if window[0] == window[1] {
            consecutive_same += 1;
            if consecutive_same >= 4 {
                return true;
            }
        } else {
            consecutive_same = 1;
        }

        if window[1] as i16 - window[0] as i16 == 1 {
            consecutive_seq += 1;
            if consecutive_seq >= 4 {
                return true;
            }
        } else {
            consecutive_seq = 1;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_secret_too_short() {
        assert_eq!(validate_secret_strength("short"), SecretStrength::Weak);
    }

    #[test]
    fn test_weak_secret_low_entropy() {
        let weak = "ab".repeat(20);
        assert_eq!(validate_secret_strength(&weak), SecretStrength::Weak);
    }

    #[test]
    fn test_weak_secret_repeating() {
        let weak = "kq7Vx2LmN9pR4tZw8YbC3dHf6JsQaaaa";
        assert_eq!(validate_secret_strength(weak), SecretStrength::Weak);
    }

    #[test]
    fn test_weak_secret_sequential() {
        let weak = "kq7Vx2LmN9pR4tZw8YbC3dHf6Js1234x";
        assert_eq!(validate_secret_strength(weak), SecretStrength::Weak);
    }

    #[test]
    fn test_acceptable_secret() {
        let secret = "kq7Vx2LmN9pR4tZw8YbC3dHf6JsQ1uGe";
        assert_eq!(validate_secret_strength(secret), SecretStrength::Acceptable);
    }
}
