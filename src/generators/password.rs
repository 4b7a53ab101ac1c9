use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use strum_macros::Display;

use crate::constants::password::{
    DIGITS, LOWERCASE, MAX_LENGTH, MIN_LENGTH, SYMBOLS, UPPERCASE,
};
use crate::debug;
use crate::error::{invalid, Error, Result};

/// Character classes that can be combined into the password alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetFlags {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for CharsetFlags {
    fn default() -> Self {
        Self {
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Where the randomness of a generated secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum EntropySource {
    #[strum(serialize = "os")]
    Os,
    /// The OS generator failed and a time seeded PRNG was used instead
    #[strum(serialize = "fallback")]
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum StrengthLabel {
    #[strum(serialize = "Weak")]
    Weak,
    #[strum(serialize = "Medium")]
    Medium,
    #[strum(serialize = "Strong")]
    Strong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Password {
    pub value: String,
    pub strength: u8,
    pub source: EntropySource,
}

impl Password {
    pub fn is_degraded(&self) -> bool {
        self.source == EntropySource::Fallback
    }

    pub fn label(&self) -> StrengthLabel {
        strength_label(self.strength)
    }
}

/// Builds the alphabet: the union of the selected classes minus the excluded characters
pub fn build_charset(flags: CharsetFlags, exclude_chars: &str) -> Vec<char> {
    let classes = [
        (flags.lowercase, LOWERCASE),
        (flags.uppercase, UPPERCASE),
        (flags.digits, DIGITS),
        (flags.symbols, SYMBOLS),
    ];
    classes
        .iter()
        .filter(|(selected, _)| *selected)
        .flat_map(|(_, chars)| chars.chars())
        .filter(|c| !exclude_chars.contains(*c))
        .collect()
}

/// Generates a password drawing `length` independent uniform samples from the alphabet.
///
/// The OS random generator is used; if it is unavailable a time seeded
/// generator is used and the result is flagged as `EntropySource::Fallback`.
///
/// # Errors
/// * `ValidationError` - if the length is outside the supported range
/// * `EmptyCharset` - if no character is left once exclusions are applied
pub fn generate_password(length: usize, flags: CharsetFlags, exclude_chars: &str) -> Result<Password> {
    let charset = checked_charset(length, flags, exclude_chars)?;

    let mut entropy_check = [0u8; 8];
    let (value, source) = match OsRng.try_fill_bytes(&mut entropy_check) {
        Ok(()) => (sample(&mut OsRng, &charset, length), EntropySource::Os),
        Err(e) => {
            debug!("OS random generator unavailable ({}), using fallback generator", e);
            let mut rng = StdRng::seed_from_u64(time_seed());
            (sample(&mut rng, &charset, length), EntropySource::Fallback)
        }
    };

    let strength = strength(&value);
    Ok(Password {
        value,
        strength,
        source,
    })
}

/// Same as `generate_password` with a caller supplied generator
pub fn generate_password_with<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    flags: CharsetFlags,
    exclude_chars: &str,
) -> Result<String> {
    let charset = checked_charset(length, flags, exclude_chars)?;
    Ok(sample(rng, &charset, length))
}

/// Scores a password from 0 to 10: up to 5 points for length, one point for
/// each of lowercase, uppercase and digits, two points for any other character
pub fn strength(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    let length_score = (password.chars().count() / 2).min(5);
    let mut score = length_score;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 2;
    }
    score.min(10) as u8
}

pub fn strength_label(score: u8) -> StrengthLabel {
    match score {
        0..=3 => StrengthLabel::Weak,
        4..=6 => StrengthLabel::Medium,
        _ => StrengthLabel::Strong,
    }
}

fn checked_charset(length: usize, flags: CharsetFlags, exclude_chars: &str) -> Result<Vec<char>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(invalid(format!(
            "password length must be between {} and {}, got {}",
            MIN_LENGTH, MAX_LENGTH, length
        )));
    }
    let charset = build_charset(flags, exclude_chars);
    if charset.is_empty() {
        return Err(Error::EmptyCharset);
    }
    Ok(charset)
}

fn sample<R: Rng + ?Sized>(rng: &mut R, charset: &[char], length: usize) -> String {
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())])
        .collect()
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn alphanumeric() -> CharsetFlags {
        CharsetFlags {
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: false,
        }
    }

    #[test]
    fn test_alphanumeric_password() {
        let pattern = Regex::new("^[A-Za-z0-9]{16}$").unwrap();
        for _ in 0..50 {
            let password = generate_password(16, alphanumeric(), "").unwrap();
            assert!(pattern.is_match(&password.value), "{}", password.value);
            assert_eq!(password.source, EntropySource::Os);
        }
    }

    #[test]
    fn test_excluded_characters_never_appear() {
        let excluded = "aeiouAEIOU01lI";
        for _ in 0..50 {
            let password = generate_password(64, alphanumeric(), excluded).unwrap();
            assert!(!password.value.chars().any(|c| excluded.contains(c)));
        }
    }

    #[test]
    fn test_empty_charset() {
        let none = CharsetFlags {
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
        };
        assert!(matches!(generate_password(16, none, ""), Err(Error::EmptyCharset)));

        let digits = CharsetFlags {
            lowercase: false,
            uppercase: false,
            digits: true,
            symbols: false,
        };
        assert!(matches!(
            generate_password(16, digits, "0123456789"),
            Err(Error::EmptyCharset)
        ));
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            generate_password(3, CharsetFlags::default(), ""),
            Err(Error::ValidationError(_))
        ));
        assert_eq!(
            generate_password(MAX_LENGTH, CharsetFlags::default(), "")
                .unwrap()
                .value
                .chars()
                .count(),
            MAX_LENGTH
        );
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let first = generate_password_with(&mut StdRng::seed_from_u64(1), 20, alphanumeric(), "").unwrap();
        let second = generate_password_with(&mut StdRng::seed_from_u64(1), 20, alphanumeric(), "").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_strength() {
        assert_eq!(strength(""), 0);
        assert_eq!(strength("abc"), 2);
        assert_eq!(strength("abcdefghij"), 6);
        assert_eq!(strength("Abcdef1!xyzw"), 10);
        assert_eq!(strength_label(strength("abc")), StrengthLabel::Weak);
        assert_eq!(strength_label(strength("Abcdef1!xyzw")), StrengthLabel::Strong);
    }

    #[test]
    fn test_charset_union() {
        let charset = build_charset(
            CharsetFlags {
                lowercase: false,
                uppercase: false,
                digits: true,
                symbols: true,
            },
            "!",
        );
        assert!(charset.contains(&'7'));
        assert!(charset.contains(&'?'));
        assert!(!charset.contains(&'!'));
        assert!(!charset.contains(&'a'));
    }
}
