//! Password generation

use rand::seq::SliceRandom;
use rand::Rng;

use crate::response::CommandResponse;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*-_=+";

/// Generated password length
pub const PASSWORD_LENGTH: usize = 16;

/// Generate a random password and return it as a speakable response
#[must_use]
pub fn generate_password() -> CommandResponse {
    CommandResponse::plain(format!("Your new password is {}.", random_password()))
}

/// Random password with at least one character from each class
#[must_use]
pub fn random_password() -> String {
    let mut rng = rand::thread_rng();
    let all: Vec<u8> = [LOWER, UPPER, DIGITS, SYMBOLS].concat();

    let mut chars: Vec<u8> = vec![
        *LOWER.choose(&mut rng).unwrap_or(&b'a'),
        *UPPER.choose(&mut rng).unwrap_or(&b'A'),
        *DIGITS.choose(&mut rng).unwrap_or(&b'0'),
        *SYMBOLS.choose(&mut rng).unwrap_or(&b'!'),
    ];
    while chars.len() < PASSWORD_LENGTH {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);
    String::from_utf8(chars).unwrap_or_default()
}
