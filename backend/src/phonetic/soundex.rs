//! Soundex encoding of normalized words.
//!
//! | Class | Letters |
//! |-------|-------------------|
//! | 1 | B F P V W |
//! | 2 | C G J K Q S X Z |
//! | 3 | D T |
//! | 4 | L |
//! | 5 | M N |
//! | 6 | R |
//!
//! Vowels, `H`, and the remaining letters have no class. Consecutive letters
//! of the same class give one digit; a class-less letter between them lets
//! the digit repeat.

use super::german::normalize;
use crate::models::SoundexCode;

/// Digit class of an uppercase ASCII letter.
pub fn digit_class(letter: char) -> Option<char> {
    match letter {
        'B' | 'F' | 'P' | 'V' | 'W' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// Encode a normalized word.
///
/// Everything outside `A-Z` after uppercasing is dropped. Returns
/// [`SoundexCode::empty`] when no letter remains.
pub fn encode(normalized: &str) -> SoundexCode {
    let mut letters = normalized
        .to_uppercase()
        .chars()
        .filter(char::is_ascii_uppercase)
        .collect::<Vec<_>>()
        .into_iter();

    let Some(first) = letters.next() else {
        return SoundexCode::empty();
    };

    let mut digits = String::new();
    let mut previous = digit_class(first);

    for letter in letters {
        let class = digit_class(letter);
        if class != previous {
            if let Some(digit) = class {
                digits.push(digit);
            }
            previous = class;
        }
        if digits.len() >= SoundexCode::LEN - 1 {
            break;
        }
    }

    SoundexCode::from_parts(first, &digits)
}

/// Normalize then encode a raw word.
///
/// ```
/// use soundex_csv::phonetic::german_soundex;
///
/// assert_eq!(german_soundex("Schmidt"), "S530");
/// assert_eq!(german_soundex("Meyer"), german_soundex("Maier"));
/// ```
pub fn german_soundex(word: &str) -> SoundexCode {
    encode(&normalize(word))
}
