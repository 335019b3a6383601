// libtelugu/src/itrans.rs
//
// ITRANS-style Latin → Telugu transliteration.
//
// The input is split into tokens by greedy longest match (up to 3 chars)
// against the tables below. Consonants carry an inherent `a`; a following
// vowel token replaces it with the vowel sign, and anything else (another
// consonant, a mark, a non-letter or the end of input) makes the consonant
// take a virama.
//
// Deviations from strict ITRANS, following common Telugu typing habits:
// - `e`/`o` are the short vowels ఎ/ఒ; `E`/`ee` and `O`/`oo` the long ఏ/ఓ
// - an uppercase letter with no entry of its own falls back to its lowercase
//   form (`K` → `k`)

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Telugu virama (halant), U+0C4D.
pub const VIRAMA: char = '\u{0C4D}';

/// Longest key in any table, in chars.
const MAX_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Independent letter and the dependent sign used after a consonant
    Vowel {
        letter: &'static str,
        sign: &'static str,
    },
    Consonant(&'static str),
    /// Anusvara, visarga, candrabindu, avagraha, digits
    Mark(&'static str),
}

static TABLE: Lazy<HashMap<&'static str, Token>> = Lazy::new(|| {
    let mut m = HashMap::new();

    let vowels: &[(&[&str], &str, &str)] = &[
        (&["a"], "అ", ""),
        (&["aa", "A"], "ఆ", "\u{0C3E}"),
        (&["i"], "ఇ", "\u{0C3F}"),
        (&["ii", "I"], "ఈ", "\u{0C40}"),
        (&["u"], "ఉ", "\u{0C41}"),
        (&["uu", "U"], "ఊ", "\u{0C42}"),
        (&["RRi", "R^i"], "ఋ", "\u{0C43}"),
        (&["RRI", "R^I"], "ౠ", "\u{0C44}"),
        (&["e"], "ఎ", "\u{0C46}"),
        (&["E", "ee"], "ఏ", "\u{0C47}"),
        (&["ai"], "ఐ", "\u{0C48}"),
        (&["o"], "ఒ", "\u{0C4A}"),
        (&["O", "oo"], "ఓ", "\u{0C4B}"),
        (&["au"], "ఔ", "\u{0C4C}"),
    ];
    for (keys, letter, sign) in vowels {
        for key in *keys {
            m.insert(*key, Token::Vowel { letter, sign });
        }
    }

    let consonants: &[(&[&str], &str)] = &[
        // Velars
        (&["k"], "క"),
        (&["kh"], "ఖ"),
        (&["g"], "గ"),
        (&["gh"], "ఘ"),
        (&["~N"], "ఙ"),
        // Palatals
        (&["ch"], "చ"),
        (&["Ch", "chh"], "ఛ"),
        (&["j", "z"], "జ"),
        (&["jh"], "ఝ"),
        (&["~n"], "ఞ"),
        // Retroflexes
        (&["T"], "ట"),
        (&["Th"], "ఠ"),
        (&["D"], "డ"),
        (&["Dh"], "ఢ"),
        (&["N"], "ణ"),
        // Dentals
        (&["t"], "త"),
        (&["th"], "థ"),
        (&["d"], "ద"),
        (&["dh"], "ధ"),
        (&["n"], "న"),
        // Labials
        (&["p"], "ప"),
        (&["ph", "f"], "ఫ"),
        (&["b"], "బ"),
        (&["bh"], "భ"),
        (&["m"], "మ"),
        // Approximants, sibilants
        (&["y"], "య"),
        (&["r"], "ర"),
        (&["l"], "ల"),
        (&["L"], "ళ"),
        (&["v", "w"], "వ"),
        (&["sh"], "శ"),
        (&["Sh"], "ష"),
        (&["s"], "స"),
        (&["h"], "హ"),
        // Conjuncts with their own keys
        (&["kSh", "x"], "క్ష"),
        (&["j~n", "GY"], "జ్ఞ"),
    ];
    for (keys, letter) in consonants {
        for key in *keys {
            m.insert(*key, Token::Consonant(letter));
        }
    }

    m.insert("M", Token::Mark("\u{0C02}"));
    m.insert(".n", Token::Mark("\u{0C02}"));
    m.insert("H", Token::Mark("\u{0C03}"));
    m.insert(".N", Token::Mark("\u{0C01}"));
    m.insert(".a", Token::Mark("\u{0C3D}"));

    const DIGITS: [&str; 10] = ["౦", "౧", "౨", "౩", "౪", "౫", "౬", "౭", "౮", "౯"];
    const KEYS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    for (key, digit) in KEYS.iter().zip(DIGITS) {
        m.insert(*key, Token::Mark(digit));
    }

    m
});

/// Find the longest token at the start of `chars`.
/// Returns the token and the number of chars it consumed.
fn next_token(chars: &[char]) -> Option<(Token, usize)> {
    let mut key = String::with_capacity(MAX_TOKEN_LEN * 4);
    for len in (1..=MAX_TOKEN_LEN.min(chars.len())).rev() {
        key.clear();
        key.extend(&chars[..len]);
        if let Some(token) = TABLE.get(key.as_str()) {
            return Some((*token, len));
        }
    }

    let first = *chars.first()?;
    if first.is_ascii_uppercase() {
        let lower = first.to_ascii_lowercase().to_string();
        return TABLE.get(lower.as_str()).map(|token| (*token, 1));
    }
    None
}

/// Check whether `ch` belongs to the typing alphabet (ASCII letters).
pub fn is_input_char(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Transliterate ITRANS text to Telugu script.
///
/// # Example
/// ```
/// assert_eq!(libtelugu::itrans::transliterate("telugu"), "తెలుగు");
/// assert_eq!(libtelugu::itrans::transliterate("amma"), "అమ్మ");
/// ```
pub fn transliterate(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() * 3);
    // A consonant whose inherent vowel is still open.
    let mut open_consonant = false;
    let mut i = 0;

    while i < chars.len() {
        let Some((token, consumed)) = next_token(&chars[i..]) else {
            if open_consonant {
                out.push(VIRAMA);
                open_consonant = false;
            }
            out.push(chars[i]);
            i += 1;
            continue;
        };

        match token {
            Token::Vowel { letter, sign } => {
                if open_consonant {
                    out.push_str(sign);
                    open_consonant = false;
                } else {
                    out.push_str(letter);
                }
            }
            Token::Consonant(letter) => {
                if open_consonant {
                    out.push(VIRAMA);
                }
                out.push_str(letter);
                open_consonant = true;
            }
            Token::Mark(mark) => {
                if open_consonant {
                    out.push(VIRAMA);
                    open_consonant = false;
                }
                out.push_str(mark);
            }
        }
        i += consumed;
    }

    if open_consonant {
        out.push(VIRAMA);
    }
    out
}
