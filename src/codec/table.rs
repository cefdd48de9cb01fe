use std::collections::HashMap;
use std::sync::LazyLock;

/// Morse symbol emitted for the space character
pub const WORD_SYMBOL: &str = "/";

/// Character ↔ symbol pairs (international Morse plus common punctuation)
///
/// Every symbol is unique so the reverse table is a plain inversion.
pub static SYMBOLS: [(char, &str); 55] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
    (' ', WORD_SYMBOL),
];

static FORWARD: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| SYMBOLS.iter().copied().collect());

static REVERSE: LazyLock<HashMap<&'static str, char>> =
    LazyLock::new(|| SYMBOLS.iter().map(|&(c, s)| (s, c)).collect());

/// Look up the Morse symbol for a character (case-insensitive)
///
/// Characters whose uppercase form is more than one character (e.g. `ß`)
/// have no symbol.
pub fn symbol_for(c: char) -> Option<&'static str> {
    let mut upper = c.to_uppercase();
    let folded = upper.next()?;
    if upper.next().is_some() {
        return None;
    }
    FORWARD.get(&folded).copied()
}

/// Look up the character for a Morse symbol
pub fn char_for(symbol: &str) -> Option<char> {
    REVERSE.get(symbol).copied()
}
