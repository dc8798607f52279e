//! Unit comparison and the built-in character predicates.

/// Case-fold a unit. Only ASCII letters fold; everything else is returned
/// unchanged, so comparison stays ordinal outside ASCII.
#[inline(always)]
pub fn fold(c: char) -> char {
    c.to_ascii_lowercase()
}

/// \return whether two units compare equal, folding case if \p icase.
#[inline(always)]
pub fn unit_eq(c1: char, c2: char, icase: bool) -> bool {
    c1 == c2 || (icase && fold(c1) == fold(c2))
}

/// \return whether this is a word char: ASCII letters, digits and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// \return whether this is a line terminator.
pub fn is_line_terminator(c: char) -> bool {
    match c {
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => true,
        _ => false,
    }
}

pub fn is_any(_c: char) -> bool {
    true
}

pub fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_alphanumeric(c: char) -> bool {
    c.is_alphanumeric()
}

pub fn is_uppercase(c: char) -> bool {
    c.is_uppercase()
}

pub fn is_lowercase(c: char) -> bool {
    c.is_lowercase()
}

/// Punctuation in the ASCII sense, plus the dashes, quotes and marks of the
/// General Punctuation block. The block's spaces and format controls are not
/// punctuation.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || ('\u{2010}' <= c && c <= '\u{2027}')
        || ('\u{2030}' <= c && c <= '\u{205E}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_is_ascii_only() {
        assert!(unit_eq('a', 'A', true));
        assert!(!unit_eq('a', 'A', false));
        // No Unicode folding: the micro sign and mu stay distinct.
        assert!(!unit_eq('\u{00B5}', '\u{03BC}', true));
        assert!(!unit_eq('\u{00E9}', '\u{00C9}', true));
    }

    #[test]
    fn predicates() {
        assert!(is_word_char('_'));
        assert!(!is_word_char('-'));
        assert!(is_line_terminator('\u{2028}'));
        assert!(is_letter('\u{00E9}'));
        assert!(!is_digit('\u{0663}'));
        assert!(is_punctuation('!'));
        assert!(is_punctuation('\u{2014}'));
        assert!(is_punctuation('\u{2026}'));
        assert!(is_punctuation('\u{2030}'));
        // Spaces and format controls in the block are excluded.
        assert!(!is_punctuation('\u{2003}'));
        assert!(!is_punctuation('\u{200B}'));
        assert!(!is_punctuation('\u{2028}'));
        assert!(!is_punctuation('\u{202F}'));
        assert!(!is_punctuation('\u{2060}'));
        assert!(!is_punctuation('a'));
    }
}
