// Tokenization shared by indexing and querying. The two sides must agree on
// the token stream or query vectors stop being commensurable with chunk
// vectors, so this is the only tokenizer in the crate.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Run {
    Latin,
    Digit,
}

/// Split text into a normalized token stream: single CJK ideographs,
/// lowercased Latin letter runs, and digit runs. Punctuation and whitespace
/// are discarded.
#[inline]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut run: Option<Run> = None;

    for c in text.chars() {
        let next = if is_cjk_ideograph(c) {
            flush(&mut tokens, &mut current, &mut run);
            tokens.push(c.to_string());
            continue;
        } else if is_latin_letter(c) {
            Some(Run::Latin)
        } else if c.is_ascii_digit() {
            Some(Run::Digit)
        } else {
            None
        };

        if next != run {
            flush(&mut tokens, &mut current, &mut run);
        }
        if let Some(kind) = next {
            run = Some(kind);
            for lower in c.to_lowercase() {
                current.push(lower);
            }
        }
    }

    flush(&mut tokens, &mut current, &mut run);
    tokens
}

/// Deduplicated token set, used for overlap ratios.
#[inline]
pub fn term_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

fn flush(tokens: &mut Vec<String>, current: &mut String, run: &mut Option<Run>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
    *run = None;
}

/// CJK Unified Ideographs, Extension A, and the compatibility block.
#[inline]
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

fn is_latin_letter(c: char) -> bool {
    // ASCII plus Latin-1 Supplement and Latin Extended-A/B letters. Other
    // scripts fall outside the token classes and are dropped.
    c.is_ascii_alphabetic()
        || (matches!(c, '\u{00C0}'..='\u{024F}') && c.is_alphabetic())
}
