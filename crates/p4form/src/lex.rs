//! Whitespace tokenizer for single-line table entries (view mappings,
//! protections, triggers, typemap lines).

use crate::error::{FormError, Result};

/// Split a line into whitespace-separated tokens.
///
/// Double-quoted segments may contain whitespace; the quotes themselves are
/// dropped. A quoted segment can sit anywhere inside a token, so both
/// `"-//a b/..."` and `-"//a b/..."` yield `-//a b/...`. `""` yields an
/// empty token.
pub(crate) fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut token = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            if c != '"' {
                token.push(c);
                continue;
            }
            let mut closed = false;
            for q in chars.by_ref() {
                if q == '"' {
                    closed = true;
                    break;
                }
                token.push(q);
            }
            if !closed {
                return Err(FormError::UnterminatedQuote(line.to_string()));
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// Render a token, quoting it when it would not survive [`tokenize`] bare.
pub(crate) fn quote(prefix: &str, text: &str) -> String {
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        format!("\"{}{}\"", prefix, text)
    } else {
        format!("{}{}", prefix, text)
    }
}
