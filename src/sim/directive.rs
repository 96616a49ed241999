//! Admin directives and their text grammar
//!
//! Typed or transcribed text is turned into a closed set of [`Directive`]s.
//! The simulation only ever sees the typed value; swapping the grammar means
//! replacing [`parse`] and nothing else.

use super::state::CharacterId;

/// Falling bombs per barrage
pub const BARRAGE_SIZE: u32 = 10;

/// A recognized admin command (ids are 0-based roster indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Grant flight
    Close(CharacterId),
    /// Point every bot at one character
    Target(CharacterId),
    /// Drop a barrage of cosmetic bombs around a character
    Bomb(CharacterId),
    Giant(CharacterId),
    Tiny(CharacterId),
    Freeze(CharacterId),
    Unfreeze(CharacterId),
    /// Shuffle everyone's positions
    Swap,
}

/// Speech-to-text tends to spell small numbers out
fn normalize_word(word: &str) -> &str {
    match word {
        "one" => "1",
        "two" | "to" | "too" => "2",
        "three" => "3",
        "four" => "4",
        "five" => "5",
        other => other,
    }
}

/// 1-based player number to roster index
fn player_index(token: &str) -> Option<CharacterId> {
    let n: usize = token.parse().ok()?;
    n.checked_sub(1)
}

/// Parse free text into a directive (case-insensitive, None if unrecognized)
pub fn parse(text: &str) -> Option<Directive> {
    let text = text.trim().to_lowercase();
    let words: Vec<&str> = text.split_whitespace().map(normalize_word).collect();

    match words.as_slice() {
        [first, ..] if first.starts_with("swap") => Some(Directive::Swap),
        ["bomb", "player", n] | ["bomb", n] => player_index(n).map(Directive::Bomb),
        [verb, n] => {
            let id = player_index(n)?;
            match *verb {
                "close" => Some(Directive::Close(id)),
                "target" => Some(Directive::Target(id)),
                "giant" => Some(Directive::Giant(id)),
                "tiny" => Some(Directive::Tiny(id)),
                "freeze" => Some(Directive::Freeze(id)),
                "unfreeze" => Some(Directive::Unfreeze(id)),
                _ => None,
            }
        }
        _ => None,
    }
}
