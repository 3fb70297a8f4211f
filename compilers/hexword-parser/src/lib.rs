pub mod grammar;
pub mod level;
pub mod phrase;

pub use grammar::{parse, parse_with_count, Verdict};
pub use level::{parse_level, LevelError};
pub use phrase::{hash_words, Link, Phrase};

/// Parse the words of a phrase read off the board.
pub fn parse_phrase(phrase: &Phrase) -> Verdict {
    parse(phrase.words())
}
