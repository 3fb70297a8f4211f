//! Plain-text level layouts.
//!
//! One line per row, cells separated by whitespace. A cell is `.` when empty,
//! otherwise `+`-joined items: UPPERCASE items are word tiles, lowercase items
//! are objects. `#` starts a comment; blank lines are skipped.
//!
//! ```text
//! # wall is stop
//! WALL IS STOP .
//! .    rock wall+ROCK
//! ```

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map},
    multi::{separated_list0, separated_list1},
    sequence::delimited,
    IResult,
};
use thiserror::Error;

use hexword_protocol::{Level, LevelTile, NounType, TileKind, Word};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("line {line}, column {column}: unexpected input")]
    Syntax { line: usize, column: usize },
    #[error("line {line}: unknown word `{word}`")]
    UnknownWord { line: usize, word: String },
    #[error("line {line}: `{name}` cannot be placed as an object")]
    ReservedObject { line: usize, name: String },
    #[error("level contains no rows")]
    Empty,
}

fn item(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic())(input)
}

fn cell(input: &str) -> IResult<&str, Option<Vec<&str>>> {
    alt((
        map(char('.'), |_| None),
        map(separated_list1(char('+'), item), Some),
    ))(input)
}

fn row(input: &str) -> IResult<&str, Vec<Option<Vec<&str>>>> {
    delimited(space0, separated_list0(space1, cell), space0)(input)
}

fn classify(item: &str, line: usize) -> Result<TileKind, LevelError> {
    let unknown = || LevelError::UnknownWord { line, word: item.to_string() };

    if item.chars().all(|c| c.is_ascii_uppercase()) {
        return Word::from_name(item).map(TileKind::Text).ok_or_else(unknown);
    }
    if item.chars().all(|c| c.is_ascii_lowercase()) {
        return match NounType::from_name(item) {
            // The pronoun is never an object, and Word-typed objects are
            // only ever word tiles.
            Some(NounType::I | NounType::Word) => Err(LevelError::ReservedObject {
                line,
                name: item.to_string(),
            }),
            Some(noun) => Ok(TileKind::Object(noun)),
            None => Err(unknown()),
        };
    }
    Err(unknown())
}

/// Decode a text layout into a [`Level`].
pub fn parse_level(text: &str) -> Result<Level, LevelError> {
    let mut tiles = Vec::new();
    let mut width = 0usize;
    let mut r = 0i32;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("");
        if content.trim().is_empty() {
            continue;
        }

        let (_, cells) = all_consuming(row)(content).map_err(|err| {
            let rest = match err {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input.len(),
                nom::Err::Incomplete(_) => 0,
            };
            LevelError::Syntax { line, column: content.len() - rest + 1 }
        })?;

        width = width.max(cells.len());
        for (q, cell) in cells.into_iter().enumerate() {
            for name in cell.into_iter().flatten() {
                tiles.push(LevelTile {
                    q: q as i32,
                    r,
                    kind: classify(name, line)?,
                });
            }
        }
        r += 1;
    }

    if r == 0 {
        return Err(LevelError::Empty);
    }

    Ok(Level {
        width: width as u32,
        height: r as u32,
        tiles,
    })
}
