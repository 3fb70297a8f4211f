use hecs::Entity;
use hexword_protocol::HexCoord;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell {0} lies outside the board")]
    OutOfBounds(HexCoord),
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    #[error("word tile {0:?} cannot be transformed")]
    ImmutableWord(Entity),
    #[error("the pronoun I is a rule subject, not an object type")]
    ReservedNoun,
}
