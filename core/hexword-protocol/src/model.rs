use rkyv::{Archive, Deserialize, Serialize};
use crate::words::{NounType, Word};
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// What a level places on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub enum TileKind {
    /// A plain object, e.g. a wall or a rock.
    Object(NounType),
    /// A word tile. Its Object type is always `NounType::Word`.
    Text(Word),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LevelTile {
    pub q: i32,
    pub r: i32,
    pub kind: TileKind,
}

/// Decoded level layout, ready to be loaded onto a board.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<LevelTile>,
}

impl Level {
    pub fn words(&self) -> impl Iterator<Item = &LevelTile> {
        self.tiles.iter().filter(|t| matches!(t.kind, TileKind::Text(_)))
    }
}
