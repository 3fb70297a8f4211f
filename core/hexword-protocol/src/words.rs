use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

/// The four disjoint ranges a [`Word`] can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub enum Category {
    Object,
    Verb,
    Property,
    Ability,
}

/// A terminal symbol printed on a word tile.
///
/// The discriminant order is load-bearing: each category occupies one
/// contiguous range, and category tests are range comparisons against the
/// `FIRST_*` boundaries below. Adding a word means inserting it inside its
/// range and moving the boundaries with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Word {
    // Objects
    I = 0,
    Wall = 1,
    Word = 2,
    Rock = 3,
    Red = 4,
    Blue = 5,
    Green = 6,
    Grey = 7,
    Purple = 8,
    Yellow = 9,

    // Verbs
    Is = 10,
    Am = 11,
    Can = 12,
    And = 13,

    // Properties
    Stop = 14,
    Hot = 15,
    Water = 16,
    Goal = 17,
    Chill = 18,

    // Abilities
    Push = 19,
    Pull = 20,
    Climb = 21,
    Float = 22,
    Send = 23,
}

impl Word {
    pub const FIRST_VERB: u8 = Word::Is as u8;
    pub const FIRST_PROPERTY: u8 = Word::Stop as u8;
    pub const FIRST_ABILITY: u8 = Word::Push as u8;
    pub const LAST: u8 = Word::Send as u8;

    pub const ALL: [Word; 24] = [
        Word::I,
        Word::Wall,
        Word::Word,
        Word::Rock,
        Word::Red,
        Word::Blue,
        Word::Green,
        Word::Grey,
        Word::Purple,
        Word::Yellow,
        Word::Is,
        Word::Am,
        Word::Can,
        Word::And,
        Word::Stop,
        Word::Hot,
        Word::Water,
        Word::Goal,
        Word::Chill,
        Word::Push,
        Word::Pull,
        Word::Climb,
        Word::Float,
        Word::Send,
    ];

    pub const fn category(self) -> Category {
        let d = self as u8;
        if d < Self::FIRST_VERB {
            Category::Object
        } else if d < Self::FIRST_PROPERTY {
            Category::Verb
        } else if d < Self::FIRST_ABILITY {
            Category::Property
        } else {
            Category::Ability
        }
    }

    pub const fn is_object(self) -> bool {
        (self as u8) < Self::FIRST_VERB
    }

    pub const fn is_verb(self) -> bool {
        let d = self as u8;
        d >= Self::FIRST_VERB && d < Self::FIRST_PROPERTY
    }

    pub const fn is_property(self) -> bool {
        let d = self as u8;
        d >= Self::FIRST_PROPERTY && d < Self::FIRST_ABILITY
    }

    pub const fn is_ability(self) -> bool {
        (self as u8) >= Self::FIRST_ABILITY
    }

    /// The noun this word names, if it is an object word.
    pub const fn noun(self) -> Option<NounType> {
        Some(match self {
            Word::I => NounType::I,
            Word::Wall => NounType::Wall,
            Word::Word => NounType::Word,
            Word::Rock => NounType::Rock,
            Word::Red => NounType::Red,
            Word::Blue => NounType::Blue,
            Word::Green => NounType::Green,
            Word::Grey => NounType::Grey,
            Word::Purple => NounType::Purple,
            Word::Yellow => NounType::Yellow,
            _ => return None,
        })
    }

    pub const fn property(self) -> Option<PropertyType> {
        Some(match self {
            Word::Stop => PropertyType::Stop,
            Word::Hot => PropertyType::Hot,
            Word::Water => PropertyType::Water,
            Word::Goal => PropertyType::Goal,
            Word::Chill => PropertyType::Chill,
            _ => return None,
        })
    }

    pub const fn ability(self) -> Option<AbilityType> {
        Some(match self {
            Word::Push => AbilityType::Push,
            Word::Pull => AbilityType::Pull,
            Word::Climb => AbilityType::Climb,
            Word::Float => AbilityType::Float,
            Word::Send => AbilityType::Send,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Word::I => "I",
            Word::Wall => "WALL",
            Word::Word => "WORD",
            Word::Rock => "ROCK",
            Word::Red => "RED",
            Word::Blue => "BLUE",
            Word::Green => "GREEN",
            Word::Grey => "GREY",
            Word::Purple => "PURPLE",
            Word::Yellow => "YELLOW",
            Word::Is => "IS",
            Word::Am => "AM",
            Word::Can => "CAN",
            Word::And => "AND",
            Word::Stop => "STOP",
            Word::Hot => "HOT",
            Word::Water => "WATER",
            Word::Goal => "GOAL",
            Word::Chill => "CHILL",
            Word::Push => "PUSH",
            Word::Pull => "PULL",
            Word::Climb => "CLIMB",
            Word::Float => "FLOAT",
            Word::Send => "SEND",
        }
    }

    /// Case-insensitive lookup by printed name.
    pub fn from_name(name: &str) -> Option<Word> {
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.name().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for Word {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Object category of an entity. `I` is the pronoun subject and never an
/// entity's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum NounType {
    I = 0,
    Wall = 1,
    Word = 2,
    Rock = 3,
    Red = 4,
    Blue = 5,
    Green = 6,
    Grey = 7,
    Purple = 8,
    Yellow = 9,
}

impl NounType {
    /// The word tile that names this noun.
    pub const fn word(self) -> Word {
        match self {
            NounType::I => Word::I,
            NounType::Wall => Word::Wall,
            NounType::Word => Word::Word,
            NounType::Rock => Word::Rock,
            NounType::Red => Word::Red,
            NounType::Blue => Word::Blue,
            NounType::Green => Word::Green,
            NounType::Grey => Word::Grey,
            NounType::Purple => Word::Purple,
            NounType::Yellow => Word::Yellow,
        }
    }

    pub fn from_name(name: &str) -> Option<NounType> {
        Word::from_name(name).and_then(Word::noun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub enum PropertyType {
    Stop,
    Hot,
    Water,
    Goal,
    Chill,
    /// Marks the entities the player controls. Granted only through `I AM ...`.
    I,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub enum AbilityType {
    Push,
    Pull,
    Climb,
    Float,
    Send,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct PropertyFlags: u16 {
        const STOP = 1;
        const HOT = 2;
        const WATER = 4;
        const GOAL = 8;
        const CHILL = 16;
        const I = 32;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct AbilityFlags: u16 {
        const PUSH = 1;
        const PULL = 2;
        const CLIMB = 4;
        const FLOAT = 8;
        const SEND = 16;
    }
}

impl From<PropertyType> for PropertyFlags {
    fn from(p: PropertyType) -> Self {
        match p {
            PropertyType::Stop => PropertyFlags::STOP,
            PropertyType::Hot => PropertyFlags::HOT,
            PropertyType::Water => PropertyFlags::WATER,
            PropertyType::Goal => PropertyFlags::GOAL,
            PropertyType::Chill => PropertyFlags::CHILL,
            PropertyType::I => PropertyFlags::I,
        }
    }
}

impl From<AbilityType> for AbilityFlags {
    fn from(a: AbilityType) -> Self {
        match a {
            AbilityType::Push => AbilityFlags::PUSH,
            AbilityType::Pull => AbilityFlags::PULL,
            AbilityType::Climb => AbilityFlags::CLIMB,
            AbilityType::Float => AbilityFlags::FLOAT,
            AbilityType::Send => AbilityFlags::SEND,
        }
    }
}
