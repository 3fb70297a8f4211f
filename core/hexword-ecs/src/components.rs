use hexword_protocol::{AbilityFlags, Direction, HexCoord, NounType, PhraseId, PropertyFlags, Word};

/// Cell an entity occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub HexCoord);

/// Visual/category type. Replaced wholesale by a noun-to-noun rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object(pub NounType);

/// The type an entity was spawned with. Never replaced by transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin(pub NounType);

/// The word printed on a word tile. Fixed for the tile's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text(pub Word);

/// Rule-derived passive classification (Stop, Goal, I, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Properties(pub PropertyFlags);

/// Rule-derived movement/interaction behaviour (Push, Climb, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Abilities(pub AbilityFlags);

/// Moves with player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputControlled;

/// Plays a footstep sound when it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepAudio;

/// Position of a word inside its phrase. The last word has no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhraseElement {
    Start,
    Middle,
}

/// Arrow drawn on a cell pointing toward the next word of a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseDirection {
    pub phrase: PhraseId,
    pub direction: Direction,
    pub element: PhraseElement,
}

/// Draw order within a cell, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderLayer {
    Object,
    Text,
    Marker,
}
