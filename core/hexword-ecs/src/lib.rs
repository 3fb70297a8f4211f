pub mod components;
pub mod error;
pub mod systems;

use hecs::{Entity, World};
use hexword_protocol::{AbilityFlags, HexCoord, Level, NounType, PropertyFlags, TileKind, Word};

use components::{
    Abilities, InputControlled, Object, Origin, PhraseDirection, Position, Properties,
    RenderLayer, StepAudio, Text,
};
pub use error::BoardError;

/// The hex grid and every entity standing on it.
///
/// Entities live in a hecs `World`; the board keeps a per-cell index on top
/// of it so cell lookups do not need a query.
pub struct Board {
    world: World,
    width: u32,
    height: u32,
    cells: Vec<Vec<Entity>>,
}

impl Board {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            world: World::new(),
            width,
            height,
            cells: vec![Vec::new(); width as usize * height as usize],
        }
    }

    /// Build a board from decoded level data.
    pub fn from_level(level: &Level) -> Result<Self, BoardError> {
        let mut board = Self::new(level.width, level.height);
        for tile in &level.tiles {
            let cell = HexCoord::new(tile.q, tile.r);
            match tile.kind {
                TileKind::Object(noun) => board.spawn_object(cell, noun)?,
                TileKind::Text(word) => board.spawn_word(cell, word)?,
            };
        }
        Ok(board)
    }

    /// Expose the inner hecs World for external solvers
    pub fn inner(&self) -> &World {
        &self.world
    }

    pub fn inner_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_valid(&self, cell: HexCoord) -> bool {
        cell.q >= 0 && cell.r >= 0 && (cell.q as u32) < self.width && (cell.r as u32) < self.height
    }

    fn index(&self, cell: HexCoord) -> Option<usize> {
        self.is_valid(cell)
            .then(|| cell.r as usize * self.width as usize + cell.q as usize)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = HexCoord> + '_ {
        (0..self.height as i32).flat_map(move |r| (0..self.width as i32).map(move |q| HexCoord::new(q, r)))
    }

    /// Entities at `cell` in the order they arrived there.
    pub fn entities_at(&self, cell: HexCoord) -> &[Entity] {
        match self.index(cell) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    /// Entities at `cell`, bottom-most first.
    pub fn entities_by_render_order(&self, cell: HexCoord) -> Vec<Entity> {
        let mut entities = self.entities_at(cell).to_vec();
        entities.sort_by_key(|e| {
            self.world
                .get::<&RenderLayer>(*e)
                .map(|layer| *layer)
                .unwrap_or(RenderLayer::Object)
        });
        entities
    }

    /// The word at `cell` when exactly one word tile stands there.
    pub fn word_at(&self, cell: HexCoord) -> Option<Word> {
        let mut words = self
            .entities_at(cell)
            .iter()
            .filter_map(|e| self.world.get::<&Text>(*e).ok().map(|t| t.0));
        match (words.next(), words.next()) {
            (Some(word), None) => Some(word),
            _ => None,
        }
    }

    pub fn spawn_object(&mut self, cell: HexCoord, noun: NounType) -> Result<Entity, BoardError> {
        if noun == NounType::I {
            return Err(BoardError::ReservedNoun);
        }
        let slot = self.index(cell).ok_or(BoardError::OutOfBounds(cell))?;
        let entity = self.world.spawn((
            Position(cell),
            Object(noun),
            Origin(noun),
            Properties::default(),
            Abilities::default(),
            RenderLayer::Object,
        ));
        self.cells[slot].push(entity);
        Ok(entity)
    }

    /// Word tiles are objects of type `Word` that also carry their text.
    pub fn spawn_word(&mut self, cell: HexCoord, word: Word) -> Result<Entity, BoardError> {
        let slot = self.index(cell).ok_or(BoardError::OutOfBounds(cell))?;
        let entity = self.world.spawn((
            Position(cell),
            Object(NounType::Word),
            Origin(NounType::Word),
            Text(word),
            Properties::default(),
            Abilities::default(),
            RenderLayer::Text,
        ));
        self.cells[slot].push(entity);
        Ok(entity)
    }

    pub fn spawn_phrase_direction(
        &mut self,
        cell: HexCoord,
        marker: PhraseDirection,
    ) -> Result<Entity, BoardError> {
        let slot = self.index(cell).ok_or(BoardError::OutOfBounds(cell))?;
        let entity = self.world.spawn((Position(cell), marker, RenderLayer::Marker));
        self.cells[slot].push(entity);
        Ok(entity)
    }

    pub fn move_entity(&mut self, entity: Entity, to: HexCoord) -> Result<(), BoardError> {
        let to_slot = self.index(to).ok_or(BoardError::OutOfBounds(to))?;
        let from = self.position_of(entity)?;
        if let Some(from_slot) = self.index(from) {
            self.cells[from_slot].retain(|e| *e != entity);
        }
        self.cells[to_slot].push(entity);
        self.world
            .insert_one(entity, Position(to))
            .map_err(|_| BoardError::NoSuchEntity(entity))
    }

    pub fn despawn(&mut self, entity: Entity) -> Result<(), BoardError> {
        let cell = self.position_of(entity)?;
        if let Some(slot) = self.index(cell) {
            self.cells[slot].retain(|e| *e != entity);
        }
        self.world
            .despawn(entity)
            .map_err(|_| BoardError::NoSuchEntity(entity))
    }

    /// Replace an entity's Object type. Returns whether the type changed.
    pub fn transform_noun(&mut self, entity: Entity, target: NounType) -> Result<bool, BoardError> {
        if target == NounType::I {
            return Err(BoardError::ReservedNoun);
        }
        if self.world.get::<&Text>(entity).is_ok() {
            return Err(BoardError::ImmutableWord(entity));
        }
        let mut object = self
            .world
            .get::<&mut Object>(entity)
            .map_err(|_| BoardError::NoSuchEntity(entity))?;
        if object.0 == target {
            return Ok(false);
        }
        tracing::trace!(?entity, from = ?object.0, to = ?target, "transform");
        object.0 = target;
        Ok(true)
    }

    pub fn grant_properties(&mut self, entity: Entity, flags: PropertyFlags) -> Result<(), BoardError> {
        let mut props = self
            .world
            .get::<&mut Properties>(entity)
            .map_err(|_| BoardError::NoSuchEntity(entity))?;
        props.0 |= flags;
        Ok(())
    }

    pub fn grant_abilities(&mut self, entity: Entity, flags: AbilityFlags) -> Result<(), BoardError> {
        let mut abilities = self
            .world
            .get::<&mut Abilities>(entity)
            .map_err(|_| BoardError::NoSuchEntity(entity))?;
        abilities.0 |= flags;
        Ok(())
    }

    /// Hand an entity to the player: input control plus footstep audio.
    pub fn mark_controlled(&mut self, entity: Entity) -> Result<(), BoardError> {
        self.world
            .insert(entity, (InputControlled, StepAudio))
            .map_err(|_| BoardError::NoSuchEntity(entity))
    }

    pub fn position_of(&self, entity: Entity) -> Result<HexCoord, BoardError> {
        self.world
            .get::<&Position>(entity)
            .map(|p| p.0)
            .map_err(|_| BoardError::NoSuchEntity(entity))
    }

    pub fn object_of(&self, entity: Entity) -> Option<NounType> {
        self.world.get::<&Object>(entity).ok().map(|o| o.0)
    }

    pub fn text_of(&self, entity: Entity) -> Option<Word> {
        self.world.get::<&Text>(entity).ok().map(|t| t.0)
    }

    pub fn properties_of(&self, entity: Entity) -> PropertyFlags {
        self.world
            .get::<&Properties>(entity)
            .map(|p| p.0)
            .unwrap_or_default()
    }

    pub fn abilities_of(&self, entity: Entity) -> AbilityFlags {
        self.world
            .get::<&Abilities>(entity)
            .map(|a| a.0)
            .unwrap_or_default()
    }

    pub fn is_input_controlled(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|e| e.has::<InputControlled>())
            .unwrap_or(false)
    }

    pub fn has_step_audio(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|e| e.has::<StepAudio>())
            .unwrap_or(false)
    }

    pub fn phrase_direction_of(&self, entity: Entity) -> Option<PhraseDirection> {
        self.world.get::<&PhraseDirection>(entity).ok().map(|d| *d)
    }

    pub fn origin_of(&self, entity: Entity) -> Option<NounType> {
        self.world.get::<&Origin>(entity).ok().map(|o| o.0)
    }

    /// All entities whose current Object type is `noun`, ordered by entity id.
    pub fn entities_of_type(&self, noun: NounType) -> Vec<Entity> {
        let mut found: Vec<Entity> = self
            .world
            .query::<&Object>()
            .iter()
            .filter(|(_, object)| object.0 == noun)
            .map(|(e, _)| e)
            .collect();
        found.sort_by_key(|e| e.id());
        found
    }

    /// All entities spawned as `noun`, whatever their type is now, ordered by
    /// entity id.
    pub fn entities_of_origin(&self, noun: NounType) -> Vec<Entity> {
        let mut found: Vec<Entity> = self
            .world
            .query::<&Origin>()
            .iter()
            .filter(|(_, origin)| origin.0 == noun)
            .map(|(e, _)| e)
            .collect();
        found.sort_by_key(|e| e.id());
        found
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }
}
