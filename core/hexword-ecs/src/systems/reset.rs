use hecs::{Entity, World};
use hexword_protocol::{AbilityFlags, PropertyFlags};
use crate::components::{Abilities, InputControlled, Properties, StepAudio};

/// Clear everything a previous rule pass granted.
///
/// Properties and Abilities go back to empty and the player-control markers
/// are stripped. Direction markers carry neither component and are left alone.
pub fn reset_rule_state(world: &mut World) {
    for (_id, props) in world.query_mut::<&mut Properties>() {
        props.0 = PropertyFlags::empty();
    }
    for (_id, abilities) in world.query_mut::<&mut Abilities>() {
        abilities.0 = AbilityFlags::empty();
    }

    let controlled: Vec<Entity> = world
        .query::<&InputControlled>()
        .iter()
        .map(|(id, _)| id)
        .collect();
    for id in controlled {
        let removed = world.remove_one::<InputControlled>(id);
        debug_assert!(removed.is_ok(), "queried entity {id:?} lost InputControlled");
    }

    let audible: Vec<Entity> = world.query::<&StepAudio>().iter().map(|(id, _)| id).collect();
    for id in audible {
        let removed = world.remove_one::<StepAudio>(id);
        debug_assert!(removed.is_ok(), "queried entity {id:?} lost StepAudio");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use hexword_protocol::{HexCoord, NounType, Word};

    #[test]
    fn test_reset_clears_granted_state() {
        let mut board = Board::new(2, 1);
        let wall = board.spawn_object(HexCoord::new(0, 0), NounType::Wall).unwrap();
        let word = board.spawn_word(HexCoord::new(1, 0), Word::Stop).unwrap();
        board.grant_properties(wall, PropertyFlags::STOP | PropertyFlags::I).unwrap();
        board.grant_abilities(word, AbilityFlags::PUSH).unwrap();
        board.mark_controlled(wall).unwrap();

        reset_rule_state(board.inner_mut());

        assert!(board.properties_of(wall).is_empty());
        assert!(board.abilities_of(word).is_empty());
        assert!(!board.is_input_controlled(wall));
        assert!(!board.has_step_audio(wall));
        // Object types survive a reset
        assert_eq!(board.object_of(wall), Some(NounType::Wall));
    }

    #[test]
    fn test_reset_strips_every_controlled_entity() {
        let mut board = Board::new(4, 1);
        let controlled: Vec<Entity> = (0..3)
            .map(|q| board.spawn_object(HexCoord::new(q, 0), NounType::Red).unwrap())
            .collect();
        let bystander = board.spawn_object(HexCoord::new(3, 0), NounType::Rock).unwrap();
        for entity in &controlled {
            board.mark_controlled(*entity).unwrap();
        }

        reset_rule_state(board.inner_mut());
        reset_rule_state(board.inner_mut());

        for entity in controlled.iter().chain([&bystander]) {
            assert!(!board.is_input_controlled(*entity));
            assert!(!board.has_step_audio(*entity));
        }
    }
}
