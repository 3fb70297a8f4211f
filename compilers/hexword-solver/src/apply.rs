use std::collections::BTreeSet;

use hecs::Entity;
use hexword_ecs::Board;
use hexword_protocol::{AbilityFlags, NounType, PropertyFlags};

use crate::rules::{flags_of, Assignment, RuleSet};

/// What one application changed beyond the rule-derived flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    /// Entities whose Object type changed, in application order.
    pub transformed: Vec<Entity>,
    /// Entities handed to the player.
    pub controlled: BTreeSet<Entity>,
}

/// Write `rules` onto the board.
///
/// Transforms go first so that property and ability rules match the final
/// Object type. Property and ability rules also reach entities spawned as
/// their subject, so a transformed entity keeps its original type's grants on
/// every application. The `I` subject goes last, once its abilities are
/// unioned. Expects rule state to have been reset beforehand.
pub fn apply_rules(board: &mut Board, rules: &RuleSet) -> Applied {
    let mut applied = Applied::default();

    // Snapshot every subject's entities before any type changes, so
    // `ROCK IS WALL` and `WALL IS ROCK` swap instead of chaining.
    let transforms: Vec<(Vec<Entity>, NounType)> = rules
        .iter()
        .filter(|(subject, _)| *subject != NounType::I)
        .filter_map(|(subject, assignments)| {
            let mut targets = assignments.iter().filter_map(Assignment::noun);
            let target = targets.next()?;
            if targets.next().is_some() {
                tracing::debug!(?subject, ?target, "several transform targets, applying the first");
            }
            let entities = board
                .entities_of_type(subject)
                .into_iter()
                .filter(|e| board.text_of(*e).is_none())
                .collect();
            Some((entities, target))
        })
        .collect();

    for (entities, target) in transforms {
        for entity in entities {
            match board.transform_noun(entity, target) {
                Ok(true) => applied.transformed.push(entity),
                Ok(false) => {}
                Err(err) => tracing::debug!(?entity, %err, "transform skipped"),
            }
        }
    }

    for (subject, assignments) in rules.iter().filter(|(s, _)| *s != NounType::I) {
        let (props, abilities) = flags_of(assignments);
        if props.is_empty() && abilities.is_empty() {
            continue;
        }
        let entities: BTreeSet<Entity> = board
            .entities_of_type(subject)
            .into_iter()
            .chain(board.entities_of_origin(subject))
            .collect();
        for entity in entities {
            grant(board, entity, props, abilities);
        }
    }

    if let Some(assignments) = rules.assignments(NounType::I) {
        let (_, abilities) = flags_of(assignments);
        for target in assignments.iter().filter_map(Assignment::noun) {
            for entity in board.entities_of_type(target) {
                grant(board, entity, PropertyFlags::I, abilities);
                if board.mark_controlled(entity).is_ok() {
                    applied.controlled.insert(entity);
                }
            }
        }
    }

    applied
}

fn grant(board: &mut Board, entity: Entity, props: PropertyFlags, abilities: AbilityFlags) {
    let granted = board
        .grant_properties(entity, props)
        .and_then(|()| board.grant_abilities(entity, abilities));
    if let Err(err) = granted {
        tracing::debug!(?entity, %err, "grant skipped");
    }
}
