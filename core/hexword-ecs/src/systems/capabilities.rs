use std::collections::BTreeSet;

use hecs::{Entity, World};
use hexword_protocol::{AbilityFlags, PropertyFlags};
use crate::components::{Abilities, Properties};

/// Entities holding the capabilities other subsystems watch for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySets {
    /// Entities with `PropertyType::I`.
    pub i: BTreeSet<Entity>,
    /// Entities with `PropertyType::Goal`.
    pub goal: BTreeSet<Entity>,
    /// Entities with `AbilityType::Send`.
    pub send: BTreeSet<Entity>,
}

pub fn collect_capabilities(world: &World) -> CapabilitySets {
    let mut sets = CapabilitySets::default();

    for (id, props) in world.query::<&Properties>().iter() {
        if props.0.contains(PropertyFlags::I) {
            sets.i.insert(id);
        }
        if props.0.contains(PropertyFlags::GOAL) {
            sets.goal.insert(id);
        }
    }

    for (id, abilities) in world.query::<&Abilities>().iter() {
        if abilities.0.contains(AbilityFlags::SEND) {
            sets.send.insert(id);
        }
    }

    sets
}
