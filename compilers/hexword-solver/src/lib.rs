//! Rule engine for the hex word puzzle: finds sentences spelled by word
//! tiles, turns them into rules and writes those rules onto the board.

pub mod apply;
pub mod config;
pub mod engine;
pub mod graph;
pub mod rules;
pub mod search;
pub mod semantics;

pub use apply::{apply_rules, Applied};
pub use config::{ConfigError, EngineConfig};
pub use engine::{NullEvents, RecomputeReport, RuleEngine, RuleEvents};
pub use graph::TransformGraph;
pub use rules::{Assignment, RuleSet};
pub use search::{discover, DiscoveredPhrase, Discovery};
pub use semantics::extract;

#[cfg(test)]
mod tests {
    use super::*;
    use hexword_ecs::Board;
    use hexword_parser::parse_level;
    use hexword_protocol::{AbilityFlags, NounType, PropertyFlags};

    fn recompute(text: &str) -> (Board, RuleEngine, RecomputeReport) {
        let level = parse_level(text).unwrap();
        let mut board = Board::from_level(&level).unwrap();
        let mut engine = RuleEngine::default();
        engine.signal_state_change();
        let report = engine
            .update(&mut board, std::time::Duration::ZERO, &mut NullEvents)
            .unwrap();
        (board, engine, report)
    }

    #[test]
    fn test_level_end_to_end() {
        let (board, engine, report) = recompute(
            "# a small room
             I    AM   RED  .    .
             .    .    .    .    .
             WALL IS   STOP .    .
             .    .    .    .    .
             ROCK CAN  PUSH .    .
             .    red  wall rock yellow
            ",
        );

        assert!(report.stabilized);
        assert_eq!(report.phrases, 3);

        let red = board.entities_of_type(NounType::Red);
        let wall = board.entities_of_type(NounType::Wall);
        let rock = board.entities_of_type(NounType::Rock);
        assert_eq!((red.len(), wall.len(), rock.len()), (1, 1, 1));

        assert_eq!(engine.i_entities().iter().copied().collect::<Vec<_>>(), red);
        assert!(board.is_input_controlled(red[0]));
        assert_eq!(board.properties_of(wall[0]), PropertyFlags::STOP);
        assert_eq!(board.abilities_of(rock[0]), AbilityFlags::PUSH);
        assert!(engine.goal_entities().is_empty());
    }

    #[test]
    fn test_word_tiles_can_be_pushed() {
        let (board, _, _) = recompute("WORD CAN PUSH");
        for tile in board.entities_of_type(NounType::Word) {
            assert_eq!(board.abilities_of(tile), AbilityFlags::PUSH);
        }
    }

    #[test]
    fn test_report_serializes() {
        let (_, engine, report) = recompute("WALL IS STOP");
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["phrases"], 1);
        assert_eq!(json["stabilized"], true);

        let rules = serde_json::to_value(engine.rules()).unwrap();
        assert_eq!(rules["Wall"][0]["Property"], "Stop");
    }
}
