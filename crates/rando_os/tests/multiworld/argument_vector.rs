#![forbid(unsafe_code)]

use rando_contracts::{
    ChoiceEntry, ConsistencyError, OptionSchema, OptionValue, ParticipantIndex, RangeError,
    ScopeId, SessionError,
};
use rando_engines::builtin_catalog::{builtin_catalog, ASSET_OPTION_KEY};
use rando_engines::multiworld::{
    build_argument_vector, build_argument_vector_with, decode_participant,
};
use rando_engines::scope_manager::ScopeTransition;
use rando_engines::session::Session;
use rando_os::generate::{GenerateOutcome, GenerateWiring, GenerateWiringConfig};
use rando_os::process_generator::ProcessGenerator;
use rando_os::shared_session::SharedSession;

const WINDOWS_SPRITE: &str = r"C:\Users\me\sprites\Link.bin";

fn session() -> Session {
    Session::new(builtin_catalog().unwrap()).unwrap()
}

fn schema_with_sprite() -> OptionSchema {
    let mut schema = builtin_catalog().unwrap();
    schema
        .augment(
            ASSET_OPTION_KEY,
            vec![ChoiceEntry::new("Link", WINDOWS_SPRITE)],
        )
        .unwrap();
    schema
}

fn p(n: u8) -> ScopeId {
    ScopeId::Participant(ParticipantIndex::new(n).unwrap())
}

fn choice(label: &str) -> OptionValue {
    OptionValue::Choice(label.to_string())
}

fn nested(args: &[String]) -> Vec<&String> {
    args.iter()
        .filter(|a| a.starts_with("--multiworld-config="))
        .collect()
}

#[test]
fn at_mw_vec_01_defaults_emit_true_flags_and_input_path() {
    let args = build_argument_vector(&session(), "rom.gbc").unwrap();
    assert!(args.contains(&"--heartpiece".to_string()));
    assert!(args.contains(&"--boomerang=gift".to_string()));
    assert!(!args.iter().any(|a| a.starts_with("--seed")));
    assert!(!args.iter().any(|a| a.starts_with("--multiworld")));
    assert!(!args.iter().any(|a| a.starts_with("--gfxmod")));
    assert_eq!(args.last().map(String::as_str), Some("rom.gbc"));
}

#[test]
fn at_mw_vec_02_seed_and_choice_labels_serialize_by_value() {
    let mut s = session();
    s.set_value(
        ScopeId::Global,
        "seed",
        OptionValue::Text("ABC123".to_string()),
    )
    .unwrap();
    s.set_value(ScopeId::Global, "logic", choice("Hard")).unwrap();
    let args = build_argument_vector(&s, "rom.gbc").unwrap();
    assert_eq!(args[0], "--seed=ABC123");
    assert!(args.contains(&"--logic=hard".to_string()));
}

#[test]
fn at_mw_vec_03_count_cycle_leaves_one_global_projection() {
    let mut s = session();
    s.set_participant_count(2).unwrap();
    s.set_value(p(2), "logic", choice("Hell")).unwrap();
    s.set_participant_count(3).unwrap();
    assert_eq!(
        s.set_participant_count(1).unwrap(),
        ScopeTransition::Shrunk {
            removed: vec![
                ParticipantIndex::new(3).unwrap(),
                ParticipantIndex::new(2).unwrap(),
                ParticipantIndex::new(1).unwrap(),
            ]
        }
    );
    let scopes = s.participant_scopes();
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].get("logic"), Some(&choice("Normal")));
    assert!(s.dedicated_scopes().is_empty());
    assert!(matches!(
        s.scope(p(2)),
        Err(SessionError::UnknownScope(_))
    ));
    assert_eq!(
        build_argument_vector(&s, "rom.gbc").unwrap(),
        build_argument_vector(&session(), "rom.gbc").unwrap()
    );
}

#[test]
fn at_mw_vec_04_only_overrides_reach_nested_configs() {
    let mut s = session();
    s.set_participant_count(2).unwrap();
    s.set_value(p(2), "boomerang", choice("Trade")).unwrap();
    let args = build_argument_vector(&s, "rom.gbc").unwrap();

    assert!(args.contains(&"--multiworld=2".to_string()));
    assert!(args.contains(&"--boomerang=gift".to_string()));
    assert_eq!(
        nested(&args),
        vec!["--multiworld-config=", "--multiworld-config=--boomerang=trade"]
    );
    assert_eq!(args.last().map(String::as_str), Some("rom.gbc"));
}

#[test]
fn at_mw_vec_05_building_twice_is_identical() {
    let mut s = session();
    s.set_participant_count(4).unwrap();
    s.set_value(p(3), "textmode", choice("No Text")).unwrap();
    let first = build_argument_vector(&s, "rom.gbc").unwrap();
    let second = build_argument_vector(&s, "rom.gbc").unwrap();
    assert_eq!(first, second);
}

#[test]
fn at_mw_vec_06_untouched_participants_encode_empty() {
    let mut s = session();
    s.set_value(ScopeId::Global, "logic", choice("Casual")).unwrap();
    s.set_participant_count(3).unwrap();
    let args = build_argument_vector(&s, "rom.gbc").unwrap();
    let configs = nested(&args);
    assert_eq!(configs.len(), 3);
    for token in configs {
        assert_eq!(decode_participant(token), Some(Vec::new()));
    }
}

#[test]
fn at_mw_vec_07_windows_paths_survive_nesting() {
    let mut s = Session::new(schema_with_sprite()).unwrap();
    s.set_participant_count(2).unwrap();
    s.set_value(p(1), ASSET_OPTION_KEY, choice("Link")).unwrap();
    let args = build_argument_vector(&s, r"D:\roms\game.gbc").unwrap();
    let configs = nested(&args);
    assert_eq!(
        configs[0],
        r"--multiworld-config=--gfxmod=C:\\Users\\me\\sprites\\Link.bin"
    );
    assert_eq!(
        decode_participant(configs[0]),
        Some(vec![format!("--gfxmod={WINDOWS_SPRITE}")])
    );
    assert_eq!(args.last().map(String::as_str), Some(r"D:\roms\game.gbc"));
}

#[test]
fn at_mw_vec_08_top_level_paths_are_not_escaped() {
    let mut s = Session::new(schema_with_sprite()).unwrap();
    s.set_value(ScopeId::Global, ASSET_OPTION_KEY, choice("Link"))
        .unwrap();
    let args = build_argument_vector(&s, "rom.gbc").unwrap();
    assert!(args.contains(&format!("--gfxmod={WINDOWS_SPRITE}")));
}

#[test]
fn at_mw_vec_09_empty_input_path_is_still_last() {
    let mut s = session();
    s.set_participant_count(2).unwrap();
    let args = build_argument_vector(&s, "").unwrap();
    assert_eq!(args.last().map(String::as_str), Some(""));
}

#[test]
fn at_mw_vec_10_out_of_range_count_changes_nothing() {
    let mut s = session();
    s.set_participant_count(3).unwrap();
    let before = s.clone();
    assert_eq!(
        s.set_participant_count(9),
        Err(RangeError {
            requested: 9,
            min: 1,
            max: 8
        })
    );
    assert_eq!(
        s.set_participant_count(0),
        Err(RangeError {
            requested: 0,
            min: 1,
            max: 8
        })
    );
    assert_eq!(s, before);
    assert!(s
        .set_value(ScopeId::Global, "multiworld", OptionValue::Count(12))
        .is_err());
    assert_eq!(s, before);
}

#[test]
fn at_mw_vec_11_foreign_schema_surfaces_unresolved_label() {
    let mut s = Session::new(schema_with_sprite()).unwrap();
    s.set_value(ScopeId::Global, ASSET_OPTION_KEY, choice("Link"))
        .unwrap();
    let plain = builtin_catalog().unwrap();
    assert_eq!(
        build_argument_vector_with(&plain, &s, "rom.gbc"),
        Err(ConsistencyError::UnresolvedChoice {
            key: ASSET_OPTION_KEY.to_string(),
            label: "Link".to_string(),
        })
    );
}

#[test]
fn at_mw_vec_12_shared_session_dry_run_matches_direct_build() {
    let shared = SharedSession::new(session());
    shared.set_participant_count(2).unwrap();
    shared
        .set_value(p(2), "boomerang", choice("Trade"))
        .unwrap();
    let wiring = GenerateWiring::new(
        GenerateWiringConfig::dry_run(),
        ProcessGenerator::new("rando-generator-that-does-not-exist"),
    );
    let out = wiring.run_shared(&shared, "rom.gbc").unwrap();
    let direct = build_argument_vector(&shared.snapshot(), "rom.gbc").unwrap();
    assert_eq!(out, GenerateOutcome::NotInvokedDryRun(direct));
}
