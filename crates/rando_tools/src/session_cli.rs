#![forbid(unsafe_code)]

use std::fmt::Write as _;

use rando_contracts::{OptionKind, OptionSchema, OptionSpec, OptionValue, ParticipantIndex, ScopeId};
use rando_engines::session::Session;
use rust_decimal::Decimal;

/// Splits `KEY=VALUE` at the first `=`. The value may be empty.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option key in '{raw}'"));
    }
    Ok((key, value))
}

/// Splits `IDX:KEY=VALUE` into a participant index and an assignment.
pub fn parse_participant_assignment(raw: &str) -> Result<(ParticipantIndex, &str, &str), String> {
    let (index, rest) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected IDX:KEY=VALUE, got '{raw}'"))?;
    let index: u8 = index
        .trim()
        .parse()
        .map_err(|_| format!("participant index '{index}' is not a number"))?;
    let index = ParticipantIndex::new(index).map_err(|e| format!("bad participant index: {e}"))?;
    let (key, value) = parse_assignment(rest)?;
    Ok((index, key, value))
}

/// Interprets `raw` according to the option's kind. Choices take either the
/// display label or the underlying value; labels win when both match.
pub fn parse_value(option: &OptionSpec, raw: &str) -> Result<OptionValue, String> {
    let key = option.key();
    match &option.kind {
        OptionKind::Boolean { .. } => parse_flag(raw)
            .map(OptionValue::Flag)
            .ok_or_else(|| format!("option '{key}' expects a boolean, got '{raw}'")),
        OptionKind::Text { .. } => Ok(OptionValue::Text(raw.to_string())),
        OptionKind::NumericRange { .. } => raw
            .trim()
            .parse::<Decimal>()
            .map(OptionValue::Number)
            .map_err(|_| format!("option '{key}' expects a number, got '{raw}'")),
        OptionKind::ParticipantCount { .. } => raw
            .trim()
            .parse::<u8>()
            .map(OptionValue::Count)
            .map_err(|_| format!("option '{key}' expects a participant count, got '{raw}'")),
        OptionKind::SingleChoice { choices, .. } | OptionKind::AssetChoice { choices, .. } => {
            if choices.iter().any(|c| c.label == raw) {
                return Ok(OptionValue::Choice(raw.to_string()));
            }
            option
                .label_for_value(raw)
                .map(|label| OptionValue::Choice(label.to_string()))
                .ok_or_else(|| {
                    let known: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
                    format!(
                        "option '{key}' has no choice '{raw}'. choices: {}",
                        known.join(", ")
                    )
                })
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn apply_global_assignment(session: &mut Session, raw: &str) -> Result<(), String> {
    let (key, value) = parse_assignment(raw)?;
    apply(session, ScopeId::Global, key, value)
}

/// The participant's scope must already exist.
pub fn apply_participant_assignment(session: &mut Session, raw: &str) -> Result<(), String> {
    let (index, key, value) = parse_participant_assignment(raw)?;
    apply(session, ScopeId::Participant(index), key, value)
}

/// Applies command-line edits in an order that keeps participant scopes in
/// step with the shared values: plain `--set` edits first, then the
/// participant count, then `--player` overrides. New participant scopes copy
/// the shared values as they stand when the count changes. `players` wins over
/// a `--set` on the participant-count option.
pub fn apply_cli(
    session: &mut Session,
    players: Option<u32>,
    sets: &[String],
    player_sets: &[String],
) -> Result<(), String> {
    let mut count = None;
    for raw in sets {
        let (key, value) = parse_assignment(raw)?;
        let option = session
            .schema()
            .get(key)
            .ok_or_else(|| format!("unknown option '{key}'"))?;
        if matches!(option.kind, OptionKind::ParticipantCount { .. }) {
            count = Some(parse_count(key, value)?);
            continue;
        }
        apply(session, ScopeId::Global, key, value)?;
    }
    if let Some(target) = players.or(count) {
        session
            .set_participant_count(target)
            .map_err(|e| e.to_string())?;
    }
    for raw in player_sets {
        apply_participant_assignment(session, raw)?;
    }
    Ok(())
}

fn parse_count(key: &str, raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("option '{key}' expects a participant count, got '{raw}'"))
}

fn apply(session: &mut Session, id: ScopeId, key: &str, raw: &str) -> Result<(), String> {
    let option = session
        .schema()
        .get(key)
        .ok_or_else(|| format!("unknown option '{key}'"))?;
    let value = parse_value(option, raw)?;
    session
        .set_value(id, key, value)
        .map_err(|e| format!("cannot set {key} in {id}: {e}"))
}

/// One line per option, then one indented line per choice.
pub fn describe_schema(schema: &OptionSchema) -> Result<String, String> {
    let mut out = String::new();
    for option in schema.options() {
        let default = option.initial_value().map_err(|e| e.to_string())?;
        writeln!(
            out,
            "{key} [{scope}] {kind} default={default} ({label})",
            key = option.key(),
            scope = option.scope.as_str(),
            kind = option.kind.as_str(),
            label = option.label,
        )
        .map_err(|e| e.to_string())?;
        if let OptionKind::NumericRange { min, max, step, .. } = &option.kind {
            writeln!(out, "    range {min}..={max} step {step}").map_err(|e| e.to_string())?;
        }
        for choice in option.kind.choices().unwrap_or_default() {
            writeln!(out, "    {} = {:?}", choice.label, choice.value)
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(out)
}

/// The vector as printed by a dry run.
pub fn render_arguments(args: &[String], json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(args).map_err(|e| e.to_string());
    }
    Ok(args.join("\n"))
}
