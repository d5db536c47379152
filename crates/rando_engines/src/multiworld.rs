#![forbid(unsafe_code)]

use rando_contracts::{ConsistencyError, OptionSchema};

use crate::arg_serializer::serialize_scope;
use crate::session::Session;

pub const MULTIWORLD_CONFIG_FLAG: &str = "multiworld-config";

pub fn escape_nested(joined: &str) -> String {
    joined.replace('\\', "\\\\")
}

pub fn unescape_nested(escaped: &str) -> String {
    escaped.replace("\\\\", "\\")
}

/// Packs one participant's tokens into a single `--multiworld-config=` token.
/// Escaping is applied once, to the joined string.
pub fn encode_participant(tokens: &[String]) -> String {
    let joined = tokens.join(" ");
    format!("--{MULTIWORLD_CONFIG_FLAG}={}", escape_nested(&joined))
}

/// Inverse of [`encode_participant`]. `None` if `token` is not a nested config flag.
pub fn decode_participant(token: &str) -> Option<Vec<String>> {
    let value = token
        .strip_prefix("--")?
        .strip_prefix(MULTIWORLD_CONFIG_FLAG)?
        .strip_prefix('=')?;
    let joined = unescape_nested(value);
    if joined.is_empty() {
        return Some(Vec::new());
    }
    Some(joined.split(' ').map(str::to_string).collect())
}

/// Full argument vector for the generator, serialized against the session's own schema.
pub fn build_argument_vector(
    session: &Session,
    input_path: &str,
) -> Result<Vec<String>, ConsistencyError> {
    build_argument_vector_with(session.schema(), session, input_path)
}

/// Global-option tokens, then the shared per-participant tokens, then one nested
/// config per participant when there is more than one, then the input path.
pub fn build_argument_vector_with(
    schema: &OptionSchema,
    session: &Session,
    input_path: &str,
) -> Result<Vec<String>, ConsistencyError> {
    let global = session.global_scope();
    let mut args = serialize_scope(schema.global_options(), global, None)?;
    args.extend(serialize_scope(schema.participant_options(), global, None)?);

    if session.participant_count() > 1 {
        for scope in session.dedicated_scopes() {
            let tokens = serialize_scope(schema.participant_options(), scope, Some(global))?;
            args.push(encode_participant(&tokens));
        }
    }

    args.push(input_path.to_string());
    Ok(args)
}
