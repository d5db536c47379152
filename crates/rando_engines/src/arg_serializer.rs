#![forbid(unsafe_code)]

use rando_contracts::{ConsistencyError, OptionKind, OptionSpec, OptionValue, Scope};

/// Asset choice value meaning "use the generator's own graphics".
pub const ASSET_DEFAULT_VALUE: &str = "default";

/// Emits one token per option whose value needs to reach the generator, in
/// the order `options` yields them.
///
/// With `shared`, an option whose value equals the shared scope's value for the
/// same key is skipped before any kind rule applies: the participant inherits
/// the shared setting.
pub fn serialize_scope<'a, I>(
    options: I,
    scope: &Scope,
    shared: Option<&Scope>,
) -> Result<Vec<String>, ConsistencyError>
where
    I: IntoIterator<Item = &'a OptionSpec>,
{
    let mut args = Vec::new();
    for option in options {
        let key = option.key();
        let value = scope
            .get(key)
            .ok_or_else(|| ConsistencyError::MissingValue {
                key: key.to_string(),
            })?;
        if shared.is_some_and(|s| s.get(key) == Some(value)) {
            continue;
        }
        if let Some(token) = token_for(option, value)? {
            args.push(token);
        }
    }
    Ok(args)
}

/// Kind rule for one option, ignoring any shared scope.
pub fn token_for(
    option: &OptionSpec,
    value: &OptionValue,
) -> Result<Option<String>, ConsistencyError> {
    let key = option.key();
    let token = match (&option.kind, value) {
        (OptionKind::Boolean { .. }, OptionValue::Flag(on)) => on.then(|| format!("--{key}")),
        (OptionKind::Text { .. }, OptionValue::Text(text)) => {
            (!text.is_empty()).then(|| format!("--{key}={text}"))
        }
        (OptionKind::ParticipantCount { .. }, OptionValue::Count(n)) => {
            (*n > 1).then(|| format!("--{key}={n}"))
        }
        // Editable in the session, but the generator takes no flag for it.
        (OptionKind::NumericRange { .. }, OptionValue::Number(_)) => None,
        (OptionKind::SingleChoice { .. }, OptionValue::Choice(label)) => {
            let resolved = resolve_choice(option, label)?;
            (!resolved.is_empty()).then(|| format!("--{key}={resolved}"))
        }
        (OptionKind::AssetChoice { .. }, OptionValue::Choice(label)) => {
            let resolved = resolve_choice(option, label)?;
            (!resolved.is_empty() && resolved != ASSET_DEFAULT_VALUE)
                .then(|| format!("--{key}={resolved}"))
        }
        _ => {
            return Err(ConsistencyError::KindMismatch {
                key: key.to_string(),
            })
        }
    };
    Ok(token)
}

fn resolve_choice<'a>(option: &'a OptionSpec, label: &str) -> Result<&'a str, ConsistencyError> {
    option
        .value_for_label(label)
        .ok_or_else(|| ConsistencyError::UnresolvedChoice {
            key: option.key().to_string(),
            label: label.to_string(),
        })
}
