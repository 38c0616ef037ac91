//! Scrubs credentials out of values before they reach a cassette.

use reqwest::Url;
use serde_yaml::Value;

/// Placeholder written in place of a secret.
pub(crate) const REDACTED: &str = "<redacted>";

const TOKEN_KEY: &str = "oauth_token";

/// Replaces every `oauth_token` value in YAML text with [`REDACTED`].
///
/// Text that does not parse as YAML is masked line by line instead.
pub(crate) fn mask_secrets(contents: &str) -> String {
    let Ok(mut doc) = serde_yaml::from_str::<Value>(contents) else {
        return mask_lines(contents);
    };
    if !mask_value(&mut doc) {
        return contents.to_string();
    }
    serde_yaml::to_string(&doc).unwrap_or_else(|_| mask_lines(contents))
}

fn mask_value(value: &mut Value) -> bool {
    match value {
        Value::Mapping(map) => {
            let mut masked = false;
            for (key, entry) in map.iter_mut() {
                if key.as_str() == Some(TOKEN_KEY) && !entry.is_null() {
                    *entry = Value::String(REDACTED.to_string());
                    masked = true;
                } else {
                    masked |= mask_value(entry);
                }
            }
            masked
        }
        Value::Sequence(items) => items.iter_mut().fold(false, |masked, item| mask_value(item) | masked),
        _ => false,
    }
}

fn mask_lines(contents: &str) -> String {
    let mut masked: String = contents
        .lines()
        .map(|line| match line.find(TOKEN_KEY) {
            Some(at) => format!("{}{TOKEN_KEY}: {REDACTED}", &line[..at]),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    if contents.ends_with('\n') {
        masked.push('\n');
    }
    masked
}

/// Drops the `user:password@` part of a `scheme://` remote URL.
///
/// scp-like `git@host:path` remotes carry no secret and pass through.
pub(crate) fn strip_userinfo(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if !parsed.username().is_empty() || parsed.password().is_some() => {
            if parsed.set_password(None).is_err() || parsed.set_username("").is_err() {
                return url.to_string();
            }
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}
