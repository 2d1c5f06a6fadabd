//! Template interpolation for configuration files
//!
//! Handles `{{ env.NAME }}` placeholders in configuration values so secrets
//! can stay out of the YAML file. Any other variable path is reported as
//! undefined.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Render a template, resolving `env.NAME` through `lookup`
pub fn render_with<F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(template.len());
    let mut errors = Vec::new();
    let mut last = 0;

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let (Some(full_match), Some(var_path)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        result.push_str(&template[last..full_match.start()]);
        last = full_match.end();

        let value = var_path
            .as_str()
            .strip_prefix("env.")
            .filter(|name| !name.contains('.'))
            .and_then(|name| lookup(name));

        match value {
            Some(value) => result.push_str(&value),
            None => errors.push(var_path.as_str().to_string()),
        }
    }
    result.push_str(&template[last..]);

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}
