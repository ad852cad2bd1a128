//! Output formatting utilities

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// Output format for displaying values
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormat {
	Text,
	Json,
	Toml,
}

/// Redacted placeholder for sensitive values
pub(crate) const REDACTED: &str = "[REDACTED]";

/// Key name patterns that mark credentials and secrets
const SENSITIVE_PATTERNS: &[&str] = &[
	"password",
	"passwd",
	"secret",
	"token",
	"access_key",
	"api_key",
	"credential",
	"private_key",
	"database_url",
];

/// Check whether a key name indicates a sensitive value
///
/// Only the last segment of a dotted key path is checked, so
/// `databases.default.password` checks `password`.
pub(crate) fn is_sensitive_key(key: &str) -> bool {
	let lower = key.to_lowercase();
	let segment = lower.rsplit('.').next().unwrap_or(&lower);
	SENSITIVE_PATTERNS
		.iter()
		.any(|pattern| segment.contains(pattern))
}

/// Recursively replace the values of sensitive keys with [`REDACTED`]
///
/// Unset secrets (`null`) are left alone so the output still shows that
/// nothing was configured.
pub(crate) fn redact_sensitive_values(value: &Value) -> Value {
	match value {
		Value::Object(map) => Value::Object(
			map.iter()
				.map(|(key, val)| {
					let val = if is_sensitive_key(key) && !val.is_null() {
						Value::String(REDACTED.to_string())
					} else {
						redact_sensitive_values(val)
					};
					(key.clone(), val)
				})
				.collect(),
		),
		Value::Array(arr) => Value::Array(arr.iter().map(redact_sensitive_values).collect()),
		other => other.clone(),
	}
}

/// Drop `null` members of objects, which TOML cannot represent
fn strip_nulls(value: Value) -> Value {
	match value {
		Value::Object(map) => Value::Object(
			map.into_iter()
				.filter(|(_, v)| !v.is_null())
				.map(|(k, v)| (k, strip_nulls(v)))
				.collect(),
		),
		Value::Array(arr) => Value::Array(arr.into_iter().map(strip_nulls).collect()),
		other => other,
	}
}

/// Print a success message
pub(crate) fn success(msg: &str) {
	println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub(crate) fn error(msg: &str) {
	eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
	println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub(crate) fn info(msg: &str) {
	println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Format and print a value based on the output format
pub(crate) fn print_value<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
	match format {
		OutputFormat::Json => {
			let json = serde_json::to_string_pretty(value)?;
			println!("{}", json);
		}
		OutputFormat::Toml => {
			println!("{}", render_toml(serde_json::to_value(value)?)?);
		}
		OutputFormat::Text => {
			let mut rendered = String::new();
			render_text(&serde_json::to_value(value)?, 0, &mut rendered);
			print!("{}", rendered);
		}
	}
	Ok(())
}

fn render_toml(value: Value) -> anyhow::Result<String> {
	match strip_nulls(value) {
		table @ Value::Object(_) => Ok(toml::to_string_pretty(&table)?),
		Value::Null => Ok(String::new()),
		scalar => {
			// TOML documents are tables; render bare values as a single assignment
			let wrapped = serde_json::json!({ "value": scalar });
			Ok(toml::to_string_pretty(&wrapped)?)
		}
	}
}

/// Render a value as indented `key: value` lines
///
/// Items of a list start with `- `; when an item is itself a table or list,
/// its first line follows the dash and the rest align under it.
fn render_text(value: &Value, indent: usize, out: &mut String) {
	let pad = "  ".repeat(indent);
	match value {
		Value::Object(map) => {
			for (key, val) in map {
				if is_nested(val) {
					out.push_str(&format!("{}{}:\n", pad, key.cyan().bold()));
					render_text(val, indent + 1, out);
				} else {
					out.push_str(&format!("{}{}: {}\n", pad, key.cyan().bold(), scalar(val)));
				}
			}
		}
		Value::Array(arr) => {
			for val in arr {
				if is_nested(val) {
					let mut item = String::new();
					render_text(val, indent + 1, &mut item);
					let inner = "  ".repeat(indent + 1);
					let rest = item.strip_prefix(inner.as_str()).unwrap_or(&item);
					out.push_str(&format!("{}- {}", pad, rest));
				} else {
					out.push_str(&format!("{}- {}\n", pad, scalar(val)));
				}
			}
		}
		other => {
			out.push_str(&pad);
			out.push_str(&scalar(other));
			out.push('\n');
		}
	}
}

/// Non-empty tables and lists get their own block
fn is_nested(value: &Value) -> bool {
	match value {
		Value::Object(map) => !map.is_empty(),
		Value::Array(arr) => !arr.is_empty(),
		_ => false,
	}
}

fn scalar(value: &Value) -> String {
	match value {
		Value::String(s) => s.green().to_string(),
		Value::Number(n) => n.to_string().yellow().to_string(),
		Value::Bool(b) => b.to_string().blue().to_string(),
		Value::Null => "null".dimmed().to_string(),
		Value::Object(_) => "{}".dimmed().to_string(),
		Value::Array(_) => "[]".dimmed().to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("secret_key", true)]
	#[case("SECRET_KEY", true)]
	#[case("databases.default.password", true)]
	#[case("storages.default.secret_access_key", true)]
	#[case("storages.default.access_key_id", true)]
	#[case("database_url", true)]
	#[case("debug", false)]
	#[case("databases.default.host", false)]
	#[case("storages.default.bucket_name", false)]
	#[case("allowed_hosts", false)]
	fn is_sensitive_key_detects_sensitive_patterns(#[case] key: &str, #[case] expected: bool) {
		// Act
		let result = is_sensitive_key(key);

		// Assert
		assert_eq!(result, expected, "key '{}' sensitivity mismatch", key);
	}

	#[rstest]
	fn redact_sensitive_values_replaces_nested_secrets() {
		// Arrange
		let value = json!({
			"secret_key": "signing",
			"databases": {
				"default": { "host": "db", "password": "pw" }
			},
			"storages": {
				"default": { "bucket_name": "media", "secret_access_key": null }
			}
		});

		// Act
		let redacted = redact_sensitive_values(&value);

		// Assert
		assert_eq!(redacted["secret_key"], json!(REDACTED));
		assert_eq!(redacted["databases"]["default"]["host"], json!("db"));
		assert_eq!(redacted["databases"]["default"]["password"], json!(REDACTED));
		assert_eq!(redacted["storages"]["default"]["bucket_name"], json!("media"));
		assert_eq!(redacted["storages"]["default"]["secret_access_key"], Value::Null);
	}

	#[rstest]
	fn render_toml_skips_nulls() {
		// Arrange
		let value = json!({ "bucket_name": "media", "region_name": null });

		// Act
		let rendered = render_toml(value).unwrap();

		// Assert
		assert!(rendered.contains("bucket_name = \"media\""));
		assert!(!rendered.contains("region_name"));
	}

	#[rstest]
	fn render_toml_wraps_scalars() {
		// Act
		let rendered = render_toml(json!(false)).unwrap();

		// Assert
		assert_eq!(rendered.trim(), "value = false");
	}

	#[rstest]
	fn render_text_aligns_tables_inside_lists() {
		// Arrange
		colored::control::set_override(false);
		let value = json!({
			"handlers": [{ "class": "x", "level": "INFO" }, "plain"],
			"debug": false,
			"options": {},
		});

		// Act
		let mut rendered = String::new();
		render_text(&value, 0, &mut rendered);

		// Assert
		assert_eq!(
			rendered,
			"handlers:\n  - class: x\n    level: INFO\n  - plain\ndebug: false\noptions: {}\n"
		);
	}
}
