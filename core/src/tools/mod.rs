use serde_json::Value;

pub mod todo_manager;

pub use todo_manager::TodoManagerTool;

pub fn extract_string_arg_opt(args: &Value, key: &str, default: &str) -> String {
    args.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

/// Reads `key` as text, accepting bare numbers as well since models often
/// send positions unquoted. `null` and other types count as absent.
pub fn extract_text_arg(args: &Value, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
