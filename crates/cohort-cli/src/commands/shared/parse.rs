use serde_json::Value;

/// Parse a JSON document passed on the command line.
pub fn parse_json(raw: &str, field: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).map_err(|error| anyhow::anyhow!("invalid {field} JSON: {error}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_json;

    #[test]
    fn parses_object() {
        let value = parse_json(r#"{"blocks": [1, 2]}"#, "blocks").expect("should parse");
        assert_eq!(value, json!({"blocks": [1, 2]}));
    }

    #[test]
    fn errors_name_the_field() {
        let err = parse_json("{nope", "blocks").expect_err("should fail");
        assert!(err.to_string().contains("invalid blocks JSON"));
    }
}
