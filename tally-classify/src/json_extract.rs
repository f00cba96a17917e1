//! Robust JSON recovery from free-text model replies.
//!
//! The reply is scanned character by character tracking brace depth; each
//! top-level balanced `{...}` span is attempted as one JSON object on its
//! own. A span that fails to parse is discarded, so one malformed record
//! cannot poison the rest of the batch.

use serde_json::Value;

/// Extract every parseable top-level JSON object embedded in `text`.
pub fn extract_json_objects(text: &str) -> Vec<Value> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        let span = &text[start..=i];
                        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(span) {
                            objects.push(Value::Object(map));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    objects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object_with_garbage_and_bad_fragment() {
        let reply = r#"{"Date":"01-01-2024","Description":"Coffee","Amount":"5.00","Category":"Expenses"} garbage {bad json"#;
        let objs = extract_json_objects(reply);
        assert_eq!(objs.len(), 1);
        assert_eq!(objs[0]["Description"], "Coffee");
    }

    #[test]
    fn test_multiple_objects_with_prose_between() {
        let reply = r#"Here you go: {"a":1} and also {"b":2}. Done!"#;
        let objs = extract_json_objects(reply);
        assert_eq!(objs.len(), 2);
        assert_eq!(objs[0]["a"], 1);
        assert_eq!(objs[1]["b"], 2);
    }

    #[test]
    fn test_nested_braces_stay_one_object() {
        let reply = r#"{"outer":{"inner":3}}"#;
        let objs = extract_json_objects(reply);
        assert_eq!(objs.len(), 1);
        assert_eq!(objs[0]["outer"]["inner"], 3);
    }

    #[test]
    fn test_malformed_span_discarded_others_kept() {
        let reply = r#"{"ok":true} {not: valid,} {"also":"ok"}"#;
        let objs = extract_json_objects(reply);
        assert_eq!(objs.len(), 2);
    }

    #[test]
    fn test_no_objects() {
        assert!(extract_json_objects("nothing here").is_empty());
        assert!(extract_json_objects("").is_empty());
        assert!(extract_json_objects("}{").is_empty());
    }

    #[test]
    fn test_objects_inside_array_reply() {
        // Arrays are not unwrapped; the scanner still finds the member
        // objects as balanced spans.
        let reply = r#"[{"a":1},{"b":2}]"#;
        let objs = extract_json_objects(reply);
        assert_eq!(objs.len(), 2);
    }
}
