use serde_json::{Map, Value};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Builds a JSON object from form fields, skipping blank values.
pub(crate) fn fields_to_object<'a>(
    fields: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Map<String, Value> {
    fields
        .into_iter()
        .filter(|(k, v)| !k.trim().is_empty() && !v.trim().is_empty())
        .map(|(k, v)| (k.trim().to_string(), Value::String(v.trim().to_string())))
        .collect()
}

/// "Passwords need to match" check, run as the confirmation field changes.
pub(crate) fn password_match_message(password: &str, confirm: &str) -> &'static str {
    if password == confirm {
        "The passwords match!"
    } else {
        "Passwords need to match"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_to_object_trims_and_skips_blanks() {
        let obj = fields_to_object([("name", " Vase "), ("year", ""), (" ", "x")]);
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["name"], "Vase");
    }

    #[test]
    fn test_password_match_message() {
        assert_eq!(password_match_message("a", "a"), "The passwords match!");
        assert_eq!(password_match_message("a", "b"), "Passwords need to match");
        assert_eq!(password_match_message("", ""), "The passwords match!");
    }
}
