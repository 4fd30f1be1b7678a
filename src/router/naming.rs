//! Name conventions shared by the resolver and the controller registry.

/// Upper-case the first character of `s`, leaving the rest untouched.
fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalized verb appended to an action name: `"get"` → `"Get"`, `"POST"` → `"Post"`.
#[must_use]
pub fn method_suffix(http_method: &str) -> String {
    upper_first(&http_method.trim().to_lowercase())
}

/// Concrete method name for an action: `("hi", "GET")` → `"hiGet"`.
#[must_use]
pub fn action_method_name(action: &str, http_method: &str) -> String {
    let mut name = action.to_lowercase();
    name.push_str(&method_suffix(http_method));
    name
}

/// Case-normalized controller name: `"INDEX"`, `"index"` and `"Index"` all yield `"Index"`.
#[must_use]
pub fn normalize_controller_name(name: &str) -> String {
    upper_first(&name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_suffix_is_case_insensitive() {
        assert_eq!(method_suffix("get"), "Get");
        assert_eq!(method_suffix("GET"), "Get");
        assert_eq!(method_suffix("POST"), "Post");
        assert_eq!(method_suffix("dElEtE"), "Delete");
        assert_eq!(method_suffix(""), "");
    }

    #[test]
    fn test_action_method_name() {
        assert_eq!(action_method_name("hi", "GET"), "hiGet");
        assert_eq!(action_method_name("index", "POST"), "indexPost");
        assert_eq!(action_method_name("HeLLo", "post"), "helloPost");
    }

    #[test]
    fn test_controller_normalization() {
        for name in ["INDEX", "index", "Index", "iNdEx"] {
            assert_eq!(normalize_controller_name(name), "Index");
        }
    }
}
