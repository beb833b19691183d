// Text processing utilities

use std::collections::HashMap;

/// String and text manipulation utilities
pub mod string {
    /// Cut `text` to at most `max_chars` characters.
    ///
    /// Returns the kept prefix and whether anything was dropped. The prefix is
    /// always a byte-for-byte prefix of the input, split on a char boundary.
    pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => (&text[..idx], true),
            None => (text, false),
        }
    }

    /// Collapse a possibly multi-line message onto a single line
    pub fn single_line(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Template processing utilities
pub mod template {
    use super::*;

    /// Simple template engine for variable substitution
    pub struct SimpleTemplate {
        variables: HashMap<String, String>,
    }

    impl SimpleTemplate {
        pub fn new() -> Self {
            Self {
                variables: HashMap::new(),
            }
        }

        /// Set a template variable
        pub fn set(&mut self, key: &str, value: &str) {
            self.variables.insert(key.to_string(), value.to_string());
        }

        /// Render template with variable substitution.
        /// Variables are specified as {{variable_name}}; unknown ones are left as-is.
        pub fn render(&self, template: &str) -> String {
            let mut result = template.to_string();

            for (key, value) in &self.variables {
                let placeholder = format!("{{{{{}}}}}", key);
                result = result.replace(&placeholder, value);
            }

            result
        }
    }

    impl Default for SimpleTemplate {
        fn default() -> Self {
            Self::new()
        }
    }
}
