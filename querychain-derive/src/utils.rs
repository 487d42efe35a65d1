//! Utility functions for code generation

/// Convert a camelCase name to snake_case
///
/// Inserts `_` between a lowercase letter and a following uppercase letter,
/// then lowercases everything. Matches `querychain::to_snake_case`, so the
/// columns `FromRow` reads are the columns the metadata resolver reports.
pub fn snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            result.push('_');
        }
        prev_lower = c.is_ascii_lowercase();
        result.extend(c.to_lowercase());
    }
    result
}

/// Name of the accessor constant generated for a field
pub fn const_name(field: &str) -> String {
    snake_case(field).to_uppercase()
}
