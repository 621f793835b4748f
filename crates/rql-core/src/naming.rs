//! Identifier normalisation (C1).
//!
//! Converts declared field names into query-side names. The default
//! splitter mirrors the common Go struct-to-snake-case convention this
//! crate's tag syntax was modelled on: split at a lowercase→uppercase
//! boundary, and at a run of uppercase letters followed by a lowercase
//! letter (so an acronym prefix stays together: `HTTPUrl` → `http_url`).

/// Default `name_fn`: CamelCase/PascalCase → snake_case.
///
/// ```
/// use rql_core::naming::camel_to_snake;
///
/// assert_eq!(camel_to_snake("HTTPUrl"), "http_url");
/// assert_eq!(camel_to_snake("FullName"), "full_name");
/// assert_eq!(camel_to_snake("UUID"), "uuid");
/// assert_eq!(camel_to_snake("Age"), "age");
/// ```
pub fn camel_to_snake(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase();
            let prev_upper = chars[i - 1].is_uppercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
