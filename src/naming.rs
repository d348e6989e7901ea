/// A pose display name split into its two rendered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub primary: String,
    pub secondary: String,
}

/// Splits a `"Primary (Alias)"` display string into primary and secondary
/// fields. Anything that doesn't match the pattern comes back whole with an
/// empty secondary; this never fails.
pub fn split_display_name(name: &str) -> DisplayName {
    let trimmed = name.trim_end();

    if let Some(open) = trimmed.rfind(" (") {
        if trimmed.ends_with(')') && open > 0 {
            let primary = trimmed[..open].trim();
            let secondary = trimmed[open + 2..trimmed.len() - 1].trim();

            if !secondary.is_empty() {
                return DisplayName {
                    primary: primary.to_string(),
                    secondary: secondary.to_string(),
                };
            }
        }
    }

    DisplayName {
        primary: name.to_string(),
        secondary: String::new(),
    }
}
