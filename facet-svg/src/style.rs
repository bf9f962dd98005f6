//! Inline `style` attribute parsing.

/// The declarations of an inline `style="..."` attribute, in source order.
///
/// Parsing is lenient: malformed declarations are dropped instead of
/// failing the element, and later declarations win over earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse a CSS-like declaration list (e.g. `"fill:none;stroke-width:2;stroke:red"`).
    pub fn parse(s: &str) -> Self {
        let declarations = s
            .split(';')
            .filter_map(|part| {
                let (key, value) = part.split_once(':')?;
                let key = key.trim();
                let value = value.trim();
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                Some((key.to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        InlineStyle { declarations }
    }

    /// The value of the last declaration for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        let style = InlineStyle::parse("fill:none;stroke-width:2.16;stroke:rgb(0,0,0);");
        assert_eq!(style.get("fill"), Some("none"));
        assert_eq!(style.get("stroke-width"), Some("2.16"));
        assert_eq!(style.get("stroke"), Some("rgb(0,0,0)"));
    }

    #[test]
    fn test_malformed_declarations_are_dropped() {
        let style = InlineStyle::parse("fill red; ;stroke:;Fill:blue");
        assert_eq!(style.get("fill"), Some("blue"));
        assert_eq!(style.get("stroke"), None);
    }

    #[test]
    fn test_last_declaration_wins() {
        let style = InlineStyle::parse("fill:red;fill:green");
        assert_eq!(style.get("fill"), Some("green"));
        assert!(InlineStyle::parse("").is_empty());
    }
}
