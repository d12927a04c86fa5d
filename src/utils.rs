/// Table name for a category: lowercased, spaces replaced by underscores.
pub fn table_slug(category: &str) -> String {
    category.to_lowercase().replace(' ', "_")
}

/// Quote an identifier for Postgres. Embedded double quotes are doubled so the
/// name can never terminate the quoted identifier early.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slug_lowercases_and_replaces_spaces() {
        assert_eq!(table_slug("Human Resources"), "human_resources");
        assert_eq!(
            table_slug("Arts and Entertainment"),
            "arts_and_entertainment"
        );
        assert_eq!(table_slug("Sales"), "sales");
    }

    #[test]
    fn quoting_neutralizes_unsafe_categories() {
        let slug = table_slug(r#"Sales"; DROP TABLE sales; --"#);
        assert_eq!(slug, r#"sales";_drop_table_sales;_--"#);
        assert_eq!(
            quote_identifier(&slug),
            r#""sales"";_drop_table_sales;_--""#
        );
    }

    #[test]
    fn quoting_plain_names() {
        assert_eq!(quote_identifier("human_resources"), r#""human_resources""#);
    }
}
