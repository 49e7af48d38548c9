use convert_case::{Boundary, Case, Casing};

/// `MegaTableName` becomes `mega_table_name`.
///
/// Words split only where a lowercase letter is followed by an uppercase one, so runs
/// of capitals stay together (`HTTPServer` becomes `httpserver`) and digits or existing
/// underscores do not start a new word.
pub fn camel_case_to_underscore(name: &str) -> String {
    name.with_boundaries(&[Boundary::LOWER_UPPER])
        .to_case(Case::Snake)
}

/// Explicit table name, or the snake case bare type name.
pub fn table_name(type_name: &str, explicit: Option<&str>) -> String {
    match explicit {
        Some(name) => name.to_owned(),
        None => camel_case_to_underscore(type_name.rsplit("::").next().unwrap_or(type_name)),
    }
}

/// Explicit column name, or the field name unchanged.
pub fn column_name<'a>(field: &'a str, explicit: Option<&'a str>) -> &'a str {
    explicit.unwrap_or(field)
}
