// src/compiler/properties.rs
//! Page property summary shown under the page header.

use crate::model::Page;

const NAME_LABEL: &str = "Property Name";
const TYPE_LABEL: &str = "Property Type";

/// Aligned plain-text table of the page's non-title properties, one
/// newline-terminated line per row, or `None` when there is nothing to show.
pub fn property_table(page: &Page) -> Option<String> {
    let rows: Vec<(&str, &str, String)> = page
        .header_properties()
        .into_iter()
        .map(|(name, value)| {
            let shown = value.display_value().replace('\n', " ");
            (name.as_str(), value.type_name(), shown)
        })
        .collect();
    if rows.is_empty() {
        return None;
    }

    let width = |text: &str| text.chars().count();
    let name_width = rows
        .iter()
        .map(|(name, _, _)| width(name))
        .chain(std::iter::once(width(NAME_LABEL)))
        .max()
        .unwrap_or(0);
    let type_width = rows
        .iter()
        .map(|(_, kind, _)| width(kind))
        .chain(std::iter::once(width(TYPE_LABEL)))
        .max()
        .unwrap_or(0);
    let pad = |text: &str, column: usize| " ".repeat(column - width(text) + 2);

    let mut out = format!(
        "{}{}| {}{}| Value\n",
        NAME_LABEL,
        pad(NAME_LABEL, name_width),
        TYPE_LABEL,
        pad(TYPE_LABEL, type_width)
    );
    out.push_str(&format!(
        "{}|{}|{}\n",
        "-".repeat(name_width + 2),
        "-".repeat(type_width + 2),
        "-".repeat(10)
    ));
    for (name, kind, value) in &rows {
        out.push_str(&format!(
            "{}{}| {}{}| {}\n",
            name,
            pad(name, name_width),
            kind,
            pad(kind, type_width),
            value
        ));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageTitle, PropertyValue};
    use crate::types::{PageId, PropertyName};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn page(properties: IndexMap<PropertyName, PropertyValue>) -> Page {
        Page {
            id: PageId::new_v4(),
            title: PageTitle::new("Doc"),
            url: String::new(),
            blocks: Vec::new(),
            properties,
            archived: false,
            last_edited_time: None,
        }
    }

    #[test]
    fn test_only_title_gives_nothing() {
        let mut properties = IndexMap::new();
        properties.insert(PropertyName::from("Name"), PropertyValue::Title(Vec::new()));
        assert_eq!(property_table(&page(properties)), None);
    }

    #[test]
    fn test_columns_are_aligned() {
        let mut properties = IndexMap::new();
        properties.insert(PropertyName::from("Reviewed"), PropertyValue::Checkbox(false));
        properties.insert(PropertyName::from("Estimate"), PropertyValue::Number(Some(3.0)));

        let table = property_table(&page(properties)).unwrap();
        assert_eq!(
            table,
            "Property Name  | Property Type  | Value\n\
             ---------------|---------------|----------\n\
             Estimate       | number         | 3\n\
             Reviewed       | checkbox       | No\n"
        );
    }
}
