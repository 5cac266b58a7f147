use crate::types::*;
use serde::{Deserialize, Serialize};

/// A page property value, reduced to what the document header displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Number(Option<f64>),
    Select(Option<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    Status(Option<SelectOption>),
    Date(Option<DateValue>),
    Formula(Option<FormulaResult>),
    Relation(Vec<PageId>),
    Rollup(RollupResult),
    People(Vec<User>),
    Files(Vec<FileRef>),
    Checkbox(bool),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    CreatedTime(String),
    CreatedBy(User),
    LastEditedTime(String),
    LastEditedBy(User),
    UniqueId { prefix: Option<String>, number: i64 },
    /// A property type this crate does not model; `raw` is its JSON text.
    Other { type_name: String, raw: String },
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Number(_) => "number",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Status(_) => "status",
            PropertyValue::Date(_) => "date",
            PropertyValue::Formula(_) => "formula",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::Rollup(_) => "rollup",
            PropertyValue::People(_) => "people",
            PropertyValue::Files(_) => "files",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Email(_) => "email",
            PropertyValue::PhoneNumber(_) => "phone_number",
            PropertyValue::CreatedTime(_) => "created_time",
            PropertyValue::CreatedBy(_) => "created_by",
            PropertyValue::LastEditedTime(_) => "last_edited_time",
            PropertyValue::LastEditedBy(_) => "last_edited_by",
            PropertyValue::UniqueId { .. } => "unique_id",
            PropertyValue::Other { type_name, .. } => type_name,
        }
    }

    /// Flattens the value to a single line of text.
    ///
    /// Booleans read `Yes`/`No`, absent values are empty and list values
    /// are joined with `, `.
    pub fn display_value(&self) -> String {
        match self {
            PropertyValue::Title(items) | PropertyValue::RichText(items) => {
                items.iter().map(|item| item.plain_text.as_str()).collect()
            }
            PropertyValue::Number(number) => number.map(format_number).unwrap_or_default(),
            PropertyValue::Select(option) | PropertyValue::Status(option) => option
                .as_ref()
                .map(|option| option.name.clone())
                .unwrap_or_default(),
            PropertyValue::MultiSelect(options) => join(options.iter().map(|o| o.name.as_str())),
            PropertyValue::Date(date) => date
                .as_ref()
                .map(|date| date.start.clone())
                .unwrap_or_default(),
            PropertyValue::Formula(result) => match result {
                Some(FormulaResult::String(text)) => text.clone(),
                Some(FormulaResult::Number(number)) => format_number(*number),
                Some(FormulaResult::Boolean(flag)) => yes_no(*flag).to_string(),
                Some(FormulaResult::Date(date)) => date.start.clone(),
                None => String::new(),
            },
            PropertyValue::Relation(pages) => join(pages.iter().map(|id| id.as_str())),
            PropertyValue::Rollup(rollup) => match rollup {
                RollupResult::Number(number) => number.map(format_number).unwrap_or_default(),
                RollupResult::Date(date) => date
                    .as_ref()
                    .map(|date| date.start.clone())
                    .unwrap_or_default(),
                RollupResult::Array(items) => items.join(", "),
                RollupResult::Empty => String::new(),
            },
            PropertyValue::People(people) => people
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            PropertyValue::Files(files) => files
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            PropertyValue::Checkbox(flag) => yes_no(*flag).to_string(),
            PropertyValue::Url(text)
            | PropertyValue::Email(text)
            | PropertyValue::PhoneNumber(text) => text.clone().unwrap_or_default(),
            PropertyValue::CreatedTime(time) | PropertyValue::LastEditedTime(time) => time.clone(),
            PropertyValue::CreatedBy(user) | PropertyValue::LastEditedBy(user) => user.to_string(),
            PropertyValue::UniqueId { prefix, number } => match prefix {
                Some(prefix) => format!("{}-{}", prefix, number),
                None => number.to_string(),
            },
            PropertyValue::Other { raw, .. } => raw.clone(),
        }
    }
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Whole numbers print without a fractional part.
fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_values() {
        assert_eq!(PropertyValue::Checkbox(true).display_value(), "Yes");
        assert_eq!(PropertyValue::Checkbox(false).display_value(), "No");
        assert_eq!(PropertyValue::Number(Some(3.0)).display_value(), "3");
        assert_eq!(PropertyValue::Number(Some(2.5)).display_value(), "2.5");
        assert_eq!(PropertyValue::Number(None).display_value(), "");
        assert_eq!(
            PropertyValue::Formula(Some(FormulaResult::Boolean(true))).display_value(),
            "Yes"
        );
        assert_eq!(
            PropertyValue::UniqueId {
                prefix: Some("TASK".to_string()),
                number: 42
            }
            .display_value(),
            "TASK-42"
        );
    }

    #[test]
    fn test_list_values_are_comma_joined() {
        let tags = PropertyValue::MultiSelect(vec![
            SelectOption {
                name: "alpha".to_string(),
                color: Color::Red,
            },
            SelectOption {
                name: "beta".to_string(),
                color: Color::Blue,
            },
        ]);
        assert_eq!(tags.display_value(), "alpha, beta");
        assert_eq!(tags.type_name(), "multi_select");

        let people = PropertyValue::People(vec![
            User {
                id: "u-1".to_string(),
                name: Some("Ada".to_string()),
            },
            User {
                id: "u-2".to_string(),
                name: None,
            },
        ]);
        assert_eq!(people.display_value(), "Ada, u-2");
    }
}
