// src/api/notion_client_adapter.rs
//! Converts notion-client objects into the domain model.
//!
//! Block kinds the compiler has no layout for become `Block::Unsupported`
//! carrying their API type name, so the document shows what was skipped.

use crate::error::{AppError, NotionClientError};
use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{Block, Page, PageTitle, PropertyValue};
use crate::types::{
    Annotations, BlockId, Color, DateValue, FileRef, FormulaResult, Link, PageId, PropertyName,
    RichTextItem, RichTextType, RollupResult, SelectOption, User,
};
use indexmap::IndexMap;
use notion_client::objects::block::{BlockType, SyncedFrom as NcSyncedFrom};
use notion_client::objects::page::{
    DateOrDateTime, DatePropertyValue, FilePropertyValue, FormulaPropertyValue, PageProperty,
    RollupPropertyValue, SelectPropertyValue,
};
use notion_client::objects::rich_text::RichText;
use std::collections::HashMap;

/// Convert a notion-client page; its blocks are filled in by the fetcher.
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<Page, AppError> {
    let id = PageId::parse(&notion_page.id)?;
    let title = extract_page_title(&notion_page.properties);

    Ok(Page {
        id,
        title,
        url: notion_page.url,
        blocks: Vec::new(),
        properties: convert_page_properties(notion_page.properties),
        archived: notion_page.archived,
        last_edited_time: Some(notion_page.last_edited_time.to_rfc3339()),
    })
}

/// Convert a notion-client block; children are filled in by the fetcher.
pub fn convert_block(
    notion_block: notion_client::objects::block::Block,
) -> Result<Block, AppError> {
    let common = convert_block_common(&notion_block)?;

    let block = match notion_block.block_type {
        BlockType::Paragraph { paragraph } => Block::Paragraph(text_block(
            common,
            paragraph.rich_text,
            paragraph.color,
        )),
        BlockType::Heading1 { heading_1 } => {
            Block::Heading1(text_block(common, heading_1.rich_text, heading_1.color))
        }
        BlockType::Heading2 { heading_2 } => {
            Block::Heading2(text_block(common, heading_2.rich_text, heading_2.color))
        }
        BlockType::Heading3 { heading_3 } => {
            Block::Heading3(text_block(common, heading_3.rich_text, heading_3.color))
        }
        BlockType::BulletedListItem { bulleted_list_item } => Block::BulletedListItem(text_block(
            common,
            bulleted_list_item.rich_text,
            Some(bulleted_list_item.color),
        )),
        BlockType::NumberedListItem { numbered_list_item } => Block::NumberedListItem(text_block(
            common,
            numbered_list_item.rich_text,
            Some(numbered_list_item.color),
        )),
        BlockType::ToDo { to_do } => Block::ToDo(ToDoBlock {
            common,
            content: text_content(to_do.rich_text, to_do.color),
            checked: to_do.checked.unwrap_or(false),
        }),
        BlockType::Toggle { toggle } => {
            Block::Toggle(text_block(common, toggle.rich_text, Some(toggle.color)))
        }
        BlockType::Quote { quote } => {
            Block::Quote(text_block(common, quote.rich_text, Some(quote.color)))
        }
        BlockType::Code { code } => Block::Code(CodeBlock {
            common,
            language: format!("{:?}", code.language).to_lowercase(),
            content: text_content(code.rich_text, None),
        }),
        BlockType::Divider { .. } => Block::Divider(DividerBlock { common }),
        BlockType::ChildDatabase { child_database } => Block::ChildDatabase(ChildDatabaseBlock {
            common,
            title: child_database.title,
        }),
        BlockType::Table { table } => Block::Table(TableBlock {
            common,
            table_width: table.table_width as usize,
            has_column_header: table.has_column_header,
            has_row_header: table.has_row_header,
        }),
        BlockType::TableRow { table_row } => Block::TableRow(TableRowBlock {
            common,
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect(),
        }),
        BlockType::ColumnList { .. } => Block::ColumnList(ColumnListBlock { common }),
        BlockType::Column { .. } => Block::Column(ColumnBlock { common }),
        BlockType::SyncedBlock { synced_block } => {
            let synced_from = match synced_block.synced_from {
                Some(NcSyncedFrom::BlockId { block_id }) => Some(SyncedFrom {
                    block_id: BlockId::parse(&block_id)?,
                }),
                None => None,
            };
            Block::Synced(SyncedBlock {
                common,
                synced_from,
            })
        }
        other => Block::Unsupported(UnsupportedBlock {
            common,
            block_type: api_type_name(&other),
        }),
    };

    Ok(block)
}

/// The snake_case tag the API uses for a block type.
///
/// The serialized form of `BlockType` carries a `type` field; the variant
/// name in snake case is the fallback.
fn api_type_name(block_type: &BlockType) -> String {
    serde_json::to_value(block_type)
        .ok()
        .and_then(|value| value.get("type").and_then(|t| t.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let debug = format!("{:?}", block_type);
            let name = debug.split([' ', '{', '(']).next().unwrap_or_default();
            to_snake_case(name)
        })
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn convert_block_common(
    notion_block: &notion_client::objects::block::Block,
) -> Result<BlockCommon, AppError> {
    let raw_id = notion_block
        .id
        .as_deref()
        .ok_or_else(|| NotionClientError::ConversionError {
            message: "Block missing required ID field".to_string(),
        })?;

    Ok(BlockCommon {
        id: BlockId::parse(raw_id)?,
        children: Vec::new(),
        has_children: notion_block.has_children.unwrap_or(false),
        archived: notion_block.archived.unwrap_or(false),
    })
}

fn text_block(
    common: BlockCommon,
    rich_text: Vec<RichText>,
    color: Option<notion_client::objects::block::TextColor>,
) -> TextBlock {
    TextBlock {
        common,
        content: text_content(rich_text, color),
    }
}

fn text_content(
    rich_text: Vec<RichText>,
    color: Option<notion_client::objects::block::TextColor>,
) -> TextBlockContent {
    TextBlockContent {
        rich_text: convert_rich_text_array(rich_text),
        color: color.map(convert_block_color).unwrap_or_default(),
    }
}

fn convert_rich_text_array(rich_texts: Vec<RichText>) -> Vec<RichTextItem> {
    rich_texts.into_iter().filter_map(convert_rich_text).collect()
}

/// Converts one rich text run; run kinds without text are dropped.
fn convert_rich_text(rich_text: RichText) -> Option<RichTextItem> {
    use notion_client::objects::rich_text::Mention;

    let item = match rich_text {
        RichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            plain_text: plain_text.unwrap_or_else(|| text.content.clone()),
            text_type: RichTextType::Text {
                content: text.content,
                link: text.link.map(|link| Link { url: link.url }),
            },
            annotations: annotations.map(convert_annotations).unwrap_or_default(),
            href,
        },
        RichText::Mention {
            mention,
            annotations,
            plain_text,
            href,
        } => {
            let kind = match mention {
                Mention::User { .. } => "user",
                Mention::Page { .. } => "page",
                Mention::Database { .. } => "database",
                Mention::Date { .. } => "date",
                Mention::LinkPreview { .. } => "link_preview",
                _ => "other",
            };
            RichTextItem {
                text_type: RichTextType::Mention {
                    kind: kind.to_string(),
                },
                annotations: convert_annotations(annotations),
                plain_text,
                href,
            }
        }
        RichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },
        _ => {
            log::debug!("Skipping rich text run of an unknown kind");
            return None;
        }
    };
    Some(item)
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
        color: convert_rich_text_color(annotations.color),
    }
}

/// Maps one of notion-client's colour enums onto ours; the variant names
/// match. Select options carry no background variants.
macro_rules! impl_color_conversion {
    ($fn_name:ident, $source:ty) => {
        impl_color_conversion!(@build $fn_name, $source,
            Default, Gray, Brown, Orange, Yellow, Green, Blue, Purple, Pink, Red);
    };
    ($fn_name:ident, $source:ty, with_backgrounds) => {
        impl_color_conversion!(@build $fn_name, $source,
            Default, Gray, Brown, Orange, Yellow, Green, Blue, Purple, Pink, Red,
            GrayBackground, BrownBackground, OrangeBackground, YellowBackground,
            GreenBackground, BlueBackground, PurpleBackground, PinkBackground, RedBackground);
    };
    (@build $fn_name:ident, $source:ty, $($variant:ident),+) => {
        fn $fn_name(color: $source) -> Color {
            match color {
                $(<$source>::$variant => Color::$variant,)+
            }
        }
    };
}

impl_color_conversion!(
    convert_block_color,
    notion_client::objects::block::TextColor,
    with_backgrounds
);
impl_color_conversion!(
    convert_rich_text_color,
    notion_client::objects::rich_text::TextColor,
    with_backgrounds
);
impl_color_conversion!(convert_option_color, notion_client::objects::page::Color);

fn extract_page_title(properties: &HashMap<String, PageProperty>) -> PageTitle {
    properties
        .values()
        .find_map(|property| match property {
            PageProperty::Title { title, .. } => Some(plain_text_of(title.clone())),
            _ => None,
        })
        .map(PageTitle::new)
        .unwrap_or_else(|| PageTitle::new(""))
}

fn plain_text_of(rich_text: Vec<RichText>) -> String {
    convert_rich_text_array(rich_text)
        .into_iter()
        .map(|item| item.plain_text)
        .collect()
}

fn convert_page_properties(
    properties: HashMap<String, PageProperty>,
) -> IndexMap<PropertyName, PropertyValue> {
    let mut converted: IndexMap<PropertyName, PropertyValue> = properties
        .into_iter()
        .map(|(name, property)| (PropertyName::new(name), convert_page_property(property)))
        .collect();
    // HashMap order is arbitrary; keep a stable one.
    converted.sort_keys();
    converted
}

fn format_date(date: DateOrDateTime) -> String {
    match date {
        DateOrDateTime::Date(day) => day.format("%Y-%m-%d").to_string(),
        DateOrDateTime::DateTime(time) => time.to_rfc3339(),
    }
}

fn convert_date(value: DatePropertyValue) -> Option<DateValue> {
    Some(DateValue {
        start: format_date(value.start?),
        end: value.end.map(format_date),
        time_zone: value.time_zone,
    })
}

fn convert_select_option(option: SelectPropertyValue) -> SelectOption {
    SelectOption {
        name: option.name.unwrap_or_default(),
        color: option.color.map(convert_option_color).unwrap_or_default(),
    }
}

fn convert_user(user: notion_client::objects::user::User) -> User {
    User {
        id: user.id,
        name: user.name,
    }
}

fn convert_file(file: FilePropertyValue) -> FileRef {
    use notion_client::objects::file::File;

    let url = match file.file {
        File::External { external } => external.url,
        File::File { file } => file.url,
    };
    FileRef {
        name: file.name,
        url,
    }
}

fn convert_formula(formula: FormulaPropertyValue) -> Option<FormulaResult> {
    match formula {
        FormulaPropertyValue::String { string } => string.map(FormulaResult::String),
        FormulaPropertyValue::Number { number } => {
            number.and_then(|n| n.as_f64()).map(FormulaResult::Number)
        }
        FormulaPropertyValue::Boolean { boolean } => Some(FormulaResult::Boolean(boolean)),
        FormulaPropertyValue::Date { date } => date.and_then(convert_date).map(FormulaResult::Date),
    }
}

fn convert_rollup(rollup: Option<RollupPropertyValue>) -> RollupResult {
    match rollup {
        Some(RollupPropertyValue::Number { number, .. }) => {
            RollupResult::Number(number.and_then(|n| n.as_f64()))
        }
        Some(RollupPropertyValue::Date { date, .. }) => {
            RollupResult::Date(date.map(|time| DateValue {
                start: time.to_rfc3339(),
                end: None,
                time_zone: None,
            }))
        }
        Some(RollupPropertyValue::Array { array, .. }) => RollupResult::Array(
            array
                .into_iter()
                .map(|item| convert_page_property(item).display_value())
                .filter(|text| !text.is_empty())
                .collect(),
        ),
        _ => RollupResult::Empty,
    }
}

/// Converts one property value. Property kinds this crate does not model
/// keep their type name and render as empty text.
fn convert_page_property(property: PageProperty) -> PropertyValue {
    match property {
        PageProperty::Title { title, .. } => PropertyValue::Title(convert_rich_text_array(title)),
        PageProperty::RichText { rich_text, .. } => {
            PropertyValue::RichText(convert_rich_text_array(rich_text))
        }
        PageProperty::Number { number, .. } => {
            PropertyValue::Number(number.and_then(|n| n.as_f64()))
        }
        PageProperty::Checkbox { checkbox, .. } => PropertyValue::Checkbox(checkbox),
        PageProperty::Url { url, .. } => PropertyValue::Url(url),
        PageProperty::Email { email, .. } => PropertyValue::Email(email),
        PageProperty::PhoneNumber { phone_number, .. } => PropertyValue::PhoneNumber(phone_number),
        PageProperty::Select { select, .. } => {
            PropertyValue::Select(select.map(convert_select_option))
        }
        PageProperty::MultiSelect { multi_select, .. } => PropertyValue::MultiSelect(
            multi_select.into_iter().map(convert_select_option).collect(),
        ),
        PageProperty::Status { status, .. } => {
            PropertyValue::Status(status.map(convert_select_option))
        }
        PageProperty::Date { date, .. } => PropertyValue::Date(date.and_then(convert_date)),
        PageProperty::People { people, .. } => {
            PropertyValue::People(people.into_iter().map(convert_user).collect())
        }
        PageProperty::Files { files, .. } => {
            PropertyValue::Files(files.into_iter().map(convert_file).collect())
        }
        PageProperty::CreatedTime { created_time, .. } => {
            PropertyValue::CreatedTime(created_time.to_rfc3339())
        }
        PageProperty::CreatedBy { created_by, .. } => {
            PropertyValue::CreatedBy(convert_user(created_by))
        }
        PageProperty::LastEditedTime {
            last_edited_time, ..
        } => PropertyValue::LastEditedTime(
            last_edited_time
                .map(|time| time.to_rfc3339())
                .unwrap_or_default(),
        ),
        PageProperty::LastEditedBy { last_edited_by, .. } => {
            PropertyValue::LastEditedBy(convert_user(last_edited_by))
        }
        PageProperty::Relation { relation, .. } => PropertyValue::Relation(
            relation
                .into_iter()
                .filter_map(|r| {
                    PageId::parse(&r.id)
                        .map_err(|e| log::warn!("Skipping relation with invalid ID '{}': {}", r.id, e))
                        .ok()
                })
                .collect(),
        ),
        PageProperty::Formula { formula, .. } => {
            PropertyValue::Formula(formula.and_then(convert_formula))
        }
        PageProperty::Rollup { rollup, .. } => PropertyValue::Rollup(convert_rollup(rollup)),
        PageProperty::UniqueID { unique_id, .. } => match unique_id {
            Some(unique_id) => PropertyValue::UniqueId {
                prefix: unique_id.prefix,
                number: unique_id.number.and_then(|n| n.as_i64()).unwrap_or(0),
            },
            None => PropertyValue::Other {
                type_name: "unique_id".to_string(),
                raw: String::new(),
            },
        },
        PageProperty::Verification { verification, .. } => PropertyValue::Other {
            type_name: "verification".to_string(),
            raw: verification
                .map(|v| format!("{:?}", v.state).to_lowercase())
                .unwrap_or_default(),
        },
        PageProperty::Button { .. } => PropertyValue::Other {
            type_name: "button".to_string(),
            raw: String::new(),
        },
    }
}
