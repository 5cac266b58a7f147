use serde::{Deserialize, Serialize};

/// Notion's text and block colours, named as the API names them
/// (`"red"`, `"red_background"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

impl Color {
    /// The hue with any `_background` dropped; documents only get the foreground.
    pub fn base(self) -> Color {
        match self {
            Color::GrayBackground => Color::Gray,
            Color::BrownBackground => Color::Brown,
            Color::OrangeBackground => Color::Orange,
            Color::YellowBackground => Color::Yellow,
            Color::GreenBackground => Color::Green,
            Color::BlueBackground => Color::Blue,
            Color::PurpleBackground => Color::Purple,
            Color::PinkBackground => Color::Pink,
            Color::RedBackground => Color::Red,
            hue => hue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let parsed: Vec<Color> =
            serde_json::from_str(r#"["default", "red", "gray_background"]"#).unwrap();
        assert_eq!(parsed, vec![Color::Default, Color::Red, Color::GrayBackground]);
        assert_eq!(
            serde_json::to_string(&Color::PinkBackground).unwrap(),
            "\"pink_background\""
        );
        assert!(serde_json::from_str::<Color>("\"light_gray\"").is_err());
    }

    #[test]
    fn test_base_strips_background() {
        assert_eq!(Color::BlueBackground.base(), Color::Blue);
        assert_eq!(Color::Green.base(), Color::Green);
        assert_eq!(Color::Default.base(), Color::Default);
    }
}
