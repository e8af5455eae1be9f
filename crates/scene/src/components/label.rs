use crate::components::LabelStyle;

/// Text drawn next to an entity's anchor position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn new(text: impl Into<String>, style: LabelStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}
