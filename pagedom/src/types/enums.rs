use std::fmt;

/// CSS-style positioning scheme of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    /// Pinned to the viewport, independent of where the element sits in the tree.
    Fixed,
}

impl Position {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Fixed => "fixed",
        }
    }
}

/// An offset or size along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(i16),
    Percent(f32),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    TranslateX(Length),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TranslateX(len) => write!(f, "translateX({len})"),
        }
    }
}
