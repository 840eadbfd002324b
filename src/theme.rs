use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Line color for trains whose category has no entry in the color table
    #[must_use]
    pub fn fallback_line_color(self) -> &'static str {
        match self {
            Theme::Light => "purple",
            Theme::Dark => "#c084fc",
        }
    }
}

/// Graph colors by upstream train category
const TRAIN_TYPE_COLORS: &[(&str, &str)] = &[
    ("EIE", "#1d4ed8"),
    ("EIJ", "#2563eb"),
    ("EIP", "#3b82f6"),
    ("ECE", "#0ea5e9"),
    ("ECJ", "#0284c7"),
    ("MOE", "#16a34a"),
    ("MOJ", "#15803d"),
    ("MPE", "#22c55e"),
    ("MPJ", "#4ade80"),
    ("RPJ", "#eab308"),
    ("ROJ", "#ca8a04"),
    ("RAJ", "#f59e0b"),
    ("LTE", "#9ca3af"),
    ("TME", "#78716c"),
    ("TLE", "#57534e"),
    ("TKE", "#a8a29e"),
    ("ZXS", "#ef4444"),
];

/// Resolves a display color from a train category code
pub trait ColorResolver {
    fn color_for(&self, train_type: &str) -> String;
}

impl<F> ColorResolver for F
where
    F: Fn(&str) -> String,
{
    fn color_for(&self, train_type: &str) -> String {
        self(train_type)
    }
}

/// Built-in color table with a theme-dependent fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainTypeColors {
    pub theme: Theme,
}

impl TrainTypeColors {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    #[must_use]
    pub fn lookup(train_type: &str) -> Option<&'static str> {
        let code = train_type.trim();
        TRAIN_TYPE_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, color)| *color)
    }
}

impl ColorResolver for TrainTypeColors {
    fn color_for(&self, train_type: &str) -> String {
        Self::lookup(train_type)
            .unwrap_or_else(|| self.theme.fallback_line_color())
            .to_string()
    }
}
