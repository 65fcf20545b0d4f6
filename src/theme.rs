use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub node_fill: String,
    pub node_text_color: String,
    pub line_color: String,
    pub line_width: f64,
    pub background: Option<String>,
}

impl Theme {
    /// Orange discs with white Verdana labels on a transparent canvas.
    pub fn classic() -> Self {
        Self {
            font_family: "Verdana".to_string(),
            node_fill: "orange".to_string(),
            node_text_color: "white".to_string(),
            line_color: "gray".to_string(),
            line_width: 2.0,
            background: None,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            node_fill: "#7A8AA6".to_string(),
            node_text_color: "#FFFFFF".to_string(),
            line_color: "#9AA6BC".to_string(),
            line_width: 1.6,
            background: Some("#FFFFFF".to_string()),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
