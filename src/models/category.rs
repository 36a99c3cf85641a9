use serde::{Deserialize, Serialize};

use super::PatternCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: String::from("circle.dashed"),
            color: String::from("#6b7280"),
        }
    }
}

/// Category -> icon/color lookup handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPalette {
    pub styles: Vec<CategoryStyle>,
    #[serde(default)]
    pub fallback: CategoryStyle,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            styles: get_default_styles(),
            fallback: CategoryStyle::default(),
        }
    }
}

impl CategoryPalette {
    pub fn style_for(&self, category: &PatternCategory) -> &CategoryStyle {
        let name = category.display_name();
        self.styles
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .unwrap_or(&self.fallback)
    }
}

pub fn get_default_styles() -> Vec<CategoryStyle> {
    vec![
        CategoryStyle {
            name: "Sensory".to_string(),
            icon: "waveform".to_string(),
            color: "#8b5cf6".to_string(),
        },
        CategoryStyle {
            name: "Executive Function".to_string(),
            icon: "brain".to_string(),
            color: "#3b82f6".to_string(),
        },
        CategoryStyle {
            name: "Energy & Regulation".to_string(),
            icon: "bolt".to_string(),
            color: "#f59e0b".to_string(),
        },
        CategoryStyle {
            name: "Social & Communication".to_string(),
            icon: "person.2".to_string(),
            color: "#10b981".to_string(),
        },
        CategoryStyle {
            name: "Routine & Change".to_string(),
            icon: "arrow.triangle.2.circlepath".to_string(),
            color: "#06b6d4".to_string(),
        },
        CategoryStyle {
            name: "Demand Avoidance".to_string(),
            icon: "hand.raised".to_string(),
            color: "#ef4444".to_string(),
        },
        CategoryStyle {
            name: "Physical & Sleep".to_string(),
            icon: "bed.double".to_string(),
            color: "#6366f1".to_string(),
        },
        CategoryStyle {
            name: "Special Interests".to_string(),
            icon: "star".to_string(),
            color: "#ec4899".to_string(),
        },
        CategoryStyle {
            name: "Positive & Coping".to_string(),
            icon: "heart".to_string(),
            color: "#22c55e".to_string(),
        },
    ]
}
