//! Learning resources shown after a call

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Article,
    Guideline,
    Warning,
}

impl ResourceCategory {
    pub const fn icon(self) -> &'static str {
        match self {
            ResourceCategory::Article => "book",
            ResourceCategory::Guideline => "file-text",
            ResourceCategory::Warning => "alert-triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearningResource {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub category: ResourceCategory,
    /// Set from the category
    pub icon: &'static str,
}

const fn resource(
    id: u32,
    category: ResourceCategory,
    title: &'static str,
    description: &'static str,
) -> LearningResource {
    LearningResource {
        id,
        title,
        description,
        category,
        icon: category.icon(),
    }
}

pub const LEARNING_RESOURCES: [LearningResource; 5] = [
    resource(
        1,
        ResourceCategory::Article,
        "Understanding IV Medication Compatibility",
        "A comprehensive guide to IV medication compatibility, focusing on common drug interactions and best practices for administration.",
    ),
    resource(
        2,
        ResourceCategory::Guideline,
        "Vancomycin Administration Guidelines",
        "Detailed protocols for Vancomycin administration, including dosing, monitoring, and compatibility considerations.",
    ),
    resource(
        3,
        ResourceCategory::Guideline,
        "Zosyn (Piperacillin/Tazobactam) Best Practices",
        "Essential information about Zosyn administration, including compatibility, dosing, and monitoring requirements.",
    ),
    resource(
        4,
        ResourceCategory::Warning,
        "Critical IV Compatibility Warnings",
        "Important warnings about incompatible IV medications, with special focus on Vancomycin and Zosyn precipitation risks.",
    ),
    resource(
        5,
        ResourceCategory::Guideline,
        "IV Line Management and Flushing Protocols",
        "Best practices for IV line management, including proper flushing techniques and timing between incompatible medications.",
    ),
];

/// Static resource list. Holding a panel means it is on screen; `close`
/// hands control back.
#[derive(Debug, Clone, Serialize)]
pub struct LearningResourcePanel {
    resources: &'static [LearningResource],
}

impl LearningResourcePanel {
    pub fn mount() -> Self {
        Self {
            resources: &LEARNING_RESOURCES,
        }
    }

    pub fn resources(&self) -> &'static [LearningResource] {
        self.resources
    }

    pub fn close(self) {}
}
