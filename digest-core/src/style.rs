//! Summary styles.
//!
//! A style controls both the instruction sent to the model for each chunk
//! and the policy used when merging partial summaries back together.

use serde::{Deserialize, Serialize};

/// Summary style options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Concise,
    Detailed,
    BulletPoints,
    Academic,
    Eli5,
}

/// How partial summaries are merged into the combined summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinePolicy {
    /// Join parts with a blank line, preserving order
    ProseJoin,
    /// Normalize parts into bullet lines and collapse consecutive duplicates
    BulletMerge,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 5] = [
        SummaryStyle::Concise,
        SummaryStyle::Detailed,
        SummaryStyle::BulletPoints,
        SummaryStyle::Academic,
        SummaryStyle::Eli5,
    ];

    /// Stable identifier used on the wire
    pub fn id(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "concise",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::BulletPoints => "bullet_points",
            SummaryStyle::Academic => "academic",
            SummaryStyle::Eli5 => "eli5",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "Concise",
            SummaryStyle::Detailed => "Detailed",
            SummaryStyle::BulletPoints => "Bullet Points",
            SummaryStyle::Academic => "Academic",
            SummaryStyle::Eli5 => "Explain Like I'm 5",
        }
    }

    /// Short description for style listings
    pub fn description(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "Brief summary highlighting key points",
            SummaryStyle::Detailed => "Comprehensive summary with more information",
            SummaryStyle::BulletPoints => "Summary formatted as bullet points",
            SummaryStyle::Academic => "Formal summary suitable for academic context",
            SummaryStyle::Eli5 => "Simple summary in easy-to-understand language",
        }
    }

    /// Instruction prepended to each chunk before it is sent to the model
    pub fn prompt_prefix(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => {
                "Provide a concise and brief summary of the following text: "
            }
            SummaryStyle::Detailed => {
                "Provide a comprehensive and detailed summary of the following text, \
                 including key points and main ideas: "
            }
            SummaryStyle::BulletPoints => {
                "Summarize the following text as a list of bullet points covering \
                 the main ideas: "
            }
            SummaryStyle::Academic => {
                "Create an academic summary of the following text, highlighting \
                 methodology, findings, and conclusions: "
            }
            SummaryStyle::Eli5 => {
                "Explain the following text as if explaining to a 5-year old in \
                 simple terms: "
            }
        }
    }

    /// Merge policy for combining partial summaries
    pub fn combine_policy(&self) -> CombinePolicy {
        match self {
            SummaryStyle::BulletPoints => CombinePolicy::BulletMerge,
            _ => CombinePolicy::ProseJoin,
        }
    }

    /// Parse a style identifier, falling back to the default for unknown values
    pub fn parse_or_default(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.id() == id)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
