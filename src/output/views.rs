//! Tolerant typed views over stored operation results
//!
//! The backend payloads are stored verbatim, so these views never reject a
//! document. A missing or oddly shaped field simply comes back as `None` and
//! the caller falls back to raw JSON.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Envelope for the job analysis result. The `analysis` object holds the six
/// known sections, keyed exactly as the backend writes them.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisEnvelope {
    #[serde(default)]
    pub analysis: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchEnvelope {
    #[serde(default)]
    pub match_result: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptimizeEnvelope {
    #[serde(default)]
    pub suggestions: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoverLetterEnvelope {
    #[serde(default)]
    pub cover_letter: Option<String>,
}

impl AnalysisEnvelope {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

impl MatchEnvelope {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

impl OptimizeEnvelope {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

impl CoverLetterEnvelope {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// How a section renders on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStyle {
    Bulleted,
    Paragraph,
    Keywords,
}

pub struct AnalysisSection {
    pub key: &'static str,
    pub heading: &'static str,
    pub style: SectionStyle,
}

/// The six analysis sections in display order. Keys match the backend's
/// JSON verbatim; headings are what the user sees.
pub const ANALYSIS_SECTIONS: [AnalysisSection; 6] = [
    AnalysisSection {
        key: "Key responsibilities",
        heading: "Key Responsibilities",
        style: SectionStyle::Bulleted,
    },
    AnalysisSection {
        key: "Required skills and qualifications",
        heading: "Required Skills",
        style: SectionStyle::Bulleted,
    },
    AnalysisSection {
        key: "Preferred skills and qualifications",
        heading: "Preferred Skills",
        style: SectionStyle::Bulleted,
    },
    AnalysisSection {
        key: "Industry and role type",
        heading: "Industry and Role Type",
        style: SectionStyle::Paragraph,
    },
    AnalysisSection {
        key: "Experience level",
        heading: "Experience Level",
        style: SectionStyle::Paragraph,
    },
    AnalysisSection {
        key: "Key keywords for optimization",
        heading: "Key Keywords",
        style: SectionStyle::Keywords,
    },
];

/// A section body is either one string or a list of strings, depending on
/// how the backend chose to emit it.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    One(String),
    Many(Vec<String>),
}

impl SectionBody {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => SectionBody::One(s.clone()),
            Value::Array(items) => SectionBody::Many(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => SectionBody::One(other.to_string()),
        }
    }

    /// Bullet items: a list stays a list, a single string splits on lines.
    pub fn items(&self) -> Vec<String> {
        match self {
            SectionBody::Many(items) => items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            SectionBody::One(text) => text
                .lines()
                .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
                .filter(|line| !line.is_empty())
                .map(|line| line.to_string())
                .collect(),
        }
    }

    /// Keyword badges: a single string splits on commas instead.
    pub fn keywords(&self) -> Vec<String> {
        match self {
            SectionBody::Many(items) => items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            SectionBody::One(text) => text
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        }
    }

    /// Running text for paragraph sections.
    pub fn text(&self) -> String {
        match self {
            SectionBody::One(text) => text.clone(),
            SectionBody::Many(items) => items.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analysis_envelope_requires_analysis_object() {
        let present = AnalysisEnvelope::from_value(&json!({
            "analysis": {"Experience level": "Senior"}
        }));
        assert!(present.analysis.is_some());

        let absent = AnalysisEnvelope::from_value(&json!({"status": "ok"}));
        assert!(absent.analysis.is_none());

        // Non-object payloads degrade to the fallback instead of erroring.
        let garbage = AnalysisEnvelope::from_value(&json!("not an object"));
        assert!(garbage.analysis.is_none());
    }

    #[test]
    fn test_cover_letter_envelope_only_accepts_strings() {
        let text = CoverLetterEnvelope::from_value(&json!({"cover_letter": "Dear hiring team"}));
        assert_eq!(text.cover_letter.as_deref(), Some("Dear hiring team"));

        let structured = CoverLetterEnvelope::from_value(&json!({"cover_letter": {"body": "x"}}));
        assert!(structured.cover_letter.is_none());
    }

    #[test]
    fn test_section_body_accepts_string_or_array() {
        let many = SectionBody::from_value(&json!(["Ship features", "Review code"]));
        assert_eq!(many.items(), vec!["Ship features", "Review code"]);

        let one = SectionBody::from_value(&json!("- Ship features\n- Review code"));
        assert_eq!(one.items(), vec!["Ship features", "Review code"]);
    }

    #[test]
    fn test_keywords_split_on_commas() {
        let body = SectionBody::from_value(&json!("rust, tokio,  async"));
        assert_eq!(body.keywords(), vec!["rust", "tokio", "async"]);

        let body = SectionBody::from_value(&json!(["rust", "tokio"]));
        assert_eq!(body.keywords(), vec!["rust", "tokio"]);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let body = SectionBody::from_value(&json!([1, "two"]));
        assert_eq!(body.items(), vec!["1", "two"]);

        let body = SectionBody::from_value(&json!(42));
        assert_eq!(body.text(), "42");
    }

    #[test]
    fn test_section_keys_match_backend_spelling() {
        let keys: Vec<&str> = ANALYSIS_SECTIONS.iter().map(|s| s.key).collect();
        assert!(keys.contains(&"Key responsibilities"));
        assert!(keys.contains(&"Required skills and qualifications"));
        assert!(keys.contains(&"Key keywords for optimization"));
        assert_eq!(keys.len(), 6);
    }
}
