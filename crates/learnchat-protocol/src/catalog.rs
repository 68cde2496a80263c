//! Enrollment and progress records returned by the course services.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Course summary embedded in an enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CourseRef {
    /// Course id; the course service emits `_id`.
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        deserialize_with = "opt_id_from_any"
    )]
    pub id: Option<String>,
    /// Course title.
    #[serde(default)]
    pub title: Option<String>,
    /// Course category.
    #[serde(default)]
    pub category: Option<String>,
}

/// One of the current user's enrollments.
///
/// The enrollment service returns either a populated `course` object or flat
/// `courseId`/`title` fields; accessors prefer the nested values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Enrollment {
    /// Populated course document, when present.
    #[serde(default)]
    pub course: Option<CourseRef>,
    /// Flat course id.
    #[serde(
        rename = "courseId",
        default,
        deserialize_with = "opt_id_from_any"
    )]
    pub course_id: Option<String>,
    /// Flat course title.
    #[serde(default)]
    pub title: Option<String>,
}

impl Enrollment {
    /// Build an enrollment with a populated course document.
    pub fn with_course(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            course: Some(CourseRef {
                id: Some(id.into()),
                title: Some(title.into()),
                category: Some(category.into()),
            }),
            course_id: None,
            title: None,
        }
    }

    /// Resolved course id.
    pub fn course_id(&self) -> Option<&str> {
        self.course
            .as_ref()
            .and_then(|course| course.id.as_deref())
            .or(self.course_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Resolved course title.
    pub fn course_title(&self) -> Option<&str> {
        self.course
            .as_ref()
            .and_then(|course| course.title.as_deref())
            .or(self.title.as_deref())
            .filter(|title| !title.is_empty())
    }

    /// Course category, only known when the course document is populated.
    pub fn category(&self) -> Option<&str> {
        self.course
            .as_ref()
            .and_then(|course| course.category.as_deref())
            .filter(|category| !category.is_empty())
    }
}

/// Completion record for a single course.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgressRecord {
    /// Completed share of the course in percent.
    #[serde(rename = "completedPercentage", default)]
    pub completed_percentage: Option<f64>,
}

impl ProgressRecord {
    /// Create a record with a known percentage.
    pub fn new(completed_percentage: f64) -> Self {
        Self {
            completed_percentage: Some(completed_percentage),
        }
    }

    /// Percentage with missing values treated as zero.
    pub fn percentage(&self) -> f64 {
        self.completed_percentage.unwrap_or(0.0)
    }
}

fn opt_id_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::{Enrollment, ProgressRecord};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_course_wins_over_flat_fields() {
        let enrollment: Enrollment = serde_json::from_value(json!({
            "course": { "_id": "c1", "title": "Rust Basics", "category": "Programming" },
            "courseId": "flat",
            "title": "Flat Title"
        }))
        .expect("enrollment");
        assert_eq!(enrollment.course_id(), Some("c1"));
        assert_eq!(enrollment.course_title(), Some("Rust Basics"));
        assert_eq!(enrollment.category(), Some("Programming"));
    }

    #[test]
    fn flat_fields_are_used_without_course_document() {
        let enrollment: Enrollment =
            serde_json::from_value(json!({ "courseId": 7, "title": "Algebra" })).expect("enrollment");
        assert_eq!(enrollment.course_id(), Some("7"));
        assert_eq!(enrollment.course_title(), Some("Algebra"));
        assert_eq!(enrollment.category(), None);
    }

    #[test]
    fn missing_percentage_reads_as_zero() {
        let record: ProgressRecord = serde_json::from_value(json!({})).expect("record");
        assert_eq!(record.percentage(), 0.0);
    }
}
