//! The resume draft data model and saved snapshots.
//!
//! Field names serialize in `camelCase`; this is the persisted document
//! layout, so renames here are a storage format change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::template::{TemplateId, DEFAULT_ACCENT, DEFAULT_PRIMARY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub linked_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    /// Generated once at entry creation; stable across edits.
    pub id: Uuid,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    /// `YYYY-MM` month string, as produced by month inputs.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: Option<String>,
}

impl Default for EducationEntry {
    fn default() -> Self {
        EducationEntry {
            id: Uuid::new_v4(),
            institution: None,
            degree: None,
            field_of_study: None,
            location: None,
            start_date: None,
            end_date: None,
            is_current: false,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub job_title: Option<String>,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current_job: bool,
    pub description: Option<String>,
}

impl Default for ExperienceEntry {
    fn default() -> Self {
        ExperienceEntry {
            id: Uuid::new_v4(),
            job_title: None,
            employer: None,
            location: None,
            start_date: None,
            end_date: None,
            is_current_job: false,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub id: Uuid,
    pub name: String,
    pub level: SkillLevel,
}

impl Default for SkillEntry {
    fn default() -> Self {
        SkillEntry {
            id: Uuid::new_v4(),
            name: String::new(),
            level: SkillLevel::default(),
        }
    }
}

/// Primary/accent palette keys. Unknown keys resolve to defaults at render
/// time, never at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScheme {
    pub primary: String,
    pub accent: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            primary: DEFAULT_PRIMARY.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

/// The resume being edited. One draft exists per service instance; mutation
/// goes through the draft container, which normalizes and persists it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDraft {
    pub basic_info: BasicInfo,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillEntry>,
    pub summary: Option<String>,
    pub color_scheme: ColorScheme,
    pub template: TemplateId,
}

impl ResumeDraft {
    /// Enforces the current/end-date exclusivity rule on every list entry:
    /// a current position has no end date. Idempotent.
    pub fn normalize(&mut self) {
        for entry in &mut self.education {
            if entry.is_current {
                entry.end_date = None;
            }
        }
        for entry in &mut self.work_experience {
            if entry.is_current_job {
                entry.end_date = None;
            }
        }
    }
}

/// An immutable snapshot of a draft captured at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResume {
    pub id: Uuid,
    pub data: ResumeDraft,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clears_end_date_for_current_entries() {
        let mut draft = ResumeDraft::default();
        draft.work_experience.push(ExperienceEntry {
            is_current_job: true,
            end_date: Some("2024-06".to_string()),
            ..Default::default()
        });
        draft.education.push(EducationEntry {
            is_current: true,
            end_date: Some("2023-05".to_string()),
            ..Default::default()
        });

        draft.normalize();
        assert_eq!(draft.work_experience[0].end_date, None);
        assert_eq!(draft.education[0].end_date, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut draft = ResumeDraft::default();
        draft.work_experience.push(ExperienceEntry {
            is_current_job: true,
            end_date: Some("2024-06".to_string()),
            ..Default::default()
        });

        draft.normalize();
        let once = draft.clone();
        draft.normalize();
        assert_eq!(draft, once);
    }

    #[test]
    fn test_normalize_keeps_end_date_for_finished_entries() {
        let mut draft = ResumeDraft::default();
        draft.work_experience.push(ExperienceEntry {
            is_current_job: false,
            end_date: Some("2022-12".to_string()),
            ..Default::default()
        });

        draft.normalize();
        assert_eq!(
            draft.work_experience[0].end_date.as_deref(),
            Some("2022-12")
        );
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let draft = ResumeDraft::default();
        let json = serde_json::to_value(&draft).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(obj.contains_key("basicInfo"));
        assert!(obj.contains_key("workExperience"));
        assert!(obj.contains_key("colorScheme"));
        assert!(!obj.contains_key("work_experience"));
    }

    #[test]
    fn test_draft_round_trip_preserves_entry_ids() {
        let mut draft = ResumeDraft::default();
        draft.skills.push(SkillEntry {
            name: "Rust".to_string(),
            level: SkillLevel::Advanced,
            ..Default::default()
        });
        let id = draft.skills[0].id;

        let json = serde_json::to_string(&draft).expect("serialize");
        let back: ResumeDraft = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.skills[0].id, id);
        assert_eq!(back, draft);
    }

    #[test]
    fn test_skill_level_serializes_as_plain_name() {
        let json = serde_json::to_string(&SkillLevel::Expert).expect("serialize");
        assert_eq!(json, "\"Expert\"");
    }

    #[test]
    fn test_empty_object_deserializes_to_default_draft() {
        let draft: ResumeDraft = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(draft.template, TemplateId::Modern);
        assert!(draft.education.is_empty());
        assert_eq!(draft.color_scheme, ColorScheme::default());
    }
}
