//! Form-step validation.
//!
//! One policy drives every step; there is exactly one implementation of each
//! rule. Only `Severity::Error` issues block step advancement — advisory
//! guidance (summary length) surfaces as `Warning` and never gates.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks advancing past the step.
    Error,
    /// Shown inline, never blocks.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    /// Dotted/indexed path, e.g. `basicInfo.email` or `skills[2].name`.
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl FieldIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldIssue {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldIssue {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// The multi-step flow's steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    BasicInfo,
    Education,
    Experience,
    Skills,
    Summary,
}

/// Configuration for the single shared validator.
#[derive(Debug, Clone, Copy)]
pub struct ValidationPolicy {
    /// Skill names must be unique, compared case-insensitively after trim.
    pub enforce_unique_skills: bool,
    /// Advisory summary length band (characters).
    pub summary_min: usize,
    pub summary_max: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy {
            enforce_unique_skills: true,
            summary_min: 150,
            summary_max: 400,
        }
    }
}

/// Validates one step of the draft. Returns every issue found; callers gate
/// advancement on [`step_can_advance`].
pub fn validate_step(draft: &ResumeDraft, step: FormStep, policy: &ValidationPolicy) -> Vec<FieldIssue> {
    match step {
        FormStep::BasicInfo => validate_basic_info(draft),
        FormStep::Education => validate_education(draft),
        FormStep::Experience => validate_experience(draft),
        FormStep::Skills => validate_skills(draft, policy),
        FormStep::Summary => validate_summary(draft, policy),
    }
}

pub fn step_can_advance(issues: &[FieldIssue]) -> bool {
    !issues.iter().any(|i| i.severity == Severity::Error)
}

fn validate_basic_info(draft: &ResumeDraft) -> Vec<FieldIssue> {
    let info = &draft.basic_info;
    let mut issues = Vec::new();

    if is_blank(&info.first_name) {
        issues.push(FieldIssue::error("basicInfo.firstName", "First name is required"));
    }
    if is_blank(&info.last_name) {
        issues.push(FieldIssue::error("basicInfo.lastName", "Last name is required"));
    }
    match info.email.as_deref().map(str::trim) {
        None | Some("") => {
            issues.push(FieldIssue::error("basicInfo.email", "Email is required"));
        }
        Some(email) if !is_valid_email(email) => {
            issues.push(FieldIssue::error(
                "basicInfo.email",
                "Enter a valid email address",
            ));
        }
        _ => {}
    }
    if let Some(phone) = info.phone.as_deref().map(str::trim) {
        if !phone.is_empty() && !is_valid_phone(phone) {
            issues.push(FieldIssue::error(
                "basicInfo.phone",
                "Enter a valid phone number",
            ));
        }
    }
    issues
}

fn validate_education(draft: &ResumeDraft) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    for (i, entry) in draft.education.iter().enumerate() {
        if is_blank(&entry.institution) {
            issues.push(FieldIssue::error(
                format!("education[{i}].institution"),
                "Institution is required",
            ));
        }
        if is_blank(&entry.degree) {
            issues.push(FieldIssue::error(
                format!("education[{i}].degree"),
                "Degree is required",
            ));
        }
        issues.extend(validate_date_pair(
            &format!("education[{i}]"),
            entry.start_date.as_deref(),
            entry.end_date.as_deref(),
            entry.is_current,
        ));
    }
    issues
}

fn validate_experience(draft: &ResumeDraft) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    for (i, entry) in draft.work_experience.iter().enumerate() {
        if is_blank(&entry.job_title) {
            issues.push(FieldIssue::error(
                format!("workExperience[{i}].jobTitle"),
                "Job title is required",
            ));
        }
        if is_blank(&entry.employer) {
            issues.push(FieldIssue::error(
                format!("workExperience[{i}].employer"),
                "Employer is required",
            ));
        }
        issues.extend(validate_date_pair(
            &format!("workExperience[{i}]"),
            entry.start_date.as_deref(),
            entry.end_date.as_deref(),
            entry.is_current_job,
        ));
    }
    issues
}

fn validate_skills(draft: &ResumeDraft, policy: &ValidationPolicy) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for (i, skill) in draft.skills.iter().enumerate() {
        let name = skill.name.trim();
        if name.is_empty() {
            issues.push(FieldIssue::error(
                format!("skills[{i}].name"),
                "Skill name is required",
            ));
            continue;
        }
        if policy.enforce_unique_skills {
            let folded = name.to_lowercase();
            if seen.contains(&folded) {
                issues.push(FieldIssue::error(
                    format!("skills[{i}].name"),
                    format!("Skill '{name}' is already listed"),
                ));
            } else {
                seen.push(folded);
            }
        }
    }
    issues
}

fn validate_summary(draft: &ResumeDraft, policy: &ValidationPolicy) -> Vec<FieldIssue> {
    let len = draft
        .summary
        .as_deref()
        .map(|s| s.trim().chars().count())
        .unwrap_or(0);
    if len == 0 {
        return Vec::new();
    }
    if len < policy.summary_min {
        vec![FieldIssue::warning(
            "summary",
            format!(
                "Summaries between {} and {} characters read best (currently {len})",
                policy.summary_min, policy.summary_max
            ),
        )]
    } else if len > policy.summary_max {
        vec![FieldIssue::warning(
            "summary",
            format!(
                "Consider trimming below {} characters (currently {len})",
                policy.summary_max
            ),
        )]
    } else {
        Vec::new()
    }
}

fn validate_date_pair(
    prefix: &str,
    start: Option<&str>,
    end: Option<&str>,
    is_current: bool,
) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());

    if let Some(s) = start {
        if !is_month(s) {
            issues.push(FieldIssue::error(
                format!("{prefix}.startDate"),
                "Use the YYYY-MM month format",
            ));
        }
    }
    if let Some(e) = end {
        if !is_month(e) {
            issues.push(FieldIssue::error(
                format!("{prefix}.endDate"),
                "Use the YYYY-MM month format",
            ));
        }
    }
    // YYYY-MM strings order lexicographically, so a plain compare is exact.
    if !is_current {
        if let (Some(s), Some(e)) = (start, end) {
            if is_month(s) && is_month(e) && e < s {
                issues.push(FieldIssue::error(
                    format!("{prefix}.endDate"),
                    "End date is before the start date",
                ));
            }
        }
    }
    issues
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || " +-().".contains(c));
    allowed && (7..=15).contains(&digits)
}

fn is_month(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !value[..4].chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    matches!(&value[5..7], "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "12")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{BasicInfo, EducationEntry, ExperienceEntry, SkillEntry};

    fn policy() -> ValidationPolicy {
        ValidationPolicy::default()
    }

    fn draft_with_basic_info(info: BasicInfo) -> ResumeDraft {
        ResumeDraft {
            basic_info: info,
            ..Default::default()
        }
    }

    // ── basic info ──────────────────────────────────────────────────────────

    #[test]
    fn test_basic_info_missing_required_fields() {
        let draft = ResumeDraft::default();
        let issues = validate_step(&draft, FormStep::BasicInfo, &policy());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"basicInfo.firstName"));
        assert!(fields.contains(&"basicInfo.lastName"));
        assert!(fields.contains(&"basicInfo.email"));
        assert!(!step_can_advance(&issues));
    }

    #[test]
    fn test_basic_info_complete_passes() {
        let draft = draft_with_basic_info(BasicInfo {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.org".to_string()),
            ..Default::default()
        });
        let issues = validate_step(&draft, FormStep::BasicInfo, &policy());
        assert!(issues.is_empty());
        assert!(step_can_advance(&issues));
    }

    #[test]
    fn test_basic_info_bad_email_blocks() {
        let draft = draft_with_basic_info(BasicInfo {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("not-an-email".to_string()),
            ..Default::default()
        });
        let issues = validate_step(&draft, FormStep::BasicInfo, &policy());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "basicInfo.email");
        assert!(!step_can_advance(&issues));
    }

    #[test]
    fn test_basic_info_whitespace_only_name_is_blank() {
        let draft = draft_with_basic_info(BasicInfo {
            first_name: Some("   ".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.org".to_string()),
            ..Default::default()
        });
        let issues = validate_step(&draft, FormStep::BasicInfo, &policy());
        assert_eq!(issues[0].field, "basicInfo.firstName");
    }

    #[test]
    fn test_basic_info_optional_phone_empty_ok_invalid_blocks() {
        let mut info = BasicInfo {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.org".to_string()),
            ..Default::default()
        };
        info.phone = None;
        assert!(validate_step(&draft_with_basic_info(info.clone()), FormStep::BasicInfo, &policy()).is_empty());

        info.phone = Some("+1 (555) 123-4567".to_string());
        assert!(validate_step(&draft_with_basic_info(info.clone()), FormStep::BasicInfo, &policy()).is_empty());

        info.phone = Some("call me maybe".to_string());
        let issues = validate_step(&draft_with_basic_info(info), FormStep::BasicInfo, &policy());
        assert_eq!(issues[0].field, "basicInfo.phone");
    }

    // ── education / experience ──────────────────────────────────────────────

    #[test]
    fn test_education_requires_institution_and_degree() {
        let mut draft = ResumeDraft::default();
        draft.education.push(EducationEntry::default());
        let issues = validate_step(&draft, FormStep::Education, &policy());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"education[0].institution"));
        assert!(fields.contains(&"education[0].degree"));
    }

    #[test]
    fn test_empty_education_list_passes() {
        let draft = ResumeDraft::default();
        assert!(validate_step(&draft, FormStep::Education, &policy()).is_empty());
    }

    #[test]
    fn test_experience_end_before_start_blocks() {
        let mut draft = ResumeDraft::default();
        draft.work_experience.push(ExperienceEntry {
            job_title: Some("Engineer".to_string()),
            employer: Some("Initech".to_string()),
            start_date: Some("2023-06".to_string()),
            end_date: Some("2021-01".to_string()),
            ..Default::default()
        });
        let issues = validate_step(&draft, FormStep::Experience, &policy());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "workExperience[0].endDate");
    }

    #[test]
    fn test_experience_malformed_month_blocks() {
        let mut draft = ResumeDraft::default();
        draft.work_experience.push(ExperienceEntry {
            job_title: Some("Engineer".to_string()),
            employer: Some("Initech".to_string()),
            start_date: Some("June 2023".to_string()),
            ..Default::default()
        });
        let issues = validate_step(&draft, FormStep::Experience, &policy());
        assert_eq!(issues[0].field, "workExperience[0].startDate");
    }

    #[test]
    fn test_current_job_skips_date_order_check() {
        let mut draft = ResumeDraft::default();
        draft.work_experience.push(ExperienceEntry {
            job_title: Some("Engineer".to_string()),
            employer: Some("Initech".to_string()),
            start_date: Some("2023-06".to_string()),
            is_current_job: true,
            ..Default::default()
        });
        assert!(validate_step(&draft, FormStep::Experience, &policy()).is_empty());
    }

    // ── skills ──────────────────────────────────────────────────────────────

    #[test]
    fn test_duplicate_skill_names_case_insensitive() {
        let mut draft = ResumeDraft::default();
        draft.skills.push(SkillEntry {
            name: "Rust".to_string(),
            ..Default::default()
        });
        draft.skills.push(SkillEntry {
            name: "  rust ".to_string(),
            ..Default::default()
        });
        let issues = validate_step(&draft, FormStep::Skills, &policy());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "skills[1].name");
        assert!(!step_can_advance(&issues));
    }

    #[test]
    fn test_duplicate_skills_allowed_when_policy_disables_check() {
        let mut draft = ResumeDraft::default();
        draft.skills.push(SkillEntry {
            name: "Rust".to_string(),
            ..Default::default()
        });
        draft.skills.push(SkillEntry {
            name: "rust".to_string(),
            ..Default::default()
        });
        let relaxed = ValidationPolicy {
            enforce_unique_skills: false,
            ..ValidationPolicy::default()
        };
        assert!(validate_step(&draft, FormStep::Skills, &relaxed).is_empty());
    }

    #[test]
    fn test_empty_skill_name_blocks() {
        let mut draft = ResumeDraft::default();
        draft.skills.push(SkillEntry::default());
        let issues = validate_step(&draft, FormStep::Skills, &policy());
        assert_eq!(issues[0].field, "skills[0].name");
    }

    // ── summary ─────────────────────────────────────────────────────────────

    #[test]
    fn test_short_summary_warns_but_advances() {
        let draft = ResumeDraft {
            summary: Some("Too short.".to_string()),
            ..Default::default()
        };
        let issues = validate_step(&draft, FormStep::Summary, &policy());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(step_can_advance(&issues));
    }

    #[test]
    fn test_long_summary_warns_but_advances() {
        let draft = ResumeDraft {
            summary: Some("x".repeat(500)),
            ..Default::default()
        };
        let issues = validate_step(&draft, FormStep::Summary, &policy());
        assert_eq!(issues.len(), 1);
        assert!(step_can_advance(&issues));
    }

    #[test]
    fn test_empty_summary_never_warns() {
        let draft = ResumeDraft::default();
        assert!(validate_step(&draft, FormStep::Summary, &policy()).is_empty());
    }

    #[test]
    fn test_summary_in_band_passes() {
        let draft = ResumeDraft {
            summary: Some("y".repeat(200)),
            ..Default::default()
        };
        assert!(validate_step(&draft, FormStep::Summary, &policy()).is_empty());
    }

    // ── helpers ─────────────────────────────────────────────────────────────

    #[test]
    fn test_is_month_shapes() {
        assert!(is_month("2024-01"));
        assert!(is_month("1999-12"));
        assert!(!is_month("2024-13"));
        assert!(!is_month("2024-1"));
        assert!(!is_month("2024/01"));
        assert!(!is_month("202401"));
    }

    #[test]
    fn test_is_valid_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@.co"));
    }
}
