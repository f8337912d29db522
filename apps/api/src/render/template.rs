//! Pure template renderer: `(ResumeDraft, TemplateId) -> RenderedDocument`.
//!
//! No I/O and no clock access — the output is a presentational block tree the
//! export adapter (or the preview endpoint) consumes. Absent optional fields
//! render nothing; only the name and job title fall back to literal
//! placeholder strings. Empty entry lists omit their section entirely,
//! header included.

use serde::Serialize;

use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeDraft};
use crate::models::template::{palette_rgb, TemplateId};
use crate::render::metrics::DocFont;

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const TITLE_PLACEHOLDER: &str = "Professional Title";

/// One presentational block. Order in the vec is layout order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocBlock {
    Name { text: String },
    Title { text: String },
    ContactLine { text: String },
    SectionHeader { text: String },
    /// Two-column line: entry title on the left, date range on the right.
    EntryHeader { left: String, right: String },
    /// Secondary line under an entry header (employer, institution, location).
    Detail { text: String },
    Paragraph { text: String },
    SkillLine { text: String },
    Rule,
    Spacer { lines: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub font: DocFont,
    pub primary_rgb: (u8, u8, u8),
    pub accent_rgb: (u8, u8, u8),
    pub blocks: Vec<DocBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Summary,
    Experience,
    Education,
    Skills,
}

/// Renders `draft` with the given template. Every template tolerates a fully
/// empty draft.
pub fn render(draft: &ResumeDraft, template: TemplateId) -> RenderedDocument {
    let font = match template {
        TemplateId::Modern | TemplateId::Minimal => DocFont::Helvetica,
        TemplateId::Classic | TemplateId::Executive => DocFont::Times,
    };

    let mut blocks = Vec::new();
    push_header(draft, template, &mut blocks);
    for section in section_order(template) {
        match section {
            Section::Summary => push_summary(draft, template, &mut blocks),
            Section::Experience => push_experience(draft, template, &mut blocks),
            Section::Education => push_education(draft, template, &mut blocks),
            Section::Skills => push_skills(draft, template, &mut blocks),
        }
    }

    RenderedDocument {
        template,
        font,
        primary_rgb: palette_rgb(&draft.color_scheme.primary),
        accent_rgb: palette_rgb(&draft.color_scheme.accent),
        blocks,
    }
}

fn section_order(template: TemplateId) -> [Section; 4] {
    match template {
        TemplateId::Executive => [
            Section::Summary,
            Section::Skills,
            Section::Experience,
            Section::Education,
        ],
        _ => [
            Section::Summary,
            Section::Experience,
            Section::Education,
            Section::Skills,
        ],
    }
}

fn uses_rules(template: TemplateId) -> bool {
    !matches!(template, TemplateId::Minimal)
}

fn header_text(template: TemplateId, label: &str) -> String {
    match template {
        TemplateId::Modern | TemplateId::Executive => label.to_uppercase(),
        _ => label.to_string(),
    }
}

fn push_header(draft: &ResumeDraft, template: TemplateId, blocks: &mut Vec<DocBlock>) {
    let info = &draft.basic_info;

    let name = join_present(&[info.first_name.as_deref(), info.last_name.as_deref()], " ");
    blocks.push(DocBlock::Name {
        text: if name.is_empty() {
            NAME_PLACEHOLDER.to_string()
        } else {
            name
        },
    });
    blocks.push(DocBlock::Title {
        text: match info.job_title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => TITLE_PLACEHOLDER.to_string(),
        },
    });

    let locality = join_present(&[info.city.as_deref(), info.state.as_deref()], ", ");
    let contact = join_present(
        &[
            info.email.as_deref(),
            info.phone.as_deref(),
            if locality.is_empty() {
                None
            } else {
                Some(locality.as_str())
            },
            info.website.as_deref(),
            info.linked_in.as_deref(),
        ],
        " | ",
    );
    if !contact.is_empty() {
        blocks.push(DocBlock::ContactLine { text: contact });
    }

    if uses_rules(template) {
        blocks.push(DocBlock::Rule);
    }
    blocks.push(DocBlock::Spacer { lines: 1 });
}

fn push_section_header(template: TemplateId, label: &str, blocks: &mut Vec<DocBlock>) {
    // Classic and Executive rule each section off; Modern rules the header
    // band only, so sections get just the heading.
    if uses_rules(template) && template != TemplateId::Modern {
        blocks.push(DocBlock::Rule);
    }
    blocks.push(DocBlock::SectionHeader {
        text: header_text(template, label),
    });
}

fn push_summary(draft: &ResumeDraft, template: TemplateId, blocks: &mut Vec<DocBlock>) {
    let Some(summary) = draft.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    push_section_header(template, "Summary", blocks);
    blocks.push(DocBlock::Paragraph {
        text: summary.to_string(),
    });
    blocks.push(DocBlock::Spacer { lines: 1 });
}

fn push_experience(draft: &ResumeDraft, template: TemplateId, blocks: &mut Vec<DocBlock>) {
    if draft.work_experience.is_empty() {
        return;
    }
    push_section_header(template, "Experience", blocks);
    for entry in &draft.work_experience {
        push_experience_entry(entry, blocks);
    }
}

fn push_experience_entry(entry: &ExperienceEntry, blocks: &mut Vec<DocBlock>) {
    let left = trimmed(&entry.job_title);
    let right = date_range(
        entry.start_date.as_deref(),
        entry.end_date.as_deref(),
        entry.is_current_job,
    );
    if !left.is_empty() || !right.is_empty() {
        blocks.push(DocBlock::EntryHeader { left, right });
    }

    let detail = join_present(&[entry.employer.as_deref(), entry.location.as_deref()], ", ");
    if !detail.is_empty() {
        blocks.push(DocBlock::Detail { text: detail });
    }
    if let Some(desc) = entry.description.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        blocks.push(DocBlock::Paragraph {
            text: desc.to_string(),
        });
    }
    blocks.push(DocBlock::Spacer { lines: 1 });
}

fn push_education(draft: &ResumeDraft, template: TemplateId, blocks: &mut Vec<DocBlock>) {
    if draft.education.is_empty() {
        return;
    }
    push_section_header(template, "Education", blocks);
    for entry in &draft.education {
        push_education_entry(entry, blocks);
    }
}

fn push_education_entry(entry: &EducationEntry, blocks: &mut Vec<DocBlock>) {
    let left = join_present(
        &[entry.degree.as_deref(), entry.field_of_study.as_deref()],
        ", ",
    );
    let right = date_range(
        entry.start_date.as_deref(),
        entry.end_date.as_deref(),
        entry.is_current,
    );
    if !left.is_empty() || !right.is_empty() {
        blocks.push(DocBlock::EntryHeader { left, right });
    }

    let detail = join_present(
        &[entry.institution.as_deref(), entry.location.as_deref()],
        ", ",
    );
    if !detail.is_empty() {
        blocks.push(DocBlock::Detail { text: detail });
    }
    if let Some(desc) = entry.description.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        blocks.push(DocBlock::Paragraph {
            text: desc.to_string(),
        });
    }
    blocks.push(DocBlock::Spacer { lines: 1 });
}

fn push_skills(draft: &ResumeDraft, template: TemplateId, blocks: &mut Vec<DocBlock>) {
    if draft.skills.is_empty() {
        return;
    }
    push_section_header(template, "Skills", blocks);
    for skill in &draft.skills {
        let name = skill.name.trim();
        if name.is_empty() {
            continue;
        }
        blocks.push(DocBlock::SkillLine {
            text: format!("{} ({})", name, skill.level.label()),
        });
    }
    blocks.push(DocBlock::Spacer { lines: 1 });
}

/// Joins the present, non-blank parts with `sep`.
fn join_present(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .filter_map(|p| p.map(str::trim).filter(|s| !s.is_empty()))
        .collect::<Vec<_>>()
        .join(sep)
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or("").to_string()
}

/// `"2021-03"` becomes `"Mar 2021"`; anything unparseable passes through as
/// typed so the user sees what they entered.
fn month_label(value: &str) -> String {
    let value = value.trim();
    if let Some((year, month)) = value.split_once('-') {
        let label = match month {
            "01" => Some("Jan"),
            "02" => Some("Feb"),
            "03" => Some("Mar"),
            "04" => Some("Apr"),
            "05" => Some("May"),
            "06" => Some("Jun"),
            "07" => Some("Jul"),
            "08" => Some("Aug"),
            "09" => Some("Sep"),
            "10" => Some("Oct"),
            "11" => Some("Nov"),
            "12" => Some("Dec"),
            _ => None,
        };
        if let Some(label) = label {
            if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
                return format!("{label} {year}");
            }
        }
    }
    value.to_string()
}

fn date_range(start: Option<&str>, end: Option<&str>, is_current: bool) -> String {
    let start = start.map(str::trim).filter(|s| !s.is_empty()).map(month_label);
    let end = if is_current {
        Some("Present".to_string())
    } else {
        end.map(str::trim).filter(|s| !s.is_empty()).map(|e| month_label(e))
    };
    match (start, end) {
        (Some(s), Some(e)) => format!("{s} – {e}"),
        (Some(s), None) => s,
        (None, Some(e)) => e,
        (None, None) => String::new(),
    }
}
