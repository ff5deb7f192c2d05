use std::borrow::Cow;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{constants::FEATURED_TAG, entities::option_fields::{OptionField, PatchString, PatchVec}};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5000;
const MAX_TAGS: usize = 20;
const MAX_TECH_STACK: usize = 30;
const MAX_LABEL_LENGTH: usize = 40;

static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} +.#-]*$").expect("label pattern is valid")
});

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_repo_url: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Featured either by flag or by carrying the `Featured` tag.
    pub fn is_featured(&self) -> bool {
        self.featured || self.tags.iter().any(|t| t == FEATURED_TAG)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Normalised values ready to be written by a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub title: String,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_repo_url: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Full replacement row computed from the current record and a patch.
pub type ProjectChanges = ProjectInsert;

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_tech_stack"))]
    pub tech_stack: Option<Vec<String>>,

    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub project_url: Option<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub github_repo_url: Option<String>,

    #[validate(custom(function = "validate_tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(custom(function = "validate_optional_title"))]
    pub title: PatchString,

    #[validate(custom(function = "validate_patch_description"))]
    pub description: PatchString,

    #[validate(custom(function = "validate_patch_tech_stack"))]
    pub tech_stack: PatchVec<String>,

    #[validate(custom(function = "validate_patch_url"))]
    pub image_url: PatchString,

    #[validate(custom(function = "validate_patch_url"))]
    pub project_url: PatchString,

    #[validate(custom(function = "validate_patch_url"))]
    pub github_repo_url: PatchString,

    #[validate(custom(function = "validate_patch_tags"))]
    pub tags: PatchVec<String>,

    pub featured: OptionField<bool>,
}

/// Query string accepted by the project list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct ProjectFilter {
    pub tag: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn by_tag(tag: impl Into<String>) -> Self {
        ProjectFilter { tag: Some(tag.into()), ..Default::default() }
    }

    pub fn featured_only() -> Self {
        ProjectFilter { featured: true, ..Default::default() }
    }

    /// Drops blank parameters so `?tag=&search=` behaves like no filter.
    pub fn normalized(self) -> Self {
        ProjectFilter {
            tag: self.tag.filter(|t| !t.trim().is_empty()),
            featured: self.featured,
            search: self.search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// In-process equivalent of the SQL predicate used by the repository.
    /// Tag matching is exact and case-sensitive; title search is not.
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(tag) = &self.tag {
            if !project.has_tag(tag) {
                return false;
            }
        }
        if self.featured && !project.is_featured() {
            return false;
        }
        if let Some(search) = &self.search {
            if !project.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagListResponse {
    pub tags: Vec<String>,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(new_validation_error("title_required", "Title is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(new_validation_error("title_length", "Title is too long"));
    }
    Ok(())
}

pub fn validate_optional_url(url: &str) -> Result<(), ValidationError> {
    // Empty strings come from cleared form inputs and mean "no URL".
    if url.trim().is_empty() {
        return Ok(());
    }
    match url::Url::parse(url.trim()) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(_) => Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://")),
        Err(_) => Err(new_validation_error("invalid_url", "Please enter a valid URL")),
    }
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    validate_labels(tags, "invalid_tag", "Tags may contain letters, digits, spaces and - + . #")
}

pub fn validate_tech_stack(tech_stack: &[String]) -> Result<(), ValidationError> {
    if tech_stack.len() > MAX_TECH_STACK {
        return Err(new_validation_error("too_many_technologies", "Too many technologies provided"));
    }
    validate_labels(tech_stack, "invalid_technology", "Technologies may contain letters, digits, spaces and - + . #")
}

fn validate_labels(labels: &[String], code: &'static str, msg: &'static str) -> Result<(), ValidationError> {
    for label in labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if label.chars().count() > MAX_LABEL_LENGTH || !LABEL_PATTERN.is_match(label) {
            return Err(new_validation_error(code, msg));
        }
    }
    Ok(())
}

pub fn validate_optional_title(value: &PatchString) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(title) => validate_title(title),
        OptionField::SetToNull => Err(new_validation_error("title_required", "Title is required")),
        OptionField::Unchanged => Ok(()),
    }
}

pub fn validate_patch_description(value: &PatchString) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(new_validation_error("description_length", "Description is too long"))
        }
        _ => Ok(()),
    }
}

pub fn validate_patch_url(value: &PatchString) -> Result<(), ValidationError> {
    value.value_ref().map_or(Ok(()), |url| validate_optional_url(url))
}

pub fn validate_patch_tags(value: &PatchVec<String>) -> Result<(), ValidationError> {
    value.value_ref().map_or(Ok(()), |tags| validate_tags(tags))
}

pub fn validate_patch_tech_stack(value: &PatchVec<String>) -> Result<(), ValidationError> {
    value.value_ref().map_or(Ok(()), |stack| validate_tech_stack(stack))
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Normalisation ────────────────────────────────────────────────

/// Trims entries, drops empty ones and removes duplicates keeping the first.
pub fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tech_stack(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value.map(normalize_labels).filter(|v| !v.is_empty())
}

fn contains_featured_tag(tags: &[String]) -> bool {
    tags.iter().any(|t| t == FEATURED_TAG)
}

impl From<NewProjectRequest> for ProjectInsert {
    fn from(req: NewProjectRequest) -> Self {
        let tags = normalize_labels(req.tags);
        let featured = req.featured.unwrap_or(false) || contains_featured_tag(&tags);

        ProjectInsert {
            title: req.title.trim().to_string(),
            description: normalize_text(req.description),
            tech_stack: normalize_tech_stack(req.tech_stack),
            image_url: normalize_text(req.image_url),
            project_url: normalize_text(req.project_url),
            github_repo_url: normalize_text(req.github_repo_url),
            tags,
            featured,
        }
    }
}

impl UpdateProjectRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_unchanged()
            && self.description.is_unchanged()
            && self.tech_stack.is_unchanged()
            && self.image_url.is_unchanged()
            && self.project_url.is_unchanged()
            && self.github_repo_url.is_unchanged()
            && self.tags.is_unchanged()
            && self.featured.is_unchanged()
    }

    /// Merges the patch into `current`, applying the same normalisation as
    /// creation. When tags are replaced without an explicit `featured`, the
    /// flag follows the presence of the `Featured` tag.
    pub fn apply(self, current: &Project) -> ProjectChanges {
        let tags = match self.tags.into_option() {
            None => current.tags.clone(),
            Some(None) => Vec::new(),
            Some(Some(tags)) => normalize_labels(tags),
        };

        let featured = match self.featured.into_option() {
            Some(Some(flag)) => flag,
            Some(None) => false,
            None if tags != current.tags => contains_featured_tag(&tags),
            None => current.featured,
        };

        let title = match self.title {
            OptionField::SetToValue(title) => title.trim().to_string(),
            _ => current.title.clone(),
        };

        ProjectChanges {
            title,
            description: normalize_text(self.description.apply_to(current.description.clone())),
            tech_stack: normalize_tech_stack(self.tech_stack.apply_to(current.tech_stack.clone())),
            image_url: normalize_text(self.image_url.apply_to(current.image_url.clone())),
            project_url: normalize_text(self.project_url.apply_to(current.project_url.clone())),
            github_repo_url: normalize_text(self.github_repo_url.apply_to(current.github_repo_url.clone())),
            tags,
            featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(tags: &[&str], featured: bool) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Portfolio".into(),
            description: None,
            tech_stack: None,
            image_url: None,
            project_url: None,
            github_repo_url: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(title: &str) -> NewProjectRequest {
        NewProjectRequest {
            title: title.into(),
            description: None,
            tech_stack: None,
            image_url: None,
            project_url: None,
            github_repo_url: None,
            tags: vec![],
            featured: None,
        }
    }

    #[test]
    fn blank_title_fails_validation() {
        assert!(request("").validate().is_err());
        assert!(request("   ").validate().is_err());
        assert!(request("Portfolio site").validate().is_ok());
    }

    #[test]
    fn urls_must_be_http() {
        let mut req = request("Site");
        req.project_url = Some("ftp://example.com".into());
        assert!(req.validate().is_err());

        req.project_url = Some("".into());
        req.github_repo_url = Some("https://github.com/me/site".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn tags_reject_markup() {
        let mut req = request("Site");
        req.tags = vec!["<script>".into()];
        assert!(req.validate().is_err());

        req.tags = vec!["C#".into(), "Node.js".into(), "Full Stack".into()];
        assert!(req.validate().is_ok());
    }

    #[test]
    fn insert_normalizes_fields_and_featured_tag() {
        let mut req = request("  Site  ");
        req.description = Some("   ".into());
        req.tech_stack = Some(vec![" Rust ".into(), "Rust".into(), "".into()]);
        req.tags = vec!["Featured".into(), "Backend".into(), "Backend".into()];

        let insert = ProjectInsert::from(req);
        assert_eq!(insert.title, "Site");
        assert_eq!(insert.description, None);
        assert_eq!(insert.tech_stack, Some(vec!["Rust".to_string()]));
        assert_eq!(insert.tags, vec!["Featured".to_string(), "Backend".to_string()]);
        assert!(insert.featured);
    }

    #[test]
    fn tag_filter_is_case_sensitive() {
        let filter = ProjectFilter::by_tag("Frontend");

        assert!(filter.matches(&project(&["Frontend"], false)));
        assert!(!filter.matches(&project(&["frontend"], false)));
        assert!(!filter.matches(&project(&["Backend"], false)));
    }

    #[test]
    fn featured_filter_accepts_flag_or_tag() {
        let filter = ProjectFilter::featured_only();

        assert!(filter.matches(&project(&[], true)));
        assert!(filter.matches(&project(&["Featured"], false)));
        assert!(!filter.matches(&project(&["Backend"], false)));
    }

    #[test]
    fn blank_filter_parameters_are_ignored() {
        let filter = ProjectFilter {
            tag: Some("".into()),
            featured: false,
            search: Some("  ".into()),
        }
        .normalized();

        assert_eq!(filter, ProjectFilter::default());
    }

    #[test]
    fn patch_replacing_tags_moves_featured_flag() {
        let current = project(&["Featured", "Backend"], true);
        let patch = UpdateProjectRequest {
            tags: OptionField::SetToValue(vec!["Backend".into()]),
            ..Default::default()
        };

        let changes = patch.apply(&current);
        assert_eq!(changes.tags, vec!["Backend".to_string()]);
        assert!(!changes.featured);
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let mut current = project(&["Backend"], false);
        current.description = Some("API".into());
        let patch = UpdateProjectRequest {
            title: OptionField::SetToValue("Renamed".into()),
            ..Default::default()
        };

        let changes = patch.apply(&current);
        assert_eq!(changes.title, "Renamed");
        assert_eq!(changes.description, Some("API".into()));
        assert_eq!(changes.tags, current.tags);
        assert!(!changes.featured);
    }

    #[test]
    fn null_title_is_rejected() {
        let patch = UpdateProjectRequest {
            title: OptionField::SetToNull,
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
