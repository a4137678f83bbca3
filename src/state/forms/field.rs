//! Form field specifications and value objects

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Input kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Url,
    Number,
    File,
    Choice,
    /// Open-ended list of entries
    List,
    Multiline,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Number => "number",
            Self::File => "file",
            Self::Choice => "choice",
            Self::List => "list",
            Self::Multiline => "multiline",
        }
    }
}

/// Metadata of a picked file. The contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }
}

/// Raw value held by a form field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Files(Vec<FileHandle>),
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn file(file: FileHandle) -> Self {
        FieldValue::Files(vec![file])
    }

    pub fn choices<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Choices(items.into_iter().map(Into::into).collect())
    }

    /// Whitespace-only text counts as empty
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Files(files) => files.is_empty(),
            FieldValue::Choices(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the attached files (empty slice for non-file values)
    pub fn files(&self) -> &[FileHandle] {
        match self {
            FieldValue::Files(files) => files,
            _ => &[],
        }
    }

    /// Get the selected items. A single text value counts as one selection.
    pub fn selections(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(s) if !s.trim().is_empty() => vec![s.as_str()],
            FieldValue::Choices(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of items for list-like values
    pub fn item_count(&self) -> usize {
        match self {
            FieldValue::Empty => 0,
            FieldValue::Text(s) => usize::from(!s.trim().is_empty()),
            FieldValue::Files(files) => files.len(),
            FieldValue::Choices(items) => items.len(),
        }
    }

    /// Parse the text as a finite number; `NaN` and infinities are rejected
    pub fn as_number(&self) -> Option<f64> {
        self.as_text()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    }

    /// Get the display value for listings and logs
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Files(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Choices(items) => items.join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A single validation rule. Rules run in declared order and the first
/// failing one supplies the field's message.
#[derive(Clone)]
pub enum Constraint {
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Pattern { regex: Regex, message: String },
    Email { message: String },
    Url { message: String },
    Phone { message: String },
    Numeric { message: String },
    Range { min: f64, max: f64, message: String },
    OneOf { options: Vec<String>, message: String },
    MinItems { min: usize, message: String },
    Custom {
        check: Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>,
        message: String,
    },
}

impl Constraint {
    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::MaxLength {
            max,
            message: message.into(),
        }
    }

    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    pub fn custom<F>(check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self::Custom {
            check: Arc::new(check),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Pattern { message, .. }
            | Self::Email { message }
            | Self::Url { message }
            | Self::Phone { message }
            | Self::Numeric { message }
            | Self::Range { message, .. }
            | Self::OneOf { message, .. }
            | Self::MinItems { message, .. }
            | Self::Custom { message, .. } => message,
        }
    }

    /// Check a non-empty value against this rule.
    ///
    /// Text rules pass for values that carry no text (files, choice lists);
    /// list rules look at every selected item.
    pub fn check(&self, value: &FieldValue) -> bool {
        match self {
            Self::MinLength { min, .. } => value
                .as_text()
                .is_none_or(|s| s.trim().chars().count() >= *min),
            Self::MaxLength { max, .. } => value
                .as_text()
                .is_none_or(|s| s.trim().chars().count() <= *max),
            Self::Pattern { regex, .. } => value
                .as_text()
                .is_none_or(|s| regex.is_match(s.trim())),
            Self::Email { .. } => value
                .as_text()
                .is_none_or(|s| EMAIL_PATTERN.is_match(s.trim())),
            Self::Url { .. } => value.as_text().is_none_or(is_web_url),
            Self::Phone { .. } => value.as_text().is_none_or(is_phone_number),
            Self::Numeric { .. } => value
                .as_text()
                .is_none_or(|_| value.as_number().is_some()),
            Self::Range { min, max, .. } => match value.as_text() {
                None => true,
                Some(_) => value.as_number().is_some_and(|n| n >= *min && n <= *max),
            },
            Self::OneOf { options, .. } => value
                .selections()
                .iter()
                .all(|item| options.iter().any(|o| o == item)),
            Self::MinItems { min, .. } => value.item_count() >= *min,
            Self::Custom { check, .. } => check(value),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinLength { min, .. } => write!(f, "MinLength({min})"),
            Self::MaxLength { max, .. } => write!(f, "MaxLength({max})"),
            Self::Pattern { regex, .. } => write!(f, "Pattern({})", regex.as_str()),
            Self::Email { .. } => f.write_str("Email"),
            Self::Url { .. } => f.write_str("Url"),
            Self::Phone { .. } => f.write_str("Phone"),
            Self::Numeric { .. } => f.write_str("Numeric"),
            Self::Range { min, max, .. } => write!(f, "Range({min}..={max})"),
            Self::OneOf { options, .. } => write!(f, "OneOf({options:?})"),
            Self::MinItems { min, .. } => write!(f, "MinItems({min})"),
            Self::Custom { .. } => f.write_str("Custom"),
        }
    }
}

fn is_web_url(input: &str) -> bool {
    url::Url::parse(input.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Accepts digits with common separators; 10 to 15 digits overall.
fn is_phone_number(input: &str) -> bool {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut digits = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => return false,
        }
    }
    (10..=15).contains(&digits)
}

/// Extra checks for file-kind fields, applied before declared constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRules {
    pub min_files: usize,
    pub max_files: usize,
    pub max_bytes: u64,
    pub allowed_mime: Vec<String>,
    pub count_message: String,
    pub too_large_message: String,
    pub wrong_type_message: String,
}

impl FileRules {
    pub const MEGABYTE: u64 = 1024 * 1024;

    /// Exactly one file within `max_bytes` whose MIME type is in `allowed_mime`
    pub fn single(max_bytes: u64, allowed_mime: &[&str]) -> Self {
        Self {
            min_files: 1,
            max_files: 1,
            max_bytes,
            allowed_mime: allowed_mime.iter().map(|m| m.to_string()).collect(),
            count_message: "Please upload exactly one file".to_string(),
            too_large_message: format!("File size must be less than {}", human_size(max_bytes)),
            wrong_type_message: "File type is not allowed".to_string(),
        }
    }

    /// Up to `max_files` files, each within `max_bytes`
    pub fn multiple(max_files: usize, max_bytes: u64, allowed_mime: &[&str]) -> Self {
        Self {
            min_files: 0,
            max_files,
            count_message: format!("You can upload at most {max_files} files"),
            ..Self::single(max_bytes, allowed_mime)
        }
    }

    pub fn with_type_message(mut self, message: impl Into<String>) -> Self {
        self.wrong_type_message = message.into();
        self
    }

    pub fn with_count_message(mut self, message: impl Into<String>) -> Self {
        self.count_message = message.into();
        self
    }

    pub fn allows_mime(&self, mime: &str) -> bool {
        self.allowed_mime.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= FileRules::MEGABYTE && bytes % FileRules::MEGABYTE == 0 {
        format!("{}MB", bytes / FileRules::MEGABYTE)
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

/// Declarative description of one input
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub required_message: String,
    pub constraints: Vec<Constraint>,
    pub file_rules: Option<FileRules>,
    pub default: FieldValue,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            required_message: format!("{label} is required"),
            constraints: Vec::new(),
            file_rules: None,
            default: FieldValue::Empty,
        }
    }

    /// Create a single-line text field
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Create a multiline text field
    pub fn multiline(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Multiline)
    }

    /// Create an email field with the address format check
    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email).constraint(Constraint::Email {
            message: "Please enter a valid email address".to_string(),
        })
    }

    /// Create a phone field with the digit-count check
    pub fn phone(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Phone).constraint(Constraint::Phone {
            message: "Please enter a valid phone number".to_string(),
        })
    }

    /// Create a URL field accepting http and https links
    pub fn url(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Url).constraint(Constraint::Url {
            message: "Please enter a valid URL".to_string(),
        })
    }

    /// Create a numeric field
    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number).constraint(Constraint::Numeric {
            message: format!("{label} must be a number"),
        })
    }

    /// Create a choice field restricted to `options`
    pub fn choice(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(name, label, FieldKind::Choice).constraint(Constraint::OneOf {
            options: options.iter().map(|o| o.to_string()).collect(),
            message: format!("Please select a valid {}", label.to_lowercase()),
        })
    }

    /// Create a field holding a free-form list of entries
    pub fn list(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::List)
    }

    /// Create a file field
    pub fn file(name: &str, label: &str, rules: FileRules) -> Self {
        Self {
            file_rules: Some(rules),
            ..Self::new(name, label, FieldKind::File)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = message.into();
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.constraint(Constraint::min_length(min, message))
    }

    pub fn max_length(self, max: usize, message: impl Into<String>) -> Self {
        self.constraint(Constraint::max_length(max, message))
    }

    pub fn range(self, min: f64, max: f64, message: impl Into<String>) -> Self {
        self.constraint(Constraint::Range {
            min,
            max,
            message: message.into(),
        })
    }

    pub fn min_items(self, min: usize, message: impl Into<String>) -> Self {
        self.constraint(Constraint::MinItems {
            min,
            message: message.into(),
        })
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn is_multiline(&self) -> bool {
        self.kind == FieldKind::Multiline
    }
}
