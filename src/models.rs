use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

pub type Id = i64;

// ── Users ─────────────────────────────────────────────────────────────

/// A group membership as the backend serialises it: a bare name, a bare id,
/// or a `{id, name}` object depending on the serializer in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
    Name(String),
    Id(Id),
    Object {
        #[serde(default)]
        id: Option<Id>,
        name: String,
    },
}

impl GroupRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            GroupRef::Name(name) | GroupRef::Object { name, .. } => Some(name),
            GroupRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups
            .iter()
            .filter_map(GroupRef::name)
            .any(|name| name.eq_ignore_ascii_case(group))
    }
}

/// `/account/profile/me/` returns the signed-in user.
pub type Profile = User;

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

// ── Kanban ────────────────────────────────────────────────────────────

/// Serialised in its display form; decoded through `FromStr` so snake-case
/// values from older serializers still parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum CardStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Failed,
}

impl CardStatus {
    pub const ALL: [CardStatus; 6] = [
        CardStatus::NotStarted,
        CardStatus::InProgress,
        CardStatus::UnderReview,
        CardStatus::OnHold,
        CardStatus::Completed,
        CardStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::UnderReview => "Under Review",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatus {
    type Err = String;

    /// Accepts the display form ("In Progress") as well as
    /// snake/kebab forms typed on the command line ("in_progress", "on-hold").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "notstarted" => Ok(Self::NotStarted),
            "inprogress" => Ok(Self::InProgress),
            "underreview" => Ok(Self::UnderReview),
            "onhold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl TryFrom<String> for CardStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CardStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "tags_from_list_or_csv")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "decimal_opt")]
    pub estimated_hours: Option<f64>,
    #[serde(default, deserialize_with = "decimal_opt")]
    pub actual_hours: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress_percentage: u8,
    #[serde(default)]
    pub list: Option<Id>,
}

impl Card {
    pub fn is_assigned_to(&self, user_id: Id) -> bool {
        self.assignees.iter().any(|u| u.id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: Id,
    pub name: String,
    pub board: Id,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub lists: Vec<List>,
}

impl Board {
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }
}

/// Payload for `POST /task/cards/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub list: Id,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub status: CardStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl NewCard {
    pub fn new(list: Id, title: impl Into<String>) -> Self {
        Self {
            list,
            title: title.into(),
            description: String::new(),
            status: CardStatus::default(),
            priority: Priority::default(),
            due_date: None,
        }
    }
}

/// Partial update for `PATCH /task/cards/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<Id>>,
}

impl CardPatch {
    pub fn move_to(list: Id) -> Self {
        Self {
            list: Some(list),
            ..Self::default()
        }
    }

    pub fn status(status: CardStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn assignees(ids: Vec<Id>) -> Self {
        Self {
            assignee_ids: Some(ids),
            ..Self::default()
        }
    }
}

// ── Staff documents ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    PendingStaff,
    PendingManager,
    Completed,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingStaff => "pending_staff",
            Self::PendingManager => "pending_manager",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_staff" => Ok(Self::PendingStaff),
            "pending_manager" => Ok(Self::PendingManager),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

/// The minimal user reference embedded in documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Id,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffDocument {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub status: DocumentStatus,
    pub staff: UserRef,
    #[serde(default)]
    pub line_manager: Option<UserRef>,
    #[serde(default)]
    pub staff_signature: Option<String>,
    #[serde(default)]
    pub manager_signature: Option<String>,
    #[serde(default)]
    pub staff_comments: Option<String>,
    #[serde(default)]
    pub manager_comments: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub staff_signed_at: Option<String>,
    #[serde(default)]
    pub manager_signed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewStaffDocument {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub staff_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_manager_id: Option<Id>,
}

// ── Careers ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Id,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub job: Option<Id>,
    #[serde(default)]
    pub position: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewJobApplication {
    pub job: Id,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

// ── Appointments ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

// ── Content ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "tags_from_list_or_csv")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: Option<Id>,
    pub slug: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub starting_price: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub rating: u8,
    pub message: String,
    #[serde(default)]
    pub approved: bool,
}

// ── Helpers ───────────────────────────────────────────────────────────

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decimal fields arrive either as JSON numbers or as strings like `"4.50"`.
fn decimal_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Option::<Decimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Decimal::Number(n)) => Ok(Some(n)),
        Some(Decimal::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Decimal::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Tag-like fields arrive either as a JSON array or as a comma-separated string.
fn tags_from_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Option::<Tags>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Tags::List(items)) => items,
        Some(Tags::Csv(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_status_serializes_as_display_string() {
        let json = serde_json::to_string(&CardStatus::UnderReview).unwrap();
        assert_eq!(json, r#""Under Review""#);
        let back: CardStatus = serde_json::from_str(r#""On Hold""#).unwrap();
        assert_eq!(back, CardStatus::OnHold);
    }

    #[test]
    fn card_status_from_str_accepts_cli_forms() {
        assert_eq!("in_progress".parse::<CardStatus>(), Ok(CardStatus::InProgress));
        assert_eq!("On Hold".parse::<CardStatus>(), Ok(CardStatus::OnHold));
        assert_eq!("not-started".parse::<CardStatus>(), Ok(CardStatus::NotStarted));
        assert!("done".parse::<CardStatus>().is_err());
    }

    #[test]
    fn card_deserializes_decimal_strings_and_csv_tags() {
        let json = r#"{
            "id": 7,
            "title": "Landing page",
            "description": null,
            "status": "In Progress",
            "priority": "High",
            "assignees": [],
            "due_date": "2024-05-01",
            "tags": "design, frontend",
            "estimated_hours": "4.50",
            "actual_hours": 2,
            "progress_percentage": 40,
            "list": 3
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.description, "");
        assert_eq!(card.tags, vec!["design", "frontend"]);
        assert_eq!(card.estimated_hours, Some(4.5));
        assert_eq!(card.actual_hours, Some(2.0));
        assert_eq!(card.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(card.list, Some(3));
    }

    #[test]
    fn minimal_card_uses_defaults() {
        let card: Card = serde_json::from_str(r#"{"id": 1, "title": "x"}"#).unwrap();
        assert_eq!(card.status, CardStatus::NotStarted);
        assert_eq!(card.priority, Priority::Medium);
        assert!(card.tags.is_empty());
        assert_eq!(card.estimated_hours, None);
    }

    #[test]
    fn card_accepts_snake_case_status_and_lowercase_priority() {
        let json = r#"{"id": 2, "title": "Hero", "status": "in_progress", "priority": "high"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.status, CardStatus::InProgress);
        assert_eq!(card.priority, Priority::High);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["status"], "In Progress");
        assert_eq!(json["priority"], "High");
    }

    #[test]
    fn card_null_status_priority_and_progress_fall_back() {
        let json = r#"{
            "id": 3,
            "title": "Copy",
            "status": null,
            "priority": null,
            "progress_percentage": null
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.status, CardStatus::NotStarted);
        assert_eq!(card.priority, Priority::Medium);
        assert_eq!(card.progress_percentage, 0);
    }

    #[test]
    fn card_with_unknown_status_names_the_value() {
        let json = r#"{"id": 4, "title": "x", "status": "archived"}"#;
        let err = serde_json::from_str::<Card>(json).unwrap_err().to_string();
        assert!(err.contains("Invalid status: archived"), "{}", err);
    }

    #[test]
    fn user_groups_accept_mixed_shapes() {
        let json = r#"{
            "id": 1,
            "username": "amy",
            "groups": ["Staff", 4, {"id": 2, "name": "admin"}]
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.in_group("Admin"));
        assert!(user.in_group("staff"));
        assert!(!user.in_group("manager"));
        assert_eq!(user.display_name(), "amy");
    }

    #[test]
    fn card_patch_serializes_only_set_fields() {
        let json = serde_json::to_value(CardPatch::move_to(9)).unwrap();
        assert_eq!(json, serde_json::json!({"list": 9}));
        let json = serde_json::to_value(CardPatch::assignees(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"assignee_ids": [1, 2]}));
    }

    #[test]
    fn document_status_round_trips_snake_case() {
        let status: DocumentStatus = serde_json::from_str(r#""pending_manager""#).unwrap();
        assert_eq!(status, DocumentStatus::PendingManager);
        assert_eq!("rejected".parse::<DocumentStatus>(), Ok(DocumentStatus::Rejected));
    }

    #[test]
    fn board_card_count_sums_lists() {
        let board = Board {
            id: 1,
            name: "Ops".into(),
            lists: vec![
                List {
                    id: 1,
                    name: "Todo".into(),
                    board: 1,
                    cards: vec![serde_json::from_str(r#"{"id": 1, "title": "a"}"#).unwrap()],
                },
                List {
                    id: 2,
                    name: "Done".into(),
                    board: 1,
                    cards: vec![],
                },
            ],
        };
        assert_eq!(board.card_count(), 1);
    }
}
