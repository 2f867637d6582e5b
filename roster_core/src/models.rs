//! Domain and wire models for the roster service

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Role name exempt from the one-role-per-schedule rule: a class may have
/// several assistants, but only one of every other role.
pub const ASSISTANT_ROLE: &str = "Assistant";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRole {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherStatus {
    /// Currently serving; must belong to a department.
    Active,
    /// On a break; must not hold a department.
    Resting,
    /// Newly joined; department may be left open until placement.
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: u64,
    pub name: String,
    pub status: TeacherStatus,
    pub department_id: Option<u64>,
    pub gender: Gender,
    pub region: Option<String>,
}

impl Teacher {
    /// Status rules carried by the roster: active teachers are placed,
    /// resting teachers are not, new teachers may be either.
    pub fn status_allows_department(&self) -> bool {
        match self.status {
            TeacherStatus::Active => self.department_id.is_some(),
            TeacherStatus::Resting => self.department_id.is_none(),
            TeacherStatus::New => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    Worship,
    Hymn,
    Activity,
    Pianica,
}

impl ClassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Worship => "worship",
            ClassType::Hymn => "hymn",
            ClassType::Activity => "activity",
            ClassType::Pianica => "pianica",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u64,
    pub department_id: u64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub topic: Option<String>,
    pub unit_number: Option<String>,
    pub class_type: ClassType,
    pub hymn_number: Option<u32>,
}

impl Schedule {
    /// Two schedules overlap when they fall on the same date and their
    /// time slots intersect.
    pub fn overlaps(&self, other: &Schedule) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: u64,
    pub schedule_id: u64,
    pub role_id: u64,
    pub teacher_id: u64,
}

/// A schedule joined with its department and assignments, as returned by
/// the read endpoints backing the schedule pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleView {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub department: String,
    pub assignments: Vec<AssignmentView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    pub id: u64,
    pub role: String,
    pub person: String,
}

/// Body of a successful form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

impl SubmitResponse {
    pub fn saved(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
