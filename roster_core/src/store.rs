//! In-memory roster store
//!
//! Keeps the reference data (departments, roles, teachers) and the mutable
//! schedule/assignment state behind a single `RwLock`. Guards are never
//! held across await points; every method locks, works, and returns owned
//! data.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use parking_lot::RwLock;

use crate::error::{AppError, Result};
use crate::models::{
    AssignmentView, ClassRole, ClassType, Department, Gender, RoleAssignment, Schedule,
    ScheduleView, Teacher, TeacherStatus, ASSISTANT_ROLE,
};
use crate::validation::{AssignmentRequest, FieldErrors};

/// Input for [`RosterStore::add_schedule`].
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub department_id: u64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub topic: Option<String>,
    pub unit_number: Option<String>,
    pub class_type: ClassType,
    pub hymn_number: Option<u32>,
}

#[derive(Default)]
struct Inner {
    departments: HashMap<u64, Department>,
    roles: HashMap<u64, ClassRole>,
    teachers: HashMap<u64, Teacher>,
    schedules: HashMap<u64, Schedule>,
    assignments: HashMap<u64, RoleAssignment>,
    next_id: u64,
}

impl Inner {
    fn take_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct RosterStore {
    inner: Arc<RwLock<Inner>>,
}

impl RosterStore {
    /// An empty store; tests and custom deployments build it up through
    /// the `add_*` methods.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// A store pre-loaded with a small roster, mirroring the reference
    /// data the original deployment ships with.
    pub fn seeded() -> Self {
        let store = Self::empty();
        store.seed();
        store
    }

    fn seed(&self) {
        let mut inner = self.inner.write();

        for (id, name) in [(1, "Kindergarten"), (2, "Elementary"), (3, "Junior")] {
            inner.departments.insert(
                id,
                Department {
                    id,
                    name: name.to_string(),
                    description: None,
                },
            );
        }

        for (id, name) in [(1, "Teacher"), (2, "Pianist"), (3, ASSISTANT_ROLE)] {
            inner.roles.insert(
                id,
                ClassRole {
                    id,
                    name: name.to_string(),
                    description: None,
                },
            );
        }

        let teachers = [
            (1, "Aiko Tanaka", TeacherStatus::Active, Some(1), Gender::Female),
            (2, "Kenji Sato", TeacherStatus::Active, Some(2), Gender::Male),
            (3, "Mei Lin", TeacherStatus::New, None, Gender::Female),
            (4, "Yuki Chen", TeacherStatus::Active, Some(1), Gender::Female),
        ];
        for (id, name, status, department_id, gender) in teachers {
            inner.teachers.insert(
                id,
                Teacher {
                    id,
                    name: name.to_string(),
                    status,
                    department_id,
                    gender,
                    region: None,
                },
            );
        }

        let schedules = [
            (1, 1, "2025-04-06", "09:00:00", "10:00:00", ClassType::Hymn, Some(12)),
            (2, 1, "2025-04-06", "10:00:00", "11:00:00", ClassType::Worship, None),
            (3, 2, "2025-04-06", "09:00:00", "10:00:00", ClassType::Worship, None),
            (4, 1, "2025-04-13", "09:00:00", "10:00:00", ClassType::Activity, None),
        ];
        for (id, department_id, date, start, end, class_type, hymn_number) in schedules {
            inner.schedules.insert(
                id,
                Schedule {
                    id,
                    department_id,
                    date: date.parse().unwrap_or_default(),
                    start_time: start.parse().unwrap_or_default(),
                    end_time: end.parse().unwrap_or_default(),
                    topic: None,
                    unit_number: None,
                    class_type,
                    hymn_number,
                },
            );
        }

        inner.next_id = 100;
    }

    pub fn add_department(&self, name: &str, description: Option<String>) -> Result<Department> {
        let mut inner = self.inner.write();
        if inner.departments.values().any(|d| d.name == name) {
            return Err(AppError::BadRequest(format!(
                "Department '{}' already exists",
                name
            )));
        }
        let id = inner.take_id();
        let department = Department {
            id,
            name: name.to_string(),
            description,
        };
        inner.departments.insert(id, department.clone());
        Ok(department)
    }

    pub fn add_role(&self, name: &str, description: Option<String>) -> Result<ClassRole> {
        let mut inner = self.inner.write();
        if inner.roles.values().any(|r| r.name == name) {
            return Err(AppError::BadRequest(format!("Role '{}' already exists", name)));
        }
        let id = inner.take_id();
        let role = ClassRole {
            id,
            name: name.to_string(),
            description,
        };
        inner.roles.insert(id, role.clone());
        Ok(role)
    }

    pub fn add_teacher(
        &self,
        name: &str,
        status: TeacherStatus,
        department_id: Option<u64>,
        gender: Gender,
        region: Option<String>,
    ) -> Result<Teacher> {
        let mut inner = self.inner.write();

        if let Some(dept_id) = department_id {
            if !inner.departments.contains_key(&dept_id) {
                return Err(AppError::BadRequest(format!("Unknown department {}", dept_id)));
            }
        }

        let teacher = Teacher {
            id: 0,
            name: name.to_string(),
            status,
            department_id,
            gender,
            region,
        };
        if !teacher.status_allows_department() {
            return Err(AppError::BadRequest(match status {
                TeacherStatus::Active => {
                    "Active teachers must have a department".to_string()
                }
                _ => "Resting teachers must not have a department".to_string(),
            }));
        }

        let id = inner.take_id();
        let teacher = Teacher { id, ..teacher };
        inner.teachers.insert(id, teacher.clone());
        Ok(teacher)
    }

    pub fn add_schedule(&self, new: NewSchedule) -> Result<Schedule> {
        let mut inner = self.inner.write();

        if !inner.departments.contains_key(&new.department_id) {
            return Err(AppError::BadRequest(format!(
                "Unknown department {}",
                new.department_id
            )));
        }
        if new.end_time <= new.start_time {
            return Err(AppError::BadRequest(
                "End time must be later than start time".to_string(),
            ));
        }
        if let Some(number) = new.hymn_number {
            if !(1..=1000).contains(&number) {
                return Err(AppError::BadRequest(
                    "Hymn number must be between 1 and 1000".to_string(),
                ));
            }
        }
        // (date, department, class type) identifies a schedule.
        if inner.schedules.values().any(|s| {
            s.date == new.date
                && s.department_id == new.department_id
                && s.class_type == new.class_type
        }) {
            return Err(AppError::BadRequest(format!(
                "A {} schedule for this department already exists on {}",
                new.class_type.as_str(),
                new.date
            )));
        }

        let id = inner.take_id();
        let schedule = Schedule {
            id,
            department_id: new.department_id,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            topic: new.topic,
            unit_number: new.unit_number,
            class_type: new.class_type,
            hymn_number: new.hymn_number,
        };
        inner.schedules.insert(id, schedule.clone());
        Ok(schedule)
    }

    /// Validates and records a role assignment. Conflicts come back as
    /// per-field validation errors so the form can surface them inline.
    pub fn create_assignment(&self, request: AssignmentRequest) -> Result<RoleAssignment> {
        let mut inner = self.inner.write();
        let mut errors = FieldErrors::new();

        let schedule = inner.schedules.get(&request.schedule_id).cloned();
        if schedule.is_none() {
            errors.add("schedule", "Unknown schedule");
        }
        let role = inner.roles.get(&request.role_id).cloned();
        if role.is_none() {
            errors.add("role", "Unknown role");
        }
        let teacher = inner.teachers.get(&request.teacher_id).cloned();
        if teacher.is_none() {
            errors.add("person", "Unknown teacher");
        }
        let (Some(schedule), Some(role), Some(teacher)) = (schedule, role, teacher) else {
            return Err(AppError::Validation(errors));
        };

        // A non-assistant role can be filled only once per schedule.
        if role.name != ASSISTANT_ROLE {
            let duplicate = inner
                .assignments
                .values()
                .any(|a| a.schedule_id == schedule.id && a.role_id == role.id);
            if duplicate {
                errors.add(
                    "role",
                    format!("Role '{}' is already assigned for this schedule", role.name),
                );
            }
        }

        // A teacher cannot hold two assignments in overlapping slots.
        let conflict = inner
            .assignments
            .values()
            .filter(|a| a.teacher_id == teacher.id)
            .find_map(|a| {
                inner
                    .schedules
                    .get(&a.schedule_id)
                    .filter(|s| s.overlaps(&schedule))
                    .map(|s| (a, s.clone()))
            });
        if let Some((existing, conflicting_schedule)) = conflict {
            let role_name = inner
                .roles
                .get(&existing.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "unknown role".to_string());
            let department = inner
                .departments
                .get(&conflicting_schedule.department_id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "unknown department".to_string());
            errors.add(
                "person",
                format!(
                    "{} is already assigned as '{}' in '{}' from {} to {}",
                    teacher.name,
                    role_name,
                    department,
                    conflicting_schedule.start_time,
                    conflicting_schedule.end_time
                ),
            );
        }

        errors.into_result()?;

        let id = inner.take_id();
        let assignment = RoleAssignment {
            id,
            schedule_id: schedule.id,
            role_id: role.id,
            teacher_id: teacher.id,
        };
        inner.assignments.insert(id, assignment.clone());
        tracing::info!(
            assignment_id = id,
            schedule_id = schedule.id,
            role = %role.name,
            person = %teacher.name,
            "role assignment created"
        );
        Ok(assignment)
    }

    /// All schedules with their assignments, ordered by date then start
    /// time, the order the schedule pages render.
    pub fn list_schedules(&self) -> Vec<ScheduleView> {
        let inner = self.inner.read();

        let mut schedules: Vec<&Schedule> = inner.schedules.values().collect();
        schedules.sort_by_key(|s| (s.date, s.start_time, s.id));

        schedules
            .into_iter()
            .map(|schedule| Self::view_of(&inner, schedule))
            .collect()
    }

    pub fn schedule_view(&self, id: u64) -> Result<ScheduleView> {
        let inner = self.inner.read();
        let schedule = inner
            .schedules
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Schedule with id {} not found", id)))?;
        Ok(Self::view_of(&inner, schedule))
    }

    fn view_of(inner: &Inner, schedule: &Schedule) -> ScheduleView {
        let department = inner
            .departments
            .get(&schedule.department_id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "unknown department".to_string());

        let mut assignments: Vec<AssignmentView> = inner
            .assignments
            .values()
            .filter(|a| a.schedule_id == schedule.id)
            .map(|a| AssignmentView {
                id: a.id,
                role: inner
                    .roles
                    .get(&a.role_id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| "unknown role".to_string()),
                person: inner
                    .teachers
                    .get(&a.teacher_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "unknown teacher".to_string()),
            })
            .collect();
        assignments.sort_by_key(|a| a.id);

        ScheduleView {
            schedule: schedule.clone(),
            department,
            assignments,
        }
    }

    pub fn stats(&self) -> serde_json::Value {
        let inner = self.inner.read();
        serde_json::json!({
            "departments": inner.departments.len(),
            "roles": inner.roles.len(),
            "teachers": inner.teachers.len(),
            "schedules": inner.schedules.len(),
            "assignments": inner.assignments.len(),
        })
    }
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(schedule_id: u64, role_id: u64, teacher_id: u64) -> AssignmentRequest {
        AssignmentRequest {
            schedule_id,
            role_id,
            teacher_id,
        }
    }

    #[test]
    fn assignment_to_unknown_references_reports_each_field() {
        let store = RosterStore::seeded();

        let err = store.create_assignment(request(999, 998, 997)).unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.messages_for("schedule").is_some());
        assert!(errors.messages_for("role").is_some());
        assert!(errors.messages_for("person").is_some());
    }

    #[test]
    fn duplicate_non_assistant_role_is_rejected() {
        let store = RosterStore::seeded();

        store.create_assignment(request(1, 1, 1)).unwrap();
        let err = store.create_assignment(request(1, 1, 3)).unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let messages = errors.messages_for("role").unwrap();
        assert!(messages[0].contains("already assigned"));
    }

    #[test]
    fn multiple_assistants_are_allowed_on_one_schedule() {
        let store = RosterStore::seeded();

        store.create_assignment(request(1, 3, 1)).unwrap();
        store.create_assignment(request(1, 3, 3)).unwrap();

        let view = store.schedule_view(1).unwrap();
        assert_eq!(view.assignments.len(), 2);
    }

    #[test]
    fn teacher_cannot_be_double_booked_across_overlapping_slots() {
        let store = RosterStore::seeded();

        // Schedules 1 and 3 share the 09:00-10:00 slot on the same date.
        store.create_assignment(request(1, 1, 1)).unwrap();
        let err = store.create_assignment(request(3, 1, 1)).unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let messages = errors.messages_for("person").unwrap();
        assert!(messages[0].contains("Aiko Tanaka"));
        assert!(messages[0].contains("already assigned"));
    }

    #[test]
    fn back_to_back_slots_do_not_conflict() {
        let store = RosterStore::seeded();

        // Schedule 2 starts exactly when schedule 1 ends.
        store.create_assignment(request(1, 1, 1)).unwrap();
        store.create_assignment(request(2, 1, 1)).unwrap();
    }

    #[test]
    fn schedules_are_listed_in_date_then_time_order() {
        let store = RosterStore::seeded();

        let views = store.list_schedules();
        let keys: Vec<(NaiveDate, NaiveTime)> = views
            .iter()
            .map(|v| (v.schedule.date, v.schedule.start_time))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn schedule_constraints_are_enforced() {
        let store = RosterStore::seeded();

        let base = NewSchedule {
            department_id: 1,
            date: "2025-05-04".parse().unwrap(),
            start_time: "09:00:00".parse().unwrap(),
            end_time: "10:00:00".parse().unwrap(),
            topic: None,
            unit_number: None,
            class_type: ClassType::Worship,
            hymn_number: None,
        };

        store.add_schedule(base.clone()).unwrap();

        // Same (date, department, class type) is a duplicate.
        assert!(store.add_schedule(base.clone()).is_err());

        let mut inverted = base.clone();
        inverted.date = "2025-05-11".parse().unwrap();
        inverted.end_time = inverted.start_time;
        assert!(store.add_schedule(inverted).is_err());

        let mut out_of_range = base;
        out_of_range.date = "2025-05-18".parse().unwrap();
        out_of_range.hymn_number = Some(1001);
        assert!(store.add_schedule(out_of_range).is_err());
    }

    #[test]
    fn teacher_status_rules_are_enforced_on_insert() {
        let store = RosterStore::seeded();

        assert!(store
            .add_teacher("Rin Takahashi", TeacherStatus::Active, None, Gender::Female, None)
            .is_err());
        assert!(store
            .add_teacher("Rin Takahashi", TeacherStatus::Resting, Some(1), Gender::Female, None)
            .is_err());
        assert!(store
            .add_teacher("Rin Takahashi", TeacherStatus::New, None, Gender::Female, None)
            .is_ok());
    }
}
