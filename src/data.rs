use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::InputError;

// Type aliases for clarity
pub type TeacherId = String;
pub type RoomId = String;
pub type ClassId = String;
pub type TimeSlotId = String;

/// A teacher and the subjects they are qualified to teach.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
}

impl Teacher {
    pub fn new(id: impl Into<String>, name: impl Into<String>, qualifications: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            qualifications: qualifications.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_qualified_for(&self, subject: &str) -> bool {
        self.qualifications.iter().any(|q| q == subject)
    }
}

/// Represents a physical room with a given capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
        }
    }
}

fn default_required_sessions() -> u32 {
    1
}

/// A class that must meet `required_sessions` times, optionally with a pinned teacher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
    pub subject: String,
    #[serde(default = "default_required_sessions")]
    pub required_sessions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<TeacherId>,
}

impl SchoolClass {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        subject: impl Into<String>,
        required_sessions: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: subject.into(),
            required_sessions,
            teacher_id: None,
        }
    }

    /// Pins the class to a single teacher.
    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }

    /// True if `teacher` may teach this class: qualified for the subject and
    /// matching the pinned teacher, if any.
    pub fn accepts(&self, teacher: &Teacher) -> bool {
        if !teacher.is_qualified_for(&self.subject) {
            return false;
        }
        match &self.teacher_id {
            Some(pinned) => *pinned == teacher.id,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub day: String,
    pub period: u32,
}

impl TimeSlot {
    pub fn new(id: impl Into<String>, day: impl Into<String>, period: u32) -> Self {
        Self {
            id: id.into(),
            day: day.into(),
            period,
        }
    }
}

/// The complete input for the scheduling problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchedulingInput {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl SchedulingInput {
    pub fn new(
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
        classes: Vec<SchoolClass>,
        time_slots: Vec<TimeSlot>,
    ) -> Self {
        Self {
            teachers,
            rooms,
            classes,
            time_slots,
        }
    }

    /// Rejects input shapes that would produce a misleading schedule.
    ///
    /// A pinned teacher that does not exist is deliberately accepted: the class
    /// ends up with no candidates and the solve reports INFEASIBLE.
    pub fn validate(&self) -> Result<(), InputError> {
        check_ids("teacher", self.teachers.iter().map(|t| t.id.as_str()))?;
        check_ids("room", self.rooms.iter().map(|r| r.id.as_str()))?;
        check_ids("class", self.classes.iter().map(|c| c.id.as_str()))?;
        check_ids("time slot", self.time_slots.iter().map(|s| s.id.as_str()))?;

        if let Some(room) = self.rooms.iter().find(|r| r.capacity < 1) {
            return Err(InputError::InvalidCapacity {
                room_id: room.id.clone(),
            });
        }
        if let Some(class) = self.classes.iter().find(|c| c.required_sessions < 1) {
            return Err(InputError::InvalidSessionCount {
                class_id: class.id.clone(),
            });
        }
        Ok(())
    }
}

fn check_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), InputError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(InputError::EmptyId { kind });
        }
        if !seen.insert(id) {
            return Err(InputError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Represents a single scheduled session of a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ScheduledAssignment {
    pub class_id: ClassId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub time_slot_id: TimeSlotId,
}

impl fmt::Display for ScheduledAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class {} with teacher {} in room {} at slot {}",
            self.class_id, self.teacher_id, self.room_id, self.time_slot_id
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleStatus {
    /// A schedule was found and proven optimal for the configured objective.
    Optimal,
    /// A schedule was found, optimality not proven.
    Feasible,
    /// No schedule exists.
    Infeasible,
    /// The search budget ran out before either a schedule or a proof was found.
    Unknown,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScheduleStatus::Optimal => "OPTIMAL",
            ScheduleStatus::Feasible => "FEASIBLE",
            ScheduleStatus::Infeasible => "INFEASIBLE",
            ScheduleStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// The final output of the solver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleResult {
    pub status: ScheduleStatus,
    pub schedule: Vec<ScheduledAssignment>,
}

impl ScheduleResult {
    pub fn infeasible() -> Self {
        Self {
            status: ScheduleStatus::Infeasible,
            schedule: Vec::new(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            status: ScheduleStatus::Unknown,
            schedule: Vec::new(),
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(
            self.status,
            ScheduleStatus::Optimal | ScheduleStatus::Feasible
        )
    }
}
