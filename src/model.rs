//! Backend-agnostic assignment model.
//!
//! The candidate space is the set of `(class, teacher, room, slot)` quadruples
//! that survive the qualification and pre-assignment filters. Each candidate is
//! a 0/1 decision variable addressed by its index in [`AssignmentModel::candidates`];
//! every constraint is a linear sum over those indices.

use itertools::Itertools;
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::fmt;

use crate::data::{ClassId, SchedulingInput, ScheduledAssignment, TeacherId};

/// One candidate variable, stored as positions into the input collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub class: usize,
    pub teacher: usize,
    pub room: usize,
    pub slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    SessionCount,
    TeacherExclusivity,
    RoomExclusivity,
    ClassExclusivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    AtMost,
}

/// `sum(terms) == bound` or `sum(terms) <= bound` over candidate indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub terms: Vec<usize>,
    pub comparison: Comparison,
    pub bound: u32,
}

impl LinearConstraint {
    /// Evaluates the constraint; indices past the end of `values` count as 0.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        let total = self
            .terms
            .iter()
            .filter(|&&i| values.get(i).copied().unwrap_or(false))
            .count() as u64;
        let bound = u64::from(self.bound);
        match self.comparison {
            Comparison::Equal => total == bound,
            Comparison::AtMost => total <= bound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnschedulableReason {
    NoQualifiedTeacher,
    UnknownPinnedTeacher(TeacherId),
    PinnedTeacherNotQualified(TeacherId),
    NoRooms,
    NoTimeSlots,
}

impl fmt::Display for UnschedulableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnschedulableReason::NoQualifiedTeacher => write!(f, "no teacher is qualified"),
            UnschedulableReason::UnknownPinnedTeacher(id) => {
                write!(f, "pinned teacher '{id}' does not exist")
            }
            UnschedulableReason::PinnedTeacherNotQualified(id) => {
                write!(f, "pinned teacher '{id}' is not qualified for the subject")
            }
            UnschedulableReason::NoRooms => write!(f, "there are no rooms"),
            UnschedulableReason::NoTimeSlots => write!(f, "there are no time slots"),
        }
    }
}

/// A class that has no candidates at all. Its session-count constraint could
/// never hold, so the model is infeasible before any search happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unschedulable {
    pub class_id: ClassId,
    pub reason: UnschedulableReason,
}

#[derive(Debug)]
pub struct AssignmentModel<'a> {
    input: &'a SchedulingInput,
    candidates: Vec<Candidate>,
    constraints: Vec<LinearConstraint>,
    unschedulable: Vec<Unschedulable>,
}

impl<'a> AssignmentModel<'a> {
    /// Builds the candidate space and assembles all four constraint families.
    pub fn build(input: &'a SchedulingInput) -> Self {
        info!(
            "Setting up assignment model with {} classes, {} teachers, {} rooms, and {} slots...",
            input.classes.len(),
            input.teachers.len(),
            input.rooms.len(),
            input.time_slots.len()
        );
        let candidates = enumerate_candidates(input);
        let mut model = Self {
            input,
            candidates,
            constraints: Vec::new(),
            unschedulable: Vec::new(),
        };
        model.add_session_count_constraints();
        model.add_exclusivity_constraints();
        debug!(
            "Assembled {} constraints over {} candidates.",
            model.constraints.len(),
            model.candidates.len()
        );
        model
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn unschedulable(&self) -> &[Unschedulable] {
        &self.unschedulable
    }

    /// True if some class has no candidates, so no search can succeed.
    pub fn is_infeasible_by_construction(&self) -> bool {
        !self.unschedulable.is_empty()
    }

    /// Materializes the assignment for candidate `index`.
    pub fn assignment(&self, index: usize) -> ScheduledAssignment {
        let c = self.candidates[index];
        ScheduledAssignment {
            class_id: self.input.classes[c.class].id.clone(),
            teacher_id: self.input.teachers[c.teacher].id.clone(),
            room_id: self.input.rooms[c.room].id.clone(),
            time_slot_id: self.input.time_slots[c.slot].id.clone(),
        }
    }

    fn add_session_count_constraints(&mut self) {
        info!("Adding 'session count' constraints...");
        let by_class: HashMap<usize, Vec<usize>> = self
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.class, i))
            .into_group_map();

        let input = self.input;
        for (class_index, class) in input.classes.iter().enumerate() {
            match by_class.get(&class_index) {
                Some(terms) => self.constraints.push(LinearConstraint {
                    family: ConstraintFamily::SessionCount,
                    terms: terms.clone(),
                    comparison: Comparison::Equal,
                    bound: class.required_sessions,
                }),
                None if class.required_sessions > 0 => {
                    let reason = self.unschedulable_reason(class_index);
                    warn!("Class {} cannot be scheduled: {}", class.id, reason);
                    self.unschedulable.push(Unschedulable {
                        class_id: class.id.clone(),
                        reason,
                    });
                }
                None => {}
            }
        }
    }

    fn add_exclusivity_constraints(&mut self) {
        info!("Adding 'no teacher overlap' constraints...");
        let by_teacher_slot = self.group_by(|c| (c.teacher, c.slot));
        for t in 0..self.input.teachers.len() {
            for s in 0..self.input.time_slots.len() {
                self.push_at_most_one(
                    ConstraintFamily::TeacherExclusivity,
                    by_teacher_slot.get(&(t, s)),
                );
            }
        }

        info!("Adding 'no room overlap' constraints...");
        let by_room_slot = self.group_by(|c| (c.room, c.slot));
        for r in 0..self.input.rooms.len() {
            for s in 0..self.input.time_slots.len() {
                self.push_at_most_one(
                    ConstraintFamily::RoomExclusivity,
                    by_room_slot.get(&(r, s)),
                );
            }
        }

        info!("Adding 'no class overlap' constraints...");
        let by_class_slot = self.group_by(|c| (c.class, c.slot));
        for c in 0..self.input.classes.len() {
            for s in 0..self.input.time_slots.len() {
                self.push_at_most_one(
                    ConstraintFamily::ClassExclusivity,
                    by_class_slot.get(&(c, s)),
                );
            }
        }
    }

    fn group_by(
        &self,
        key: impl Fn(&Candidate) -> (usize, usize),
    ) -> HashMap<(usize, usize), Vec<usize>> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (key(c), i))
            .into_group_map()
    }

    // a single 0/1 term can never exceed 1
    fn push_at_most_one(&mut self, family: ConstraintFamily, terms: Option<&Vec<usize>>) {
        if let Some(terms) = terms.filter(|t| t.len() > 1) {
            self.constraints.push(LinearConstraint {
                family,
                terms: terms.clone(),
                comparison: Comparison::AtMost,
                bound: 1,
            });
        }
    }

    fn unschedulable_reason(&self, class_index: usize) -> UnschedulableReason {
        let input = self.input;
        let class = &input.classes[class_index];
        if let Some(pinned) = &class.teacher_id {
            return match input.teachers.iter().find(|t| t.id == *pinned) {
                None => UnschedulableReason::UnknownPinnedTeacher(pinned.clone()),
                Some(_) if !input.teachers.iter().any(|t| class.accepts(t)) => {
                    UnschedulableReason::PinnedTeacherNotQualified(pinned.clone())
                }
                Some(_) => self.empty_dimension_reason(),
            };
        }
        if !input.teachers.iter().any(|t| class.accepts(t)) {
            return UnschedulableReason::NoQualifiedTeacher;
        }
        self.empty_dimension_reason()
    }

    fn empty_dimension_reason(&self) -> UnschedulableReason {
        if self.input.rooms.is_empty() {
            UnschedulableReason::NoRooms
        } else {
            UnschedulableReason::NoTimeSlots
        }
    }
}

// class -> teacher -> room -> slot; this order is also the output order
fn enumerate_candidates(input: &SchedulingInput) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (ci, class) in input.classes.iter().enumerate() {
        for (ti, teacher) in input.teachers.iter().enumerate() {
            if !class.accepts(teacher) {
                continue;
            }
            for ri in 0..input.rooms.len() {
                for si in 0..input.time_slots.len() {
                    candidates.push(Candidate {
                        class: ci,
                        teacher: ti,
                        room: ri,
                        slot: si,
                    });
                }
            }
        }
    }
    trace!(
        "Generated {} candidate variables out of a theoretical maximum of {}.",
        candidates.len(),
        input.classes.len() * input.teachers.len() * input.rooms.len() * input.time_slots.len()
    );
    candidates
}
