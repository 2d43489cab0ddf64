use log::{info, trace, warn};
use std::time::Instant;

use crate::backend::{BackendOutcome, BackendStatus, SearchBackend};
use crate::data::{
    Room, ScheduleResult, ScheduleStatus, ScheduledAssignment, SchedulingInput, SchoolClass,
    Teacher, TimeSlot,
};
use crate::error::SolveError;
use crate::model::AssignmentModel;

/// Convenience wrapper taking the four collections separately.
pub fn solve(
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    classes: Vec<SchoolClass>,
    time_slots: Vec<TimeSlot>,
    backend: &impl SearchBackend,
) -> Result<ScheduleResult, SolveError> {
    let input = SchedulingInput::new(teachers, rooms, classes, time_slots);
    solve_input(&input, backend)
}

/// Builds the assignment model for `input`, runs `backend` on it and turns the
/// outcome into a timetable.
///
/// Nothing is shared between calls: each one owns its model, and the backend is
/// expected to create a fresh solver instance per search.
pub fn solve_input(
    input: &SchedulingInput,
    backend: &impl SearchBackend,
) -> Result<ScheduleResult, SolveError> {
    let start_time = Instant::now();
    input.validate()?;

    if input.classes.is_empty() {
        info!("No classes to schedule.");
        return Ok(ScheduleResult {
            status: ScheduleStatus::Optimal,
            schedule: Vec::new(),
        });
    }

    let model = AssignmentModel::build(input);
    if model.is_infeasible_by_construction() {
        warn!(
            "{} class(es) have no eligible teacher, room and slot; skipping search.",
            model.unschedulable().len()
        );
        return Ok(ScheduleResult::infeasible());
    }

    let outcome = backend.search(&model)?;
    let result = extract(&model, outcome)?;
    info!(
        "Solve finished with {} and {} assignments in {:.2?}",
        result.status,
        result.schedule.len(),
        start_time.elapsed()
    );
    Ok(result)
}

/// Turns a backend outcome into a [`ScheduleResult`], keeping candidate
/// enumeration order. Unsolved outcomes never carry assignments.
pub fn extract(
    model: &AssignmentModel<'_>,
    outcome: BackendOutcome,
) -> Result<ScheduleResult, SolveError> {
    let status = match outcome.status {
        BackendStatus::Optimal => ScheduleStatus::Optimal,
        BackendStatus::Feasible => ScheduleStatus::Feasible,
        BackendStatus::Infeasible => return Ok(ScheduleResult::infeasible()),
        BackendStatus::Unknown => return Ok(ScheduleResult::unknown()),
    };
    if outcome.values.len() != model.candidates().len() {
        return Err(SolveError::Backend(format!(
            "expected {} variable values, got {}",
            model.candidates().len(),
            outcome.values.len()
        )));
    }

    let schedule: Vec<ScheduledAssignment> = outcome
        .values
        .iter()
        .enumerate()
        .filter(|(_, scheduled)| **scheduled)
        .map(|(i, _)| model.assignment(i))
        .collect();
    for assignment in &schedule {
        trace!("Scheduled {}", assignment);
    }
    Ok(ScheduleResult { status, schedule })
}
