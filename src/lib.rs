//! School timetabling as a 0/1 feasibility problem.
//!
//! [`solver::solve`] enumerates every eligible `(class, teacher, room, slot)`
//! candidate, constrains session counts and teacher/room/class exclusivity,
//! hands the model to a [`backend::SearchBackend`] and reads the timetable back.

pub mod backend;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod server;
pub mod solver;

pub use backend::{HighsBackend, SearchBackend};
pub use data::{
    Room, ScheduleResult, ScheduleStatus, ScheduledAssignment, SchedulingInput, SchoolClass,
    Teacher, TimeSlot,
};
pub use error::{InputError, SolveError};
pub use solver::{solve, solve_input};
