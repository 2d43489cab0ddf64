use itertools::Itertools;
use test_log::test;
use timetable_solver::config::SolverConfig;
use timetable_solver::{
    HighsBackend, Room, ScheduleResult, ScheduleStatus, SchedulingInput, SchoolClass, Teacher,
    TimeSlot, solve, solve_input,
};

fn backend() -> HighsBackend {
    HighsBackend::new(SolverConfig::default())
}

fn slots(n: u32) -> Vec<TimeSlot> {
    (1..=n)
        .map(|p| TimeSlot::new(format!("s{p}"), "Mon", p))
        .collect()
}

/// Checks every hard property a solved timetable must have.
fn assert_valid(input: &SchedulingInput, result: &ScheduleResult) {
    assert!(result.is_solved(), "expected a schedule, got {}", result.status);
    let schedule = &result.schedule;

    assert!(schedule.iter().map(|a| (&a.teacher_id, &a.time_slot_id)).all_unique());
    assert!(schedule.iter().map(|a| (&a.room_id, &a.time_slot_id)).all_unique());
    assert!(schedule.iter().map(|a| (&a.class_id, &a.time_slot_id)).all_unique());

    let per_class = schedule.iter().counts_by(|a| a.class_id.clone());
    for class in &input.classes {
        assert_eq!(
            per_class.get(&class.id).copied().unwrap_or(0),
            class.required_sessions as usize,
            "session count for {}",
            class.id
        );
    }

    for a in schedule {
        let class = input.classes.iter().find(|c| c.id == a.class_id).unwrap();
        let teacher = input.teachers.iter().find(|t| t.id == a.teacher_id).unwrap();
        assert!(teacher.is_qualified_for(&class.subject));
        if let Some(pinned) = &class.teacher_id {
            assert_eq!(&a.teacher_id, pinned);
        }
        assert!(input.rooms.iter().any(|r| r.id == a.room_id));
        assert!(input.time_slots.iter().any(|s| s.id == a.time_slot_id));
    }
}

#[test]
fn two_subjects_one_room() {
    let input = SchedulingInput::new(
        vec![
            Teacher::new("t1", "Mr. Smith", &["Math"]),
            Teacher::new("t2", "Ms. Jones", &["Science"]),
        ],
        vec![Room::new("r1", "Room 101", 30)],
        vec![
            SchoolClass::new("c1", "Math 101", "Math", 2),
            SchoolClass::new("c2", "Science 101", "Science", 2),
        ],
        slots(5),
    );
    let result = solve_input(&input, &backend()).unwrap();

    assert_eq!(result.status, ScheduleStatus::Optimal);
    assert_eq!(result.schedule.len(), 4);
    assert_valid(&input, &result);
}

#[test]
fn unqualified_teacher_is_infeasible() {
    let result = solve(
        vec![Teacher::new("t1", "Ms. Jones", &["Science"])],
        vec![Room::new("r1", "Room 101", 30)],
        vec![SchoolClass::new("c1", "Math 101", "Math", 1)],
        slots(5),
        &backend(),
    )
    .unwrap();
    assert_eq!(result, ScheduleResult::infeasible());
}

#[test]
fn more_sessions_than_slots_is_infeasible() {
    let result = solve(
        vec![Teacher::new("t1", "Mr. Smith", &["Math"])],
        vec![Room::new("r1", "Room 101", 30)],
        vec![SchoolClass::new("c1", "Math 101", "Math", 6)],
        slots(5),
        &backend(),
    )
    .unwrap();
    assert_eq!(result.status, ScheduleStatus::Infeasible);
    assert!(result.schedule.is_empty());
}

#[test]
fn no_classes_is_optimal_and_empty() {
    let result = solve(
        vec![Teacher::new("t1", "Mr. Smith", &["Math"])],
        vec![Room::new("r1", "Room 101", 30)],
        vec![],
        slots(5),
        &backend(),
    )
    .unwrap();
    assert_eq!(result.status, ScheduleStatus::Optimal);
    assert!(result.schedule.is_empty());
}

#[test]
fn empty_rooms_with_classes_is_infeasible() {
    let result = solve(
        vec![Teacher::new("t1", "Mr. Smith", &["Math"])],
        vec![],
        vec![SchoolClass::new("c1", "Math 101", "Math", 1)],
        slots(5),
        &backend(),
    )
    .unwrap();
    assert_eq!(result, ScheduleResult::infeasible());
}

#[test]
fn pinned_teacher_is_respected() {
    let input = SchedulingInput::new(
        vec![
            Teacher::new("t1", "Mr. Smith", &["Math"]),
            Teacher::new("t2", "Mrs. Brown", &["Math", "Physics"]),
        ],
        vec![Room::new("r1", "Room 101", 30), Room::new("r2", "Lab", 20)],
        vec![
            SchoolClass::new("c1", "Algebra", "Math", 3).with_teacher("t2"),
            SchoolClass::new("c2", "Geometry", "Math", 2),
            SchoolClass::new("c3", "Physics", "Physics", 1),
        ],
        slots(4),
    );
    let result = solve_input(&input, &backend()).unwrap();
    assert_valid(&input, &result);
    assert_eq!(result.schedule.len(), 6);
}

#[test]
fn unknown_pinned_teacher_is_infeasible() {
    let result = solve(
        vec![Teacher::new("t1", "Mr. Smith", &["Math"])],
        vec![Room::new("r1", "Room 101", 30)],
        vec![SchoolClass::new("c1", "Math 101", "Math", 1).with_teacher("t9")],
        slots(5),
        &backend(),
    )
    .unwrap();
    assert_eq!(result, ScheduleResult::infeasible());
}

#[test]
fn shared_teacher_exclusivity_makes_tight_week_infeasible() {
    // one teacher, two classes of three sessions, five slots
    let result = solve(
        vec![Teacher::new("t1", "Mr. Smith", &["Math"])],
        vec![Room::new("r1", "A", 30), Room::new("r2", "B", 30)],
        vec![
            SchoolClass::new("c1", "Math A", "Math", 3),
            SchoolClass::new("c2", "Math B", "Math", 3),
        ],
        slots(5),
        &backend(),
    )
    .unwrap();
    assert_eq!(result.status, ScheduleStatus::Infeasible);
    assert!(result.schedule.is_empty());
}

#[test]
fn busy_week_fills_every_room_slot() {
    let input = SchedulingInput::new(
        vec![
            Teacher::new("t1", "Smith", &["Math", "Physics"]),
            Teacher::new("t2", "Jones", &["Science", "Biology"]),
            Teacher::new("t3", "Brown", &["Math", "Biology"]),
        ],
        vec![Room::new("r1", "101", 30), Room::new("r2", "102", 25)],
        vec![
            SchoolClass::new("c1", "Math", "Math", 3),
            SchoolClass::new("c2", "Physics", "Physics", 2),
            SchoolClass::new("c3", "Science", "Science", 2),
            SchoolClass::new("c4", "Biology", "Biology", 3),
        ],
        slots(5),
    );
    let result = solve_input(&input, &backend()).unwrap();
    assert_valid(&input, &result);
    assert_eq!(result.schedule.len(), 10);
}

#[test]
fn repeated_solves_agree_on_outcome() {
    let input = SchedulingInput::new(
        vec![Teacher::new("t1", "Smith", &["Math"])],
        vec![Room::new("r1", "101", 30)],
        vec![SchoolClass::new("c1", "Math", "Math", 2)],
        slots(3),
    );
    let first = solve_input(&input, &backend()).unwrap();
    let second = solve_input(&input, &backend()).unwrap();
    assert_eq!(first.status, second.status);
    assert_eq!(first, second);
}

#[test]
fn concurrent_solves_are_independent() {
    let handles: Vec<_> = (1..=4u32)
        .map(|sessions| {
            std::thread::spawn(move || {
                let input = SchedulingInput::new(
                    vec![Teacher::new("t1", "Smith", &["Math"])],
                    vec![Room::new("r1", "101", 30)],
                    vec![SchoolClass::new("c1", "Math", "Math", sessions)],
                    slots(3),
                );
                (sessions, solve_input(&input, &backend()).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (sessions, result) = handle.join().unwrap();
        if sessions <= 3 {
            assert_eq!(result.schedule.len(), sessions as usize);
        } else {
            assert_eq!(result, ScheduleResult::infeasible());
        }
    }
}

#[test]
fn json_round_trip_through_solver() {
    let input: SchedulingInput = serde_json::from_str(
        r#"{
            "teachers": [
                {"id": "t1", "name": "Mr. Smith", "qualifications": ["Math"]},
                {"id": "t2", "name": "Ms. Jones", "qualifications": ["Science"]}
            ],
            "rooms": [{"id": "r1", "name": "Room 101", "capacity": 30}],
            "classes": [
                {"id": "c1", "name": "Math 101", "subject": "Math"},
                {"id": "c2", "name": "Science 101", "subject": "Science", "teacher_id": "t2"}
            ],
            "time_slots": [
                {"id": "s1", "day": "Mon", "period": 1},
                {"id": "s2", "day": "Mon", "period": 2}
            ]
        }"#,
    )
    .unwrap();
    let result = solve_input(&input, &backend()).unwrap();
    assert_valid(&input, &result);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "OPTIMAL");
    assert_eq!(json["schedule"].as_array().unwrap().len(), 2);
}
