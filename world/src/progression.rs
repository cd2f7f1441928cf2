//! Progression engine: quest, item and course mutators.
//!
//! Every mutator re-validates its preconditions. A violated precondition is a
//! silent no-op that only leaves a `debug` trace behind.

use campus_quest_core::{
    DepartmentId, DepartmentSelection, Event, FlagId, QuestId, SchoolId, SequenceRejection,
};
use tracing::debug;

use crate::World;

/// Experience granted for every completed course.
const COURSE_EXPERIENCE: u32 = 5;

/// Experience granted once every quest is complete.
const VICTORY_BONUS: u32 = 100;

pub(crate) fn grant_experience(world: &mut World, amount: u32, out_events: &mut Vec<Event>) {
    if amount == 0 {
        debug!("zero experience grant ignored");
        return;
    }
    world.experience = world.experience.saturating_add(amount);
    out_events.push(Event::ExperienceGranted {
        amount,
        total: world.experience,
    });
}

pub(crate) fn grant_item(world: &mut World, name: String, out_events: &mut Vec<Event>) {
    if world.inventory.contains(&name) {
        debug!(item = %name, "item already in inventory");
        return;
    }
    let _ = world.inventory.insert(name.clone());
    out_events.push(Event::ItemGranted { name });
}

pub(crate) fn set_energy(world: &mut World, value: i32, out_events: &mut Vec<Event>) {
    let clamped = u8::try_from(value.clamp(0, 100)).unwrap_or(100);
    if clamped != world.energy {
        world.energy = clamped;
        out_events.push(Event::EnergyChanged { energy: clamped });
    }
}

pub(crate) fn raise_flag(world: &mut World, flag: FlagId, out_events: &mut Vec<Event>) {
    if world.flags.insert(flag) {
        out_events.push(Event::FlagRaised { flag });
    } else {
        debug!(?flag, "flag already raised");
    }
}

pub(crate) fn record_book_read(world: &mut World, out_events: &mut Vec<Event>) {
    world.meta.books_read = world.meta.books_read.saturating_add(1);
    out_events.push(Event::BookRead {
        total: world.meta.books_read,
    });
}

pub(crate) fn complete_quest(world: &mut World, quest: QuestId, out_events: &mut Vec<Event>) {
    if !world.quests.insert(quest) {
        debug!(?quest, "quest already complete");
        return;
    }
    out_events.push(Event::QuestCompleted { quest });

    if quest == QuestId::ProgramOrientation && selected_program_is_empty(world) {
        complete_quest(world, QuestId::CompleteProgramCourses, out_events);
    }

    check_victory(world, out_events);
}

fn selected_program_is_empty(world: &World) -> bool {
    world
        .meta
        .school
        .as_ref()
        .and_then(|id| world.campus.catalog().school(id))
        .is_some_and(|school| school.program().is_empty())
}

pub(crate) fn select_school(world: &mut World, school: SchoolId, out_events: &mut Vec<Event>) {
    let Some(name) = world
        .campus
        .catalog()
        .school(&school)
        .map(|entry| entry.name().to_owned())
    else {
        debug!(%school, "unknown school");
        return;
    };
    if world.meta.school.as_ref() == Some(&school) {
        debug!(%school, "school already selected");
        return;
    }

    world.meta.school = Some(school.clone());
    world.meta.department = None;
    world.meta.program.clear();
    world.meta.departments.clear();
    for quest in QuestId::SCHOOL_DEPENDENT {
        let _ = world.quests.remove(&quest);
    }
    out_events.push(Event::SchoolSelected { school });

    complete_quest(world, QuestId::ChooseSchool, out_events);
    grant_item(world, format!("School: {name}"), out_events);
}

pub(crate) fn complete_program_course(
    world: &mut World,
    school: &SchoolId,
    index: usize,
    out_events: &mut Vec<Event>,
) {
    if world.meta.school.as_ref() != Some(school) {
        debug!(%school, index, "program course for a school that is not selected");
        return;
    }
    if !world.quests.contains(&QuestId::ProgramOrientation) {
        debug!(%school, index, "program course before orientation");
        return;
    }
    let Some(len) = world
        .campus
        .catalog()
        .school(school)
        .map(|entry| entry.program().len())
    else {
        return;
    };

    match world.meta.program.record(school, index, len) {
        Ok(advance) => {
            out_events.push(Event::ProgramCourseCompleted {
                school: school.clone(),
                index,
            });
            grant_experience(world, COURSE_EXPERIENCE, out_events);
            if advance.finished {
                complete_quest(world, QuestId::CompleteProgramCourses, out_events);
            }
        }
        Err(rejection) => trace_rejection("program course", index, rejection),
    }
}

pub(crate) fn select_department(
    world: &mut World,
    school: SchoolId,
    department: DepartmentId,
    out_events: &mut Vec<Event>,
) {
    if world.meta.school.as_ref() != Some(&school) {
        debug!(%school, %department, "department for a school that is not selected");
        return;
    }
    if !(world.quests.contains(&QuestId::ProgramOrientation)
        && world.quests.contains(&QuestId::CompleteProgramCourses))
    {
        debug!(%school, %department, "department before program core");
        return;
    }
    if world.meta.department.is_some() {
        debug!(%school, %department, "department already selected");
        return;
    }
    let Some(name) = world
        .campus
        .catalog()
        .school(&school)
        .and_then(|entry| entry.department(&department))
        .map(|entry| entry.name().to_owned())
    else {
        debug!(%school, %department, "unknown department");
        return;
    };

    world.meta.department = Some(DepartmentSelection {
        id: department.clone(),
        school: school.clone(),
    });
    out_events.push(Event::DepartmentSelected { school, department });

    complete_quest(world, QuestId::ChooseDepartment, out_events);
    grant_item(world, format!("Department: {name}"), out_events);
}

pub(crate) fn complete_department_course(
    world: &mut World,
    school: SchoolId,
    department: DepartmentId,
    index: usize,
    out_events: &mut Vec<Event>,
) {
    let selected = world
        .meta
        .department
        .as_ref()
        .is_some_and(|selection| selection.school == school && selection.id == department);
    if !selected {
        debug!(%school, %department, index, "course for a department that is not selected");
        return;
    }
    let Some(len) = world
        .campus
        .catalog()
        .school(&school)
        .and_then(|entry| entry.department(&department))
        .map(|entry| entry.courses().len())
    else {
        return;
    };

    let track = (school, department);
    match world.meta.departments.record(&track, index, len) {
        Ok(advance) => {
            let (school, department) = track;
            out_events.push(Event::DepartmentCourseCompleted {
                school,
                department,
                index,
            });
            grant_experience(world, COURSE_EXPERIENCE, out_events);
            if advance.finished {
                complete_quest(world, QuestId::CompleteDepartmentCourses, out_events);
            }
        }
        Err(rejection) => trace_rejection("department course", index, rejection),
    }
}

pub(crate) fn check_victory(world: &mut World, out_events: &mut Vec<Event>) {
    if world.victory_awarded {
        return;
    }
    if !QuestId::ALL.iter().all(|quest| world.quests.contains(quest)) {
        return;
    }
    world.victory_awarded = true;
    grant_experience(world, VICTORY_BONUS, out_events);
    out_events.push(Event::VictoryAwarded {
        bonus: VICTORY_BONUS,
    });
}

fn trace_rejection(kind: &'static str, index: usize, rejection: SequenceRejection) {
    match rejection {
        SequenceRejection::AlreadyComplete => debug!(kind, index, "course already complete"),
        SequenceRejection::Locked { next } => debug!(kind, index, next, "course still locked"),
        SequenceRejection::OutOfRange { len } => debug!(kind, index, len, "course out of range"),
    }
}
