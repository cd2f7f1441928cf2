use campus_quest_core::{Command, FlagId, LocationId, QuestId};
use campus_quest_world::query::ProgressionView;

use crate::{once, Panel, PanelPresenter};

/// Classroom: school, orientation, first class, program core, department and
/// department courses, in that order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassroomPresenter;

impl PanelPresenter for ClassroomPresenter {
    fn location(&self) -> LocationId {
        LocationId::Classroom
    }

    fn populate(&self, progression: ProgressionView<'_>, panel: &mut Panel) {
        choose_school(progression, panel);
        orientation(progression, panel);
        first_class(progression, panel);
        program_core(progression, panel);
        choose_department(progression, panel);
        department_courses(progression, panel);
    }
}

fn choose_school(progression: ProgressionView<'_>, panel: &mut Panel) {
    panel.heading("Choose School");
    let current = progression.school_id();
    for school in progression.catalog().schools() {
        let selected = current == Some(school.id());
        let label = if selected {
            format!("{}: Selected (Current)", school.name())
        } else {
            format!("{}: Select", school.name())
        };
        panel.action(
            label,
            !selected,
            vec![Command::SelectSchool {
                school: school.id().clone(),
            }],
        );
    }
}

fn orientation(progression: ProgressionView<'_>, panel: &mut Panel) {
    panel.heading("Program Orientation");
    let oriented = progression.quest_complete(QuestId::ProgramOrientation);
    panel.action(
        once(oriented, "Orientation Completed", "Attend Orientation (+10 XP)"),
        !oriented && progression.school().is_some(),
        vec![
            Command::CompleteQuest {
                quest: QuestId::ProgramOrientation,
            },
            Command::GrantExperience { amount: 10 },
        ],
    );
}

fn first_class(progression: ProgressionView<'_>, panel: &mut Panel) {
    panel.heading("First Class");
    let attended = progression.flag_raised(FlagId::FirstClassBadge);
    panel.action(
        once(attended, "First Class Completed", "Attend First Class (+10 XP)"),
        !attended && progression.quest_complete(QuestId::ProgramOrientation),
        vec![
            Command::RaiseFlag {
                flag: FlagId::FirstClassBadge,
            },
            Command::GrantItem {
                name: "First Class Badge".to_owned(),
            },
            Command::GrantExperience { amount: 10 },
            Command::CompleteQuest {
                quest: QuestId::FirstClass,
            },
        ],
    );
}

fn program_core(progression: ProgressionView<'_>, panel: &mut Panel) {
    let Some(school) = progression.school() else {
        return;
    };
    if !progression.quest_complete(QuestId::ProgramOrientation) {
        return;
    }

    panel.heading("Program Core Courses");
    let courses = school.program();
    let done = (0..courses.len())
        .filter(|index| progression.program_course_complete(school.id(), *index))
        .count();
    panel.text(format!("Progress: {done} / {}", courses.len()));

    let next = progression.program_next_unlocked();
    for (index, title) in courses.iter().enumerate() {
        let complete = progression.program_course_complete(school.id(), index);
        course_action(
            panel,
            title,
            complete,
            next == Some(index),
            Command::CompleteProgramCourse {
                school: school.id().clone(),
                index,
            },
        );
    }
}

fn choose_department(progression: ProgressionView<'_>, panel: &mut Panel) {
    panel.heading("Choose Department");
    let Some(school) = progression.school() else {
        panel.text("Choose a school first.");
        return;
    };

    let unlocked = progression.quest_complete(QuestId::ProgramOrientation)
        && progression.quest_complete(QuestId::CompleteProgramCourses);
    let current = progression.department().map(|department| department.id());
    for department in school.departments() {
        let selected = current == Some(department.id());
        let label = if selected {
            format!("{}: Selected (Current)", department.name())
        } else {
            format!("{}: Select", department.name())
        };
        panel.action(
            label,
            unlocked && current.is_none(),
            vec![Command::SelectDepartment {
                school: school.id().clone(),
                department: department.id().clone(),
            }],
        );
    }
}

fn department_courses(progression: ProgressionView<'_>, panel: &mut Panel) {
    let (Some(school), Some(department)) = (progression.school(), progression.department())
    else {
        return;
    };

    panel.heading("Department Courses");
    let courses = department.courses();
    panel.text(format!(
        "Progress: {} / {}",
        progression.department_completed_count(),
        courses.len()
    ));

    let next = progression.department_next_unlocked();
    for (index, title) in courses.iter().enumerate() {
        let complete = progression.department_course_complete(school.id(), department.id(), index);
        course_action(
            panel,
            title,
            complete,
            next == Some(index),
            Command::CompleteDepartmentCourse {
                school: school.id().clone(),
                department: department.id().clone(),
                index,
            },
        );
    }
}

fn course_action(panel: &mut Panel, title: &str, complete: bool, unlocked: bool, command: Command) {
    let status = if complete {
        "Completed"
    } else if unlocked {
        "Complete (+5 XP)"
    } else {
        "Locked"
    };
    panel.action(
        format!("{title}: {status}"),
        !complete && unlocked,
        vec![command],
    );
}
