use campus_quest_core::{Command, FlagId, LocationId, QuestId};
use campus_quest_world::query::ProgressionView;

use crate::{once, Panel, PanelPresenter};

/// Administration office: student id card and timetable.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdminPresenter;

impl PanelPresenter for AdminPresenter {
    fn location(&self) -> LocationId {
        LocationId::Admin
    }

    fn populate(&self, progression: ProgressionView<'_>, panel: &mut Panel) {
        panel.heading("Student Services");
        let has_id = progression.flag_raised(FlagId::StudentId);
        panel.action(
            once(has_id, "Student ID Collected", "Get Student ID (+15 XP)"),
            !has_id,
            vec![
                Command::RaiseFlag {
                    flag: FlagId::StudentId,
                },
                Command::GrantItem {
                    name: "Student ID Card".to_owned(),
                },
                Command::GrantExperience { amount: 15 },
                Command::CompleteQuest {
                    quest: QuestId::StudentId,
                },
            ],
        );

        panel.heading("Timetable");
        let has_timetable = progression.flag_raised(FlagId::Timetable);
        panel.action(
            once(has_timetable, "Timetable Collected", "Collect Timetable"),
            !has_timetable,
            vec![
                Command::RaiseFlag {
                    flag: FlagId::Timetable,
                },
                Command::GrantItem {
                    name: "Timetable".to_owned(),
                },
                Command::CompleteQuest {
                    quest: QuestId::Timetable,
                },
            ],
        );
    }
}
