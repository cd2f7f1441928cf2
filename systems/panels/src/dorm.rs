use campus_quest_core::{Command, FlagId, LocationId};
use campus_quest_world::query::ProgressionView;

use crate::{once, Panel, PanelPresenter};

/// Dormitory: rest, a one-time study session and the dorm key.
#[derive(Clone, Copy, Debug, Default)]
pub struct DormPresenter;

impl PanelPresenter for DormPresenter {
    fn location(&self) -> LocationId {
        LocationId::Dorm
    }

    fn populate(&self, progression: ProgressionView<'_>, panel: &mut Panel) {
        panel.heading("Your Room");
        panel.text("Rest and study here.");
        panel.action(
            "Sleep (Energy 100)",
            true,
            vec![Command::SetEnergy { value: 100 }],
        );
        let studied = progression.flag_raised(FlagId::DormStudyDone);
        panel.action(
            once(studied, "Study Done", "Study at Desk (+10 XP)"),
            !studied,
            vec![
                Command::RaiseFlag {
                    flag: FlagId::DormStudyDone,
                },
                Command::GrantExperience { amount: 10 },
            ],
        );

        panel.heading("Essentials");
        let has_key = progression.flag_raised(FlagId::DormKey);
        panel.action(
            once(has_key, "Dorm Key Collected", "Take Dorm Key"),
            !has_key,
            vec![
                Command::RaiseFlag {
                    flag: FlagId::DormKey,
                },
                Command::GrantItem {
                    name: "Dorm Key".to_owned(),
                },
            ],
        );

        panel.heading("Furniture");
        panel.text("Bed, study table, lamp.");
    }
}
