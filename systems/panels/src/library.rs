use campus_quest_core::{Command, FlagId, LocationId, QuestId};
use campus_quest_world::query::ProgressionView;

use crate::{Panel, PanelPresenter};

const SHELVES: [(&str, [&str; 3]); 3] = [
    (
        "Engineering",
        ["Statics Basics", "Digital Logic", "Fluid Flow 101"],
    ),
    (
        "Science",
        ["Physics Primer", "Organic Chemistry", "Biology of Cells"],
    ),
    (
        "Literature",
        ["Poetry Classics", "Modern Novels", "World Myths"],
    ),
];

/// Library: card registration unlocks the shelves.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibraryPresenter;

impl PanelPresenter for LibraryPresenter {
    fn location(&self) -> LocationId {
        LocationId::Library
    }

    fn populate(&self, progression: ProgressionView<'_>, panel: &mut Panel) {
        panel.heading("Library Services");
        if !progression.flag_raised(FlagId::LibraryCard) {
            panel.action(
                "Register for Library Card (+20 XP)",
                true,
                vec![
                    Command::RaiseFlag {
                        flag: FlagId::LibraryCard,
                    },
                    Command::GrantItem {
                        name: "Library Card".to_owned(),
                    },
                    Command::GrantExperience { amount: 20 },
                    Command::CompleteQuest {
                        quest: QuestId::LibraryVisit,
                    },
                ],
            );
            return;
        }
        panel.text("Library card registered.");

        panel.heading("Browse Books");
        for (shelf, titles) in SHELVES {
            panel.text(shelf);
            for title in titles {
                panel.action(
                    format!("{title}: Read (+2 XP)"),
                    true,
                    vec![Command::RecordBookRead, Command::GrantExperience { amount: 2 }],
                );
            }
        }

        panel.heading("Reading Stats");
        panel.text(format!("Books read: {}", progression.books_read()));
    }
}
