use campus_quest_core::{Command, FlagId, LocationId, QuestId};
use campus_quest_world::query::ProgressionView;

use crate::{once, Panel, PanelPresenter};

/// Cafeteria: a meal coupon gates a single meal.
#[derive(Clone, Copy, Debug, Default)]
pub struct CafeteriaPresenter;

impl PanelPresenter for CafeteriaPresenter {
    fn location(&self) -> LocationId {
        LocationId::Cafeteria
    }

    fn populate(&self, progression: ProgressionView<'_>, panel: &mut Panel) {
        panel.heading("Meal Services");
        let has_coupon = progression.flag_raised(FlagId::MealCoupon);
        panel.action(
            once(has_coupon, "Meal Coupon Collected", "Get Meal Coupon"),
            !has_coupon,
            vec![
                Command::RaiseFlag {
                    flag: FlagId::MealCoupon,
                },
                Command::GrantItem {
                    name: "Meal Coupon".to_owned(),
                },
            ],
        );

        panel.heading("Dining");
        let ate = progression.flag_raised(FlagId::AteMeal);
        panel.action(
            once(ate, "Meal Eaten", "Eat Meal (+5 XP, Energy 100)"),
            has_coupon && !ate,
            vec![
                Command::RaiseFlag {
                    flag: FlagId::AteMeal,
                },
                Command::SetEnergy { value: 100 },
                Command::GrantExperience { amount: 5 },
                Command::CompleteQuest {
                    quest: QuestId::EatMeal,
                },
            ],
        );
    }
}
