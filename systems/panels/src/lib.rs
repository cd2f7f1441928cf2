#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Panel presenters for every campus location.
//!
//! A presenter reads the world through [`ProgressionView`] and fills a
//! [`Panel`] with headings, text and actions. Actions never touch the world;
//! each one carries the command batch it stands for, and the session executes
//! that batch only while the action is still enabled.

mod admin;
mod cafeteria;
mod classroom;
mod dorm;
mod library;

use campus_quest_core::{Command, LocationId};
use campus_quest_world::{
    query::{self, ProgressionView},
    World,
};

pub use admin::AdminPresenter;
pub use cafeteria::CafeteriaPresenter;
pub use classroom::ClassroomPresenter;
pub use dorm::DormPresenter;
pub use library::LibraryPresenter;

/// Interactive element offered by a panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelAction {
    /// Button caption.
    pub label: String,
    /// Whether every precondition of the action currently holds.
    pub enabled: bool,
    /// Commands issued when the action is activated.
    pub commands: Vec<Command>,
}

/// Line of panel content.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelEntry {
    /// Section title.
    Heading(String),
    /// Informational line.
    Text(String),
    /// Activatable element.
    Action(PanelAction),
}

/// Modal content surface shown for the active location.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    title: String,
    entries: Vec<PanelEntry>,
}

impl Panel {
    /// Creates an empty panel.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Panel title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Content in display order.
    #[must_use]
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    /// Appends a section title.
    pub fn heading(&mut self, text: impl Into<String>) {
        self.entries.push(PanelEntry::Heading(text.into()));
    }

    /// Appends an informational line.
    pub fn text(&mut self, text: impl Into<String>) {
        self.entries.push(PanelEntry::Text(text.into()));
    }

    /// Appends an action.
    pub fn action(&mut self, label: impl Into<String>, enabled: bool, commands: Vec<Command>) {
        self.entries.push(PanelEntry::Action(PanelAction {
            label: label.into(),
            enabled,
            commands,
        }));
    }

    /// Actions in display order; the position is the action index.
    pub fn actions(&self) -> impl Iterator<Item = &PanelAction> {
        self.entries.iter().filter_map(|entry| match entry {
            PanelEntry::Action(action) => Some(action),
            _ => None,
        })
    }

    /// Commands of the action at `index`, or `None` when it does not exist or
    /// is disabled.
    #[must_use]
    pub fn activate(&self, index: usize) -> Option<&[Command]> {
        self.actions()
            .nth(index)
            .filter(|action| action.enabled)
            .map(|action| action.commands.as_slice())
    }
}

/// Populates the panel of one location.
pub trait PanelPresenter {
    /// Location served by the presenter.
    fn location(&self) -> LocationId;

    /// Fills `panel` from the current progression state.
    fn populate(&self, progression: ProgressionView<'_>, panel: &mut Panel);
}

/// Registry of presenters keyed by location.
pub struct PanelDeck {
    presenters: Vec<Box<dyn PanelPresenter>>,
}

impl PanelDeck {
    /// Creates a deck without presenters.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            presenters: Vec::new(),
        }
    }

    /// Registers a presenter, replacing any previous one for its location.
    pub fn register(&mut self, presenter: Box<dyn PanelPresenter>) {
        let location = presenter.location();
        self.presenters
            .retain(|existing| existing.location() != location);
        self.presenters.push(presenter);
    }

    /// Whether a presenter is registered for `location`.
    #[must_use]
    pub fn serves(&self, location: LocationId) -> bool {
        self.presenter(location).is_some()
    }

    /// Builds the panel of `location`, titled with the location name.
    #[must_use]
    pub fn present(&self, world: &World, location: LocationId) -> Option<Panel> {
        let presenter = self.presenter(location)?;
        let title = query::campus(world)
            .location(location)
            .map_or_else(|| location.key().to_owned(), |entry| entry.name.clone());
        let mut panel = Panel::new(title);
        presenter.populate(query::progression(world), &mut panel);
        Some(panel)
    }

    fn presenter(&self, location: LocationId) -> Option<&dyn PanelPresenter> {
        self.presenters
            .iter()
            .find(|presenter| presenter.location() == location)
            .map(Box::as_ref)
    }
}

impl Default for PanelDeck {
    fn default() -> Self {
        let mut deck = Self::empty();
        deck.register(Box::new(DormPresenter));
        deck.register(Box::new(ClassroomPresenter));
        deck.register(Box::new(LibraryPresenter));
        deck.register(Box::new(CafeteriaPresenter));
        deck.register(Box::new(AdminPresenter));
        deck
    }
}

impl std::fmt::Debug for PanelDeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.presenters.iter().map(|presenter| presenter.location()))
            .finish()
    }
}

/// Label shown for a one-time action that may already be done.
fn once(done: bool, done_label: &str, pending_label: &str) -> String {
    let label = if done { done_label } else { pending_label };
    label.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_actions_do_not_activate() {
        let mut panel = Panel::new("Test");
        panel.heading("Section");
        panel.action("Off", false, vec![Command::RecordBookRead]);
        panel.text("between");
        panel.action("On", true, vec![Command::CheckVictory]);

        assert_eq!(panel.actions().count(), 2);
        assert_eq!(panel.activate(0), None);
        assert_eq!(panel.activate(1), Some(&[Command::CheckVictory][..]));
        assert_eq!(panel.activate(2), None);
    }

    #[test]
    fn default_deck_serves_every_location() {
        let deck = PanelDeck::default();
        let world = World::new();
        for location in LocationId::ALL {
            assert!(deck.serves(location));
            let panel = deck.present(&world, location).expect("panel");
            assert!(!panel.title().is_empty());
        }
    }

    #[test]
    fn empty_deck_presents_nothing() {
        let deck = PanelDeck::empty();
        assert!(deck.present(&World::new(), LocationId::Dorm).is_none());
    }
}
