#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Campus Quest engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Systems query immutable views of the world and
//! respond exclusively with new command batches.

mod geometry;
mod interaction;
mod sequence;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use geometry::{BoundingBox, Position, Size};
pub use interaction::InteractionState;
pub use sequence::{CourseLedger, SequenceAdvance, SequenceRejection};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Campus Quest.";

/// Directions the player can hold to steer the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y`.
    Up,
    /// Toward increasing `y`.
    Down,
    /// Toward decreasing `x`.
    Left,
    /// Toward increasing `x`.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Held state of the four directional inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputIntent {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl InputIntent {
    /// Intent with nothing held.
    pub const NONE: InputIntent = InputIntent {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Returns a copy with `direction` set to `held`.
    #[must_use]
    pub const fn with(mut self, direction: Direction, held: bool) -> Self {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
        self
    }

    /// Updates a single direction in place.
    pub fn set(&mut self, direction: Direction, held: bool) {
        *self = self.with(direction, held);
    }

    /// Reports whether `direction` is held.
    #[must_use]
    pub const fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Identifier of a location hosted on the campus map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationId {
    /// Student dormitory.
    Dorm,
    /// Lecture building hosting the school and course progression.
    Classroom,
    /// Campus library.
    Library,
    /// Cafeteria.
    Cafeteria,
    /// Administration office.
    Admin,
}

impl LocationId {
    /// Every location identifier in declaration order.
    pub const ALL: [LocationId; 5] = [
        Self::Dorm,
        Self::Classroom,
        Self::Library,
        Self::Cafeteria,
        Self::Admin,
    ];

    /// Stable lowercase key of the location.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dorm => "dorm",
            Self::Classroom => "classroom",
            Self::Library => "library",
            Self::Cafeteria => "cafeteria",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static location of the campus registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Identifier of the location.
    pub id: LocationId,
    /// Display name shown on the map and as the panel title.
    pub name: String,
    /// Region that activates the location when the avatar overlaps it.
    pub bounds: BoundingBox,
    /// Whether the location has a panel presenter.
    pub hosts_panel: bool,
}

impl Location {
    /// Creates a location that hosts a panel.
    #[must_use]
    pub fn new<T>(id: LocationId, name: T, bounds: BoundingBox) -> Self
    where
        T: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            bounds,
            hosts_panel: true,
        }
    }
}

/// One-way milestones tracked by the quest log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestId {
    /// Attend the first class.
    FirstClass,
    /// Collect a student id card.
    StudentId,
    /// Register at the library.
    LibraryVisit,
    /// Collect the timetable.
    Timetable,
    /// Eat a meal at the cafeteria.
    EatMeal,
    /// Choose a school.
    ChooseSchool,
    /// Attend the program orientation.
    ProgramOrientation,
    /// Finish every program core course.
    CompleteProgramCourses,
    /// Choose a department.
    ChooseDepartment,
    /// Finish every department course.
    CompleteDepartmentCourses,
}

impl QuestId {
    /// Every quest in checklist order.
    pub const ALL: [QuestId; 10] = [
        Self::FirstClass,
        Self::StudentId,
        Self::LibraryVisit,
        Self::Timetable,
        Self::EatMeal,
        Self::ChooseSchool,
        Self::ProgramOrientation,
        Self::CompleteProgramCourses,
        Self::ChooseDepartment,
        Self::CompleteDepartmentCourses,
    ];

    /// Quests invalidated when the player switches school.
    pub const SCHOOL_DEPENDENT: [QuestId; 4] = [
        Self::ProgramOrientation,
        Self::CompleteProgramCourses,
        Self::ChooseDepartment,
        Self::CompleteDepartmentCourses,
    ];

    /// Checklist label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstClass => "Attend your first class",
            Self::StudentId => "Get your student ID",
            Self::LibraryVisit => "Register at the library",
            Self::Timetable => "Collect your timetable",
            Self::EatMeal => "Eat a meal",
            Self::ChooseSchool => "Choose a school",
            Self::ProgramOrientation => "Attend program orientation",
            Self::CompleteProgramCourses => "Complete program core courses",
            Self::ChooseDepartment => "Choose a department",
            Self::CompleteDepartmentCourses => "Complete department courses",
        }
    }
}

/// Fine-grained one-time actions that are not quests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlagId {
    /// Dorm key taken.
    DormKey,
    /// First class badge earned.
    FirstClassBadge,
    /// Library card issued.
    LibraryCard,
    /// Meal coupon collected.
    MealCoupon,
    /// Student id collected.
    StudentId,
    /// Timetable collected.
    Timetable,
    /// Meal eaten.
    AteMeal,
    /// Desk study session finished.
    DormStudyDone,
}

/// Identifier of a school in the curriculum catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(String);

impl SchoolId {
    /// Creates a school identifier.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Into<String>,
    {
        Self(value.into())
    }

    /// Borrowed identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a department, unique within its school.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(String);

impl DepartmentId {
    /// Creates a department identifier.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Into<String>,
    {
        Self(value.into())
    }

    /// Borrowed identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Department chosen by the player together with the school it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentSelection {
    /// Selected department.
    pub id: DepartmentId,
    /// School owning the department.
    pub school: SchoolId,
}

/// Player standing derived from accumulated experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// Fewer than 30 experience points.
    Rookie,
    /// 30 to 59 experience points.
    Explorer,
    /// 60 to 99 experience points.
    Achiever,
    /// 100 or more experience points.
    Master,
}

impl Rank {
    /// Rank reached with the provided experience.
    #[must_use]
    pub const fn for_experience(experience: u32) -> Self {
        if experience >= 100 {
            Self::Master
        } else if experience >= 60 {
            Self::Achiever
        } else if experience >= 30 {
            Self::Explorer
        } else {
            Self::Rookie
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rookie => "Rookie",
            Self::Explorer => "Explorer",
            Self::Achiever => "Achiever",
            Self::Master => "Master",
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the held directional intent.
    SetIntent {
        /// Intent gathered by the adapter for this frame.
        intent: InputIntent,
    },
    /// Moves the avatar; the world clamps the destination to the map.
    MoveAvatar {
        /// Requested top-left corner of the avatar.
        to: Position,
    },
    /// Feeds the interaction machine with the result of an overlap scan.
    ObserveOverlap {
        /// First location intersecting the avatar, if any.
        location: Option<LocationId>,
    },
    /// Explicit request to open the active location's panel.
    RequestPanel,
    /// Explicit request to close the open panel.
    ClosePanel,
    /// Adds experience points.
    GrantExperience {
        /// Points to add; zero is ignored.
        amount: u32,
    },
    /// Adds an item to the inventory.
    GrantItem {
        /// Item name.
        name: String,
    },
    /// Sets energy, clamped to `0..=100`.
    SetEnergy {
        /// Requested energy level.
        value: i32,
    },
    /// Marks a quest as complete and re-evaluates victory.
    CompleteQuest {
        /// Quest to complete.
        quest: QuestId,
    },
    /// Raises a one-time flag.
    RaiseFlag {
        /// Flag to raise.
        flag: FlagId,
    },
    /// Counts one more book read at the library.
    RecordBookRead,
    /// Selects a school, invalidating downstream progress.
    SelectSchool {
        /// School to select.
        school: SchoolId,
    },
    /// Completes the next program core course of the selected school.
    CompleteProgramCourse {
        /// School owning the program.
        school: SchoolId,
        /// Ordinal of the course within the program core.
        index: usize,
    },
    /// Selects a department of the current school.
    SelectDepartment {
        /// School owning the department.
        school: SchoolId,
        /// Department to select.
        department: DepartmentId,
    },
    /// Completes the next course of the selected department.
    CompleteDepartmentCourse {
        /// School owning the department.
        school: SchoolId,
        /// Department owning the course list.
        department: DepartmentId,
        /// Ordinal of the course within the department list.
        index: usize,
    },
    /// Awards the victory bonus when every quest is complete.
    CheckVictory,
    /// Closes the victory surface and resets the session.
    AcknowledgeVictory,
    /// Restores the initial game state.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The held directional intent changed.
    IntentChanged {
        /// New intent.
        intent: InputIntent,
    },
    /// The avatar moved.
    AvatarMoved {
        /// Previous top-left corner.
        from: Position,
        /// New top-left corner.
        to: Position,
    },
    /// The interaction machine changed state.
    InteractionChanged {
        /// State before the transition.
        from: InteractionState,
        /// State after the transition.
        to: InteractionState,
    },
    /// A location panel became visible.
    PanelOpened {
        /// Location whose panel opened.
        location: LocationId,
    },
    /// A location panel was dismissed.
    PanelClosed {
        /// Location whose panel closed.
        location: LocationId,
    },
    /// Experience was granted; surfaces as a notification.
    ExperienceGranted {
        /// Points added.
        amount: u32,
        /// Experience after the grant.
        total: u32,
    },
    /// A new item entered the inventory; surfaces as a notification.
    ItemGranted {
        /// Item name.
        name: String,
    },
    /// Energy changed.
    EnergyChanged {
        /// Energy after the change.
        energy: u8,
    },
    /// A quest was completed.
    QuestCompleted {
        /// Completed quest.
        quest: QuestId,
    },
    /// A flag was raised.
    FlagRaised {
        /// Raised flag.
        flag: FlagId,
    },
    /// A book was read.
    BookRead {
        /// Books read so far.
        total: u32,
    },
    /// A school was selected and downstream progress was cleared.
    SchoolSelected {
        /// Selected school.
        school: SchoolId,
    },
    /// A program core course was completed.
    ProgramCourseCompleted {
        /// School owning the program.
        school: SchoolId,
        /// Ordinal of the completed course.
        index: usize,
    },
    /// A department was selected.
    DepartmentSelected {
        /// School owning the department.
        school: SchoolId,
        /// Selected department.
        department: DepartmentId,
    },
    /// A department course was completed.
    DepartmentCourseCompleted {
        /// School owning the department.
        school: SchoolId,
        /// Department owning the course.
        department: DepartmentId,
        /// Ordinal of the completed course.
        index: usize,
    },
    /// Every quest is complete and the one-time bonus was granted.
    VictoryAwarded {
        /// Bonus experience granted.
        bonus: u32,
    },
    /// The session was reinitialised.
    SessionReset {
        /// Generation number of the fresh session.
        generation: u64,
    },
}
