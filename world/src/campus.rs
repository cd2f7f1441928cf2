//! Static campus configuration: map extents, location registry and the
//! curriculum catalog.

use std::collections::BTreeSet;

use campus_quest_core::{
    BoundingBox, DepartmentId, Location, LocationId, Position, SchoolId, Size,
};
use serde::Deserialize;
use thiserror::Error;

const SUPPORTED_CAMPUS_VERSION: u32 = 1;

const DEFAULT_MAP: Size = Size::new(880.0, 560.0);
const DEFAULT_AVATAR: Size = Size::new(22.0, 22.0);
const DEFAULT_SPAWN: Position = Position::new(100.0, 470.0);
const DEFAULT_SPEED: f32 = 3.0;
const DEFAULT_ENERGY: u8 = 80;

/// Errors raised while loading a campus description.
#[derive(Debug, Error)]
pub enum CampusError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse campus toml contents")]
    Syntax(#[from] toml::de::Error),
    /// The document declares a version this build cannot read.
    #[error("unsupported campus version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version declared by the document.
        found: u32,
        /// Version supported by this build.
        expected: u32,
    },
    /// The map has a zero or negative extent.
    #[error("campus map must have a positive width and height")]
    EmptyMap,
    /// The avatar cannot fit on the map.
    #[error("avatar of {width}x{height} does not fit on the campus map")]
    AvatarTooLarge {
        /// Avatar width.
        width: f32,
        /// Avatar height.
        height: f32,
    },
    /// The avatar speed is not a positive finite number.
    #[error("avatar speed must be positive, got {0}")]
    InvalidSpeed(f32),
    /// A location was declared twice.
    #[error("location `{0}` is declared more than once")]
    DuplicateLocation(LocationId),
    /// A location does not lie inside the map.
    #[error("location `{0}` lies outside the campus map")]
    LocationOutOfBounds(LocationId),
    /// A school was declared twice.
    #[error("school `{0}` is declared more than once")]
    DuplicateSchool(SchoolId),
    /// A department was declared twice within one school.
    #[error("department `{department}` is declared more than once in school `{school}`")]
    DuplicateDepartment {
        /// School owning the duplicate.
        school: SchoolId,
        /// Duplicate department.
        department: DepartmentId,
    },
    /// The catalog declares no schools.
    #[error("campus catalog must declare at least one school")]
    EmptyCatalog,
    /// A school offers no departments to choose from.
    #[error("school `{0}` declares no departments")]
    SchoolWithoutDepartments(SchoolId),
    /// A department has no courses to complete.
    #[error("department `{department}` of school `{school}` declares no courses")]
    EmptyDepartmentCourses {
        /// School owning the department.
        school: SchoolId,
        /// Department without courses.
        department: DepartmentId,
    },
}

/// Department of a school with its ordered course list.
#[derive(Clone, Debug, PartialEq)]
pub struct Department {
    id: DepartmentId,
    name: String,
    courses: Vec<String>,
}

impl Department {
    /// Creates a department description.
    #[must_use]
    pub fn new(id: DepartmentId, name: impl Into<String>, courses: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            courses,
        }
    }

    /// Identifier of the department.
    #[must_use]
    pub fn id(&self) -> &DepartmentId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered course list.
    #[must_use]
    pub fn courses(&self) -> &[String] {
        &self.courses
    }
}

/// School with its program core and departments.
#[derive(Clone, Debug, PartialEq)]
pub struct School {
    id: SchoolId,
    name: String,
    program: Vec<String>,
    departments: Vec<Department>,
}

impl School {
    /// Creates a school description.
    #[must_use]
    pub fn new(
        id: SchoolId,
        name: impl Into<String>,
        program: Vec<String>,
        departments: Vec<Department>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            program,
            departments,
        }
    }

    /// Identifier of the school.
    #[must_use]
    pub fn id(&self) -> &SchoolId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered program core courses.
    #[must_use]
    pub fn program(&self) -> &[String] {
        &self.program
    }

    /// Departments in declaration order.
    #[must_use]
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Looks up a department by identifier.
    #[must_use]
    pub fn department(&self, id: &DepartmentId) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.id() == id)
    }
}

/// Every school the player may enrol in.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    schools: Vec<School>,
}

impl Catalog {
    /// Creates a catalog from schools in display order.
    #[must_use]
    pub fn new(schools: Vec<School>) -> Self {
        Self { schools }
    }

    /// Schools in display order.
    #[must_use]
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Looks up a school by identifier.
    #[must_use]
    pub fn school(&self, id: &SchoolId) -> Option<&School> {
        self.schools.iter().find(|school| school.id() == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            school(
                "civil",
                "School of Civil & Water Resources",
                &["Calculus I", "Physics I", "Intro to Engineering"],
                vec![
                    department(
                        "civil",
                        "Civil Engineering",
                        &["Intro to Structures", "Soil Mechanics", "Surveying"],
                    ),
                    department(
                        "water",
                        "Water Resources Engineering",
                        &["Fluid Mechanics", "Hydrology", "Irrigation Engineering"],
                    ),
                ],
            ),
            school(
                "ece",
                "School of Electrical & Computer",
                &["Calculus I", "Programming Basics", "Digital Systems I"],
                vec![
                    department(
                        "electrical",
                        "Electrical Engineering",
                        &["Circuit Analysis", "Electromagnetics", "Power Systems"],
                    ),
                    department(
                        "computer",
                        "Computer Engineering",
                        &["Programming I", "Data Structures", "Computer Architecture"],
                    ),
                ],
            ),
            school(
                "mech",
                "School of Mechanical & Materials",
                &["Calculus I", "Engineering Graphics", "Materials Basics"],
                vec![
                    department(
                        "mechanical",
                        "Mechanical Engineering",
                        &["Statics", "Dynamics", "Thermodynamics"],
                    ),
                    department(
                        "materials",
                        "Materials Science",
                        &[
                            "Materials Science",
                            "Manufacturing Processes",
                            "Strength of Materials",
                        ],
                    ),
                ],
            ),
        ])
    }
}

fn school(id: &str, name: &str, program: &[&str], departments: Vec<Department>) -> School {
    School::new(SchoolId::new(id), name, owned(program), departments)
}

fn department(id: &str, name: &str, courses: &[&str]) -> Department {
    Department::new(DepartmentId::new(id), name, owned(courses))
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

/// Complete static description of the campus. Survives session resets.
#[derive(Clone, Debug, PartialEq)]
pub struct Campus {
    map: Size,
    avatar: Size,
    spawn: Position,
    speed: f32,
    initial_energy: u8,
    locations: Vec<Location>,
    catalog: Catalog,
}

impl Campus {
    /// Parses and validates a TOML campus description.
    ///
    /// Sections missing from the document fall back to the built-in campus.
    pub fn from_toml_str(contents: &str) -> Result<Self, CampusError> {
        let document: CampusDocument = toml::from_str(contents)?;
        if document.version != SUPPORTED_CAMPUS_VERSION {
            return Err(CampusError::UnsupportedVersion {
                found: document.version,
                expected: SUPPORTED_CAMPUS_VERSION,
            });
        }

        let defaults = Self::default();
        let map = document
            .map
            .map_or(defaults.map, |map| Size::new(map.width, map.height));
        let avatar = document.avatar.unwrap_or_default();
        let locations = match document.locations {
            Some(locations) => locations
                .into_iter()
                .map(|location| Location {
                    id: location.id,
                    name: location.name,
                    bounds: BoundingBox::from_xywh(
                        location.bounds.x,
                        location.bounds.y,
                        location.bounds.width,
                        location.bounds.height,
                    ),
                    hosts_panel: location.hosts_panel,
                })
                .collect(),
            None => defaults.locations,
        };
        let catalog = match document.schools {
            Some(schools) => Catalog::new(
                schools
                    .into_iter()
                    .map(|school| {
                        School::new(
                            school.id,
                            school.name,
                            school.program,
                            school
                                .departments
                                .into_iter()
                                .map(|department| {
                                    Department::new(
                                        department.id,
                                        department.name,
                                        department.courses,
                                    )
                                })
                                .collect(),
                        )
                    })
                    .collect(),
            ),
            None => defaults.catalog,
        };

        let campus = Self {
            map,
            avatar: Size::new(avatar.width, avatar.height),
            spawn: Position::new(avatar.spawn.x, avatar.spawn.y),
            speed: avatar.speed,
            initial_energy: avatar.energy.min(100),
            locations,
            catalog,
        };
        campus.validate()?;
        Ok(campus)
    }

    fn validate(&self) -> Result<(), CampusError> {
        if self.map.is_empty() {
            return Err(CampusError::EmptyMap);
        }
        if self.avatar.is_empty()
            || self.avatar.width > self.map.width
            || self.avatar.height > self.map.height
        {
            return Err(CampusError::AvatarTooLarge {
                width: self.avatar.width,
                height: self.avatar.height,
            });
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(CampusError::InvalidSpeed(self.speed));
        }

        let mut seen_locations = BTreeSet::new();
        for location in &self.locations {
            if !seen_locations.insert(location.id) {
                return Err(CampusError::DuplicateLocation(location.id));
            }
            if !location.bounds.fits_within(self.map) {
                return Err(CampusError::LocationOutOfBounds(location.id));
            }
        }

        if self.catalog.schools().is_empty() {
            return Err(CampusError::EmptyCatalog);
        }
        let mut seen_schools = BTreeSet::new();
        for school in self.catalog.schools() {
            if !seen_schools.insert(school.id()) {
                return Err(CampusError::DuplicateSchool(school.id().clone()));
            }
            let mut seen_departments = BTreeSet::new();
            for department in school.departments() {
                if !seen_departments.insert(department.id()) {
                    return Err(CampusError::DuplicateDepartment {
                        school: school.id().clone(),
                        department: department.id().clone(),
                    });
                }
                if department.courses().is_empty() {
                    return Err(CampusError::EmptyDepartmentCourses {
                        school: school.id().clone(),
                        department: department.id().clone(),
                    });
                }
            }
            if school.departments().is_empty() {
                return Err(CampusError::SchoolWithoutDepartments(school.id().clone()));
            }
        }

        Ok(())
    }

    /// Extent of the walkable map.
    #[must_use]
    pub const fn map(&self) -> Size {
        self.map
    }

    /// Extent of the avatar bounding box.
    #[must_use]
    pub const fn avatar(&self) -> Size {
        self.avatar
    }

    /// Top-left corner the avatar starts from, clamped onto the map.
    #[must_use]
    pub fn spawn(&self) -> Position {
        self.spawn.clamp_within(self.map, self.avatar)
    }

    /// Displacement per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Energy of a fresh session.
    #[must_use]
    pub const fn initial_energy(&self) -> u8 {
        self.initial_energy
    }

    /// Location registry in declaration order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Looks up a location by identifier.
    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    /// Whether the location exists and hosts a panel.
    #[must_use]
    pub fn hosts_panel(&self, id: LocationId) -> bool {
        self.location(id).is_some_and(|location| location.hosts_panel)
    }

    /// Keeps panels only on locations for which `serves` holds.
    #[must_use]
    pub fn restrict_panels<F>(mut self, serves: F) -> Self
    where
        F: Fn(LocationId) -> bool,
    {
        for location in &mut self.locations {
            location.hosts_panel = location.hosts_panel && serves(location.id);
        }
        self
    }

    /// Curriculum catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for Campus {
    fn default() -> Self {
        Self {
            map: DEFAULT_MAP,
            avatar: DEFAULT_AVATAR,
            spawn: DEFAULT_SPAWN,
            speed: DEFAULT_SPEED,
            initial_energy: DEFAULT_ENERGY,
            locations: vec![
                Location::new(
                    LocationId::Dorm,
                    "Dormitory",
                    BoundingBox::from_xywh(40.0, 420.0, 160.0, 120.0),
                ),
                Location::new(
                    LocationId::Classroom,
                    "Classroom",
                    BoundingBox::from_xywh(80.0, 70.0, 200.0, 120.0),
                ),
                Location::new(
                    LocationId::Library,
                    "Library",
                    BoundingBox::from_xywh(600.0, 60.0, 220.0, 140.0),
                ),
                Location::new(
                    LocationId::Cafeteria,
                    "Cafeteria",
                    BoundingBox::from_xywh(540.0, 320.0, 220.0, 140.0),
                ),
                Location::new(
                    LocationId::Admin,
                    "Admin Office",
                    BoundingBox::from_xywh(260.0, 320.0, 220.0, 120.0),
                ),
            ],
            catalog: Catalog::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CampusDocument {
    version: u32,
    map: Option<MapDocument>,
    avatar: Option<AvatarDocument>,
    locations: Option<Vec<LocationDocument>>,
    schools: Option<Vec<SchoolDocument>>,
}

#[derive(Debug, Deserialize)]
struct MapDocument {
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AvatarDocument {
    width: f32,
    height: f32,
    spawn: PointDocument,
    speed: f32,
    energy: u8,
}

impl Default for AvatarDocument {
    fn default() -> Self {
        Self {
            width: DEFAULT_AVATAR.width,
            height: DEFAULT_AVATAR.height,
            spawn: PointDocument {
                x: DEFAULT_SPAWN.x,
                y: DEFAULT_SPAWN.y,
            },
            speed: DEFAULT_SPEED,
            energy: DEFAULT_ENERGY,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PointDocument {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct RectDocument {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
struct LocationDocument {
    id: LocationId,
    name: String,
    bounds: RectDocument,
    #[serde(default = "hosts_panel_by_default")]
    hosts_panel: bool,
}

fn hosts_panel_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SchoolDocument {
    id: SchoolId,
    name: String,
    #[serde(default)]
    program: Vec<String>,
    #[serde(default)]
    departments: Vec<DepartmentDocument>,
}

#[derive(Debug, Deserialize)]
struct DepartmentDocument {
    id: DepartmentId,
    name: String,
    #[serde(default)]
    courses: Vec<String>,
}
