//! By-age child cost tables
//!
//! Nine education tracks and two rearing plans, each a 23-entry curve indexed
//! by the child's age (0 through 22). Values are annual costs in man-yen.
//! Ages outside the curve cost nothing: not yet born, or graduated.

use serde::{Deserialize, Serialize};

/// Number of ages covered by every cost curve (ages 0..=22)
pub const COST_TABLE_AGES: usize = 23;

/// Annual cost curve by child age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostTable {
    costs: [f64; COST_TABLE_AGES],
}

impl CostTable {
    pub const fn new(costs: [f64; COST_TABLE_AGES]) -> Self {
        Self { costs }
    }

    /// Cost at a given age; zero outside 0..=22
    pub fn cost_at(&self, age: i32) -> f64 {
        if age < 0 {
            return 0.0;
        }
        self.costs.get(age as usize).copied().unwrap_or(0.0)
    }

    /// Sum of the whole curve
    pub fn lifetime_total(&self) -> f64 {
        self.costs.iter().sum()
    }

    pub fn costs(&self) -> &[f64; COST_TABLE_AGES] {
        &self.costs
    }

    pub(crate) fn set_cost(&mut self, age: usize, cost: f64) {
        if age < COST_TABLE_AGES {
            self.costs[age] = cost;
        }
    }
}

/// Education track, from fully public schooling to private from elementary school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationTrack {
    /// Public schools with heavy cram school
    A,
    /// Public through high school, private humanities university
    B,
    /// Public through high school, private science university
    C,
    /// Private from high school, humanities university
    D,
    /// Private from high school, science university
    E,
    /// Private integrated junior/senior high via entrance exam, humanities university
    F,
    /// Private integrated junior/senior high via entrance exam, science university
    G,
    /// Private from elementary school, humanities university
    H,
    /// Private from elementary school, science university
    I,
}

impl EducationTrack {
    pub const ALL: [EducationTrack; 9] = [
        EducationTrack::A,
        EducationTrack::B,
        EducationTrack::C,
        EducationTrack::D,
        EducationTrack::E,
        EducationTrack::F,
        EducationTrack::G,
        EducationTrack::H,
        EducationTrack::I,
    ];

    /// Single-letter code used in CSV headers
    pub fn code(&self) -> &'static str {
        match self {
            EducationTrack::A => "A",
            EducationTrack::B => "B",
            EducationTrack::C => "C",
            EducationTrack::D => "D",
            EducationTrack::E => "E",
            EducationTrack::F => "F",
            EducationTrack::G => "G",
            EducationTrack::H => "H",
            EducationTrack::I => "I",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code.trim())
    }

    pub fn description(&self) -> &'static str {
        match self {
            EducationTrack::A => "public schools with cram school",
            EducationTrack::B => "public through high school, private humanities university",
            EducationTrack::C => "public through high school, private science university",
            EducationTrack::D => "private from high school, humanities university",
            EducationTrack::E => "private from high school, science university",
            EducationTrack::F => "private junior/senior high by exam, humanities university",
            EducationTrack::G => "private junior/senior high by exam, science university",
            EducationTrack::H => "private from elementary school, humanities university",
            EducationTrack::I => "private from elementary school, science university",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Built-in cost curve for this track
    pub fn default_table(&self) -> CostTable {
        EDUCATION_TABLES[self.index()]
    }
}

/// Child-rearing plan (food, clothing, activities; excludes schooling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RearingPlan {
    #[default]
    Standard,
    Generous,
}

impl RearingPlan {
    pub const ALL: [RearingPlan; 2] = [RearingPlan::Standard, RearingPlan::Generous];

    pub fn code(&self) -> &'static str {
        match self {
            RearingPlan::Standard => "standard",
            RearingPlan::Generous => "generous",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.code() == code.trim())
    }

    pub fn default_table(&self) -> CostTable {
        match self {
            RearingPlan::Standard => STANDARD_REARING,
            RearingPlan::Generous => GENEROUS_REARING,
        }
    }
}

const EDUCATION_TABLES: [CostTable; 9] = [
    // A
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 40.0, 45.0, 50.0, 60.0, 60.0, 80.0,
        60.0, 70.0, 90.0, 90.0, 55.0, 55.0, 55.0, 0.0,
    ]),
    // B
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 40.0, 45.0, 50.0, 60.0, 60.0, 80.0,
        60.0, 70.0, 90.0, 135.0, 105.0, 105.0, 105.0, 0.0,
    ]),
    // C
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 40.0, 45.0, 50.0, 60.0, 60.0, 80.0,
        60.0, 70.0, 90.0, 170.0, 150.0, 150.0, 150.0, 0.0,
    ]),
    // D
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 40.0, 45.0, 50.0, 60.0, 60.0, 80.0,
        100.0, 100.0, 110.0, 135.0, 105.0, 105.0, 105.0, 0.0,
    ]),
    // E
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 40.0, 45.0, 50.0, 60.0, 60.0, 80.0,
        100.0, 100.0, 110.0, 170.0, 150.0, 150.0, 150.0, 0.0,
    ]),
    // F
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 80.0, 100.0, 140.0, 145.0, 145.0,
        150.0, 110.0, 110.0, 120.0, 135.0, 105.0, 105.0, 105.0, 0.0,
    ]),
    // G
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 35.0, 35.0, 35.0, 80.0, 100.0, 140.0, 145.0, 145.0,
        150.0, 110.0, 110.0, 120.0, 170.0, 150.0, 150.0, 150.0, 0.0,
    ]),
    // H
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 160.0, 160.0, 160.0, 160.0, 170.0, 180.0, 145.0, 145.0,
        150.0, 110.0, 110.0, 120.0, 135.0, 105.0, 105.0, 105.0, 0.0,
    ]),
    // I
    CostTable::new([
        10.0, 10.0, 10.0, 25.0, 25.0, 25.0, 160.0, 160.0, 160.0, 160.0, 170.0, 180.0, 145.0, 145.0,
        150.0, 110.0, 110.0, 120.0, 170.0, 150.0, 150.0, 150.0, 0.0,
    ]),
];

const STANDARD_REARING: CostTable = CostTable::new([
    80.0, 80.0, 80.0, 90.0, 90.0, 90.0, 100.0, 100.0, 100.0, 110.0, 110.0, 120.0, 130.0, 130.0,
    130.0, 140.0, 140.0, 140.0, 100.0, 100.0, 100.0, 100.0, 0.0,
]);

const GENEROUS_REARING: CostTable = CostTable::new([
    100.0, 100.0, 100.0, 110.0, 110.0, 110.0, 120.0, 120.0, 120.0, 130.0, 130.0, 140.0, 150.0,
    150.0, 150.0, 160.0, 160.0, 160.0, 150.0, 150.0, 150.0, 150.0, 0.0,
]);

/// Education and rearing curves in use for a projection
#[derive(Debug, Clone)]
pub struct CostTables {
    education: [CostTable; 9],
    rearing: [CostTable; 2],
}

impl CostTables {
    /// Built-in reference curves
    pub fn reference() -> Self {
        Self {
            education: EDUCATION_TABLES,
            rearing: [STANDARD_REARING, GENEROUS_REARING],
        }
    }

    pub fn education(&self, track: EducationTrack) -> &CostTable {
        &self.education[track.index()]
    }

    pub fn rearing(&self, plan: RearingPlan) -> &CostTable {
        match plan {
            RearingPlan::Standard => &self.rearing[0],
            RearingPlan::Generous => &self.rearing[1],
        }
    }

    pub fn set_education(&mut self, track: EducationTrack, table: CostTable) {
        self.education[track.index()] = table;
    }

    pub fn set_rearing(&mut self, plan: RearingPlan, table: CostTable) {
        match plan {
            RearingPlan::Standard => self.rearing[0] = table,
            RearingPlan::Generous => self.rearing[1] = table,
        }
    }
}

impl Default for CostTables {
    fn default() -> Self {
        Self::reference()
    }
}
