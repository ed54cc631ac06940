//! Domain models for curriculum planning.
//!
//! This module contains the core types: domain and standard tokens, the
//! domain rank table, the inferred curriculum sequence, and the per-student
//! curriculum builder.

mod token;
pub use token::{Domain, DomainStandard, Standard, TokenError};

pub mod rank;
pub use rank::{DomainRanks, RankError};

pub mod mapper;
pub use mapper::{DomainMapper, DomainOrderMap, DomainTransitionMap, MapError};

mod proficiency;
pub use proficiency::ProficiencyRecord;

pub mod builder;
pub use builder::{Curriculum, CurriculumBuilder, DEFAULT_MAX_LENGTH};

mod student;
pub use student::{StudentError, StudentRecord, StudentTable, StudentTableError};

mod plan;
pub use plan::{PlanReport, Planner, StudentPlan};

mod config;
pub use config::Config;
