//! Classified audience variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared target population of a notification, decided exactly once
/// per run by the classifier and never mutated afterwards.
///
/// Representing the audience as a closed sum type means the rest of the
/// workflow dispatches on one tag instead of re-inspecting the raw request
/// fields at every decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Audience {
    /// Every user in the organization.
    AllUsers,
    /// Members of one or more specific teams.
    TeamRosters { ids: Vec<String> },
    /// Members of one or more directory groups.
    Groups { ids: Vec<String> },
    /// General channel of one or more whole teams.
    EntireTeams { ids: Vec<String> },
    /// Externally supplied CSV-encoded user list.
    CsvUsers { raw: String },
}

impl Audience {
    /// True when this audience fans out to one lookup per entity.
    pub fn is_fan_out(&self) -> bool {
        matches!(self, Self::TeamRosters { .. } | Self::Groups { .. })
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllUsers => write!(f, "all_users"),
            Self::TeamRosters { ids } => write!(f, "team_rosters({})", ids.len()),
            Self::Groups { ids } => write!(f, "groups({})", ids.len()),
            Self::EntireTeams { ids } => write!(f, "entire_teams({})", ids.len()),
            Self::CsvUsers { .. } => write!(f, "csv_users"),
        }
    }
}
