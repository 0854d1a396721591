//! Data models for profile lookups and battles.
//!
//! This module contains the core data structures produced by the
//! aggregator and consumed by the renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of repositories shown on a card.
pub const RECENT_REPOSITORY_LIMIT: usize = 5;

/// Profile-level data for a single GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name, if the user set one.
    pub display_name: Option<String>,
    /// Login handle.
    pub handle: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Personal website. Never an empty string.
    pub blog_url: Option<String>,
    /// Account creation date.
    pub joined: DateTime<Utc>,
    /// Number of followers.
    pub followers: u64,
}

impl Identity {
    /// Name to show in card headings: the display name, or the handle.
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.handle)
    }
}

/// A repository as listed on a profile card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Repository name.
    pub name: String,
    /// Browser URL of the repository.
    pub url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stargazer count.
    pub star_count: u64,
}

/// The aggregated result of one profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    /// Who the profile belongs to.
    pub identity: Identity,
    /// Up to [`RECENT_REPOSITORY_LIMIT`] repositories, newest first.
    pub recent_repositories: Vec<RepositorySummary>,
    /// Stars summed over every listed repository.
    pub total_star_count: u64,
}

/// Visual classification applied to a rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// Single lookups and ties.
    #[default]
    Neutral,
    /// The battle winner.
    Favorable,
    /// The battle loser.
    Unfavorable,
}

impl fmt::Display for Emphasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emphasis::Neutral => write!(f, "Neutral"),
            Emphasis::Favorable => write!(f, "Favorable"),
            Emphasis::Unfavorable => write!(f, "Unfavorable"),
        }
    }
}

impl Emphasis {
    /// CSS background class used by the HTML card.
    pub fn css_class(&self) -> &'static str {
        match self {
            Emphasis::Neutral => "bg-white",
            Emphasis::Favorable => "bg-green-100",
            Emphasis::Unfavorable => "bg-red-100",
        }
    }

    /// Returns an emoji badge for text output.
    pub fn emoji(&self) -> &'static str {
        match self {
            Emphasis::Neutral => "",
            Emphasis::Favorable => "🏆",
            Emphasis::Unfavorable => "💀",
        }
    }
}

/// Which side of a battle has more stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    First,
    Second,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::First => write!(f, "First"),
            Winner::Second => write!(f, "Second"),
            Winner::Tie => write!(f, "Tie"),
        }
    }
}

/// Two profiles plus the ranking derived from their star totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub first: ProfileResult,
    pub second: ProfileResult,
    pub winner: Winner,
}

impl ComparisonOutcome {
    /// Emphasis for the first and second card, in that order.
    pub fn emphasis(&self) -> (Emphasis, Emphasis) {
        match self.winner {
            Winner::First => (Emphasis::Favorable, Emphasis::Unfavorable),
            Winner::Second => (Emphasis::Unfavorable, Emphasis::Favorable),
            Winner::Tie => (Emphasis::Neutral, Emphasis::Neutral),
        }
    }
}
