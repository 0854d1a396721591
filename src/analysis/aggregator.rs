//! Profile aggregation and battle ranking.
//!
//! This module turns raw API payloads into [`ProfileResult`]s and decides
//! the winner of a battle.

use crate::github::{LookupError, ProfileSource, RepoPayload, UserPayload};
use crate::models::{
    ComparisonOutcome, ProfileResult, RepositorySummary, Winner, RECENT_REPOSITORY_LIMIT,
};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Sort repositories newest first. The sort is stable, so repositories
/// created at the same instant keep the order the API listed them in.
pub fn sort_newest_first(repos: &mut [RepositorySummary]) {
    repos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Sum of stars over every repository in the listing.
pub fn total_stars(repos: &[RepositorySummary]) -> u64 {
    repos.iter().map(|repo| repo.star_count).sum()
}

/// Build a profile result from an identity and its complete repository listing.
pub fn summarize(user: UserPayload, repos: Vec<RepoPayload>) -> ProfileResult {
    let mut repositories: Vec<RepositorySummary> =
        repos.into_iter().map(RepositorySummary::from).collect();

    // Totals cover the whole listing, not just the repositories shown.
    let total_star_count = total_stars(&repositories);

    sort_newest_first(&mut repositories);
    repositories.truncate(RECENT_REPOSITORY_LIMIT);

    ProfileResult {
        identity: user.into_identity(),
        recent_repositories: repositories,
        total_star_count,
    }
}

/// Look up a handle: identity first, then the repository listing it points to.
pub async fn fetch_profile<S>(source: &S, handle: &str) -> Result<ProfileResult, LookupError>
where
    S: ProfileSource + ?Sized,
{
    let user = source.fetch_identity(handle).await?;
    debug!("Resolved identity {} (repos at {})", user.login, user.repos_url);

    let repos = source.fetch_repositories(&user.repos_url).await?;
    debug!("{} has {} repositories", user.login, repos.len());

    let result = summarize(user, repos);
    info!(
        "Fetched {}: {} stars, {} recent repositories",
        result.identity.handle,
        result.total_star_count,
        result.recent_repositories.len()
    );

    Ok(result)
}

/// Decide the winner by total star count. Equal totals are a tie.
pub fn compare(first: ProfileResult, second: ProfileResult) -> ComparisonOutcome {
    let winner = match first.total_star_count.cmp(&second.total_star_count) {
        Ordering::Greater => Winner::First,
        Ordering::Less => Winner::Second,
        Ordering::Equal => Winner::Tie,
    };

    ComparisonOutcome {
        first,
        second,
        winner,
    }
}

/// Fetch two profiles concurrently and rank them.
///
/// Either lookup failing fails the whole battle; no partial result is kept.
pub async fn battle<S>(
    source: &S,
    first: &str,
    second: &str,
) -> Result<ComparisonOutcome, LookupError>
where
    S: ProfileSource + ?Sized,
{
    let (a, b) = futures::try_join!(fetch_profile(source, first), fetch_profile(source, second))?;

    let outcome = compare(a, b);
    info!(
        "Battle {} ({}) vs {} ({}): {}",
        outcome.first.identity.handle,
        outcome.first.total_star_count,
        outcome.second.identity.handle,
        outcome.second.total_star_count,
        outcome.winner
    );

    Ok(outcome)
}
