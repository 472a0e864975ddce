//! Personalized ranking of candidate actions from corpus usage statistics

use crate::config::RankingPolicy;
use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

/// Ranked list plus what the relevance filter did
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    pub actions: Vec<RankedAction>,
    pub filtered: usize,
    pub personalization_applied: bool,
}

/// Base priority adjusted by frequency, execution rate and recency, capped
pub fn personalized_priority(
    base: u8,
    stat: Option<&UserActionStat>,
    policy: &RankingPolicy,
    now: DateTime<Utc>,
) -> u8 {
    let Some(stat) = stat else {
        return base.min(policy.max_priority);
    };

    let mut priority = base as u16;

    if stat.frequency > policy.high_frequency {
        priority += policy.high_frequency_boost as u16;
    } else if stat.frequency > policy.medium_frequency {
        priority += policy.medium_frequency_boost as u16;
    }

    let executed_often = stat.execution_rate > policy.execution_rate;
    if executed_often && stat.times_suggested >= policy.min_suggestions {
        priority += policy.execution_boost as u16;
    }

    if let Some(last_used) = stat.last_used_at {
        if now.signed_duration_since(last_used) <= Duration::days(policy.recency_days) {
            priority += policy.recency_boost as u16;
        }
    }

    priority.min(policy.max_priority as u16) as u8
}

/// Rank actions against a corpus snapshot.
///
/// Once the corpus is large enough, actions the user has never seen are
/// dropped unless they are generic or carry a high base priority. An empty
/// snapshot leaves base priorities untouched.
pub fn rank_actions(
    actions: &[&ActionDefinition],
    stats: &CorpusStats,
    policy: &RankingPolicy,
    now: DateTime<Utc>,
) -> RankingOutcome {
    let personalization_applied = !stats.is_empty();
    let apply_filter = stats.overall.total_emails > policy.filter_min_corpus;
    let mut filtered = 0;

    let mut ranked: Vec<RankedAction> = actions
        .iter()
        .filter_map(|action| {
            let stat = stats.stat_for(&action.id);
            let observed = stat.map_or(false, UserActionStat::observed);
            let exempt = action.generic || action.base_priority >= policy.filter_exempt_priority;
            if apply_filter && !exempt && !observed {
                filtered += 1;
                return None;
            }
            Some(RankedAction {
                action: (*action).clone(),
                priority: personalized_priority(action.base_priority, stat, policy, now),
                user_stats: stat.cloned(),
            })
        })
        .collect();

    sort_ranked(&mut ranked);

    RankingOutcome {
        actions: ranked,
        filtered,
        personalization_applied,
    }
}

/// Priority desc, then frequency desc, then id asc
pub fn sort_ranked(actions: &mut [RankedAction]) {
    actions.sort_by(compare_ranked);
}

fn frequency(ranked: &RankedAction) -> f64 {
    ranked.user_stats.as_ref().map_or(0.0, |s| s.frequency)
}

fn compare_ranked(a: &RankedAction, b: &RankedAction) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| frequency(b).total_cmp(&frequency(a)))
        .then_with(|| a.action.id.cmp(&b.action.id))
}
