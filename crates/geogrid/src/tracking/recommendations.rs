use super::domain::{GridPoint, Keyword};
use super::metrics::CompetitorStanding;
use serde::{Deserialize, Serialize};

/// Rank beyond which a grid point counts against geographic coverage.
const WEAK_RANK_CUTOFF: u8 = 10;
/// Fraction of weak points that triggers the coverage recommendation.
const WEAK_POINT_THRESHOLD: f64 = 0.3;
/// Competitors averaging better than this rank are considered dominant.
const STRONG_COMPETITOR_RANK: f64 = 5.0;
/// Keywords averaging worse than this rank are flagged for optimization.
const UNDERPERFORMING_KEYWORD_RANK: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Optimization,
    Competition,
    Keywords,
}

impl RecommendationCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Optimization => "Optimization",
            Self::Competition => "Competition",
            Self::Keywords => "Keywords",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// One actionable finding. Generated fresh per invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: &'static str,
    pub description: String,
    pub impact: &'static str,
}

/// Evaluates the three advisory rules independently. Output order is rule
/// order (coverage, competition, keywords), not priority order.
pub fn generate_recommendations(
    grid: &[GridPoint],
    standings: &[CompetitorStanding],
    keywords: &[Keyword],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let weak_points = grid
        .iter()
        .filter(|point| point.rank > WEAK_RANK_CUTOFF)
        .count();
    if weak_points as f64 > grid.len() as f64 * WEAK_POINT_THRESHOLD {
        recommendations.push(Recommendation {
            category: RecommendationCategory::Optimization,
            priority: Priority::High,
            title: "Optimize for Geographic Coverage",
            description: format!(
                "{weak_points} grid points show poor visibility. Focus on local citations and geo-targeted content."
            ),
            impact: "Could improve SoLV by 15-25%",
        });
    }

    let strongest = standings
        .iter()
        .filter_map(|standing| {
            standing
                .average_rank
                .filter(|rank| *rank < STRONG_COMPETITOR_RANK)
                .map(|rank| (standing, rank))
        })
        .min_by(|(_, a), (_, b)| a.total_cmp(b));
    if let Some((standing, _)) = strongest {
        recommendations.push(Recommendation {
            category: RecommendationCategory::Competition,
            priority: Priority::Medium,
            title: "Competitor Analysis Required",
            description: format!(
                "{} dominates {} grid points. Analyze their local SEO strategy.",
                standing.name, standing.visibility
            ),
            impact: "Potential 10-20% SoLV increase",
        });
    }

    if let Some(keyword) = keywords
        .iter()
        .find(|keyword| keyword.average_rank > UNDERPERFORMING_KEYWORD_RANK)
    {
        recommendations.push(Recommendation {
            category: RecommendationCategory::Keywords,
            priority: Priority::Medium,
            title: "Keyword Optimization Needed",
            description: format!(
                "Keyword \"{}\" is underperforming. Consider long-tail variations.",
                keyword.term
            ),
            impact: "Could improve rankings by 2-5 positions",
        });
    }

    recommendations
}
