// =============================================================================
// Ranking & Funnel — score floor, ordering and the published views
// =============================================================================
//
//   qualified  = composite_score >= min_score, sorted descending (stable)
//   movers     = first `movers_count` of qualified
//   strongest  = first `strongest_count` of qualified
//   full       = all qualified, only when requested
// =============================================================================

use serde::Serialize;

use crate::scoring::EvaluatedSymbol;

/// Views produced from one pass's evaluated symbols.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Funnel {
    pub movers: Vec<EvaluatedSymbol>,
    pub strongest: Vec<EvaluatedSymbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<Vec<EvaluatedSymbol>>,
    /// Size of the qualified set, independent of the view widths.
    #[serde(skip)]
    pub qualified: usize,
}

impl Funnel {
    /// Nothing cleared the score floor.
    pub fn is_empty(&self) -> bool {
        self.qualified == 0
    }
}

pub fn rank(
    evaluated: Vec<EvaluatedSymbol>,
    min_score: f64,
    movers_count: usize,
    strongest_count: usize,
    include_full: bool,
) -> Funnel {
    let mut qualified: Vec<EvaluatedSymbol> = evaluated
        .into_iter()
        .filter(|e| e.composite_score >= min_score)
        .collect();

    qualified.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let movers = qualified.iter().take(movers_count).cloned().collect();
    let strongest = qualified.iter().take(strongest_count).cloned().collect();

    Funnel {
        movers,
        strongest,
        qualified: qualified.len(),
        full: include_full.then_some(qualified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, Direction, MovementState};

    fn evaluated(symbol: &str, score: f64) -> EvaluatedSymbol {
        EvaluatedSymbol {
            symbol: symbol.into(),
            last_price: 1.0,
            change_24h: 0.0,
            movement_state: MovementState::LikelyIn24h,
            direction: Direction::Long,
            composite_score: score,
            risk_score: 5.0,
            confidence: Confidence::Low,
            entry: 1.0,
            take_profit_1: 1.006,
            take_profit_2: 1.012,
            take_profit_3: 1.02,
            stop_loss: 0.988,
            leverage: "15-20x".into(),
            reason: String::new(),
            trend_strength: String::new(),
            breakout_signal: String::new(),
            whale_activity: String::new(),
            volatility: String::new(),
        }
    }

    fn names(list: &[EvaluatedSymbol]) -> Vec<&str> {
        list.iter().map(|e| e.symbol.as_str()).collect()
    }

    #[test]
    fn floor_sort_and_prefix_views() {
        let input = vec![
            evaluated("A", 60.0),
            evaluated("B", 54.99),
            evaluated("C", 88.0),
            evaluated("D", 55.0),
            evaluated("E", 71.0),
            evaluated("F", 66.0),
            evaluated("G", 99.0),
            evaluated("H", 57.0),
        ];
        let funnel = rank(input, 55.0, 5, 3, true);

        let full = funnel.full.as_deref().unwrap();
        assert_eq!(names(full), vec!["G", "C", "E", "F", "A", "H", "D"]);
        assert_eq!(names(&funnel.movers), vec!["G", "C", "E", "F", "A"]);
        assert_eq!(names(&funnel.strongest), vec!["G", "C", "E"]);
        assert!(full.iter().all(|e| e.composite_score >= 55.0));
    }

    #[test]
    fn ties_keep_evaluation_order() {
        let input = vec![evaluated("X", 70.0), evaluated("Y", 80.0), evaluated("Z", 70.0)];
        let funnel = rank(input, 55.0, 5, 3, false);
        assert_eq!(names(&funnel.movers), vec!["Y", "X", "Z"]);
        assert!(funnel.full.is_none());
    }

    #[test]
    fn nothing_qualifies() {
        let funnel = rank(vec![evaluated("A", 10.0)], 55.0, 5, 3, true);
        assert!(funnel.is_empty());
        assert!(funnel.strongest.is_empty());
        assert_eq!(funnel.full.map(|f| f.len()), Some(0));
    }

    #[test]
    fn zero_width_movers_view_is_not_empty() {
        let input = vec![evaluated("A", 80.0), evaluated("B", 60.0)];
        let funnel = rank(input, 55.0, 0, 3, false);
        assert!(funnel.movers.is_empty());
        assert_eq!(names(&funnel.strongest), vec!["A", "B"]);
        assert_eq!(funnel.qualified, 2);
        assert!(!funnel.is_empty());
    }
}
