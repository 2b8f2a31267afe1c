//! Leave-day selection
//!
//! Picks `requested` workdays out of the eligible pool (actual workdays that
//! are not excluded) so that the resulting plan scores as high as possible
//! while passing every constraint.
//!
//! # Algorithm
//!
//! The strategy is chosen by pool size alone, so the same input always takes
//! the same path:
//!
//! 1. **Exhaustive** (pool <= threshold): every `requested`-subset of the pool
//!    is validated and scored. Evaluation is parallel; the enumeration order
//!    is preserved so ties stay deterministic.
//! 2. **Heuristic** (larger pools):
//!    - mandatory windows are pre-filled with their best-ranked workdays;
//!    - for each long block of non-working days, every split of the
//!      remaining budget between the workdays just before and just after
//!      the block becomes a seed;
//!    - short workday gaps between two blocks become bridge seeds;
//!    - each seed (plus a pure greedy seed) is topped up greedily by
//!      proximity score, re-validating after every addition.
//!
//! All surviving candidates are sorted by score (stable), deduplicated, and
//! optionally capped.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use leaveplan_core::{DayRecord, VacationConstraints};
use rayon::prelude::*;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::score::proximity_score;
use crate::segments::non_working_blocks;
use crate::validate::{check_run_limit, validate};

/// Candidate-generation strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    Exhaustive,
    Heuristic,
}

impl SearchMode {
    pub fn for_pool(pool_size: usize, threshold: usize) -> Self {
        if pool_size <= threshold {
            SearchMode::Exhaustive
        } else {
            SearchMode::Heuristic
        }
    }
}

/// A valid, scored leave set
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub dates: BTreeSet<NaiveDate>,
    pub score: f64,
}

/// Shared, read-only state of one selection run
struct Search<'a> {
    days: &'a [DayRecord],
    requested: usize,
    constraints: &'a VacationConstraints,
    config: &'a PlannerConfig,
    /// Indexed like `days`
    eligible: Vec<bool>,
    /// Eligible day indices, best proximity score first
    ranked: Vec<usize>,
}

impl<'a> Search<'a> {
    fn new(
        days: &'a [DayRecord],
        requested: usize,
        constraints: &'a VacationConstraints,
        config: &'a PlannerConfig,
    ) -> Self {
        let eligible: Vec<bool> = days
            .iter()
            .map(|d| d.is_working_day && !constraints.is_excluded(d.date))
            .collect();

        let mut scored: Vec<(usize, f64)> = eligible
            .iter()
            .enumerate()
            .filter(|(_, ok)| **ok)
            .map(|(idx, _)| (idx, proximity_score(days, idx, config)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self {
            days,
            requested,
            constraints,
            config,
            eligible,
            ranked: scored.into_iter().map(|(idx, _)| idx).collect(),
        }
    }

    fn pool(&self) -> Vec<usize> {
        (0..self.days.len()).filter(|i| self.eligible[*i]).collect()
    }

    fn evaluate(&self, dates: BTreeSet<NaiveDate>) -> Option<Candidate> {
        if dates.len() != self.requested || !validate(&dates, self.days, self.constraints) {
            return None;
        }
        let score = self
            .config
            .scoring
            .score(&dates, self.days, self.requested as u32);
        Some(Candidate { dates, score })
    }

    // ========================================================================
    // Exhaustive
    // ========================================================================

    fn exhaustive(&self) -> Vec<Candidate> {
        let pool = self.pool();
        let combos: Vec<Vec<usize>> = Combinations::new(pool.len(), self.requested).collect();
        debug!(combinations = combos.len(), "enumerating leave combinations");

        combos
            .par_iter()
            .filter_map(|combo| {
                let dates = combo.iter().map(|&i| self.days[pool[i]].date).collect();
                self.evaluate(dates)
            })
            .collect()
    }

    // ========================================================================
    // Heuristic
    // ========================================================================

    fn heuristic(&self) -> Vec<Candidate> {
        let Some(fixed) = self.preselect_mandatory() else {
            debug!("mandatory windows cannot be filled");
            return Vec::new();
        };
        if fixed.len() > self.requested {
            debug!(fixed = fixed.len(), "mandatory windows exceed the leave budget");
            return Vec::new();
        }

        let remaining = self.requested - fixed.len();
        let mut seeds = vec![fixed.clone()];
        if remaining > 0 {
            seeds.extend(self.block_seeds(&fixed, remaining));
            seeds.extend(self.bridge_seeds(&fixed, remaining));
        }
        debug!(seeds = seeds.len(), fixed = fixed.len(), "heuristic seeds");

        seeds
            .into_iter()
            .filter_map(|seed| self.greedy_fill(seed))
            .filter_map(|dates| self.evaluate(dates))
            .collect()
    }

    /// Satisfy each mandatory window with its best-ranked eligible days
    fn preselect_mandatory(&self) -> Option<BTreeSet<NaiveDate>> {
        let mut fixed = BTreeSet::new();

        for range in &self.constraints.mandatory_ranges {
            let covered = fixed.iter().filter(|d| range.contains(**d)).count();
            let mut needed = (range.required_days as usize).saturating_sub(covered);

            for &idx in &self.ranked {
                if needed == 0 {
                    break;
                }
                let date = self.days[idx].date;
                if !range.contains(date) || fixed.contains(&date) {
                    continue;
                }
                fixed.insert(date);
                if check_run_limit(&fixed, self.days, self.constraints).is_ok() {
                    needed -= 1;
                } else {
                    fixed.remove(&date);
                }
            }

            if needed > 0 {
                return None;
            }
        }

        Some(fixed)
    }

    /// Every before/after split of `remaining` around each long block
    fn block_seeds(&self, fixed: &BTreeSet<NaiveDate>, remaining: usize) -> Vec<BTreeSet<NaiveDate>> {
        let mut seeds = Vec::new();

        for block in non_working_blocks(self.days, self.config.long_block_min_len) {
            let before = self.adjacent_workdays(block.start.checked_sub(1), false, fixed, remaining);
            let after = self.adjacent_workdays(Some(block.end), true, fixed, remaining);

            for take_before in 0..=remaining.min(before.len()) {
                let take_after = (remaining - take_before).min(after.len());
                if take_before + take_after == 0 {
                    continue;
                }
                let mut seed = fixed.clone();
                seed.extend(&before[..take_before]);
                seed.extend(&after[..take_after]);
                seeds.push(seed);
            }
        }

        seeds
    }

    /// Consecutive eligible workdays walking away from a block
    ///
    /// Already-fixed days are passed through without using budget; the walk
    /// stops at the first day that cannot be taken.
    fn adjacent_workdays(
        &self,
        from: Option<usize>,
        forward: bool,
        fixed: &BTreeSet<NaiveDate>,
        limit: usize,
    ) -> Vec<NaiveDate> {
        let mut found = Vec::new();
        let mut cursor = from;

        while let Some(idx) = cursor.filter(|i| *i < self.days.len()) {
            if found.len() == limit {
                break;
            }
            let date = self.days[idx].date;
            if !fixed.contains(&date) {
                if !self.eligible[idx] {
                    break;
                }
                found.push(date);
            }
            cursor = if forward { idx.checked_add(1) } else { idx.checked_sub(1) };
        }

        found
    }

    /// Short runs of workdays joining two non-working blocks
    fn bridge_seeds(&self, fixed: &BTreeSet<NaiveDate>, remaining: usize) -> Vec<BTreeSet<NaiveDate>> {
        let blocks = non_working_blocks(self.days, 1);
        let max_gap = self.config.max_bridge_gap.min(remaining);

        blocks
            .windows(2)
            .filter_map(|pair| {
                let gap = pair[0].end..pair[1].start;
                if gap.is_empty() || gap.len() > max_gap {
                    return None;
                }
                if !gap.clone().all(|i| self.eligible[i]) {
                    return None;
                }
                let mut seed = fixed.clone();
                seed.extend(gap.map(|i| self.days[i].date));
                Some(seed)
            })
            .filter(|seed| seed.len() <= self.requested)
            .collect()
    }

    /// Top a seed up to the requested size in proximity order
    fn greedy_fill(&self, mut leave: BTreeSet<NaiveDate>) -> Option<BTreeSet<NaiveDate>> {
        if check_run_limit(&leave, self.days, self.constraints).is_err() {
            return None;
        }

        for &idx in &self.ranked {
            if leave.len() >= self.requested {
                break;
            }
            let date = self.days[idx].date;
            if !leave.insert(date) {
                continue;
            }
            if check_run_limit(&leave, self.days, self.constraints).is_err() {
                leave.remove(&date);
            }
        }

        (leave.len() == self.requested).then_some(leave)
    }
}

/// Select the best leave sets for `requested` days
///
/// Returns an empty list when the request cannot be met; infeasibility is
/// not an error.
pub fn select(
    days: &[DayRecord],
    requested: u32,
    constraints: &VacationConstraints,
    config: &PlannerConfig,
) -> Vec<Candidate> {
    let search = Search::new(days, requested as usize, constraints, config);
    let pool_size = search.ranked.len();

    if requested == 0 || requested as usize > pool_size {
        debug!(requested, pool_size, "request does not fit the eligible pool");
        return Vec::new();
    }

    let mode = SearchMode::for_pool(pool_size, config.exhaustive_threshold);
    debug!(?mode, requested, pool_size, "selecting leave days");

    let candidates = match mode {
        SearchMode::Exhaustive => search.exhaustive(),
        SearchMode::Heuristic => search.heuristic(),
    };

    rank(candidates, config.max_plans)
}

/// Stable sort by score, drop repeated date sets, cap
fn rank(mut candidates: Vec<Candidate>, max_plans: Option<usize>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.dates.clone()));

    if let Some(max) = max_plans {
        candidates.truncate(max);
    }
    candidates
}

/// Lexicographic `k`-subsets of `0..n`
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        // Rightmost index that can still move
        let mut i = self.k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - self.k + i {
                break;
            }
        }

        self.indices[i] += 1;
        for j in i + 1..self.k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoringModel;
    use crate::segments::longest_leave_only_run;
    use crate::test_support::{date, july_with_holiday_block, records};
    use leaveplan_core::HolidayCalendar;
    use pretty_assertions::assert_eq;

    fn dates(candidate: &Candidate) -> Vec<NaiveDate> {
        candidate.dates.iter().copied().collect()
    }

    #[test]
    fn combinations_enumerate_in_order() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        assert_eq!(Combinations::new(20, 10).count(), 184_756);
        assert_eq!(Combinations::new(3, 3).count(), 1);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn search_mode_threshold() {
        assert_eq!(SearchMode::for_pool(20, 20), SearchMode::Exhaustive);
        assert_eq!(SearchMode::for_pool(21, 20), SearchMode::Heuristic);
    }

    #[test]
    fn exhaustive_extends_holiday_block() {
        // 19 eligible workdays
        let days = july_with_holiday_block();
        let result = select(&days, 3, &VacationConstraints::new(), &PlannerConfig::default());

        assert!(!result.is_empty());
        assert_eq!(
            dates(&result[0]),
            vec![date(2025, 7, 7), date(2025, 7, 8), date(2025, 7, 9)]
        );
        assert_eq!(result[0].score, 300.0);
        // C(19, 3) leave sets, all valid
        assert_eq!(result.len(), 969);
        assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn empty_when_request_does_not_fit() {
        let days = july_with_holiday_block();
        let none = VacationConstraints::new();
        let config = PlannerConfig::default();

        assert!(select(&days, 0, &none, &config).is_empty());
        assert!(select(&days, 20, &none, &config).is_empty());
        assert!(select(&days[..2], 1, &none, &config).is_empty());
    }

    #[test]
    fn excluded_days_leave_the_pool() {
        let days = july_with_holiday_block();
        let constraints = VacationConstraints::new()
            .exclude(date(2025, 7, 7))
            .exclude(date(2025, 7, 8));
        let result = select(&days, 2, &constraints, &PlannerConfig::default());

        assert!(result
            .iter()
            .all(|c| !c.dates.contains(&date(2025, 7, 7)) && !c.dates.contains(&date(2025, 7, 8))));
    }

    #[test]
    fn max_plans_caps_output() {
        let days = july_with_holiday_block();
        let config = PlannerConfig::default().max_plans(5);
        let result = select(&days, 3, &VacationConstraints::new(), &config);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn heuristic_extends_golden_week() {
        let cal = HolidayCalendar::china().unwrap();
        let days = records(&cal, date(2025, 9, 1), date(2025, 10, 31));
        let result = select(&days, 3, &VacationConstraints::new(), &PlannerConfig::default());

        assert!(!result.is_empty());
        // Sun Sep 28 (make-up) to Tue Sep 30 joins Sat Sep 27 to the
        // eight-day holiday; Oct 9-11 ties from the other side.
        assert_eq!(result[0].score, 400.0);
    }

    #[test]
    fn heuristic_respects_mandatory_windows() {
        let cal = HolidayCalendar::china().unwrap();
        let days = records(&cal, date(2025, 6, 1), date(2025, 8, 31));
        let constraints = VacationConstraints::new()
            .require(date(2025, 6, 10), date(2025, 6, 30), 3)
            .require(date(2025, 7, 15), date(2025, 7, 31), 4)
            .require(date(2025, 8, 1), date(2025, 8, 15), 2);

        let result = select(&days, 10, &constraints, &PlannerConfig::default());
        assert!(!result.is_empty());
        for candidate in &result {
            assert_eq!(candidate.dates.len(), 10);
            assert!(validate(&candidate.dates, &days, &constraints));
        }
    }

    #[test]
    fn heuristic_mandatory_over_budget_is_empty() {
        let cal = HolidayCalendar::china().unwrap();
        let days = records(&cal, date(2025, 6, 1), date(2025, 8, 31));
        let constraints = VacationConstraints::new().require(date(2025, 7, 1), date(2025, 7, 31), 8);
        assert!(select(&days, 5, &constraints, &PlannerConfig::default()).is_empty());
    }

    #[test]
    fn heuristic_zero_limit_isolates_days() {
        // August 2025 has 21 workdays and no holidays
        let days = records(&HolidayCalendar::default(), date(2025, 8, 1), date(2025, 8, 31));
        let constraints = VacationConstraints::new().max_continuous(0);
        let result = select(&days, 5, &constraints, &PlannerConfig::default());

        assert!(!result.is_empty());
        for candidate in &result {
            assert_eq!(longest_leave_only_run(&candidate.dates, &days), 1);
        }
    }

    #[test]
    fn bridge_seed_joins_blocks() {
        // Thu May 1 - Sun May 4 off, then a lone Monday workday, then a holiday Tuesday
        let cal = HolidayCalendar::default()
            .with_holiday("Labour Day", date(2025, 5, 1), date(2025, 5, 4))
            .with_holiday("Extra", date(2025, 5, 6), date(2025, 5, 6));
        let days = records(&cal, date(2025, 4, 1), date(2025, 5, 31));
        let constraints = VacationConstraints::new();
        let config = PlannerConfig::default();
        let search = Search::new(&days, 1, &constraints, &config);

        let seeds = search.bridge_seeds(&BTreeSet::new(), 1);
        assert!(seeds.contains(&BTreeSet::from([date(2025, 5, 5)])));

        let result = select(&days, 1, &constraints, &config);
        assert_eq!(dates(&result[0]), vec![date(2025, 5, 5)]);
    }

    #[test]
    fn weighted_scoring_changes_ranking_model() {
        let days = july_with_holiday_block();
        let config = PlannerConfig::default().scoring(ScoringModel::Weighted);
        let result = select(&days, 2, &VacationConstraints::new(), &config);

        assert!(!result.is_empty());
        assert!(result.iter().all(|c| c.score.is_finite() && c.score > 0.0));
        assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
