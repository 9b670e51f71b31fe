//! Lazily ordered search results.
//!
//! A [`SearchResult`] holds the matching set ids and their scores in set-id
//! order. Ordering is deferred until a window is read:
//!
//! ```text
//! get(Some(2))   select_nth + sort the top 2      order_for = Top(2)
//! get(Some(1))   reuse (Top(2) covers Top(1))
//! get(None)      full sort                        order_for = All
//! get(Some(5))   reuse (All covers everything)
//! ```
//!
//! Results are ranked by score, highest first. Equal scores rank the higher
//! set id first.

use core::cmp::Ordering;

use setdex_types::SetId;

use crate::index::types::Payloads;

/// A prefix of the ranked results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Top(usize),
    All,
}

impl Window {
    /// Normalizes a requested bound against the result length, so that a
    /// bound at or past the end is [`Window::All`].
    fn bounded(max_results: Option<usize>, len: usize) -> Self {
        match max_results {
            Some(n) if n < len => Window::Top(n),
            _ => Window::All,
        }
    }

    fn covers(self, other: Window) -> bool {
        match (self, other) {
            (Window::All, _) => true,
            (Window::Top(_), Window::All) => false,
            (Window::Top(a), Window::Top(b)) => a >= b,
        }
    }

    fn take(self, len: usize) -> usize {
        match self {
            Window::Top(n) => n.min(len),
            Window::All => len,
        }
    }
}

/// Scored matches of one query, borrowing the index's payload table.
///
/// `Sc` is the score type: intersection counts for `find`, similarities for
/// `find_similar`.
#[derive(Debug, Clone)]
pub struct SearchResult<'a, P, Sc> {
    set_ids: Vec<SetId>,
    scores: Vec<Sc>,
    sets: &'a [Payloads<P>],
    cap: Option<usize>,
    /// Positions into `set_ids`/`scores`, best first.
    order: Vec<usize>,
    order_for: Option<Window>,
    list: Vec<(Sc, &'a [P])>,
    list_for: Option<Window>,
}

impl<'a, P, Sc: PartialOrd + Copy> SearchResult<'a, P, Sc> {
    /// Wraps matches given in ascending set-id order.
    ///
    /// `cap` bounds every window read from this result.
    pub fn new(
        set_ids: Vec<SetId>,
        scores: Vec<Sc>,
        sets: &'a [Payloads<P>],
        cap: Option<usize>,
    ) -> Self {
        debug_assert_eq!(set_ids.len(), scores.len());
        Self {
            set_ids,
            scores,
            sets,
            cap,
            order: Vec::new(),
            order_for: None,
            list: Vec::new(),
            list_for: None,
        }
    }

    /// A result with no matches.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), &[], None)
    }

    /// Number of matching sets, regardless of any cap.
    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether nothing matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterates the best `max_results` matches (all if `None`) as
    /// `(score, payloads)` pairs, best first.
    ///
    /// The ranking is cached; a request no wider than an earlier one reuses it.
    pub fn get(
        &mut self,
        max_results: Option<usize>,
    ) -> impl Iterator<Item = (Sc, &'a [P])> + '_ {
        let window = self.window(max_results);
        self.ensure_order(window);

        let take = window.take(self.order.len());
        let (scores, set_ids, sets) = (&self.scores, &self.set_ids, self.sets);
        self.order[..take]
            .iter()
            .map(move |&pos| (scores[pos], payloads_of(sets, set_ids[pos])))
    }

    /// Like [`get`](Self::get), but also caches the materialized list.
    pub fn get_list(&mut self, max_results: Option<usize>) -> &[(Sc, &'a [P])] {
        let window = self.window(max_results);
        if !self.list_for.is_some_and(|cached| cached.covers(window)) {
            let list: Vec<_> = self.get(max_results).collect();
            self.list = list;
            self.list_for = Some(window);
        }
        let take = window.take(self.list.len());
        &self.list[..take]
    }

    fn window(&self, max_results: Option<usize>) -> Window {
        let bound = match (max_results, self.cap) {
            (Some(n), Some(cap)) => Some(n.min(cap)),
            (n, cap) => n.or(cap),
        };
        Window::bounded(bound, self.scores.len())
    }

    fn ensure_order(&mut self, window: Window) {
        if self.order_for.is_some_and(|cached| cached.covers(window)) {
            return;
        }

        let (scores, set_ids) = (&self.scores, &self.set_ids);
        let rank = |&a: &usize, &b: &usize| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| set_ids[b].cmp(&set_ids[a]))
        };

        let mut order: Vec<usize> = (0..scores.len()).collect();
        match window {
            Window::Top(0) => order.clear(),
            Window::Top(n) => {
                order.select_nth_unstable_by(n - 1, rank);
                order.truncate(n);
                order.sort_unstable_by(rank);
            }
            Window::All => order.sort_unstable_by(rank),
        }

        self.order = order;
        self.order_for = Some(window);
    }
}

impl<'a, P, Sc: PartialOrd + Copy> IntoIterator for SearchResult<'a, P, Sc> {
    type Item = (Sc, &'a [P]);
    type IntoIter = std::vec::IntoIter<(Sc, &'a [P])>;

    /// Iterates every match (up to the cap), best first.
    fn into_iter(mut self) -> Self::IntoIter {
        self.get(None).collect::<Vec<_>>().into_iter()
    }
}

#[inline]
fn payloads_of<P>(sets: &[Payloads<P>], set_id: SetId) -> &[P] {
    sets.get(set_id as usize).map_or(&[], |p| p.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn table() -> Vec<Payloads<&'static str>> {
        vec![
            smallvec!["a"],
            smallvec!["b"],
            smallvec!["c", "c2"],
            smallvec!["d"],
        ]
    }

    fn ranked<'a>(
        result: &mut SearchResult<'a, &'static str, u64>,
        max: Option<usize>,
    ) -> Vec<(u64, &'a [&'static str])> {
        result.get(max).collect()
    }

    #[test]
    fn ranks_by_score_then_higher_set_id() {
        let sets = table();
        let mut result = SearchResult::new(vec![0, 1, 2, 3], vec![2, 3, 2, 1], &sets, None);
        let all = ranked(&mut result, None);
        let scores: Vec<u64> = all.iter().map(|(s, _)| *s).collect();
        assert_eq!(scores, vec![3, 2, 2, 1]);
        assert_eq!(all[0].1, &["b"]);
        assert_eq!(all[1].1, &["c", "c2"]);
        assert_eq!(all[2].1, &["a"]);
        assert_eq!(all[3].1, &["d"]);
    }

    #[test]
    fn windows_reuse_and_widen() {
        let sets = table();
        let mut result = SearchResult::new(vec![0, 1, 2, 3], vec![4, 3, 2, 1], &sets, None);

        assert_eq!(ranked(&mut result, Some(2)).len(), 2);
        assert_eq!(result.order_for, Some(Window::Top(2)));

        assert_eq!(ranked(&mut result, Some(1)).len(), 1);
        assert_eq!(result.order_for, Some(Window::Top(2)));

        assert_eq!(ranked(&mut result, Some(3)).len(), 3);
        assert_eq!(result.order_for, Some(Window::Top(3)));

        assert_eq!(ranked(&mut result, None).len(), 4);
        assert_eq!(result.order_for, Some(Window::All));

        assert_eq!(ranked(&mut result, Some(10)).len(), 4);
        assert_eq!(ranked(&mut result, Some(0)).len(), 0);
        assert_eq!(result.order_for, Some(Window::All));
    }

    #[test]
    fn top_window_matches_full_ranking_prefix() {
        let sets: Vec<Payloads<&'static str>> = (0..50).map(|_| smallvec!["x"]).collect();
        let scores: Vec<u64> = (0..50).map(|i| (i * 7) % 5).collect();
        let mut narrow = SearchResult::new((0..50).collect(), scores.clone(), &sets, None);
        let mut full = SearchResult::new((0..50).collect(), scores, &sets, None);

        let top: Vec<u64> = narrow.get(Some(12)).map(|(s, _)| s).collect();
        let all: Vec<u64> = full.get(None).map(|(s, _)| s).collect();
        assert_eq!(top, all[..12]);
    }

    #[test]
    fn get_list_caches() {
        let sets = table();
        let mut result = SearchResult::new(vec![0, 2], vec![1u64, 5], &sets, None);
        assert_eq!(result.get_list(Some(1)).len(), 1);
        assert_eq!(result.list_for, Some(Window::Top(1)));
        assert_eq!(result.get_list(None).len(), 2);
        assert_eq!(result.list_for, Some(Window::All));
        assert_eq!(result.get_list(Some(1))[0].0, 5);
        assert_eq!(result.list_for, Some(Window::All));
    }

    #[test]
    fn cap_bounds_every_window() {
        let sets = table();
        let mut result = SearchResult::new(vec![0, 1, 2, 3], vec![1, 2, 3, 4], &sets, Some(2));
        assert_eq!(result.len(), 4);
        assert_eq!(ranked(&mut result, None).len(), 2);
        assert_eq!(ranked(&mut result, Some(3)).len(), 2);
        assert_eq!(ranked(&mut result, Some(1)).len(), 1);
        assert_eq!(result.into_iter().count(), 2);
    }

    #[test]
    fn float_scores() {
        let sets = table();
        let result = SearchResult::new(vec![1, 3], vec![0.4f64, 0.75], &sets, None);
        let scores: Vec<f64> = result.into_iter().map(|(s, _)| s).collect();
        assert_eq!(scores, vec![0.75, 0.4]);
    }

    #[test]
    fn empty_result() {
        let mut result: SearchResult<'_, &str, u64> = SearchResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.get(None).count(), 0);
        assert_eq!(result.get(Some(3)).count(), 0);
        assert!(result.get_list(None).is_empty());
    }
}
