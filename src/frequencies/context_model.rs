// PPMX: a PPM context model coupled with a binary arithmetic coder
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::context_table::{ContextEntry, SymbolIndex};
use super::static_table::StaticFrequencyTable;
use super::{Cfi, Frequency, FrequencyTable};

use std::collections::{HashMap, HashSet};

/// The set of symbols already ruled out by a failed higher-order lookup during a single
/// encode/decode call. Fresh per call, grows monotonically as orders descend.
pub type ExclusionSet = HashSet<SymbolIndex>;

/// The adaptive (context -> symbol -> count) table that drives the PPM cascade.
///
/// Orders `0..=K` are each a map from a context (the trailing `order` symbols of history) to a
/// [`ContextEntry`]. Order `-1` is a separate, immutable fallback table built once at
/// construction (uniform, or seeded from a counts file by the harness) so it can never fail to
/// produce a symbol.
pub struct FrequencyModel {
    /// The ESC pseudo-symbol, always `alphabet_size` (N) + 1 for the harness' alphabet.
    esc_symbol: SymbolIndex,
    /// `orders[o]` holds every context of length `o` seen so far, `o` in `0..=max_order`.
    orders: Vec<HashMap<Vec<SymbolIndex>, ContextEntry>>,
    /// Order-(-1) fallback: never fails, ignores exclusion entirely.
    fallback: StaticFrequencyTable,
}

impl FrequencyModel {
    /// Builds an empty model for context orders `0..=max_order`, with `esc_symbol` used to seed
    /// every newly materialized context. `fallback` is the order-(-1) distribution (uniform or
    /// seeded by the harness) and must cover every normal symbol, including EOF.
    pub fn new(max_order: usize, esc_symbol: SymbolIndex, fallback: StaticFrequencyTable) -> Self {
        Self {
            esc_symbol,
            orders: (0..=max_order).map(|_| HashMap::new()).collect(),
            fallback,
        }
    }

    /// Returns the (possibly freshly materialized) entry for `ctx` at `order`.
    fn entry_mut(&mut self, order: usize, ctx: &[SymbolIndex]) -> &mut ContextEntry {
        let esc_symbol = self.esc_symbol;
        self.orders[order]
            .entry(ctx.to_vec())
            .or_insert_with(|| ContextEntry::new(esc_symbol))
    }

    /// Looks up the entry for `ctx` at `order` without creating it. Used by tests and model
    /// introspection; the encode/decode paths always go through `interval`/`query`, which create
    /// contexts lazily on first visit.
    pub fn peek(&self, order: usize, ctx: &[SymbolIndex]) -> Option<&ContextEntry> {
        self.orders.get(order)?.get(ctx)
    }

    /// Computes the CFI of `symbol` at `(order, ctx)` under PPM exclusion, materializing the
    /// context if this is its first visit. Every non-ESC symbol encountered during the walk -
    /// matched or not - is added to `exclude` unless it was already excluded, in which case it
    /// contributes nothing to the total. Returns `None` if `symbol` isn't present (or only
    /// present in an already-excluded state).
    pub fn interval(
        &mut self,
        order: isize,
        ctx: &[SymbolIndex],
        symbol: SymbolIndex,
        exclude: &mut ExclusionSet,
    ) -> Option<Cfi> {
        if order < 0 {
            return self.fallback.get_cfi(symbol);
        }

        let entry = self.entry_mut(order as usize, ctx);
        let esc_symbol = self.esc_symbol;

        let mut acc: u64 = 0;
        let mut matched = None;
        for (s, count) in entry.iter() {
            let contributes = s == esc_symbol || exclude_and_check(exclude, s);
            if contributes {
                let left = acc;
                acc += count;
                if s == symbol {
                    matched = Some((left, acc));
                }
            }
        }

        matched.map(|(left, right)| Cfi {
            start: Frequency::new(left).expect("model total exceeds the frequency bit width"),
            end: Frequency::new(right).expect("model total exceeds the frequency bit width"),
            total: Frequency::new(acc).expect("model total exceeds the frequency bit width"),
        })
    }

    /// Inverse of `interval`: given a cumulative point inside `[0, total)`, finds which symbol's
    /// sub-interval contains it, applying the same exclusion rule. Returns `None` only if `ctx`
    /// at `order` somehow has no included mass at all (should not happen: ESC always
    /// contributes).
    pub fn query(
        &mut self,
        order: isize,
        ctx: &[SymbolIndex],
        point: Frequency,
        exclude: &mut ExclusionSet,
    ) -> Option<(SymbolIndex, Cfi)> {
        if order < 0 {
            let index = self.fallback.get_index(point)?;
            return self.fallback.get_cfi(index).map(|cfi| (index, cfi));
        }

        let entry = self.entry_mut(order as usize, ctx);
        let esc_symbol = self.esc_symbol;
        let target = *point;

        let mut acc: u64 = 0;
        let mut matched: Option<(SymbolIndex, u64, u64)> = None;
        for (s, count) in entry.iter() {
            let contributes = s == esc_symbol || exclude_and_check(exclude, s);
            if contributes {
                let left = acc;
                acc += count;
                if matched.is_none() && target < acc {
                    matched = Some((s, left, acc));
                }
            }
        }

        matched.map(|(s, left, right)| {
            (
                s,
                Cfi {
                    start: Frequency::new(left).expect("model total exceeds the frequency bit width"),
                    end: Frequency::new(right).expect("model total exceeds the frequency bit width"),
                    total: Frequency::new(acc).expect("model total exceeds the frequency bit width"),
                },
            )
        })
    }

    /// Grand total of everything that contributes at `(order, ctx)` under `exclude`, without
    /// mutating it. Used by the decoder to turn its raw code window into a cumulative point
    /// *before* calling `query`, which mutates `exclude` for real as it walks the same entry.
    pub fn total(&mut self, order: isize, ctx: &[SymbolIndex], exclude: &ExclusionSet) -> Frequency {
        if order < 0 {
            return self.fallback.get_total();
        }

        let entry = self.entry_mut(order as usize, ctx);
        let esc_symbol = self.esc_symbol;
        let acc: u64 = entry
            .iter()
            .filter(|&(s, _)| s == esc_symbol || !exclude.contains(&s))
            .map(|(_, count)| count)
            .sum();

        Frequency::new(acc).expect("model total exceeds the frequency bit width")
    }

    /// Increments `symbol`'s count in `ctx` at `order`, materializing the context if absent.
    pub fn record(&mut self, order: usize, ctx: &[SymbolIndex], symbol: SymbolIndex) {
        self.entry_mut(order, ctx).record(symbol);
    }

    /// Preloads order-0 counts from a harness-provided histogram, giving the coder a warm start.
    pub fn seed(&mut self, symbol: SymbolIndex, count: u64) {
        self.entry_mut(0, &[]).overwrite(symbol, count);
    }

    pub fn esc_symbol(&self) -> SymbolIndex {
        self.esc_symbol
    }

    pub fn max_order(&self) -> usize {
        self.orders.len() - 1
    }
}

/// Returns whether `symbol` still contributes (i.e. is not already excluded), and if so, marks
/// it excluded for the remainder of the call.
fn exclude_and_check(exclude: &mut ExclusionSet, symbol: SymbolIndex) -> bool {
    if exclude.contains(&symbol) {
        false
    } else {
        exclude.insert(symbol);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESC: SymbolIndex = 3;

    fn uniform_fallback(alphabet: usize) -> StaticFrequencyTable {
        let freqs = vec![Frequency::one(); alphabet];
        StaticFrequencyTable::new(&freqs).unwrap()
    }

    #[test]
    fn fresh_context_only_yields_escape() {
        let mut model = FrequencyModel::new(2, ESC, uniform_fallback(3));
        let mut exclude = ExclusionSet::new();
        assert_eq!(model.interval(0, &[], 0, &mut exclude), None);

        let mut exclude = ExclusionSet::new();
        let cfi = model.interval(0, &[], ESC, &mut exclude).unwrap();
        assert_eq!(cfi.start, Frequency::zero());
        assert_eq!(cfi.end, Frequency::one());
        assert_eq!(cfi.total, Frequency::one());
    }

    #[test]
    fn record_then_interval_reflects_updated_counts() {
        let mut model = FrequencyModel::new(2, ESC, uniform_fallback(3));
        model.record(0, &[], 0);
        model.record(0, &[], 0);
        model.record(0, &[], 1);

        let mut exclude = ExclusionSet::new();
        let cfi = model.interval(0, &[], 0, &mut exclude).unwrap();
        assert_eq!(cfi.start, Frequency::zero());
        assert_eq!(cfi.end, Frequency::new(2).unwrap());
        assert_eq!(cfi.total, Frequency::new(4).unwrap());
    }

    #[test]
    fn excluded_symbols_contribute_nothing() {
        let mut model = FrequencyModel::new(2, ESC, uniform_fallback(3));
        model.record(0, &[], 0);
        model.record(0, &[], 1);

        let mut exclude = ExclusionSet::new();
        exclude.insert(0);
        // Symbol 0 is pre-excluded, so looking it up must fail even though it's present.
        assert_eq!(model.interval(0, &[], 0, &mut exclude), None);
        // Symbol 1 still succeeds, and the total excludes symbol 0's count.
        let cfi = model.interval(0, &[], 1, &mut exclude).unwrap();
        assert_eq!(cfi.total, Frequency::new(2).unwrap());
    }

    #[test]
    fn query_mirrors_interval_under_same_exclusion() {
        let mut model = FrequencyModel::new(2, ESC, uniform_fallback(3));
        model.record(0, &[], 5);
        model.record(0, &[], 7);

        let mut enc_exclude = ExclusionSet::new();
        let cfi = model.interval(0, &[], 7, &mut enc_exclude).unwrap();

        let mut dec_exclude = ExclusionSet::new();
        let (sym, decoded_cfi) = model.query(0, &[], cfi.start, &mut dec_exclude).unwrap();
        assert_eq!(sym, 7);
        assert_eq!(decoded_cfi, cfi);
        assert_eq!(dec_exclude, enc_exclude);
    }

    #[test]
    fn order_minus_one_ignores_exclusion_and_never_fails() {
        let mut model = FrequencyModel::new(1, ESC, uniform_fallback(4));
        let mut exclude = ExclusionSet::new();
        exclude.insert(2);
        let cfi = model.interval(-1, &[], 2, &mut exclude).unwrap();
        assert_eq!(cfi.start, Frequency::new(2).unwrap());
        assert_eq!(cfi.end, Frequency::new(3).unwrap());
    }

    #[test]
    fn seed_overwrites_order_zero_counts() {
        let mut model = FrequencyModel::new(1, ESC, uniform_fallback(3));
        model.seed(0, 40);
        model.seed(1, 10);

        let mut exclude = ExclusionSet::new();
        let cfi = model.interval(0, &[], 0, &mut exclude).unwrap();
        assert_eq!(cfi.end, Frequency::new(40).unwrap());
    }
}
