//! "Recently added" heuristic over `/coins/list`
//!
//! The list endpoint carries no listing date. Ids of newer listings tend to end
//! in a higher number (`foo`, `foo-2`, `foo10`), so the trailing number of the
//! id is used as a proxy for recency.

use md_types::CoinListEntry;

/// Trailing run of ASCII digits in `id`, 0 when there is none
pub fn trailing_number(id: &str) -> u64 {
    let digits = id.len() - id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return 0;
    }
    // Saturate absurdly long digit runs instead of failing the whole sort
    id[id.len() - digits..].parse().unwrap_or(u64::MAX)
}

/// Sort by trailing number, highest first, and keep `limit` entries
///
/// The sort is stable: coins with equal numbers keep their upstream order.
pub fn select_recently_added(mut coins: Vec<CoinListEntry>, limit: usize) -> Vec<CoinListEntry> {
    coins.sort_by_key(|coin| std::cmp::Reverse(trailing_number(&coin.id)));
    coins.truncate(limit);
    coins
}
