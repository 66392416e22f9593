use std::collections::HashSet;

/// Per-result statistics feeding the reorder cost model: how often an
/// instance of this kind succeeds, and how expensive one call is.
#[derive(Copy, Clone, Debug)]
pub struct Stat {
    pub p_success: f64,
    pub overhead: f64,
}

impl Default for Stat {
    fn default() -> Self {
        Stat { p_success: 1.0, overhead: 1.0 }
    }
}

/// Caps the bitmask DP's input size. A stream plan this large is already
/// past what the focused loop is meant to handle in one skeleton; beyond
/// this the caller should fall back to the plan's original order.
pub const MAX_DP_VERTICES: usize = 20;

/// Finds the vertex order minimizing expected sampling cost, subject to the
/// precedence pairs in `orders` (`(i, j)` meaning `i` before `j`).
///
/// Cost model: clearing a remaining set `S` starting now costs
/// `overhead(v) + p_success(v) * cost(S \ {v})` for whichever `v` is chosen
/// to go first (only legal if none of `v`'s predecessors are still in `S`).
/// This rewards moving cheap, reliable streams earlier, since an upstream
/// failure is assumed to abandon everything still queued behind it. Solved
/// by a standard subset DP: `2^n` reachable states, `O(n)` per state.
pub fn dynamic_programming(n: usize, orders: &HashSet<(usize, usize)>, stats: &[Stat]) -> Vec<usize> {
    assert!(n <= MAX_DP_VERTICES, "bitmask reorder DP caps at {MAX_DP_VERTICES} stream results");
    assert_eq!(stats.len(), n);

    let mut pred_mask = vec![0u32; n];
    for &(p, q) in orders {
        pred_mask[q] |= 1 << p;
    }

    let full = (1u32 << n) - 1;
    // memo[mask] = (expected cost to clear `mask`, vertex chosen as head)
    let mut memo: Vec<Option<(f64, usize)>> = vec![None; 1 << n];
    memo[0] = Some((0.0, usize::MAX));

    for mask in 1..=full {
        let mut best: Option<(f64, usize)> = None;
        for v in 0..n {
            let bit = 1u32 << v;
            if mask & bit == 0 || pred_mask[v] & mask != 0 {
                continue;
            }
            let rest = mask & !bit;
            let Some((rest_cost, _)) = memo[rest as usize] else { continue };
            let cost = stats[v].overhead + stats[v].p_success * rest_cost;
            let better = match best {
                Some((best_cost, _)) => cost < best_cost,
                None => true,
            };
            if better {
                best = Some((cost, v));
            }
        }
        memo[mask as usize] = best;
    }

    let mut order = Vec::with_capacity(n);
    let mut mask = full;
    while mask != 0 {
        let (_, head) = memo[mask as usize].expect("every reachable mask has a legal head under an acyclic partial order");
        order.push(head);
        mask &= !(1 << head);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheap_reliable_results_move_earlier() {
        let stats = vec![
            Stat { p_success: 0.5, overhead: 10.0 },
            Stat { p_success: 0.99, overhead: 0.1 },
        ];
        let order = dynamic_programming(2, &HashSet::new(), &stats);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn partial_order_is_respected_even_when_costlier() {
        let mut orders = HashSet::new();
        orders.insert((0, 1));
        let stats = vec![
            Stat { p_success: 0.5, overhead: 10.0 },
            Stat { p_success: 0.99, overhead: 0.1 },
        ];
        let order = dynamic_programming(2, &orders, &stats);
        assert_eq!(order, vec![0, 1]);
    }
}
