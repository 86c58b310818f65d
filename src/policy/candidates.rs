use crate::state::PLAY_SIZE;

/// All k-element index subsets of `0..n` in lexicographic order.
fn k_subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        // Rightmost position that can still advance.
        let mut p = k;
        while p > 0 && idx[p - 1] == n - k + (p - 1) {
            p -= 1;
        }
        if p == 0 {
            break;
        }
        idx[p - 1] += 1;
        for q in p..k {
            idx[q] = idx[q - 1] + 1;
        }
    }
    out
}

/// PLAY candidates: the distinct 5-card index subsets of the current hand,
/// lexicographically ascending. For the standard 7-card hand this is the
/// full C(7,5) = 21 set.
pub fn play_candidates(hand_len: usize) -> Vec<[usize; PLAY_SIZE]> {
    k_subsets(hand_len, PLAY_SIZE)
        .into_iter()
        .map(|v| [v[0], v[1], v[2], v[3], v[4]])
        .collect()
}

/// DISCARD templates: "discard the k worst cards" for k in 1..=3, where
/// `worst_first` is the policy's retention ranking (most expendable first).
/// k = 0 ("do not discard") is representable only through the PLAY
/// candidates it competes against; it is not itself a legal action.
/// Returned index sets are sorted ascending.
pub fn discard_templates(
    worst_first: &[usize],
    d_remaining: u8,
    hand_len: usize,
) -> Vec<Vec<usize>> {
    let cap = 3usize.min(d_remaining as usize).min(hand_len);
    (1..=cap)
        .map(|k| {
            let mut indices = worst_first[..k].to_vec();
            indices.sort_unstable();
            indices
        })
        .collect()
}

/// Full DISCARD enumeration for exhaustive search: every index subset of
/// size 1..=min(hand, d_remaining), ordered by size then lexicographically.
/// Not the default; the template set above avoids the combinatorial blow-up.
pub fn enumerate_discards_full(hand_len: usize, d_remaining: u8) -> Vec<Vec<usize>> {
    let max_n = hand_len.min(d_remaining as usize);
    let mut out = Vec::new();
    for k in 1..=max_n {
        out.extend(k_subsets(hand_len, k));
    }
    out
}
