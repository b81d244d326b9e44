use crate::{AnnealError, AuctionSnapshot};
use tracing::{Level, event};

/// A dense, square matrix of pairwise couplings between bids.
///
/// Stored row-major. Symmetric with a zero diagonal by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Couplings {
    size: usize,
    values: Vec<f64>,
}

impl Couplings {
    fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }

    /// The coupling between bids `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Row `i` of the matrix
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// The number of rows (and columns)
    pub fn len(&self) -> usize {
        self.size
    }

    /// Is this the 0×0 matrix?
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Copy the matrix out as nested rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}

/// The Ising-style model of a clearing round: local fields `h` and couplings `J`.
///
/// The total benefit of an activation vector `a` is
///
/// ```text
/// Σ_i a_i·h_i + Σ_i Σ_j a_i·a_j·J_ij
/// ```
///
/// with the double sum running over ordered pairs, so every interacting pair is
/// counted twice. Higher is better. Couplings are non-positive: an exclusive
/// pair costs `penalty` (twice), and every item two bids share costs the sum of
/// their prices (twice).
#[derive(Clone, Debug, PartialEq)]
pub struct CouplingGraph {
    fields: Vec<f64>,
    couplings: Couplings,
    penalty: f64,
}

impl CouplingGraph {
    /// Translate a snapshot into fields and couplings.
    pub fn build(snapshot: &AuctionSnapshot) -> Self {
        let items = snapshot.items();
        let bids = snapshot.bids();
        let n = bids.len();

        // The surplus of accepting a bid on its own
        let fields = (0..n)
            .map(|i| {
                let reserve = snapshot
                    .coverage(i)
                    .iter()
                    .map(|&idx| items[idx].min_price)
                    .sum::<f64>();
                bids[i].price - reserve
            })
            .collect::<Vec<_>>();

        let penalty = exclusion_penalty(&fields);

        let mut couplings = Couplings::zeros(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let mut coupling = if snapshot.are_exclusive(i, j) {
                    penalty
                } else {
                    0.0
                };
                let shared = snapshot.shared_items(i, j);
                for _ in 0..shared {
                    coupling += bids[i].price + bids[j].price;
                }
                if coupling != 0.0 {
                    couplings.set_pair(i, j, -coupling);
                }
            }
        }

        event!(
            Level::DEBUG,
            bids = n,
            items = items.len(),
            penalty,
            "computed fields and couplings"
        );

        Self {
            fields,
            couplings,
            penalty,
        }
    }

    /// The number of bids (spins) in the model
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Does the model have no bids at all?
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The local field of every bid
    pub fn local_fields(&self) -> &[f64] {
        &self.fields
    }

    /// The coupling matrix
    pub fn couplings(&self) -> &Couplings {
        &self.couplings
    }

    /// The magnitude charged for keeping an exclusive pair active
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// The total benefit of an activation vector, recomputed from scratch.
    pub fn total_benefit(&self, active: &[bool]) -> Result<f64, AnnealError> {
        if active.len() != self.len() {
            return Err(AnnealError::LengthMismatch {
                expected: self.len(),
                found: active.len(),
            });
        }
        Ok(self.benefit(active))
    }

    // O(n²); callers guarantee the length
    pub(crate) fn benefit(&self, active: &[bool]) -> f64 {
        let mut total = 0.0;
        for (i, _) in active.iter().enumerate().filter(|(_, a)| **a) {
            total += self.fields[i];
            let row = self.couplings.row(i);
            for (j, _) in active.iter().enumerate().filter(|(_, a)| **a) {
                total += row[j];
            }
        }
        total
    }

    /// The change in total benefit caused by toggling bit `n` of `active`.
    ///
    /// Because the double sum counts both `J_nj` and `J_jn`, the interaction
    /// term enters twice.
    pub(crate) fn flip_delta(&self, active: &[bool], n: usize) -> f64 {
        let row = self.couplings.row(n);
        let interaction = active
            .iter()
            .zip(row)
            .filter(|(a, _)| **a)
            .map(|(_, j)| j)
            .sum::<f64>();
        let local = self.fields[n] + 2.0 * interaction;
        if active[n] { -local } else { local }
    }
}

// Twice the largest field, so that no combination of surpluses can pay for an
// exclusion violation.
//
// The plain `2·max(h)` would be zero or positive (a reward for exclusive
// pairs) when no bid has a positive surplus. In that case this departs from
// the formula and uses twice the largest magnitude instead, and 1 if every
// field is zero, so exclusive couplings stay strictly negative.
fn exclusion_penalty(fields: &[f64]) -> f64 {
    let max = fields.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if fields.is_empty() {
        0.0
    } else if max > 0.0 {
        2.0 * max
    } else {
        let magnitude = fields.iter().map(|h| h.abs()).fold(0.0, f64::max);
        if magnitude > 0.0 { 2.0 * magnitude } else { 1.0 }
    }
}
