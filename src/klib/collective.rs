use std::sync::{Arc, Condvar, Mutex};

/// The three reductions the parallel coordinator needs from its
/// message-passing substrate. All are collective: every rank must
/// arrive before any proceeds, and every rank leaves with the same
/// reduced values.
pub trait Collective {
    fn rank(&self) -> usize;
    fn nranks(&self) -> usize;
    /// Element-wise logical-OR (max) across ranks.
    fn allreduce_max_flags(&self, flags: &mut [bool]);
    /// Scalar logical-OR (max) across ranks.
    fn allreduce_max_flag(&self, flag: bool) -> bool;
    /// Component-wise sum across ranks.
    fn allreduce_sum(&self, values: &mut [f32]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReduceOp {
    Max,
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Gather,
    Scatter,
}

#[derive(Debug)]
struct Round {
    phase: Phase,
    arrived: usize,
    op: ReduceOp,
    contributions: Vec<Option<Vec<f32>>>,
    reduced: Vec<f32>,
}

#[derive(Debug)]
struct Shared {
    nranks: usize,
    round: Mutex<Round>,
    arrivals: Condvar,
}

/// Same-process collective channel: one handle per worker thread.
/// Contributions are folded in rank order so reduced sums are
/// reproducible run to run regardless of arrival order. A poisoned
/// lock means a peer panicked mid-collective; the whole job aborts
/// rather than recovering locally.
#[derive(Debug)]
pub struct ThreadCollective {
    rank: usize,
    shared: Arc<Shared>,
}

impl ThreadCollective {
    /// Build one connected handle per rank.
    pub fn ranks(nranks: usize) -> Vec<ThreadCollective> {
        let shared = Arc::new(Shared {
            nranks,
            round: Mutex::new(Round {
                phase: Phase::Gather,
                arrived: 0,
                op: ReduceOp::Max,
                contributions: vec![None; nranks],
                reduced: Vec::new(),
            }),
            arrivals: Condvar::new(),
        });
        (0..nranks)
            .map(|rank| ThreadCollective {
                rank,
                shared: shared.clone(),
            })
            .collect()
    }

    fn allreduce(&self, values: &mut [f32], op: ReduceOp) {
        let shared = &self.shared;
        let mut round = shared.round.lock().unwrap();

        // a previous round may still be draining
        while round.phase == Phase::Scatter {
            round = shared.arrivals.wait(round).unwrap();
        }

        if round.arrived == 0 {
            round.op = op;
        } else {
            assert_eq!(round.op, op, "ranks disagree on the collective op");
        }
        round.contributions[self.rank] = Some(values.to_vec());
        round.arrived += 1;

        if round.arrived == shared.nranks {
            round.reduced = fold(&mut round.contributions, op);
            round.phase = Phase::Scatter;
            shared.arrivals.notify_all();
        } else {
            while round.phase == Phase::Gather {
                round = shared.arrivals.wait(round).unwrap();
            }
        }

        values.copy_from_slice(&round.reduced);
        round.arrived -= 1;
        if round.arrived == 0 {
            round.phase = Phase::Gather;
            shared.arrivals.notify_all();
        }
    }
}

fn fold(contributions: &mut [Option<Vec<f32>>], op: ReduceOp) -> Vec<f32> {
    let mut parts = contributions.iter_mut().map(|c| c.take().unwrap());
    let mut reduced = parts.next().unwrap();
    for part in parts {
        assert_eq!(part.len(), reduced.len(), "ranks disagree on vector length");
        for (acc, v) in reduced.iter_mut().zip(part) {
            *acc = match op {
                ReduceOp::Max => acc.max(v),
                ReduceOp::Sum => *acc + v,
            };
        }
    }
    reduced
}

impl Collective for ThreadCollective {
    fn rank(&self) -> usize {
        self.rank
    }

    fn nranks(&self) -> usize {
        self.shared.nranks
    }

    fn allreduce_max_flags(&self, flags: &mut [bool]) {
        let mut lifted: Vec<f32> = flags.iter().map(|&f| if f { 1.0 } else { 0.0 }).collect();
        self.allreduce(&mut lifted, ReduceOp::Max);
        for (flag, v) in flags.iter_mut().zip(lifted) {
            *flag = v != 0.0;
        }
    }

    fn allreduce_max_flag(&self, flag: bool) -> bool {
        let mut lifted = [if flag { 1.0 } else { 0.0 }];
        self.allreduce(&mut lifted, ReduceOp::Max);
        lifted[0] != 0.0
    }

    fn allreduce_sum(&self, values: &mut [f32]) {
        self.allreduce(values, ReduceOp::Sum);
    }
}
