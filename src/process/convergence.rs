use rand::Rng;

use crate::primitives::mesh::Mesh;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Some vertices were recolored this step.
    Progressed { recolored: usize, remaining: usize },
    /// Every vertex already had the target color; nothing changed.
    Converged,
}

/// Recolors a bounded number of random vertices per frame until every vertex
/// carries the target color.
///
/// Indices not yet recolored in the current cycle are kept in `pending`, so
/// picking an unused index is a single random `swap_remove` and can never
/// pick the same index twice before the next [`reset`](Self::reset).
#[derive(Clone, Debug)]
pub struct ColorConvergence {
    len: usize,
    changes_per_step: usize,
    pending: Vec<usize>,
    converged: Vec<usize>,
}

impl ColorConvergence {
    /// A budget of zero is raised to one so every step makes progress.
    pub fn new(len: usize, changes_per_step: usize) -> Self {
        Self {
            len,
            changes_per_step: changes_per_step.max(1),
            pending: (0..len).collect(),
            converged: Vec::with_capacity(len),
        }
    }

    pub fn for_mesh(mesh: &Mesh, changes_per_step: usize) -> Self {
        Self::new(mesh.len(), changes_per_step)
    }

    /// Starts a new cycle: every index becomes eligible again.
    pub fn reset(&mut self) {
        self.converged.clear();
        self.pending.clear();
        self.pending.extend(0..self.len);
    }

    pub fn step<R: Rng + ?Sized>(&mut self, mesh: &mut Mesh, target: [f32; 3], rng: &mut R) -> StepOutcome {
        debug_assert_eq!(mesh.len(), self.len, "convergence state built for another mesh");

        if self.pending.is_empty() {
            return StepOutcome::Converged;
        }

        let mut recolored = 0;
        while recolored < self.changes_per_step && !self.pending.is_empty() {
            let slot = rng.gen_range(0..self.pending.len());
            let index = self.pending.swap_remove(slot);
            mesh.set_color(index, target);
            self.converged.push(index);
            recolored += 1;
        }
        log::trace!("recolored {} vertices, {} remaining", recolored, self.pending.len());

        StepOutcome::Progressed {
            recolored,
            remaining: self.pending.len(),
        }
    }

    /// Indices recolored in the current cycle, in the order they were picked.
    pub fn converged(&self) -> &[usize] {
        &self.converged
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_converged(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::primitives::vertex::Vertex;

    const RED: [f32; 3] = [1.0, 0.0, 0.0];
    const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

    fn gray_mesh(n: usize) -> Mesh {
        Mesh::new(vec![Vertex::new([0.0; 3], [0.5; 3]); n])
    }

    fn unique(indices: &[usize]) -> bool {
        indices.iter().collect::<HashSet<_>>().len() == indices.len()
    }

    #[test]
    fn converges_within_ceil_n_over_4_steps() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [1, 3, 4, 5, 17, 720] {
            let mut mesh = gray_mesh(n);
            let mut engine = ColorConvergence::for_mesh(&mesh, 4);
            for _ in 0..(n + 3) / 4 {
                engine.step(&mut mesh, RED, &mut rng);
            }
            assert_eq!(engine.converged().len(), n);
            assert!(engine.is_converged());
            assert!(mesh.vertices().iter().all(|v| v.color == RED));
        }
    }

    #[test]
    fn full_engine_does_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut mesh = gray_mesh(8);
        let mut engine = ColorConvergence::for_mesh(&mesh, 4);
        engine.step(&mut mesh, RED, &mut rng);
        engine.step(&mut mesh, RED, &mut rng);
        let converged = engine.converged().to_vec();

        for _ in 0..5 {
            assert_eq!(engine.step(&mut mesh, RED, &mut rng), StepOutcome::Converged);
        }
        assert_eq!(engine.converged(), &converged[..]);
        assert!(mesh.vertices().iter().all(|v| v.color == RED));
    }

    #[test]
    fn each_step_adds_exactly_min_of_budget_and_remaining() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut mesh = gray_mesh(10);
        let mut engine = ColorConvergence::for_mesh(&mesh, 4);

        let expected = [(4, 6), (4, 2), (2, 0)];
        for &(recolored, remaining) in &expected {
            let before = engine.converged().len();
            let outcome = engine.step(&mut mesh, RED, &mut rng);
            assert_eq!(outcome, StepOutcome::Progressed { recolored, remaining });
            assert_eq!(engine.converged().len(), before + recolored);
            assert!(unique(engine.converged()));
        }
        assert_eq!(engine.step(&mut mesh, RED, &mut rng), StepOutcome::Converged);
    }

    #[test]
    fn never_reselects_within_a_cycle() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut mesh = gray_mesh(720);
        let mut engine = ColorConvergence::for_mesh(&mesh, 4);
        while !engine.is_converged() {
            engine.step(&mut mesh, BLUE, &mut rng);
            assert!(unique(engine.converged()));
            assert!(engine.converged().iter().all(|&i| i < 720));
            for &i in engine.converged() {
                assert_eq!(mesh.color(i), BLUE);
            }
        }
        let all: HashSet<usize> = engine.converged().iter().copied().collect();
        assert_eq!(all, (0..720).collect::<HashSet<usize>>());
    }

    #[test]
    fn reset_clears_cycle() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut mesh = gray_mesh(12);
        let mut engine = ColorConvergence::for_mesh(&mesh, 4);
        engine.step(&mut mesh, RED, &mut rng);
        engine.reset();
        assert!(engine.converged().is_empty());
        assert_eq!(engine.remaining(), 12);

        let mut seen = HashSet::new();
        while !engine.is_converged() {
            engine.step(&mut mesh, BLUE, &mut rng);
            for &i in engine.converged() {
                seen.insert(i);
            }
            assert!(unique(engine.converged()));
        }
        assert_eq!(seen.len(), 12);
        assert!(mesh.vertices().iter().all(|v| v.color == BLUE));
    }

    #[test]
    fn four_vertices_turn_red() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut mesh = gray_mesh(4);
        let mut engine = ColorConvergence::for_mesh(&mesh, 4);
        let outcomes: Vec<_> = (0..4).map(|_| engine.step(&mut mesh, RED, &mut rng)).collect();

        let mut converged = engine.converged().to_vec();
        converged.sort_unstable();
        assert_eq!(converged, vec![0, 1, 2, 3]);
        assert!(mesh.vertices().iter().all(|v| v.color == RED));
        assert_eq!(outcomes[3], StepOutcome::Converged);
    }

    #[test]
    fn switching_red_to_blue_mid_run() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut mesh = gray_mesh(4);
        let mut engine = ColorConvergence::for_mesh(&mesh, 1);
        engine.step(&mut mesh, RED, &mut rng);
        engine.step(&mut mesh, RED, &mut rng);
        assert_eq!(engine.converged().len(), 2);

        engine.reset();
        assert!(engine.converged().is_empty());

        let outcome = engine.step(&mut mesh, BLUE, &mut rng);
        assert_eq!(outcome, StepOutcome::Progressed { recolored: 1, remaining: 3 });
        let picked = engine.converged()[0];
        assert_eq!(engine.converged(), &[picked]);
        assert_eq!(mesh.color(picked), BLUE);
        assert_eq!(mesh.vertices().iter().filter(|v| v.color == BLUE).count(), 1);
    }

    #[test]
    fn zero_budget_still_makes_progress() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut mesh = gray_mesh(3);
        let mut engine = ColorConvergence::for_mesh(&mesh, 0);
        assert_eq!(
            engine.step(&mut mesh, RED, &mut rng),
            StepOutcome::Progressed { recolored: 1, remaining: 2 }
        );
        engine.step(&mut mesh, RED, &mut rng);
        engine.step(&mut mesh, RED, &mut rng);
        assert!(engine.is_converged());
        assert!(mesh.vertices().iter().all(|v| v.color == RED));
    }

    #[test]
    fn empty_mesh_is_already_converged() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut mesh = gray_mesh(0);
        let mut engine = ColorConvergence::for_mesh(&mesh, 4);
        assert!(engine.is_empty());
        assert_eq!(engine.step(&mut mesh, RED, &mut rng), StepOutcome::Converged);
    }
}
