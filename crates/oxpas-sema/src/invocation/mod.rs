// invocation/mod.rs
//
// Overload resolution: rank candidates per argument, drop incompatible ones,
// keep the Pareto frontier and break remaining ties by aggregate fit.

mod candidate;
mod compare;
mod equality;

pub use candidate::{Invocable, InvocationCandidate};
pub use compare::TypeComparer;
pub use equality::{EqualityType, ParamRank};

use crate::type_arena::TypeArena;
use crate::type_arena::TypeId;

#[derive(Debug, Default, Clone)]
pub struct InvocationResolver {
    candidates: Vec<InvocationCandidate>,
}

impl InvocationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_candidate(&mut self, candidate: InvocationCandidate) {
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[InvocationCandidate] {
        &self.candidates
    }

    /// Rank every candidate against the argument types and drop those that
    /// cannot take the arguments.
    pub fn process_candidates(&mut self, arena: &TypeArena, args: &[TypeId]) {
        let comparer = TypeComparer::new(arena);
        for candidate in &mut self.candidates {
            let required = candidate.params.iter().filter(|p| !p.has_default).count();
            if args.len() > candidate.params.len() || args.len() < required {
                candidate.ranks = vec![ParamRank::INCOMPATIBLE];
                continue;
            }
            candidate.ranks = args
                .iter()
                .zip(&candidate.params)
                .map(|(&arg, param)| comparer.compare_param(arg, param))
                .collect();
        }
        let before = self.candidates.len();
        self.candidates.retain(InvocationCandidate::is_compatible);
        tracing::trace!(
            before,
            after = self.candidates.len(),
            "dropped incompatible candidates"
        );
    }

    /// The best candidates: the Pareto frontier, narrowed to the candidates
    /// with the best aggregate fit. More than one result is a tie.
    pub fn choose_best(self) -> Vec<InvocationCandidate> {
        let frontier: Vec<InvocationCandidate> = self
            .candidates
            .iter()
            .filter(|c| !self.candidates.iter().any(|other| other.dominates(c)))
            .cloned()
            .collect();
        let Some(best) = frontier.iter().map(InvocationCandidate::tie_key).min() else {
            return frontier;
        };
        frontier
            .into_iter()
            .filter(|c| c.tie_key() == best)
            .collect()
    }
}
