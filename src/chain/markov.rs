use rand::Rng;
use tracing::debug;

use crate::{
    chain::ReCom,
    error::{RecomError, Result},
    partition::Partition,
};

/// One state yielded by a [`MarkovChain`].
#[derive(Clone, Debug)]
pub struct ChainState {
    /// 0 for the initial plan.
    pub step: usize,
    /// Whether this step moved to a new plan. Always true for the initial plan.
    pub accepted: bool,
    pub partition: Partition,
}

/// Iterator over the plans of a ReCom chain.
///
/// Yields the initial plan followed by `total_steps - 1` further states. A proposal is accepted
/// when it succeeded and every district is within the population tolerance of the proposal's
/// parameters; otherwise the current plan is yielded again. Configuration errors end the chain.
pub struct MarkovChain<'r, R: Rng + ?Sized> {
    proposal: ReCom,
    state: Partition,
    total_steps: usize,
    step: usize,
    accepted: usize,
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> MarkovChain<'r, R> {
    /// Fails if the initial plan is itself outside the population tolerance.
    pub fn new(proposal: ReCom, initial: Partition, total_steps: usize, rng: &'r mut R) -> Result<Self> {
        let params = proposal.params();
        if !initial.within_population_tolerance(&params.pop_column, params.pop_target, params.epsilon)? {
            return Err(RecomError::InvalidConfig(format!(
                "initial plan is not within {} of the ideal population {}", params.epsilon, params.pop_target
            )));
        }
        Ok(Self { proposal, state: initial, total_steps, step: 0, accepted: 0, rng })
    }

    /// The current plan.
    #[inline] pub fn state(&self) -> &Partition { &self.state }

    /// Number of accepted proposals so far.
    #[inline] pub fn accepted(&self) -> usize { self.accepted }

    #[inline] pub fn total_steps(&self) -> usize { self.total_steps }

    /// Consume the chain, returning the current plan.
    pub fn into_state(self) -> Partition { self.state }

    fn advance(&mut self) -> Result<bool> {
        let params = self.proposal.params();
        let Some(next) = self.proposal.propose(&self.state, &mut *self.rng)? else { return Ok(false) };
        if !next.within_population_tolerance(&params.pop_column, params.pop_target, params.epsilon)? {
            return Ok(false);
        }
        self.state = next;
        Ok(true)
    }
}

impl<R: Rng + ?Sized> Iterator for MarkovChain<'_, R> {
    type Item = Result<ChainState>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.total_steps { return None }

        let step = self.step;
        self.step += 1;

        let accepted = if step == 0 { true } else {
            match self.advance() {
                Ok(accepted) => accepted,
                Err(err) => {
                    self.step = self.total_steps;
                    return Some(Err(err));
                }
            }
        };
        if step > 0 && accepted { self.accepted += 1 }
        debug!(step, accepted, "chain step");

        Some(Ok(ChainState { step, accepted, partition: self.state.clone() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_steps - self.step;
        (0, Some(remaining))
    }
}
