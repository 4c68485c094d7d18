//! ReCom Markov chain: proposal, iterator, and JSON-lines recording.

mod markov;
mod proposal;
mod recorder;

pub use markov::{ChainState, MarkovChain};
pub use proposal::ReCom;
pub use recorder::ChainRecorder;
