//! Serves a loaded cassette back one call at a time.

use std::collections::{BTreeMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Interactions still to be served for one `port::method`.
#[derive(Debug, Default)]
struct Pending {
    queue: VecDeque<Interaction>,
    served: usize,
}

/// Hands out recorded interactions in recording order, independently for
/// each `port::method` pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    pending: BTreeMap<(String, String), Pending>,
}

impl CassetteReplayer {
    /// Indexes the cassette's interactions by port and method.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut ordered: Vec<&Interaction> = cassette.interactions.iter().collect();
        ordered.sort_by_key(|i| i.seq);

        let mut pending: BTreeMap<(String, String), Pending> = BTreeMap::new();
        for interaction in ordered {
            let key = (interaction.port.clone(), interaction.method.clone());
            pending.entry(key).or_default().queue.push_back(interaction.clone());
        }
        Self { pending }
    }

    /// Takes the next recorded interaction for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics when nothing was ever recorded for the pair, listing the pairs
    /// the cassette does hold, or when every recorded call has been served.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(pending) = self.pending.get_mut(&key) else {
            let recorded: Vec<String> = self.pending.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            panic!(
                "cassette has no interactions recorded for {port}::{method}; it holds [{}]",
                recorded.join(", ")
            );
        };

        let Some(interaction) = pending.queue.pop_front() else {
            panic!(
                "cassette exhausted for {port}::{method}: all {} recorded calls were already served",
                pending.served
            );
        };
        pending.served += 1;
        interaction
    }
}
