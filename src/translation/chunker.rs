/*!
 * Token-budgeted chunking.
 *
 * Pending units are grouped into contiguous, order-preserving chunks whose
 * summed source cost stays within the active budget. A unit that is larger
 * than the budget on its own still gets a chunk of its own.
 */

use crate::memory::TmMatches;

/// A group of units sent to the engine in one request
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Position of the chunk within its round
    pub order: usize,
    /// Batch indices of the chunk's units, ascending
    pub units: Vec<usize>,
    /// Union of the TM pairs found for the chunk's units
    pub tm_examples: TmMatches,
}

/// Partition `pending` (ascending batch indices) into chunks of at most `budget` tokens
///
/// `costs` and `examples` are indexed by batch index. A chunk is flushed
/// before a unit that would push it over the budget.
pub fn build_chunks(pending: &[usize], costs: &[usize], examples: &[TmMatches], budget: usize) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_cost = 0;

    for &index in pending {
        let cost = costs.get(index).copied().unwrap_or(0);
        if !current.is_empty() && current_cost + cost > budget {
            chunks.push(new_chunk(chunks.len(), std::mem::take(&mut current), examples));
            current_cost = 0;
        }
        current.push(index);
        current_cost += cost;
    }

    if !current.is_empty() {
        chunks.push(new_chunk(chunks.len(), current, examples));
    }

    chunks
}

fn new_chunk(order: usize, units: Vec<usize>, examples: &[TmMatches]) -> Chunk {
    let tm_examples = units
        .iter()
        .filter_map(|&index| examples.get(index))
        .flat_map(|matches| matches.iter().map(|(source, target)| (source.clone(), target.clone())))
        .collect();

    Chunk {
        order,
        units,
        tm_examples,
    }
}
