//! Minimum-size parse.
//!
//! Positions `0..=N` form a DAG whose edges only point forward: from `pos`
//! there is a reference edge for every length `3..=best` of the longest match
//! at `pos`, and a literal edge for every run of `1..=32` bytes. Each edge
//! weighs exactly its encoded size, so one forward relaxation pass over the
//! positions yields the smallest stream for the grammar.

use crate::block::{reference_cost, Block, BlockWriter, MAX_LITERAL_LEN, MIN_MATCH};
use crate::error::{Error, Result};
use crate::matcher::MatchFinder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Literal { length: usize },
    Reference { length: usize, distance: usize },
}

impl Edge {
    fn length(&self) -> usize {
        match *self {
            Edge::Literal { length } | Edge::Reference { length, .. } => length,
        }
    }
}

/// Cheapest known way to reach a position
#[derive(Clone, Copy, Debug)]
struct Step {
    cost: usize,
    /// Edge that arrives at this position; `None` only at position 0
    edge: Option<Edge>,
}

struct PredecessorTable {
    steps: Vec<Option<Step>>,
}

impl PredecessorTable {
    fn new(len: usize) -> Self {
        let mut steps = vec![None; len + 1];
        steps[0] = Some(Step { cost: 0, edge: None });
        Self { steps }
    }

    /// Relax the edge leaving `pos`; strictly cheaper paths replace the entry
    #[inline]
    fn relax(&mut self, pos: usize, base: usize, edge_cost: usize, edge: Edge) {
        let cost = base + edge_cost;
        let target = &mut self.steps[pos + edge.length()];
        if target.map_or(true, |step| cost < step.cost) {
            *target = Some(Step { cost, edge: Some(edge) });
        }
    }

    /// Edges of the cheapest path from 0 to the end, in forward order
    fn path(&self) -> Result<Vec<(usize, Edge)>> {
        let mut edges = Vec::new();
        let mut pos = self.steps.len() - 1;
        while pos > 0 {
            let edge = self.steps[pos]
                .and_then(|step| step.edge)
                .ok_or_else(|| Error::Internal(format!("position {} unreachable", pos)))?;
            pos -= edge.length();
            edges.push((pos, edge));
        }
        edges.reverse();
        Ok(edges)
    }
}

fn build_table(data: &[u8]) -> Result<PredecessorTable> {
    let mut table = PredecessorTable::new(data.len());
    let mut finder = MatchFinder::Exhaustive;

    for pos in 0..data.len() {
        let base = table.steps[pos]
            .map(|step| step.cost)
            .ok_or_else(|| Error::Internal(format!("position {} unreachable", pos)))?;

        if let Some(best) = finder.find(data, pos) {
            for length in MIN_MATCH..=best.length {
                let edge = Edge::Reference { length, distance: best.distance };
                table.relax(pos, base, reference_cost(length), edge);
            }
        }

        for length in 1..=MAX_LITERAL_LEN.min(data.len() - pos) {
            table.relax(pos, base, 1 + length, Edge::Literal { length });
        }
    }

    Ok(table)
}

/// Smallest possible stream for `data`
pub fn compress_optimal(data: &[u8]) -> Result<Vec<u8>> {
    let table = build_table(data)?;
    let path = table.path()?;

    let mut writer = BlockWriter::new();
    for (pos, edge) in path {
        let block = match edge {
            Edge::Literal { length } => Block::Literal(&data[pos..pos + length]),
            Edge::Reference { length, distance } => Block::Reference { length, distance },
        };
        writer.write_block(&block)?;
    }

    Ok(writer.finish())
}

/// Size of the smallest stream for `data`, without emitting it
pub fn optimal_size(data: &[u8]) -> Result<usize> {
    let table = build_table(data)?;
    Ok(table.steps[data.len()].map_or(0, |step| step.cost))
}
