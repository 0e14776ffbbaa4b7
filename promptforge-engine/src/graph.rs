// Copyright 2026 PromptForge Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The Dependency Resolver: builds the prompt reference graph and proves it
//! acyclic with Kahn's algorithm before any write that could introduce a
//! cycle is allowed to commit.

use std::collections::{HashMap, HashSet, VecDeque};

use promptforge_core::{PromptId, PromptRef};

use crate::error::EngineError;

/// Adjacency list over every `source -> target` edge regardless of
/// `ref_type` — the whole `PromptRef` graph must stay a DAG, not just some
/// labeled subset of it.
pub type RefGraph = HashMap<PromptId, Vec<PromptId>>;

pub fn build_full_ref_graph(refs: &[PromptRef]) -> RefGraph {
    let mut graph: RefGraph = HashMap::new();
    for r in refs {
        graph.entry(r.source).or_default().push(r.target);
        graph.entry(r.target).or_default();
    }
    graph
}

/// Kahn's algorithm. Returns the topological order on success; on a cycle,
/// returns the set of nodes that never reached in-degree zero (the
/// members of one or more cycles, though not necessarily a single cycle).
pub fn topological_sort(graph: &RefGraph) -> Result<Vec<PromptId>, Vec<PromptId>> {
    let mut in_degree: HashMap<PromptId, usize> = graph.keys().map(|&id| (id, 0)).collect();
    for targets in graph.values() {
        for target in targets {
            *in_degree.entry(*target).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<PromptId> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(node) = queue.pop_front() {
        order.push(node);
        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*target);
                    }
                }
            }
        }
    }

    if order.len() == in_degree.len() {
        Ok(order)
    } else {
        let visited: HashSet<PromptId> = order.into_iter().collect();
        Err(in_degree.keys().filter(|id| !visited.contains(id)).copied().collect())
    }
}

/// Builds the graph `existing_refs` would form with a hypothetical new
/// `source -> target` edge added, and proves it's still acyclic. Used by
/// ref creation and by fork/includes validation before the write commits.
pub fn check_no_cycles(
    existing_refs: &[PromptRef],
    candidate: (PromptId, PromptId),
) -> Result<(), EngineError> {
    let mut graph = build_full_ref_graph(existing_refs);
    graph.entry(candidate.0).or_default().push(candidate.1);
    graph.entry(candidate.1).or_default();

    topological_sort(&graph).map(|_| ()).map_err(|stuck| {
        EngineError::Cycle(format!(
            "adding {} -> {} would create a cycle through {} node(s)",
            candidate.0,
            candidate.1,
            stuck.len()
        ))
    })
}

/// All prompts transitively reachable from `root`, `root` itself included —
/// the working set for impact analysis and for scene dependency export.
pub fn transitive_closure(graph: &RefGraph, root: PromptId) -> HashSet<PromptId> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if !seen.contains(target) {
                    stack.push(*target);
                }
            }
        }
    }
    seen
}

/// All prompts that depend on `target`, directly or transitively — the
/// answer to "what breaks if I change this prompt" (impact analysis).
pub fn dependents_of(refs: &[PromptRef], target: PromptId) -> HashSet<PromptId> {
    let graph = build_full_ref_graph(refs);
    let mut reversed: RefGraph = HashMap::new();
    for (source, targets) in &graph {
        for t in targets {
            reversed.entry(*t).or_default().push(*source);
        }
    }
    let mut closure = transitive_closure(&reversed, target);
    closure.remove(&target);
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptforge_core::PromptId;

    fn make_ref(source: PromptId, target: PromptId) -> PromptRef {
        PromptRef::new(source, target, None, None, "includes", None, None)
    }

    #[test]
    fn topo_sort_orders_a_dag() {
        let a = PromptId::new();
        let b = PromptId::new();
        let c = PromptId::new();
        let refs = vec![make_ref(a, b), make_ref(b, c)];
        let graph = build_full_ref_graph(&refs);
        let order = topological_sort(&graph).unwrap();
        let pos = |id: PromptId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(c));
    }

    #[test]
    fn topo_sort_detects_a_cycle() {
        let a = PromptId::new();
        let b = PromptId::new();
        let refs = vec![make_ref(a, b), make_ref(b, a)];
        let graph = build_full_ref_graph(&refs);
        assert!(topological_sort(&graph).is_err());
    }

    #[test]
    fn check_no_cycles_rejects_an_edge_that_closes_a_loop() {
        let a = PromptId::new();
        let b = PromptId::new();
        let refs = vec![make_ref(a, b)];
        assert!(check_no_cycles(&refs, (b, a)).is_err());
        let c = PromptId::new();
        assert!(check_no_cycles(&refs, (b, c)).is_ok());
    }

    #[test]
    fn dependents_of_finds_transitive_consumers() {
        let a = PromptId::new();
        let b = PromptId::new();
        let c = PromptId::new();
        // c includes b includes a: changing `a` impacts b and c.
        let refs = vec![make_ref(b, a), make_ref(c, b)];
        let impacted = dependents_of(&refs, a);
        assert!(impacted.contains(&b));
        assert!(impacted.contains(&c));
        assert!(!impacted.contains(&a));
    }
}
