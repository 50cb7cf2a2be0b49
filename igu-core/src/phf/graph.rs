use std::collections::{HashMap, VecDeque};

use log::{debug, trace};

use crate::func_vect::FuncVect;

use super::{edge::PhfEdge, matching::max_bipartite_matching, node::PhfNode};

/// A d-uniform hypergraph built from d `FuncVect`s: one node per (function-slot, pattern-value)
/// actually observed, one edge per registered vector.
///
/// Built once from a list of `FuncVect`s and consumed by a single analysis call
/// (`simple_check`, `acyclic_check`, `assign`, or `collision_free_partition`).
pub struct PhfGraph {
	degree: usize,
	max_vals: Vec<u32>,
	nodes: Vec<PhfNode>,
	edges: Vec<PhfEdge>,
}

impl PhfGraph {
	/// Builds the hypergraph from d FuncVects, all sharing the same `input_size`.
	pub fn build(func_vects: &[FuncVect]) -> Self {
		let d = func_vects.len();
		assert!(d >= 1, "PhfGraph needs at least one hash function");
		let k = func_vects[0].input_size();
		for fv in func_vects {
			assert_eq!(fv.input_size(), k, "all FuncVects must share the same input_size");
		}

		let max_vals: Vec<u32> = func_vects.iter().map(|f| f.max_val()).collect();
		let mut lookup: Vec<Vec<Option<usize>>> = max_vals.iter().map(|&m| vec![None; m as usize]).collect();

		let mut nodes = Vec::new();
		let mut edges = Vec::with_capacity(k);

		for vid in 0..k {
			let mut node_ids = Vec::with_capacity(d);
			for (j, fv) in func_vects.iter().enumerate() {
				let pat = fv.val(vid);
				let node_id = match lookup[j][pat as usize] {
					Some(id) => id,
					None => {
						let id = nodes.len();
						nodes.push(PhfNode::new(id, j, pat));
						lookup[j][pat as usize] = Some(id);
						id
					}
				};
				node_ids.push(node_id);
			}

			let edge_id = edges.len();
			for &nid in &node_ids {
				nodes[nid].add_edge(edge_id);
			}
			edges.push(PhfEdge::new(edge_id, node_ids, vid));
		}

		debug!("built PhfGraph: {} nodes, {} edges, degree {}", nodes.len(), edges.len(), d);

		PhfGraph { degree: d, max_vals, nodes, edges }
	}

	pub fn degree(&self) -> usize {
		self.degree
	}

	pub fn node_num(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_num(&self) -> usize {
		self.edges.len()
	}

	pub fn node(&self, id: usize) -> &PhfNode {
		&self.nodes[id]
	}

	pub fn edge(&self, id: usize) -> &PhfEdge {
		&self.edges[id]
	}

	/// True iff no two edges share the same d-tuple of node ids.
	pub fn simple_check(&self) -> bool {
		for node in &self.nodes {
			if node.degree() < 2 {
				continue;
			}
			let incident = node.edges();
			for i in 0..incident.len() {
				for j in (i + 1)..incident.len() {
					if self.edges[incident[i]].nodes() == self.edges[incident[j]].nodes() {
						return false;
					}
				}
			}
		}
		true
	}

	/// Iteratively removes degree-1 nodes (and their incident edge). Returns the removal
	/// order reversed (so every edge in the returned list has at least one endpoint not seen
	/// in any earlier edge) iff every edge was eventually removed.
	pub fn acyclic_check(&self) -> Option<Vec<usize>> {
		let (removal_order, all_removed) = self.peel();
		if all_removed {
			let mut order = removal_order;
			order.reverse();
			Some(order)
		} else {
			None
		}
	}

	/// Runs the degree-1 peeling used by both `acyclic_check` and `collision_free_partition`.
	/// Returns (edges in removal order, whether every edge was removed).
	fn peel(&self) -> (Vec<usize>, bool) {
		let nn = self.nodes.len();
		let ne = self.edges.len();

		let mut degree: Vec<usize> = self.nodes.iter().map(|n| n.degree()).collect();
		let mut node_done = vec![false; nn];
		let mut edge_active = vec![true; ne];
		let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

		for (id, &deg) in degree.iter().enumerate() {
			if deg == 1 {
				queue.push_back((id, self.nodes[id].edges()[0]));
			}
		}

		let mut removal_order = Vec::with_capacity(ne);

		while let Some((node_id, edge_id)) = queue.pop_front() {
			if !edge_active[edge_id] || node_done[node_id] {
				continue;
			}
			edge_active[edge_id] = false;
			node_done[node_id] = true;
			removal_order.push(edge_id);

			for &other in self.edges[edge_id].nodes() {
				if other == node_id || node_done[other] {
					continue;
				}
				degree[other] -= 1;
				if degree[other] == 1 {
					if let Some(&remaining) = self.nodes[other].edges().iter().find(|&&e| edge_active[e]) {
						queue.push_back((other, remaining));
					}
				}
			}
		}

		trace!("peeling removed {}/{} edges", removal_order.len(), ne);
		let all_removed = removal_order.len() == ne;
		(removal_order, all_removed)
	}

	/// Allocates and fills g-tables from an acyclic order (as returned by `acyclic_check`).
	/// Mutates node values in place; may only be called once per graph.
	pub fn assign(&mut self, order: &[usize]) -> Vec<Vec<u32>> {
		let d = self.degree;
		let mut g_tables: Vec<Vec<u32>> = self.max_vals.iter().map(|&m| vec![0u32; m as usize]).collect();

		for &edge_id in order {
			let node_ids = self.edges[edge_id].nodes().to_vec();
			let edge_val = self.edges[edge_id].val() as u32;

			for (j, &node_id) in node_ids.iter().enumerate() {
				if self.nodes[node_id].is_assigned() {
					continue;
				}

				let mut val = edge_val;
				for (k, &other) in node_ids.iter().enumerate() {
					if k != j {
						val ^= self.nodes[other].val().unwrap_or(0);
					}
				}

				self.nodes[node_id].set_val(val);
				let func_slot = self.nodes[node_id].func_slot();
				let pat = self.nodes[node_id].pat();
				g_tables[func_slot][pat as usize] = val;
			}
		}

		g_tables
	}

	/// Peels, then resolves any cyclic residue via bipartite matching (spec 4.4.5). Returns,
	/// indexed by vector-id, which function slot each vector was routed to.
	pub fn collision_free_partition(&self) -> Option<Vec<usize>> {
		let nn = self.nodes.len();
		let ne = self.edges.len();

		let mut degree: Vec<usize> = self.nodes.iter().map(|n| n.degree()).collect();
		let mut node_done = vec![false; nn];
		let mut edge_active = vec![true; ne];
		let mut block_map = vec![usize::MAX; ne];
		let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
		let mut peeled = 0usize;

		for (id, &deg) in degree.iter().enumerate() {
			if deg == 1 {
				queue.push_back((id, self.nodes[id].edges()[0]));
			}
		}

		while let Some((node_id, edge_id)) = queue.pop_front() {
			if !edge_active[edge_id] || node_done[node_id] {
				continue;
			}
			edge_active[edge_id] = false;
			node_done[node_id] = true;
			peeled += 1;

			let edge = &self.edges[edge_id];
			block_map[edge.val()] = self.nodes[node_id].func_slot();

			for &other in edge.nodes() {
				if other == node_id || node_done[other] {
					continue;
				}
				degree[other] -= 1;
				if degree[other] == 1 {
					if let Some(&remaining) = self.nodes[other].edges().iter().find(|&&e| edge_active[e]) {
						queue.push_back((other, remaining));
					}
				}
			}
		}

		if peeled == ne {
			return Some(block_map);
		}

		let residue_edges: Vec<usize> = (0..ne).filter(|&e| edge_active[e]).collect();
		let residue_nodes: Vec<usize> = (0..nn).filter(|&n| !node_done[n] && degree[n] > 0).collect();

		debug!("collision_free_partition: residue of {} edges over {} nodes", residue_edges.len(), residue_nodes.len());

		if residue_nodes.len() < residue_edges.len() {
			return None;
		}

		let node_index: HashMap<usize, usize> = residue_nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
		let adjacency: Vec<Vec<usize>> = residue_edges
			.iter()
			.map(|&e| self.edges[e].nodes().iter().map(|n| node_index[n]).collect())
			.collect();

		let matching = max_bipartite_matching(residue_edges.len(), &adjacency, residue_nodes.len());

		for (i, &e) in residue_edges.iter().enumerate() {
			let right = matching[i]?;
			let node_id = residue_nodes[right];
			block_map[self.edges[e].val()] = self.nodes[node_id].func_slot();
		}

		Some(block_map)
	}
}

/// Verifies a perfect-hash assignment: XOR-summing every g-table entry selected by
/// `func_vects` reproduces the vector id, for every vector id. Exposed so the CLI and the
/// test suite can both check `assign`'s output without duplicating the XOR loop.
pub fn verify_assignment(func_vects: &[FuncVect], g_tables: &[Vec<u32>]) -> bool {
	assert_eq!(func_vects.len(), g_tables.len(), "one g-table per function");
	let k = func_vects.first().map(FuncVect::input_size).unwrap_or(0);

	for vid in 0..k {
		let mut acc = 0u32;
		for (fv, table) in func_vects.iter().zip(g_tables) {
			acc ^= table[fv.val(vid) as usize];
		}
		if acc as usize != vid {
			return false;
		}
	}
	true
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{func_vect::FuncVect, input_func::InputFunc, regvec::RvMgr, variable::Variable};

	fn two_primaries_separable_vects() -> RvMgr {
		let mut mgr = RvMgr::new();
		mgr.load("3 4\n000\n011\n101\n110\n".as_bytes()).unwrap();
		mgr
	}

	#[test]
	fn test_simple_check_true_for_distinct_functions() {
		let mgr = two_primaries_separable_vects();
		let f1 = InputFunc::VarFunc(vec![Variable::primary(0), Variable::primary(1)]);
		let f2 = InputFunc::VarFunc(vec![Variable::primary(1), Variable::primary(2)]);
		let fv1 = mgr.gen_hash_vect(&f1);
		let fv2 = mgr.gen_hash_vect(&f2);

		let graph = PhfGraph::build(&[fv1, fv2]);
		assert!(graph.simple_check());
	}

	#[test]
	fn test_simple_check_false_for_identical_functions() {
		let mgr = two_primaries_separable_vects();
		let f = InputFunc::VarFunc(vec![Variable::primary(0), Variable::primary(1)]);
		let fv1 = mgr.gen_hash_vect(&f);
		let fv2 = fv1.clone();

		let graph = PhfGraph::build(&[fv1, fv2]);
		assert!(!graph.simple_check());
	}

	#[test]
	fn test_acyclic_check_and_assign_produce_a_consistent_g_table_pair() {
		let mgr = two_primaries_separable_vects();
		let f1 = InputFunc::VarFunc(vec![Variable::primary(0), Variable::primary(1)]);
		let f2 = InputFunc::VarFunc(vec![Variable::primary(1), Variable::primary(2)]);
		let fv1 = mgr.gen_hash_vect(&f1);
		let fv2 = mgr.gen_hash_vect(&f2);

		let mut graph = PhfGraph::build(&[fv1.clone(), fv2.clone()]);
		assert!(graph.simple_check());

		let order = graph.acyclic_check().expect("expected acyclic graph");
		let g_tables = graph.assign(&order);

		for vid in 0..mgr.vect_count() {
			let pat1 = fv1.val(vid);
			let pat2 = fv2.val(vid);
			let reconstructed = g_tables[0][pat1 as usize] ^ g_tables[1][pat2 as usize];
			assert_eq!(reconstructed as usize, vid);
		}

		assert!(verify_assignment(&[fv1, fv2], &g_tables));
	}

	#[test]
	fn test_verify_assignment_rejects_a_tampered_g_table() {
		let mgr = two_primaries_separable_vects();
		let f1 = InputFunc::VarFunc(vec![Variable::primary(0), Variable::primary(1)]);
		let f2 = InputFunc::VarFunc(vec![Variable::primary(1), Variable::primary(2)]);
		let fv1 = mgr.gen_hash_vect(&f1);
		let fv2 = mgr.gen_hash_vect(&f2);

		let mut graph = PhfGraph::build(&[fv1.clone(), fv2.clone()]);
		let order = graph.acyclic_check().expect("expected acyclic graph");
		let mut g_tables = graph.assign(&order);
		g_tables[0][0] ^= 1;

		assert!(!verify_assignment(&[fv1, fv2], &g_tables));
	}

	#[test]
	fn test_collision_free_partition_resolves_a_fully_cyclic_hypergraph_via_matching() {
		// Three constant (single-pattern) functions over 3 vectors: every edge shares the
		// same 3-node tuple, so every node has degree 3 and peeling cannot start - the
		// hypergraph is a single cyclic component of 3 nodes and 3 edges. No two edges can
		// share a block, so the partition must route each edge to a different function slot;
		// a complete bipartite matching resolves it.
		let mut mgr = RvMgr::new();
		mgr.load("2 3\n00\n01\n10\n".as_bytes()).unwrap();

		let constant = InputFunc::XorFunc(vec![]);
		let fv = mgr.gen_hash_vect(&constant);

		let graph = PhfGraph::build(&[fv.clone(), fv.clone(), fv.clone()]);
		assert!(!graph.simple_check(), "all three edges share the same node tuple");
		assert!(graph.acyclic_check().is_none(), "every node has degree 3, peeling can't start");

		let assignment = graph.collision_free_partition().expect("matching should resolve the cyclic residue");
		assert_eq!(assignment.len(), 3);
		let mut slots: Vec<usize> = assignment.clone();
		slots.sort_unstable();
		assert_eq!(slots, vec![0, 1, 2], "each edge must land on a distinct function slot");
	}

	#[test]
	fn test_single_identity_function_yields_identity_g_table() {
		// p = ceil(log2(4)) = 2, one VarFunc over both bit positions, vectors ordered so the
		// function's pattern value already equals the vector's id: d=1, so peeling removes
		// every node on the first pass and no back-substitution combines two tables.
		let mut mgr = RvMgr::new();
		mgr.load("2 4\n00\n10\n01\n11\n".as_bytes()).unwrap();

		let f = InputFunc::VarFunc(vec![Variable::primary(0), Variable::primary(1)]);
		let fv = mgr.gen_hash_vect(&f);

		let mut graph = PhfGraph::build(&[fv.clone()]);
		assert!(graph.simple_check());

		let order = graph.acyclic_check().expect("a single-function graph is trivially acyclic");
		let g_tables = graph.assign(&order);

		for vid in 0..mgr.vect_count() {
			assert_eq!(g_tables[0][fv.val(vid) as usize] as usize, vid);
		}
		assert!(verify_assignment(&[fv], &g_tables));
	}
}
