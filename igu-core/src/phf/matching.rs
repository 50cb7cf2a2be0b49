/// Maximum bipartite matching between a left set of size `left_num` and a right set of size
/// `right_num`, given for each left vertex the right vertices it is adjacent to.
///
/// Uses the standard augmenting-path (Kuhn's) algorithm: one DFS-for-augmenting-path per left
/// vertex. Returns, for each matched left vertex, the right vertex it was matched to.
pub fn max_bipartite_matching(left_num: usize, adjacency: &[Vec<usize>], right_num: usize) -> Vec<Option<usize>> {
	let mut match_right: Vec<Option<usize>> = vec![None; right_num];
	let mut match_left: Vec<Option<usize>> = vec![None; left_num];

	for left in 0..left_num {
		let mut visited = vec![false; right_num];
		try_augment(left, adjacency, &mut visited, &mut match_right, &mut match_left);
	}

	match_left
}

fn try_augment(left: usize, adjacency: &[Vec<usize>], visited: &mut [bool], match_right: &mut [Option<usize>], match_left: &mut [Option<usize>]) -> bool {
	for &right in &adjacency[left] {
		if visited[right] {
			continue;
		}
		visited[right] = true;

		let free = match_right[right].is_none();
		let can_reassign = !free && try_augment(match_right[right].unwrap(), adjacency, visited, match_right, match_left);

		if free || can_reassign {
			match_right[right] = Some(left);
			match_left[left] = Some(right);
			return true;
		}
	}
	false
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_perfect_matching_on_cycle() {
		// 3-cycle: edges 0-1-2-0 on both sides (triangle in the bipartite sense)
		let adjacency = vec![vec![0, 1], vec![1, 2], vec![2, 0]];
		let result = max_bipartite_matching(3, &adjacency, 3);

		assert!(result.iter().all(|m| m.is_some()));
		let assigned: Vec<usize> = result.into_iter().map(|m| m.unwrap()).collect();
		let mut sorted = assigned.clone();
		sorted.sort_unstable();
		assert_eq!(sorted, vec![0, 1, 2]);
	}

	#[test]
	fn test_no_perfect_matching_when_hall_violated() {
		// two left vertices only connect to the same single right vertex
		let adjacency = vec![vec![0], vec![0]];
		let result = max_bipartite_matching(2, &adjacency, 1);
		let matched_count = result.iter().filter(|m| m.is_some()).count();
		assert_eq!(matched_count, 1);
	}

	#[test]
	fn test_empty_matching() {
		let adjacency: Vec<Vec<usize>> = vec![];
		let result = max_bipartite_matching(0, &adjacency, 0);
		assert!(result.is_empty());
	}
}
