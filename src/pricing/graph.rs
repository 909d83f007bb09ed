//! Task dependency graph checks.
//!
//! Dependencies are metadata for downstream scheduling; pricing only needs
//! them to be a well-formed DAG over the product's own tasks.

use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

use super::PricingError;
use crate::domain::product::Task;

/// Validates the dependency relation of one product's tasks.
///
/// Rejects duplicate task ids, self references, references to tasks outside
/// the product and cycles.
pub fn validate_task_graph(tasks: &[Task]) -> Result<(), PricingError> {
    execution_order(tasks).map(|_| ())
}

/// Returns task ids in an order where every task follows its dependencies.
///
/// Kahn's algorithm; among ready tasks the product's list order wins, so the
/// result is stable for a given input.
pub fn execution_order(tasks: &[Task]) -> Result<Vec<Uuid>, PricingError> {
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(tasks.len());
    for (position, task) in tasks.iter().enumerate() {
        if index.insert(task.id, position).is_some() {
            return Err(PricingError::DuplicateTaskId { task_id: task.id });
        }
    }

    // dependents[i] = tasks waiting on task i
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    let mut pending: Vec<usize> = vec![0; tasks.len()];

    for (position, task) in tasks.iter().enumerate() {
        let mut seen = HashSet::new();
        for dependency in &task.dependencies {
            if *dependency == task.id {
                return Err(PricingError::SelfDependency { task_id: task.id });
            }
            let Some(&target) = index.get(dependency) else {
                return Err(PricingError::UnknownDependency {
                    task_id: task.id,
                    dependency: *dependency,
                });
            };
            // Repeated entries count once.
            if seen.insert(*dependency) {
                dependents[target].push(position);
                pending[position] += 1;
            }
        }
    }

    let mut ready: VecDeque<usize> = (0..tasks.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(tasks.len());

    while let Some(current) = ready.pop_front() {
        order.push(tasks[current].id);

        let mut released = Vec::new();
        for &next in &dependents[current] {
            pending[next] -= 1;
            if pending[next] == 0 {
                released.push(next);
            }
        }
        released.sort_unstable();
        ready.extend(released);
    }

    if order.len() != tasks.len() {
        // Leftover tasks are either on a cycle or downstream of one.
        let blocked: Vec<bool> = pending.iter().map(|&p| p > 0).collect();
        let tasks_on_cycle = tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| blocked[*i] && reaches_itself(*i, &dependents, &blocked))
            .map(|(_, t)| t.id)
            .collect();
        return Err(PricingError::DependencyCycle { tasks: tasks_on_cycle });
    }

    Ok(order)
}

/// Depth-first walk over blocked tasks looking for a path back to `start`.
fn reaches_itself(start: usize, dependents: &[Vec<usize>], blocked: &[bool]) -> bool {
    let mut visited = vec![false; dependents.len()];
    let mut stack: Vec<usize> = dependents[start].iter().copied().filter(|&n| blocked[n]).collect();

    while let Some(node) = stack.pop() {
        if node == start {
            return true;
        }
        if visited[node] {
            continue;
        }
        visited[node] = true;
        stack.extend(dependents[node].iter().copied().filter(|&n| blocked[n] && !visited[n]));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: Uuid, dependencies: &[Uuid]) -> Task {
        Task {
            id,
            name: format!("task-{}", &id.to_string()[..8]),
            dependencies: dependencies.to_vec(),
            can_run_in_parallel: false,
            steps: vec![],
            questionnaire: None,
        }
    }

    #[test]
    fn test_chain_is_accepted() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        // C depends on B, B depends on A, listed out of order.
        let tasks = vec![task(c, &[b]), task(b, &[a]), task(a, &[])];

        assert!(validate_task_graph(&tasks).is_ok());
        assert_eq!(execution_order(&tasks).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_two_task_cycle_rejected() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let tasks = vec![task(a, &[b]), task(b, &[a])];

        match validate_task_graph(&tasks) {
            Err(PricingError::DependencyCycle { tasks }) => {
                assert_eq!(tasks.len(), 2);
                assert!(tasks.contains(&a) && tasks.contains(&b));
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_behind_valid_prefix_reports_only_cycle_members() {
        let (root, a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let downstream = Uuid::new_v4();
        let tasks = vec![
            task(root, &[]),
            task(a, &[root, c]),
            task(downstream, &[a]),
            task(b, &[a]),
            task(c, &[b]),
        ];

        match validate_task_graph(&tasks) {
            Err(PricingError::DependencyCycle { tasks }) => {
                assert_eq!(tasks, vec![a, b, c]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_task_between_two_cycles_is_not_reported() {
        let (a, b, bridge, c, d) = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        // a <-> b, bridge depends on a, c <-> d with c also waiting on bridge
        let tasks = vec![
            task(a, &[b]),
            task(b, &[a]),
            task(bridge, &[a]),
            task(c, &[d, bridge]),
            task(d, &[c]),
        ];

        match validate_task_graph(&tasks) {
            Err(PricingError::DependencyCycle { tasks }) => {
                assert_eq!(tasks, vec![a, b, c, d]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_rejected() {
        let a = Uuid::new_v4();
        assert_eq!(
            validate_task_graph(&[task(a, &[a])]),
            Err(PricingError::SelfDependency { task_id: a })
        );
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let (a, ghost) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(
            validate_task_graph(&[task(a, &[ghost])]),
            Err(PricingError::UnknownDependency {
                task_id: a,
                dependency: ghost
            })
        );
    }

    #[test]
    fn test_duplicate_task_id_rejected() {
        let a = Uuid::new_v4();
        assert_eq!(
            validate_task_graph(&[task(a, &[]), task(a, &[])]),
            Err(PricingError::DuplicateTaskId { task_id: a })
        );
    }

    #[test]
    fn test_independent_tasks_keep_list_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let tasks: Vec<Task> = ids.iter().map(|id| task(*id, &[])).collect();

        assert_eq!(execution_order(&tasks).unwrap(), ids);
        assert!(validate_task_graph(&[]).is_ok());
    }

    #[test]
    fn test_repeated_dependency_counts_once() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let tasks = vec![task(a, &[]), task(b, &[a, a])];
        assert_eq!(execution_order(&tasks).unwrap(), vec![a, b]);
    }
}
