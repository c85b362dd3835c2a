//! Dependency resolution over a workflow's task set.
//!
//! Pure functions: runnability against a completed-id set, longest-chain
//! leveling, level grouping for the parallel strategy, and explicit cycle
//! detection with `petgraph`.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use thiserror::Error;

use dugout_types::task::{Task, TaskId};

/// Structural faults in a task graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    #[error("cycle detected involving task {0}")]
    CycleDetected(TaskId),
}

// ---------------------------------------------------------------------------
// Runnability
// ---------------------------------------------------------------------------

/// True iff every prerequisite of `task` is in `completed`.
pub fn is_runnable(task: &Task, completed: &HashSet<TaskId>) -> bool {
    task.prerequisites.iter().all(|dep| completed.contains(dep))
}

/// Prerequisites of `task` that are not in `completed`, in declared order.
pub fn unmet_prerequisites(task: &Task, completed: &HashSet<TaskId>) -> Vec<TaskId> {
    task.prerequisites
        .iter()
        .filter(|dep| !completed.contains(dep))
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Leveling
// ---------------------------------------------------------------------------

struct Leveler<'a> {
    index: HashMap<TaskId, &'a Task>,
    on_path: HashSet<TaskId>,
    memo: HashMap<TaskId, usize>,
}

impl<'a> Leveler<'a> {
    fn new(tasks: &'a [Task]) -> Self {
        Self {
            index: tasks.iter().map(|t| (t.id, t)).collect(),
            on_path: HashSet::new(),
            memo: HashMap::new(),
        }
    }

    /// Returns the level and whether a revisit was cut short below this node.
    /// Only results untouched by a cut are memoized, so a cycle cannot leak
    /// a truncated level into an unrelated query.
    fn visit(&mut self, id: TaskId) -> (usize, bool) {
        if let Some(&level) = self.memo.get(&id) {
            return (level, false);
        }
        let Some(task) = self.index.get(&id).copied() else {
            return (0, false);
        };
        if !self.on_path.insert(id) {
            return (0, true);
        }

        let mut level = 0;
        let mut cut = false;
        for dep in &task.prerequisites {
            if !self.index.contains_key(dep) {
                continue;
            }
            let (dep_level, dep_cut) = self.visit(*dep);
            level = level.max(dep_level + 1);
            cut |= dep_cut;
        }

        self.on_path.remove(&id);
        if !cut {
            self.memo.insert(id, level);
        }
        (level, cut)
    }
}

/// Length of the longest prerequisite chain ending at `task_id`.
///
/// Tasks without prerequisites are level 0. Prerequisites outside `tasks`
/// are ignored. A task revisited while its own chain is still being walked
/// contributes level 0 instead of recursing, so cyclic graphs terminate
/// (with levels that do not order the cycle correctly). Unknown `task_id`
/// yields 0.
pub fn level_of(task_id: TaskId, tasks: &[Task]) -> usize {
    Leveler::new(tasks).visit(task_id).0
}

/// Partition `tasks` by level, ascending. Within a level, tasks keep their
/// workflow order.
pub fn group_by_level(tasks: &[Task]) -> BTreeMap<usize, Vec<&Task>> {
    let mut leveler = Leveler::new(tasks);
    let mut levels: BTreeMap<usize, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        let (level, _) = leveler.visit(task.id);
        levels.entry(level).or_default().push(task);
    }
    levels
}

// ---------------------------------------------------------------------------
// Cycle detection
// ---------------------------------------------------------------------------

/// Fail if the prerequisite edges between known tasks form a cycle.
///
/// Edges to ids outside `tasks` are skipped; those surface later as stalls.
pub fn detect_cycle(tasks: &[Task]) -> Result<(), DagError> {
    let mut graph = DiGraph::<TaskId, ()>::new();
    let nodes: HashMap<TaskId, _> = tasks
        .iter()
        .map(|t| (t.id, graph.add_node(t.id)))
        .collect();

    for task in tasks {
        let to = nodes[&task.id];
        for dep in &task.prerequisites {
            if let Some(&from) = nodes.get(dep) {
                graph.add_edge(from, to, ());
            }
        }
    }

    toposort(&graph, None)
        .map(|_| ())
        .map_err(|cycle| DagError::CycleDetected(graph[cycle.node_id()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugout_types::task::TaskArguments;
    use uuid::Uuid;

    fn task(deps: &[TaskId]) -> Task {
        Task::new("player", "run", TaskArguments::new(), deps.iter().copied())
    }

    /// A -> B -> C -> D, each depending on the previous.
    fn chain() -> Vec<Task> {
        let a = task(&[]);
        let b = task(&[a.id]);
        let c = task(&[b.id]);
        let d = task(&[c.id]);
        vec![a, b, c, d]
    }

    /// Rewire `tasks[from]` to depend on `tasks[to]`.
    fn add_edge(tasks: &mut [Task], from: usize, to: usize) {
        let dep = tasks[to].id;
        tasks[from].prerequisites.push(dep);
    }

    #[test]
    fn empty_prerequisites_are_always_runnable() {
        let t = task(&[]);
        assert!(is_runnable(&t, &HashSet::new()));
    }

    #[test]
    fn runnable_only_when_all_prerequisites_completed() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let t = task(&[a, b]);

        let mut completed = HashSet::from([a]);
        assert!(!is_runnable(&t, &completed));
        assert_eq!(unmet_prerequisites(&t, &completed), vec![b]);

        completed.insert(b);
        assert!(is_runnable(&t, &completed));
        assert!(unmet_prerequisites(&t, &completed).is_empty());
    }

    #[test]
    fn chain_levels() {
        let tasks = chain();
        let levels: Vec<usize> = tasks.iter().map(|t| level_of(t.id, &tasks)).collect();
        assert_eq!(levels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn chain_groups_into_four_singletons() {
        let tasks = chain();
        let groups = group_by_level(&tasks);
        assert_eq!(groups.len(), 4);
        for (level, (key, members)) in groups.iter().enumerate() {
            assert_eq!(*key, level);
            assert_eq!(members.len(), 1);
            assert_eq!(members[0].id, tasks[level].id);
        }
    }

    #[test]
    fn diamond_takes_longest_chain() {
        // plan -> {bat, bowl}; report depends on plan, bat and bowl.
        let plan = task(&[]);
        let bat = task(&[plan.id]);
        let bowl = task(&[plan.id]);
        let report = task(&[plan.id, bat.id, bowl.id]);
        let tasks = vec![plan, bat, bowl, report];

        assert_eq!(level_of(tasks[3].id, &tasks), 2);

        let groups = group_by_level(&tasks);
        let level1: Vec<TaskId> = groups[&1].iter().map(|t| t.id).collect();
        assert_eq!(level1, vec![tasks[1].id, tasks[2].id]);
        assert_eq!(groups[&2][0].id, tasks[3].id);
    }

    #[test]
    fn unknown_prerequisites_are_ignored_for_leveling() {
        let t = task(&[Uuid::now_v7()]);
        let tasks = vec![t];
        assert_eq!(level_of(tasks[0].id, &tasks), 0);
        assert!(detect_cycle(&tasks).is_ok());
    }

    #[test]
    fn unknown_task_is_level_zero() {
        assert_eq!(level_of(Uuid::now_v7(), &chain()), 0);
    }

    #[test]
    fn cyclic_levels_terminate() {
        let mut tasks = vec![task(&[]), task(&[])];
        add_edge(&mut tasks, 0, 1);
        add_edge(&mut tasks, 1, 0);

        // a -> b -> (a revisited: 0) gives b = 1, a = 2
        assert_eq!(level_of(tasks[0].id, &tasks), 2);
        assert_eq!(level_of(tasks[1].id, &tasks), 2);

        let groups = group_by_level(&tasks);
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 2);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut tasks = vec![task(&[])];
        add_edge(&mut tasks, 0, 0);
        assert_eq!(level_of(tasks[0].id, &tasks), 1);
        assert_eq!(
            detect_cycle(&tasks),
            Err(DagError::CycleDetected(tasks[0].id))
        );
    }

    #[test]
    fn detect_cycle_accepts_dag_and_rejects_cycle() {
        let mut tasks = chain();
        assert!(detect_cycle(&tasks).is_ok());

        add_edge(&mut tasks, 0, 3);
        let err = detect_cycle(&tasks).unwrap_err();
        let DagError::CycleDetected(id) = err;
        assert!(tasks.iter().any(|t| t.id == id));
    }

    #[test]
    fn empty_task_set() {
        assert!(group_by_level(&[]).is_empty());
        assert!(detect_cycle(&[]).is_ok());
    }
}
