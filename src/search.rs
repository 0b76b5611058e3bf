//! Generic state-space search engine.
//!
//! A problem domain implements [`SearchProblem`]: goal test, successor
//! expansion with step costs, and an admissible heuristic. The engine provides:
//! - [`astar`]: informed search ordered by `f = g + h`, driven by [`AStarSearch`].
//! - [`breadth_first`]: uninformed FIFO search, optimal for unit step costs.
//! - [`depth_first`]: uninformed search over an explicit stack.
//!
//! All three report a [`SearchOutcome`]. Paths are rebuilt from a predecessor
//! map by [`reconstruct_path`].
//!
//! The A* frontier keeps duplicate entries for a state instead of decreasing
//! keys in place. An entry is stale when the [`CostTable`] already holds a
//! strictly lower g-cost for its state; stale entries are skipped on pop and
//! are not counted as expansions.

use crate::error::{Result, SolverError};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A discrete search problem with uniform-or-positive step costs.
pub trait SearchProblem {
    /// Immutable problem snapshot. `Ord` is the deterministic tie-break used by
    /// the A* frontier when two entries share both `f` and `h`.
    type State: Clone + Eq + Hash + Ord + Debug;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Valid successors of `state` with the cost of reaching each one, in a
    /// fixed order.
    fn successors(&self, state: &Self::State) -> Vec<(Self::State, u32)>;

    /// Lower bound on the remaining cost from `state` to a goal.
    fn heuristic(&self, state: &Self::State) -> u32;
}

/// Run-time limits for a single search call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop with [`SearchOutcome::Exhausted`] once this many states have been
    /// expanded without reaching a goal. The limit is checked before each
    /// expansion, so `Some(0)` expands nothing. `None` searches the whole space.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    pub fn with_max_expansions(limit: usize) -> Self {
        SearchConfig {
            max_expansions: Some(limit),
        }
    }

    fn budget_spent(&self, expansions: usize) -> bool {
        self.max_expansions.is_some_and(|limit| expansions >= limit)
    }
}

/// Ordered states from start to goal, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionPath<S> {
    states: Vec<S>,
}

impl<S> SolutionPath<S> {
    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn into_states(self) -> Vec<S> {
        self.states
    }

    /// Number of states on the path, including start and goal.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false` for paths built by the engine; a path holds at least the start.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of moves, i.e. `len() - 1`.
    pub fn moves(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&S> {
        self.states.first()
    }

    pub fn goal(&self) -> Option<&S> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.states.iter()
    }
}

/// Result of a search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<S> {
    /// A goal was reached.
    Solved {
        path: SolutionPath<S>,
        elapsed: Duration,
        expansions: usize,
    },
    /// The start state can never reach the goal; no search was run.
    Unsolvable,
    /// The frontier emptied, or the expansion budget ran out, before a goal
    /// was reached.
    Exhausted { elapsed: Duration, expansions: usize },
}

impl<S> SearchOutcome<S> {
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved { .. })
    }

    pub fn path(&self) -> Option<&SolutionPath<S>> {
        match self {
            SearchOutcome::Solved { path, .. } => Some(path),
            _ => None,
        }
    }

    /// States expanded by the search; zero when no search was run.
    pub fn expansions(&self) -> usize {
        match self {
            SearchOutcome::Solved { expansions, .. } | SearchOutcome::Exhausted { expansions, .. } => {
                *expansions
            }
            SearchOutcome::Unsolvable => 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            SearchOutcome::Solved { elapsed, .. } | SearchOutcome::Exhausted { elapsed, .. } => *elapsed,
            SearchOutcome::Unsolvable => Duration::ZERO,
        }
    }
}

/// A frontier entry: estimated total cost `f`, cost so far `g`, and the state.
///
/// Entries are only built by [`Frontier::push`], which guarantees `f >= g`.
///
/// ```compile_fail
/// use tile_maze_solver::search::FrontierEntry;
/// let entry = FrontierEntry { f: 1, g: 3, state: 0u8 };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry<S> {
    f: u32,
    g: u32,
    state: S,
}

impl<S> FrontierEntry<S> {
    pub fn f(&self) -> u32 {
        self.f
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    /// Heuristic part of the estimate, `f - g`.
    pub fn h(&self) -> u32 {
        self.f - self.g
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

// Ascending by f, then by h (deeper entries first), then by state.
impl<S: Ord> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| self.h().cmp(&other.h()))
            .then_with(|| self.state.cmp(&other.state))
    }
}

impl<S: Ord> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of [`FrontierEntry`] values.
///
/// Several entries for the same state may be live at once; the driver decides
/// which ones are stale.
#[derive(Debug, Clone)]
pub struct Frontier<S: Ord> {
    heap: BinaryHeap<Reverse<FrontierEntry<S>>>,
}

impl<S: Ord> Frontier<S> {
    pub fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
        }
    }

    /// Inserts `state` with total estimate `f` and cost so far `g`.
    ///
    /// # Panics
    /// Panics if `f < g`; the heuristic part of an estimate is never negative.
    pub fn push(&mut self, f: u32, g: u32, state: S) {
        assert!(f >= g, "f-cost {} below g-cost {}", f, g);
        self.heap.push(Reverse(FrontierEntry { f, g, state }));
    }

    /// Removes and returns the entry with the lowest `f`, or
    /// [`SolverError::EmptyFrontier`] when nothing is left.
    pub fn pop_min(&mut self) -> Result<FrontierEntry<S>> {
        self.heap
            .pop()
            .map(|Reverse(entry)| entry)
            .ok_or(SolverError::EmptyFrontier)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<S: Ord> Default for Frontier<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Best known g-cost per state. Recorded costs only ever decrease.
#[derive(Debug, Clone)]
pub struct CostTable<S> {
    costs: HashMap<S, u32>,
}

impl<S: Eq + Hash + Clone> CostTable<S> {
    pub fn new() -> Self {
        CostTable {
            costs: HashMap::new(),
        }
    }

    pub fn get(&self, state: &S) -> Option<u32> {
        self.costs.get(state).copied()
    }

    /// Records `g` for `state` if no cost is known yet or `g` is strictly
    /// lower than the recorded one. Returns whether the table changed.
    pub fn relax(&mut self, state: &S, g: u32) -> bool {
        match self.costs.get_mut(state) {
            Some(best) if *best <= g => false,
            Some(best) => {
                *best = g;
                true
            }
            None => {
                self.costs.insert(state.clone(), g);
                true
            }
        }
    }

    /// An entry carrying cost `g` is stale when a strictly lower cost is recorded.
    pub fn is_stale(&self, state: &S, g: u32) -> bool {
        self.get(state).is_some_and(|best| best < g)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl<S: Eq + Hash + Clone> Default for CostTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps each reached state to its predecessor; the start maps to `None`.
pub type PredecessorMap<S> = HashMap<S, Option<S>>;

/// Walks predecessor links from `goal` back to the start and returns the
/// states in start-to-goal order.
///
/// # Errors
/// [`SolverError::BrokenChain`] if a state on the way has no entry in
/// `predecessors`, or if the links loop without reaching the start.
pub fn reconstruct_path<S>(predecessors: &PredecessorMap<S>, goal: &S) -> Result<SolutionPath<S>>
where
    S: Clone + Eq + Hash + Debug,
{
    let mut states = vec![goal.clone()];
    let mut current = goal;
    loop {
        match predecessors.get(current) {
            None => {
                return Err(SolverError::BrokenChain {
                    state: format!("{:?}", current),
                })
            }
            Some(None) => break,
            Some(Some(previous)) => {
                // A chain longer than the map has revisited a state.
                if states.len() > predecessors.len() {
                    return Err(SolverError::BrokenChain {
                        state: format!("{:?}", previous),
                    });
                }
                states.push(previous.clone());
                current = previous;
            }
        }
    }
    states.reverse();
    Ok(SolutionPath { states })
}

/// Lifecycle of an [`AStarSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Initialized,
    Running,
    Succeeded,
    Exhausted,
}

/// A* driver owning the frontier, cost table and predecessor map of one search.
///
/// [`astar`] runs it to completion. Callers that want their own stopping rule
/// can call [`AStarSearch::step`] and poll [`AStarSearch::expansions`].
pub struct AStarSearch<'p, P: SearchProblem> {
    problem: &'p P,
    frontier: Frontier<P::State>,
    costs: CostTable<P::State>,
    predecessors: PredecessorMap<P::State>,
    expansions: usize,
    phase: SearchPhase,
    goal: Option<P::State>,
}

impl<'p, P: SearchProblem> AStarSearch<'p, P> {
    pub fn new(problem: &'p P, start: P::State) -> Self {
        let mut frontier = Frontier::new();
        let mut costs = CostTable::new();
        let mut predecessors = PredecessorMap::new();

        costs.relax(&start, 0);
        predecessors.insert(start.clone(), None);
        frontier.push(problem.heuristic(&start), 0, start);

        AStarSearch {
            problem,
            frontier,
            costs,
            predecessors,
            expansions: 0,
            phase: SearchPhase::Initialized,
            goal: None,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Best g-cost recorded so far for `state`.
    pub fn cost_of(&self, state: &P::State) -> Option<u32> {
        self.costs.get(state)
    }

    /// Pops entries until one is live and processes it: either it is the goal
    /// (phase becomes `Succeeded`) or its successors are relaxed and pushed.
    /// Returns the phase after the step; terminal phases are sticky.
    pub fn step(&mut self) -> SearchPhase {
        if matches!(self.phase, SearchPhase::Succeeded | SearchPhase::Exhausted) {
            return self.phase;
        }
        self.phase = SearchPhase::Running;

        let entry = loop {
            match self.frontier.pop_min() {
                Ok(entry) if self.costs.is_stale(&entry.state, entry.g) => {
                    tracing::trace!(f = entry.f, g = entry.g, "skipping stale frontier entry");
                }
                Ok(entry) => break entry,
                Err(_) => {
                    self.phase = SearchPhase::Exhausted;
                    return self.phase;
                }
            }
        };
        self.expansions += 1;

        if self.problem.is_goal(&entry.state) {
            self.goal = Some(entry.state);
            self.phase = SearchPhase::Succeeded;
            return self.phase;
        }

        for (successor, step_cost) in self.problem.successors(&entry.state) {
            let candidate = entry.g + step_cost;
            if self.costs.relax(&successor, candidate) {
                self.predecessors
                    .insert(successor.clone(), Some(entry.state.clone()));
                let f = candidate + self.problem.heuristic(&successor);
                self.frontier.push(f, candidate, successor);
            }
        }
        self.phase
    }

    /// Path to the goal once the search has succeeded.
    pub fn solution(&self) -> Option<Result<SolutionPath<P::State>>> {
        self.goal
            .as_ref()
            .map(|goal| reconstruct_path(&self.predecessors, goal))
    }

    /// Steps until the search succeeds, exhausts its frontier, or spends the
    /// expansion budget in `config`.
    ///
    /// # Panics
    /// Panics if the predecessor chain of the goal is broken, which means the
    /// driver's own bookkeeping is inconsistent.
    pub fn run(mut self, config: &SearchConfig) -> SearchOutcome<P::State> {
        let started = Instant::now();
        loop {
            if config.budget_spent(self.expansions) {
                tracing::trace!(expansions = self.expansions, "expansion budget spent");
                self.phase = SearchPhase::Exhausted;
                return exhausted("astar", started.elapsed(), self.expansions);
            }
            match self.step() {
                SearchPhase::Succeeded => break,
                SearchPhase::Exhausted => {
                    return exhausted("astar", started.elapsed(), self.expansions)
                }
                SearchPhase::Running | SearchPhase::Initialized => {}
            }
        }
        let path = match self.solution() {
            Some(Ok(path)) => path,
            Some(Err(err)) => panic!("A* bookkeeping is inconsistent: {}", err),
            None => unreachable!("succeeded search always records its goal"),
        };
        solved("astar", path, started.elapsed(), self.expansions)
    }
}

/// Runs A* from `start` until a goal is popped or the search is exhausted.
///
/// # Examples
/// ```
/// use tile_maze_solver::maze::Maze;
/// use tile_maze_solver::search::{astar, SearchConfig};
/// use tile_maze_solver::utils::maze_from_str_array;
///
/// let maze: Maze = maze_from_str_array(&["I F"]).unwrap();
/// let outcome = astar(&maze, maze.start(), &SearchConfig::default());
/// assert_eq!(outcome.path().unwrap().moves(), 2);
/// ```
pub fn astar<P: SearchProblem>(
    problem: &P,
    start: P::State,
    config: &SearchConfig,
) -> SearchOutcome<P::State> {
    tracing::debug!(start = ?start, "starting A* search");
    AStarSearch::new(problem, start).run(config)
}

/// Breadth-first search. Each state is enqueued at most once; with unit step
/// costs the returned path has the minimum number of moves.
pub fn breadth_first<P: SearchProblem>(
    problem: &P,
    start: P::State,
    config: &SearchConfig,
) -> SearchOutcome<P::State> {
    tracing::debug!(start = ?start, "starting breadth-first search");
    let started = Instant::now();
    let mut predecessors = PredecessorMap::new();
    let mut queue = VecDeque::new();
    let mut expansions = 0;

    predecessors.insert(start.clone(), None);
    queue.push_back(start);

    while !config.budget_spent(expansions) {
        let Some(state) = queue.pop_front() else {
            break;
        };
        expansions += 1;
        if problem.is_goal(&state) {
            return finish("bfs", &predecessors, &state, started, expansions);
        }
        for (successor, _) in problem.successors(&state) {
            if !predecessors.contains_key(&successor) {
                predecessors.insert(successor.clone(), Some(state.clone()));
                queue.push_back(successor);
            }
        }
    }
    exhausted("bfs", started.elapsed(), expansions)
}

/// Depth-first search over an explicit stack.
///
/// States are marked visited when popped, and successors are pushed in reverse
/// so the first one in the problem's order is explored first. The returned path
/// is the first one found, not necessarily the shortest.
pub fn depth_first<P: SearchProblem>(
    problem: &P,
    start: P::State,
    config: &SearchConfig,
) -> SearchOutcome<P::State> {
    tracing::debug!(start = ?start, "starting depth-first search");
    let started = Instant::now();
    let mut predecessors = PredecessorMap::new();
    let mut stack = vec![(start, None)];
    let mut expansions = 0;

    while !config.budget_spent(expansions) {
        let Some((state, parent)) = stack.pop() else {
            break;
        };
        if predecessors.contains_key(&state) {
            continue;
        }
        predecessors.insert(state.clone(), parent);
        expansions += 1;

        if problem.is_goal(&state) {
            return finish("dfs", &predecessors, &state, started, expansions);
        }

        let successors = problem.successors(&state);
        for (successor, _) in successors.into_iter().rev() {
            if !predecessors.contains_key(&successor) {
                stack.push((successor, Some(state.clone())));
            }
        }
    }
    exhausted("dfs", started.elapsed(), expansions)
}

fn finish<S: Clone + Eq + Hash + Debug>(
    algorithm: &'static str,
    predecessors: &PredecessorMap<S>,
    goal: &S,
    started: Instant,
    expansions: usize,
) -> SearchOutcome<S> {
    match reconstruct_path(predecessors, goal) {
        Ok(path) => solved(algorithm, path, started.elapsed(), expansions),
        Err(err) => panic!("{} bookkeeping is inconsistent: {}", algorithm, err),
    }
}

fn solved<S>(
    algorithm: &'static str,
    path: SolutionPath<S>,
    elapsed: Duration,
    expansions: usize,
) -> SearchOutcome<S> {
    tracing::debug!(
        algorithm,
        moves = path.moves(),
        expansions,
        elapsed_us = elapsed.as_micros() as u64,
        "search solved"
    );
    SearchOutcome::Solved {
        path,
        elapsed,
        expansions,
    }
}

fn exhausted<S>(algorithm: &'static str, elapsed: Duration, expansions: usize) -> SearchOutcome<S> {
    tracing::debug!(
        algorithm,
        expansions,
        elapsed_us = elapsed.as_micros() as u64,
        "search exhausted"
    );
    SearchOutcome::Exhausted {
        elapsed,
        expansions,
    }
}
