//! Task boundary between the orchestrator and a parallel runtime.
//!
//! Every kernel invocation is a typed task with direction-tagged tensor
//! arguments. A runtime derives dependency edges from those tags: a
//! read-after-write edge from a slot's last writer to its next reader,
//! a write-after-read edge from prior readers to the next writer, and
//! exclusive access for the writer while it runs. Tasks touching
//! disjoint slots carry no ordering at all.
//!
//! Two backends live here: [`InlineRuntime`] runs every kernel at
//! submission (the default), and [`DeferredRuntime`] queues kernels into
//! a [`TaskGraph`] and executes them in dependency order at the drain
//! barrier — the same contract an external distributed scheduler would
//! honour.

use ndarray::Array2;
use num_complex::Complex64;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::error::NetResult;
use crate::kernel;
use crate::tensor::TensorStore;

/// Index of a tensor slot owned by the network.
pub type SlotId = usize;

/// Handle for a submitted task.
pub type TaskId = usize;

/// Directionality of a kernel argument, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Read-only input.
    In,
    /// Read and written in place.
    InOut,
    /// Written without reading.
    Out,
}

impl Direction {
    /// Whether this argument reads its slot.
    #[inline]
    pub fn reads(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    /// Whether this argument writes its slot.
    #[inline]
    pub fn writes(self) -> bool {
        matches!(self, Direction::InOut | Direction::Out)
    }
}

/// A schedulable kernel invocation against tensor slots.
///
/// Operator matrices travel by value: they are immutable inputs and need
/// no dependency tracking.
#[derive(Debug, Clone)]
pub enum KernelCall {
    /// `init_zero(shape)` into a slot.
    InitZero {
        /// Destination slot (OUT).
        slot: SlotId,
        /// Tensor shape to allocate.
        shape: Vec<usize>,
    },
    /// `init_one(shape)` into a slot.
    InitOne {
        /// Destination slot (OUT).
        slot: SlotId,
        /// Tensor shape to allocate.
        shape: Vec<usize>,
    },
    /// `apply1(ψ, U)` on a slot.
    Apply1 {
        /// Site tensor (INOUT).
        slot: SlotId,
        /// The 2×2 operator (IN).
        op: Array2<Complex64>,
    },
    /// `apply2(a, iₐ, b, i_b, U)` across two slots.
    Apply2 {
        /// First site tensor (INOUT).
        a: SlotId,
        /// Bond axis on `a`.
        idx_a: usize,
        /// Second site tensor (INOUT).
        b: SlotId,
        /// Bond axis on `b`.
        idx_b: usize,
        /// The 4×4 operator (IN).
        op: Array2<Complex64>,
    },
}

impl KernelCall {
    /// Kernel name, as exposed to the runtime.
    pub fn name(&self) -> &'static str {
        match self {
            KernelCall::InitZero { .. } => "init_zero",
            KernelCall::InitOne { .. } => "init_one",
            KernelCall::Apply1 { .. } => "apply1",
            KernelCall::Apply2 { .. } => "apply2",
        }
    }

    /// Slot accesses with their directions; the runtime builds dependency
    /// edges from these.
    pub fn accesses(&self) -> Vec<(SlotId, Direction)> {
        match self {
            KernelCall::InitZero { slot, .. } | KernelCall::InitOne { slot, .. } => {
                vec![(*slot, Direction::Out)]
            }
            KernelCall::Apply1 { slot, .. } => vec![(*slot, Direction::InOut)],
            KernelCall::Apply2 { a, b, .. } => {
                vec![(*a, Direction::InOut), (*b, Direction::InOut)]
            }
        }
    }

    /// Run the kernel against the store.
    fn execute(&self, store: &mut TensorStore) -> NetResult<()> {
        match self {
            KernelCall::InitZero { slot, shape } => {
                store.replace(*slot, kernel::init_zero(shape));
                Ok(())
            }
            KernelCall::InitOne { slot, shape } => {
                store.replace(*slot, kernel::init_one(shape));
                Ok(())
            }
            KernelCall::Apply1 { slot, op } => kernel::apply1(store.get_mut(*slot), op),
            KernelCall::Apply2 {
                a,
                idx_a,
                b,
                idx_b,
                op,
            } => {
                let (ta, tb) = store.pair_mut(*a, *b);
                kernel::apply2(ta, *idx_a, tb, *idx_b, op)
            }
        }
    }
}

/// A backend that accepts kernel tasks.
///
/// Submission is the orchestrator's only suspension point; `drain` is the
/// barrier used at user-observable boundaries (amplitude queries, program
/// exit). A kernel failure is fatal and surfaces at the submit or drain
/// site.
pub trait Runtime {
    /// Submit a kernel task; returns a handle.
    fn submit(&mut self, store: &mut TensorStore, call: KernelCall) -> NetResult<TaskId>;

    /// Block until the given task has completed.
    fn wait(&mut self, store: &mut TensorStore, task: TaskId) -> NetResult<()>;

    /// Block until every submitted task has completed.
    fn drain(&mut self, store: &mut TensorStore) -> NetResult<()>;
}

/// The default backend: runs every kernel synchronously at submission.
#[derive(Debug, Default)]
pub struct InlineRuntime {
    submitted: usize,
}

impl Runtime for InlineRuntime {
    fn submit(&mut self, store: &mut TensorStore, call: KernelCall) -> NetResult<TaskId> {
        trace!(kernel = call.name(), "inline submit");
        call.execute(store)?;
        let id = self.submitted;
        self.submitted += 1;
        Ok(id)
    }

    fn wait(&mut self, _store: &mut TensorStore, _task: TaskId) -> NetResult<()> {
        Ok(())
    }

    fn drain(&mut self, _store: &mut TensorStore) -> NetResult<()> {
        Ok(())
    }
}

/// Dependency graph over submitted tasks.
///
/// Edges point from a task to the tasks that must wait for it.
#[derive(Debug, Default)]
pub struct TaskGraph {
    graph: DiGraph<&'static str, ()>,
    /// Last task that wrote each slot.
    last_writer: FxHashMap<SlotId, NodeIndex>,
    /// Tasks that read each slot since its last write.
    readers: FxHashMap<SlotId, Vec<NodeIndex>>,
}

impl TaskGraph {
    /// Record a task and wire its dependency edges from the access tags.
    pub fn record(&mut self, call: &KernelCall) -> TaskId {
        let node = self.graph.add_node(call.name());
        let mut predecessors: FxHashSet<NodeIndex> = FxHashSet::default();

        for (slot, direction) in call.accesses() {
            if direction.reads() {
                // Read-after-write: wait for the slot's last writer.
                if let Some(&writer) = self.last_writer.get(&slot) {
                    predecessors.insert(writer);
                }
            }
            if direction.writes() {
                // Write-after-read: wait for everyone who read the slot
                // since it was last written, and for the writer itself.
                if let Some(readers) = self.readers.get(&slot) {
                    predecessors.extend(readers.iter().copied());
                }
                if let Some(&writer) = self.last_writer.get(&slot) {
                    predecessors.insert(writer);
                }
            }
        }
        for pred in predecessors {
            self.graph.add_edge(pred, node, ());
        }

        for (slot, direction) in call.accesses() {
            if direction.writes() {
                self.last_writer.insert(slot, node);
                self.readers.entry(slot).or_default().clear();
            } else if direction.reads() {
                self.readers.entry(slot).or_default().push(node);
            }
        }

        node.index()
    }

    /// Number of recorded tasks.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether no tasks have been recorded.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct dependencies of a task (tasks it must wait for).
    pub fn dependencies(&self, task: TaskId) -> Vec<TaskId> {
        self.graph
            .neighbors_directed(NodeIndex::new(task), petgraph::Direction::Incoming)
            .map(NodeIndex::index)
            .collect()
    }

    /// Whether `later` is transitively ordered after `earlier`.
    pub fn is_ordered_after(&self, later: TaskId, earlier: TaskId) -> bool {
        petgraph::algo::has_path_connecting(
            &self.graph,
            NodeIndex::new(earlier),
            NodeIndex::new(later),
            None,
        )
    }

    /// Tasks in an order satisfying every dependency edge.
    fn schedule(&self) -> Vec<TaskId> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("task graph is acyclic: edges only point at later submissions")
            .into_iter()
            .map(NodeIndex::index)
            .collect()
    }
}

/// A backend that queues kernels and executes them at the barrier.
///
/// Stands in for an external distributed scheduler: tasks are dispatched
/// in an order derived purely from the recorded dependency edges, which
/// exercises the same contract a parallel runtime must honour. Kernels on
/// the same slot run in submission order; kernels on disjoint slots may
/// be reordered freely.
#[derive(Debug, Default)]
pub struct DeferredRuntime {
    graph: TaskGraph,
    pending: Vec<KernelCall>,
    completed: usize,
}

impl DeferredRuntime {
    /// Create an empty deferred runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// The dependency graph recorded so far.
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }
}

impl Runtime for DeferredRuntime {
    fn submit(&mut self, _store: &mut TensorStore, call: KernelCall) -> NetResult<TaskId> {
        trace!(kernel = call.name(), "deferred submit");
        let id = self.graph.record(&call);
        self.pending.push(call);
        Ok(id)
    }

    fn wait(&mut self, store: &mut TensorStore, _task: TaskId) -> NetResult<()> {
        // Single-machine backend: the barrier completes everything.
        self.drain(store)
    }

    fn drain(&mut self, store: &mut TensorStore) -> NetResult<()> {
        for id in self.graph.schedule() {
            if id < self.completed {
                continue;
            }
            self.pending[id - self.completed].execute(store)?;
        }
        self.completed += self.pending.len();
        self.pending.clear();
        Ok(())
    }
}
