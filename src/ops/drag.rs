//! Pointer-drag gesture interpreter.
//!
//! A gesture runs `Idle → Dragging(active) → Dragging(active, over)* → Idle`.
//! Only the drop (`End`) touches the board, and only through
//! [`board_ops`](crate::ops::board_ops). Anything that cannot be resolved
//! ends the gesture with the board unchanged.

use tracing::debug;

use crate::model::board::Board;
use crate::ops::board_ops;

/// Gesture state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active_id: String,
        /// Current drop candidate, for the position indicator
        over_id: Option<String>,
    },
}

/// Drop rules for one view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPolicy {
    /// Whether a drop may move a task into another group
    pub allow_cross_group: bool,
}

impl DragPolicy {
    pub fn same_group_only() -> Self {
        DragPolicy {
            allow_cross_group: false,
        }
    }

    pub fn cross_group() -> Self {
        DragPolicy {
            allow_cross_group: true,
        }
    }
}

/// Pointer events fed to the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start(String),
    Over(Option<String>),
    End {
        active_id: String,
        over_id: Option<String>,
    },
    Cancel,
}

/// Why a drop did not change the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Dropped outside any task
    NoTarget,
    /// Dropped on itself
    SameItem,
    /// Active or target task is not on the board
    Unresolved,
    /// Target is in another group and the policy forbids it
    CrossGroupDisallowed,
}

/// What a drop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    NoOp(NoOpReason),
    Reordered {
        group_id: String,
        from: usize,
        to: usize,
    },
    Moved {
        task_id: String,
        from_group: String,
        to_group: String,
        index: usize,
    },
}

impl DropOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, DropOutcome::NoOp(_))
    }
}

/// Pure transition of the gesture state. `End` and `Cancel` both go idle;
/// the board side of `End` is [`resolve_drop`].
pub fn reduce(state: &DragState, event: &DragEvent) -> DragState {
    match event {
        DragEvent::Start(id) => DragState::Dragging {
            active_id: id.clone(),
            over_id: None,
        },
        DragEvent::Over(candidate) => match state {
            DragState::Dragging { active_id, .. } => DragState::Dragging {
                active_id: active_id.clone(),
                over_id: candidate.clone(),
            },
            // Stray over events outside a gesture are ignored
            DragState::Idle => DragState::Idle,
        },
        DragEvent::End { .. } | DragEvent::Cancel => DragState::Idle,
    }
}

/// Resolve a drop of `active_id` onto `over_id`.
///
/// The dragged task lands at the index currently held by the drop target.
pub fn resolve_drop(
    board: &Board,
    policy: DragPolicy,
    active_id: &str,
    over_id: Option<&str>,
) -> (Board, DropOutcome) {
    let unchanged = |reason| (board.clone(), DropOutcome::NoOp(reason));

    let over_id = match over_id {
        None => return unchanged(NoOpReason::NoTarget),
        Some(id) if id == active_id => return unchanged(NoOpReason::SameItem),
        Some(id) => id,
    };

    let (Some((sg, from)), Some((tg, to))) = (board.locate(active_id), board.locate(over_id))
    else {
        debug!(active = active_id, over = over_id, "drop target unresolved");
        return unchanged(NoOpReason::Unresolved);
    };

    let source = board.groups[sg].id.clone();
    let target = board.groups[tg].id.clone();

    if sg == tg {
        let next = board_ops::reorder_within_group(board, &source, from, to);
        return (
            next,
            DropOutcome::Reordered {
                group_id: source,
                from,
                to,
            },
        );
    }

    if !policy.allow_cross_group {
        debug!(active = active_id, from = %source, to = %target, "cross-group drop refused");
        return unchanged(NoOpReason::CrossGroupDisallowed);
    }

    let next = board_ops::move_across_groups(board, &source, active_id, &target, to);
    (
        next,
        DropOutcome::Moved {
            task_id: active_id.to_string(),
            from_group: source,
            to_group: target,
            index: to,
        },
    )
}

/// Holds the in-flight gesture for one view.
#[derive(Debug, Clone)]
pub struct DragInterpreter {
    policy: DragPolicy,
    state: DragState,
}

impl DragInterpreter {
    pub fn new(policy: DragPolicy) -> Self {
        DragInterpreter {
            policy,
            state: DragState::Idle,
        }
    }

    pub fn policy(&self) -> DragPolicy {
        self.policy
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { active_id, .. } => Some(active_id.as_str()),
            DragState::Idle => None,
        }
    }

    pub fn over_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { over_id, .. } => over_id.as_deref(),
            DragState::Idle => None,
        }
    }

    /// Begin a gesture; any gesture already in flight is discarded.
    pub fn on_drag_start(&mut self, task_id: &str) {
        self.state = reduce(&self.state, &DragEvent::Start(task_id.to_string()));
    }

    pub fn on_drag_over(&mut self, candidate: Option<&str>) {
        self.state = reduce(&self.state, &DragEvent::Over(candidate.map(str::to_string)));
    }

    pub fn on_drag_end(
        &mut self,
        board: &Board,
        active_id: &str,
        over_id: Option<&str>,
    ) -> (Board, DropOutcome) {
        self.state = DragState::Idle;
        resolve_drop(board, self.policy, active_id, over_id)
    }

    pub fn on_drag_cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Feed one event; returns the board after the event.
    pub fn dispatch(&mut self, board: &Board, event: DragEvent) -> Board {
        match event {
            DragEvent::End { active_id, over_id } => {
                self.on_drag_end(board, &active_id, over_id.as_deref()).0
            }
            other => {
                self.state = reduce(&self.state, &other);
                board.clone()
            }
        }
    }
}
