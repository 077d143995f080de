use chrono::NaiveDate;
use tracing::trace;
use uuid::Uuid;

use crate::task::Task;

/// Top-level view mode. Pending and
/// completed are scoped server-side;
/// the pipeline only re-applies the
/// date views.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ActiveFilter {
  #[default]
  All,
  Today,
  Upcoming,
  Pending,
  Completed
}

impl ActiveFilter {
  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Today => "today",
      | Self::Upcoming => "upcoming",
      | Self::Pending => "pending",
      | Self::Completed => "completed"
    }
  }

  #[must_use]
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "all" => Some(Self::All),
      | "today" => Some(Self::Today),
      | "upcoming" => {
        Some(Self::Upcoming)
      }
      | "pending" => {
        Some(Self::Pending)
      }
      | "completed" => {
        Some(Self::Completed)
      }
      | _ => None
    }
  }

  #[must_use]
  pub fn title(self) -> &'static str {
    match self {
      | Self::All => "All Tasks",
      | Self::Today => {
        "Today's Tasks"
      }
      | Self::Upcoming => {
        "Upcoming Tasks"
      }
      | Self::Pending => {
        "Pending Tasks"
      }
      | Self::Completed => {
        "Completed Tasks"
      }
    }
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct FilterState {
  pub search_term:  String,
  pub active:       ActiveFilter,
  pub tag_filter:   Option<Uuid>,
  /// Tracked for page-title and
  /// toggle bookkeeping; group
  /// scoping itself happens at fetch
  /// time.
  pub group_filter: Option<Uuid>
}

/// Pure staged pipeline: search
/// narrows first, then the date view,
/// then the tag filter. The order is
/// fixed so ties keep a deterministic
/// output sequence. Tasks without a
/// due date never survive the today
/// or upcoming stages.
#[must_use]
pub fn apply_filters(
  tasks: &[Task],
  state: &FilterState,
  today: NaiveDate
) -> Vec<Task> {
  let term = state
    .search_term
    .trim()
    .to_lowercase();

  let filtered: Vec<Task> = tasks
    .iter()
    .filter(|task| {
      matches_search(task, &term)
    })
    .filter(|task| {
      matches_date(
        task,
        state.active,
        today
      )
    })
    .filter(|task| {
      matches_tag(
        task,
        state.tag_filter
      )
    })
    .cloned()
    .collect();

  trace!(
    input = tasks.len(),
    output = filtered.len(),
    active = state.active.as_key(),
    "applied filter pipeline"
  );

  filtered
}

fn matches_search(
  task: &Task,
  term: &str
) -> bool {
  term.is_empty()
    || task
      .content
      .to_lowercase()
      .contains(term)
}

fn matches_date(
  task: &Task,
  active: ActiveFilter,
  today: NaiveDate
) -> bool {
  match active {
    | ActiveFilter::Today => {
      task.due_date
        == Some(today)
    }
    | ActiveFilter::Upcoming => {
      // Midnight-of-date against the
      // current instant reduces to a
      // strict date comparison.
      task
        .due_date
        .map(|due| due > today)
        .unwrap_or(false)
    }
    | ActiveFilter::All
    | ActiveFilter::Pending
    | ActiveFilter::Completed => true
  }
}

fn matches_tag(
  task: &Task,
  tag_filter: Option<Uuid>
) -> bool {
  match tag_filter {
    | Some(tag_id) => {
      task.has_tag(tag_id)
    }
    | None => true
  }
}
