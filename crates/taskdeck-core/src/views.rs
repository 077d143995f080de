use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::datetime::{
  format_time_range,
  week_days
};
use crate::task::{
  CountsSummary,
  FullCounts,
  Group,
  Status,
  Task
};

/// One column of the task board. The
/// ungrouped bucket has no group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
  pub group: Option<Group>,
  pub tasks: Vec<Task>
}

impl BoardColumn {
  #[must_use]
  pub fn count(&self) -> usize {
    self.tasks.len()
  }

  #[must_use]
  pub fn header(&self) -> String {
    match &self.group {
      | Some(group) => format!(
        "{} {}",
        group.icon, group.name
      ),
      | None => {
        "Ungrouped".to_string()
      }
    }
  }
}

/// Partition the filtered set by
/// group id. Column order follows the
/// group fetch order; in-column order
/// follows the filtered order, no
/// re-sort. Groups with zero
/// post-filter tasks are suppressed,
/// and the trailing Ungrouped column
/// only appears when something is in
/// it.
#[must_use]
pub fn board_columns(
  groups: &[Group],
  filtered: &[Task]
) -> Vec<BoardColumn> {
  let mut by_group: BTreeMap<
    Uuid,
    Vec<Task>,
  > = BTreeMap::new();
  let mut ungrouped: Vec<Task> =
    Vec::new();

  for task in filtered {
    match task.group_id {
      | Some(group_id) => by_group
        .entry(group_id)
        .or_default()
        .push(task.clone()),
      | None => {
        ungrouped.push(task.clone())
      }
    }
  }

  let mut columns = Vec::new();
  for group in groups {
    if let Some(tasks) =
      by_group.remove(&group.id)
    {
      columns.push(BoardColumn {
        group: Some(group.clone()),
        tasks
      });
    }
  }

  if !ungrouped.is_empty() {
    columns.push(BoardColumn {
      group: None,
      tasks: ungrouped
    });
  }

  debug!(
    columns = columns.len(),
    tasks = filtered.len(),
    "projected board"
  );

  columns
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekEntry {
  pub task_id: Uuid,
  pub label:   String
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
  pub date:    NaiveDate,
  pub label:   String,
  pub entries: Vec<WeekEntry>
}

/// Seven buckets starting at the
/// Monday of the current week, fed
/// from the UNFILTERED task set.
/// Entries keep natural fetch order;
/// there is no time-of-day sort even
/// though time_range exists (known
/// limitation carried over).
#[must_use]
pub fn week_buckets(
  tasks: &[Task],
  today: NaiveDate
) -> Vec<DayBucket> {
  week_days(today)
    .into_iter()
    .map(|day| {
      let entries = tasks
        .iter()
        .filter(|task| {
          task.due_date == Some(day)
        })
        .map(week_entry)
        .collect();

      DayBucket {
        date: day,
        label: day
          .format("%a %d")
          .to_string(),
        entries
      }
    })
    .collect()
}

fn week_entry(
  task: &Task
) -> WeekEntry {
  let label =
    match task.time_range.as_deref() {
      | Some(range)
        if !range.is_empty() =>
      {
        format!(
          "{} — {}",
          format_time_range(range),
          task.content
        )
      }
      | _ => task.content.clone()
    };

  WeekEntry {
    task_id: task.id,
    label
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct StatsView {
  pub total:     u64,
  pub pending:   u64,
  pub completed: u64,
  pub today:     u64,
  pub upcoming:  u64
}

/// Three-tier precedence: full counts
/// verbatim when loaded; else the
/// summary totals with today and
/// upcoming derived from the loaded
/// tasks; else everything derived
/// client-side.
#[must_use]
pub fn stats(
  full: Option<&FullCounts>,
  summary: Option<&CountsSummary>,
  tasks: &[Task],
  today: NaiveDate
) -> StatsView {
  if let Some(counts) = full {
    return StatsView {
      total:     counts.total,
      pending:   counts.pending,
      completed: counts.completed,
      today:     counts.today,
      upcoming:  counts.upcoming
    };
  }

  let due_today =
    count_due_today(tasks, today);
  let due_upcoming =
    count_due_upcoming(tasks, today);

  if let Some(summary) = summary {
    return StatsView {
      total:     summary.total,
      pending:   summary.pending,
      completed: summary.completed,
      today:     due_today,
      upcoming:  due_upcoming
    };
  }

  StatsView {
    total: tasks.len() as u64,
    pending: count_status(
      tasks,
      Status::Pending
    ),
    completed: count_status(
      tasks,
      Status::Done
    ),
    today: due_today,
    upcoming: due_upcoming
  }
}

fn count_status(
  tasks: &[Task],
  status: Status
) -> u64 {
  tasks
    .iter()
    .filter(|task| {
      task.status == status
    })
    .count() as u64
}

fn count_due_today(
  tasks: &[Task],
  today: NaiveDate
) -> u64 {
  tasks
    .iter()
    .filter(|task| {
      task.due_date == Some(today)
    })
    .count() as u64
}

fn count_due_upcoming(
  tasks: &[Task],
  today: NaiveDate
) -> u64 {
  tasks
    .iter()
    .filter(|task| {
      task
        .due_date
        .map(|due| due > today)
        .unwrap_or(false)
    })
    .count() as u64
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct GroupBadge {
  pub group_id: Uuid,
  pub count:    u64
}

/// Badge counts for the group
/// listing, one per group in fetch
/// order. Server per-group counts
/// win; without them a best-effort
/// tally over the loaded tasks is
/// used and the second return tells
/// the caller to kick off a full
/// counts refresh in the background.
#[must_use]
pub fn group_badges(
  groups: &[Group],
  full: Option<&FullCounts>,
  tasks: &[Task]
) -> (Vec<GroupBadge>, bool) {
  let counts: BTreeMap<Uuid, u64> =
    match full {
      | Some(counts) => counts
        .per_group
        .iter()
        .map(|entry| {
          (
            entry.group_id,
            entry.count
          )
        })
        .collect(),
      | None => {
        let mut tally =
          BTreeMap::new();
        for task in tasks {
          if let Some(group_id) =
            task.group_id
          {
            *tally
              .entry(group_id)
              .or_insert(0_u64) += 1;
          }
        }
        tally
      }
    };

  let badges = groups
    .iter()
    .map(|group| GroupBadge {
      group_id: group.id,
      count:    counts
        .get(&group.id)
        .copied()
        .unwrap_or(0)
    })
    .collect();

  (badges, full.is_none())
}
