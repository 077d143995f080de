pub mod datetime;
pub mod filter;
pub mod task;
pub mod views;

pub use filter::{
  ActiveFilter,
  FilterState,
  apply_filters
};
pub use task::{
  CountsSummary,
  FullCounts,
  Group,
  GroupCount,
  GroupDraft,
  Priority,
  Status,
  Tag,
  TagDraft,
  TagPatch,
  Task,
  TaskDraft,
  TaskPatch
};
pub use views::{
  BoardColumn,
  DayBucket,
  GroupBadge,
  StatsView,
  WeekEntry,
  board_columns,
  group_badges,
  stats,
  week_buckets
};
