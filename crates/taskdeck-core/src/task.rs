use chrono::{
  NaiveDate,
  NaiveDateTime
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Pending,
  Done
}

impl Status {
  /// The only reachable transition:
  /// pending <-> done.
  #[must_use]
  pub fn toggled(self) -> Self {
    match self {
      | Self::Pending => Self::Done,
      | Self::Done => Self::Pending
    }
  }

  #[must_use]
  pub fn is_done(self) -> bool {
    self == Self::Done
  }

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Pending => "pending",
      | Self::Done => "done"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Tag {
  pub id:    Uuid,
  pub name:  String,
  #[serde(default)]
  pub color: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Group {
  pub id:    Uuid,
  pub name:  String,
  pub icon:  String,
  #[serde(default)]
  pub color: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct Task {
  pub id:         Uuid,
  pub content:    String,
  pub status:     Status,
  #[serde(default)]
  pub priority:   Priority,
  #[serde(default)]
  pub group_id:   Option<Uuid>,
  #[serde(default)]
  pub due_date:   Option<NaiveDate>,
  #[serde(default)]
  pub time_range: Option<String>,
  /// Tags come back embedded as full
  /// objects, in server order.
  #[serde(default)]
  pub tags:       Vec<Tag>,
  #[serde(default)]
  pub created_at: Option<NaiveDateTime>
}

impl Task {
  #[must_use]
  pub fn has_tag(
    &self,
    tag_id: Uuid
  ) -> bool {
    self
      .tags
      .iter()
      .any(|tag| tag.id == tag_id)
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskDraft {
  pub content:    String,
  #[serde(default)]
  pub group_id:   Option<Uuid>,
  #[serde(default)]
  pub priority:   Priority,
  #[serde(default)]
  pub due_date:   Option<NaiveDate>,
  #[serde(default)]
  pub time_range: Option<String>,
  /// Tag ids picked in the
  /// multi-select.
  #[serde(default)]
  pub tags:       Vec<Uuid>
}

/// Partial update; unset fields are
/// left alone server-side, double
/// options clear nullable fields.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
)]
pub struct TaskPatch {
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub content:    Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub status:     Option<Status>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub priority:   Option<Priority>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub group_id:   Option<Option<Uuid>>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub due_date:
    Option<Option<NaiveDate>>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub time_range:
    Option<Option<String>>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub tags:       Option<Vec<Uuid>>
}

impl TaskPatch {
  #[must_use]
  pub fn status_only(
    status: Status
  ) -> Self {
    Self {
      status: Some(status),
      ..Self::default()
    }
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct GroupDraft {
  pub name:  String,
  pub icon:  String,
  #[serde(default)]
  pub color: Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TagDraft {
  pub name:  String,
  #[serde(default)]
  pub color: Option<String>
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
)]
pub struct TagPatch {
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub name:  Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub color: Option<String>
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CountsSummary {
  pub total:     u64,
  pub pending:   u64,
  pub completed: u64
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct GroupCount {
  pub group_id: Uuid,
  pub count:    u64
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct FullCounts {
  pub total:     u64,
  pub pending:   u64,
  pub completed: u64,
  pub today:     u64,
  pub upcoming:  u64,
  #[serde(default)]
  pub per_group: Vec<GroupCount>
}
