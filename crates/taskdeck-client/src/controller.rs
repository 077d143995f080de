use chrono::NaiveDate;
use taskdeck_core::datetime::local_today;
use taskdeck_core::filter::{ActiveFilter, apply_filters};
use taskdeck_core::task::{GroupDraft, Status, TagDraft, TagPatch, TaskDraft, TaskPatch};
use taskdeck_core::views::{
    BoardColumn, DayBucket, GroupBadge, StatsView, board_columns, group_badges, stats,
    week_buckets,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::notify::Notifier;
use crate::store::{Collection, Store};

/// Everything the render sink needs for one frame. Pure data; no DOM or
/// framework types leak in here.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub page_title: String,
    pub board: Vec<BoardColumn>,
    pub week: Vec<DayBucket>,
    pub stats: StatsView,
    pub badges: Vec<GroupBadge>,
    /// True when no column survived filtering; the sink shows the
    /// "All caught up!" card.
    pub board_empty: bool,
    /// True when badges came from the best-effort tally; the caller
    /// should kick off a full-counts refresh without blocking render.
    pub needs_full_counts: bool,
}

/// Single owner of the client state. One logical flow of control: every
/// mutation is a sequential recipe (gateway call, re-fetch of dependents,
/// notification), never a local patch. Failed calls leave prior state
/// intact; there are no retries.
pub struct Controller<G, N> {
    gateway: G,
    notifier: N,
    store: Store,
}

impl<G: Gateway, N: Notifier> Controller<G, N> {
    pub fn new(gateway: G, notifier: N) -> Self {
        Self {
            gateway,
            notifier,
            store: Store::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Startup sequence: groups, tags, then tasks (which chains the
    /// summary refresh).
    #[instrument(skip(self))]
    pub async fn bootstrap(&mut self) {
        self.load_groups().await;
        self.load_tags().await;
        self.load_tasks().await;
        info!("client bootstrapped");
    }

    #[instrument(skip(self))]
    pub async fn load_groups(&mut self) {
        let token = self.store.begin_fetch(Collection::Groups);
        match self.gateway.fetch_groups().await {
            Ok(groups) => {
                self.store.commit_groups(token, groups);
            }
            Err(err) => {
                error!(%err, "failed loading groups");
                self.notifier.error("Error loading groups");
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn load_tags(&mut self) {
        let token = self.store.begin_fetch(Collection::Tags);
        match self.gateway.fetch_tags().await {
            Ok(tags) => {
                self.store.commit_tags(token, tags);
            }
            Err(err) => {
                error!(%err, "failed loading tags");
                self.notifier.error("Error loading tags");
            }
        }
    }

    /// Full task reload; every successful load also refreshes the
    /// lightweight counts summary.
    #[instrument(skip(self))]
    pub async fn load_tasks(&mut self) {
        let token = self.store.begin_fetch(Collection::Tasks);
        match self.gateway.fetch_tasks().await {
            Ok(tasks) => {
                if self.store.commit_tasks(token, tasks) {
                    self.refresh_summary().await;
                }
            }
            Err(err) => {
                error!(%err, "failed loading tasks");
                self.notifier.error("Error loading tasks");
            }
        }
    }

    /// Cheap aggregate; failures are logged but not surfaced, the stats
    /// projection just falls back a tier.
    #[instrument(skip(self))]
    pub async fn refresh_summary(&mut self) {
        let token = self.store.begin_fetch(Collection::Summary);
        match self.gateway.fetch_counts_summary().await {
            Ok(summary) => {
                self.store.commit_summary(token, summary);
            }
            Err(err) => {
                warn!(%err, "failed refreshing counts summary");
            }
        }
    }

    /// Heavy aggregate with the per-group breakdown; loaded on demand and
    /// reused until the next explicit reload. Not surfaced on failure.
    #[instrument(skip(self))]
    pub async fn load_full_counts(&mut self) {
        let token = self.store.begin_fetch(Collection::FullCounts);
        match self.gateway.fetch_full_counts().await {
            Ok(counts) => {
                self.store.commit_full_counts(token, counts);
            }
            Err(err) => {
                warn!(%err, "failed loading full counts");
            }
        }
    }

    /// Background kick-off used after a view reported best-effort badges.
    pub async fn ensure_full_counts(&mut self) {
        if self.store.full_counts.is_none() {
            self.load_full_counts().await;
        }
    }

    /// Switch the top-level view mode. Date/status scoped modes fetch
    /// from their server endpoints; `all` is a plain reload.
    #[instrument(skip(self), fields(kind = kind.as_key()))]
    pub async fn set_active_filter(&mut self, kind: ActiveFilter) {
        self.store.filter.active = kind;
        self.store.filter.group_filter = None;
        self.store.page_title = kind.title().to_string();

        if kind == ActiveFilter::All {
            self.load_tasks().await;
            return;
        }

        let token = self.store.begin_fetch(Collection::Tasks);
        match self.gateway.fetch_tasks_by_filter(kind).await {
            Ok(tasks) => {
                self.store.commit_tasks(token, tasks);
            }
            Err(err) => {
                error!(%err, kind = kind.as_key(), "failed loading filtered tasks");
                self.notifier.error("Error loading tasks");
            }
        }
    }

    /// Toggle semantics: selecting the active tag clears it and reloads
    /// everything.
    #[instrument(skip(self), fields(tag_id = %tag_id))]
    pub async fn set_tag_filter(&mut self, tag_id: Uuid) {
        if self.store.filter.tag_filter == Some(tag_id) {
            self.store.filter.tag_filter = None;
            self.load_tasks().await;
            return;
        }

        self.store.filter.tag_filter = Some(tag_id);
        let token = self.store.begin_fetch(Collection::Tasks);
        match self.gateway.fetch_tasks_by_tag(tag_id).await {
            Ok(tasks) => {
                self.store.commit_tasks(token, tasks);
            }
            Err(err) => {
                error!(%err, "failed fetching tasks by tag");
                self.notifier.error("Error fetching tasks by tag");
            }
        }
    }

    /// Group selection clears any tag filter so the group's tasks show
    /// unobstructed, and takes over the page title.
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn set_group_filter(&mut self, group_id: Uuid) {
        if let Some(group) = self.store.groups.iter().find(|g| g.id == group_id) {
            self.store.page_title = format!("{} {}", group.icon, group.name);
        }
        self.store.filter.tag_filter = None;
        self.store.filter.group_filter = Some(group_id);

        let token = self.store.begin_fetch(Collection::Tasks);
        match self.gateway.fetch_tasks_by_group(group_id).await {
            Ok(tasks) => {
                self.store.commit_tasks(token, tasks);
            }
            Err(err) => {
                error!(%err, "failed fetching tasks by group");
                self.notifier.error("Error fetching tasks by group");
            }
        }
    }

    /// State only; the embedder debounces input and re-renders after the
    /// quiet period.
    pub fn set_search_term(&mut self, term: &str) {
        self.store.filter.search_term = term.to_string();
    }

    #[instrument(skip(self, draft), fields(content_len = draft.content.len()))]
    pub async fn create_task(&mut self, draft: TaskDraft) {
        if let Err(err) = self.try_create_task(&draft).await {
            error!(%err, "create task failed");
            self.surface(&err, "Error creating task");
            return;
        }
        self.notifier.success("Task created successfully!");
    }

    async fn try_create_task(&mut self, draft: &TaskDraft) -> Result<(), ApiError> {
        if draft.content.trim().is_empty() {
            return Err(ApiError::validation("Please enter task content"));
        }
        self.gateway.create_task(draft).await?;
        self.load_tasks().await;
        Ok(())
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_task(&mut self, id: Uuid, patch: TaskPatch) {
        if let Err(err) = self.try_update_task(id, &patch).await {
            error!(%err, "update task failed");
            self.surface(&err, "Error updating task");
            return;
        }
        self.notifier.success("Task updated successfully!");
    }

    async fn try_update_task(&mut self, id: Uuid, patch: &TaskPatch) -> Result<(), ApiError> {
        if patch
            .content
            .as_deref()
            .is_some_and(|content| content.trim().is_empty())
        {
            return Err(ApiError::validation("Please enter task content"));
        }
        self.gateway.update_task(id, patch).await?;
        self.load_tasks().await;
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_task(&mut self, id: Uuid) {
        match self.gateway.delete_task(id).await {
            Ok(()) => {
                self.load_tasks().await;
                self.notifier.success("Task deleted successfully!");
            }
            Err(err) => {
                error!(%err, "delete task failed");
                self.notifier.error("Error deleting task");
            }
        }
    }

    /// Flip pending <-> done through a status-only patch. Unknown ids are
    /// ignored (the card vanished under the click).
    #[instrument(skip(self), fields(id = %id))]
    pub async fn toggle_status(&mut self, id: Uuid) {
        let Some(task) = self.store.tasks.iter().find(|task| task.id == id) else {
            return;
        };
        let next: Status = task.status.toggled();

        match self
            .gateway
            .update_task(id, &TaskPatch::status_only(next))
            .await
        {
            Ok(_) => {
                self.load_tasks().await;
                self.notifier
                    .success(format!("Task marked as {}", next.as_key()));
            }
            Err(err) => {
                error!(%err, "toggle status failed");
                self.notifier.error("Error updating task");
            }
        }
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_group(&mut self, draft: GroupDraft) {
        if draft.name.trim().is_empty() {
            self.notifier.error("Please enter group name");
            return;
        }

        match self.gateway.create_group(&draft).await {
            Ok(_) => {
                self.load_groups().await;
                self.notifier.success("Group created successfully!");
            }
            Err(err) => {
                error!(%err, "create group failed");
                self.notifier.error("Error creating group");
            }
        }
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_tag(&mut self, draft: TagDraft) {
        if draft.name.trim().is_empty() {
            self.notifier.error("Tag name required");
            return;
        }

        match self.gateway.create_tag(&draft).await {
            Ok(_) => {
                self.load_tags().await;
                self.notifier.success("Tag created");
            }
            Err(ApiError::Conflict) => {
                self.notifier.error("Tag already exists");
            }
            Err(err) => {
                error!(%err, "create tag failed");
                self.notifier.error("Error creating tag");
            }
        }
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_tag(&mut self, id: Uuid, patch: TagPatch) {
        if patch
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            self.notifier.error("Tag name required");
            return;
        }

        match self.gateway.update_tag(id, &patch).await {
            Ok(_) => {
                self.load_tags().await;
                self.notifier.success("Tag updated");
            }
            Err(ApiError::Conflict) => {
                self.notifier.error("Tag name already used");
            }
            Err(err) => {
                error!(%err, "update tag failed");
                self.notifier.error("Error updating tag");
            }
        }
    }

    /// Tag removal changes task membership, so tags reload before tasks.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_tag(&mut self, id: Uuid) {
        match self.gateway.delete_tag(id).await {
            Ok(()) => {
                if self.store.filter.tag_filter == Some(id) {
                    self.store.filter.tag_filter = None;
                }
                self.load_tags().await;
                self.load_tasks().await;
                self.notifier.success("Tag deleted");
            }
            Err(err) => {
                error!(%err, "delete tag failed");
                self.notifier.error("Error deleting tag");
            }
        }
    }

    /// Project the current state for the render sink using the host's
    /// local calendar date.
    pub fn view(&self) -> ViewModel {
        self.view_at(local_today())
    }

    /// Pure projection against an explicit date.
    pub fn view_at(&self, today: NaiveDate) -> ViewModel {
        let filtered = apply_filters(&self.store.tasks, &self.store.filter, today);
        let board = board_columns(&self.store.groups, &filtered);
        let week = week_buckets(&self.store.tasks, today);
        let stats = stats(
            self.store.full_counts.as_ref(),
            self.store.summary.as_ref(),
            &self.store.tasks,
            today,
        );
        let (badges, needs_full_counts) = group_badges(
            &self.store.groups,
            self.store.full_counts.as_ref(),
            &self.store.tasks,
        );

        ViewModel {
            page_title: self.store.page_title.clone(),
            board_empty: board.is_empty(),
            board,
            week,
            stats,
            badges,
            needs_full_counts,
        }
    }

    fn surface(&mut self, err: &ApiError, fallback: &str) {
        match err {
            ApiError::Validation(message) => {
                let message = message.clone();
                self.notifier.error(message);
            }
            _ => self.notifier.error(fallback),
        }
    }
}
