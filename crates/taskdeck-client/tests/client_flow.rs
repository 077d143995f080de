use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use taskdeck_client::controller::Controller;
use taskdeck_client::error::ApiError;
use taskdeck_client::gateway::Gateway;
use taskdeck_client::notify::{Level, Notice, Notifier};
use taskdeck_core::filter::ActiveFilter;
use taskdeck_core::task::{
    CountsSummary, FullCounts, Group, GroupCount, GroupDraft, Priority, Status, Tag, TagDraft,
    TagPatch, Task, TaskDraft, TaskPatch,
};
use uuid::Uuid;

#[derive(Default)]
struct ServerState {
    tasks: Vec<Task>,
    groups: Vec<Group>,
    tags: Vec<Tag>,
    today: Option<NaiveDate>,
    fail_tasks: bool,
    calls: Vec<String>,
}

/// In-memory stand-in for the HTTP server, shared through a handle so
/// tests can seed and inspect it after the controller takes ownership.
#[derive(Clone, Default)]
struct FakeGateway {
    state: Rc<RefCell<ServerState>>,
}

impl FakeGateway {
    fn log(&self, call: impl Into<String>) {
        self.state.borrow_mut().calls.push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn seed_task(&self, task: Task) {
        self.state.borrow_mut().tasks.push(task);
    }

    fn seed_group(&self, group: Group) {
        self.state.borrow_mut().groups.push(group);
    }

    fn seed_tag(&self, tag: Tag) {
        self.state.borrow_mut().tags.push(tag);
    }

    fn embedded_tags(&self, ids: &[Uuid]) -> Vec<Tag> {
        let state = self.state.borrow();
        ids.iter()
            .filter_map(|id| state.tags.iter().find(|tag| tag.id == *id).cloned())
            .collect()
    }
}

impl Gateway for FakeGateway {
    async fn fetch_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.log("fetch_groups");
        Ok(self.state.borrow().groups.clone())
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.log("fetch_tags");
        Ok(self.state.borrow().tags.clone())
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.log("fetch_tasks");
        if self.state.borrow().fail_tasks {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(self.state.borrow().tasks.clone())
    }

    async fn fetch_tasks_by_filter(&self, kind: ActiveFilter) -> Result<Vec<Task>, ApiError> {
        self.log(format!("fetch_tasks_by_filter:{}", kind.as_key()));
        let state = self.state.borrow();
        let tasks = state
            .tasks
            .iter()
            .filter(|task| match kind {
                ActiveFilter::All => true,
                ActiveFilter::Pending => task.status == Status::Pending,
                ActiveFilter::Completed => task.status == Status::Done,
                ActiveFilter::Today => state.today.is_some() && task.due_date == state.today,
                ActiveFilter::Upcoming => match (task.due_date, state.today) {
                    (Some(due), Some(today)) => due > today,
                    _ => false,
                },
            })
            .cloned()
            .collect();
        Ok(tasks)
    }

    async fn fetch_tasks_by_tag(&self, tag_id: Uuid) -> Result<Vec<Task>, ApiError> {
        self.log("fetch_tasks_by_tag");
        let state = self.state.borrow();
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.has_tag(tag_id))
            .cloned()
            .collect())
    }

    async fn fetch_tasks_by_group(&self, group_id: Uuid) -> Result<Vec<Task>, ApiError> {
        self.log("fetch_tasks_by_group");
        let state = self.state.borrow();
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.group_id == Some(group_id))
            .cloned()
            .collect())
    }

    async fn fetch_counts_summary(&self) -> Result<CountsSummary, ApiError> {
        self.log("fetch_counts_summary");
        let state = self.state.borrow();
        let completed = state
            .tasks
            .iter()
            .filter(|task| task.status == Status::Done)
            .count() as u64;
        Ok(CountsSummary {
            total: state.tasks.len() as u64,
            pending: state.tasks.len() as u64 - completed,
            completed,
        })
    }

    async fn fetch_full_counts(&self) -> Result<FullCounts, ApiError> {
        self.log("fetch_full_counts");
        let summary = self.fetch_counts_summary().await?;
        let state = self.state.borrow();

        let per_group = state
            .groups
            .iter()
            .map(|group| GroupCount {
                group_id: group.id,
                count: state
                    .tasks
                    .iter()
                    .filter(|task| task.group_id == Some(group.id))
                    .count() as u64,
            })
            .collect();

        let today = state.today;
        Ok(FullCounts {
            total: summary.total,
            pending: summary.pending,
            completed: summary.completed,
            today: state
                .tasks
                .iter()
                .filter(|task| today.is_some() && task.due_date == today)
                .count() as u64,
            upcoming: state
                .tasks
                .iter()
                .filter(|task| match (task.due_date, today) {
                    (Some(due), Some(today)) => due > today,
                    _ => false,
                })
                .count() as u64,
            per_group,
        })
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.log("create_task");
        let tags = self.embedded_tags(&draft.tags);
        let task = Task {
            id: Uuid::new_v4(),
            content: draft.content.clone(),
            status: Status::Pending,
            priority: draft.priority,
            group_id: draft.group_id,
            due_date: draft.due_date,
            time_range: draft.time_range.clone(),
            tags,
            created_at: None,
        };
        self.state.borrow_mut().tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.log("update_task");
        let embedded = patch.tags.as_ref().map(|ids| self.embedded_tags(ids));
        let mut state = self.state.borrow_mut();
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(ApiError::NotFound)?;

        if let Some(content) = &patch.content {
            task.content = content.clone();
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(group_id) = patch.group_id {
            task.group_id = group_id;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(time_range) = &patch.time_range {
            task.time_range = time_range.clone();
        }
        if let Some(tags) = embedded {
            task.tags = tags;
        }

        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        self.log("delete_task");
        let mut state = self.state.borrow_mut();
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        if state.tasks.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn create_group(&self, draft: &GroupDraft) -> Result<Group, ApiError> {
        self.log("create_group");
        let group = Group {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            icon: draft.icon.clone(),
            color: draft.color.clone(),
        };
        self.state.borrow_mut().groups.push(group.clone());
        Ok(group)
    }

    async fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError> {
        self.log("create_tag");
        let mut state = self.state.borrow_mut();
        if state.tags.iter().any(|tag| tag.name == draft.name) {
            return Err(ApiError::Conflict);
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            color: draft.color.clone(),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, id: Uuid, patch: &TagPatch) -> Result<Tag, ApiError> {
        self.log("update_tag");
        let mut state = self.state.borrow_mut();
        if let Some(name) = &patch.name
            && state
                .tags
                .iter()
                .any(|tag| tag.id != id && tag.name == *name)
        {
            return Err(ApiError::Conflict);
        }

        let updated = {
            let tag = state
                .tags
                .iter_mut()
                .find(|tag| tag.id == id)
                .ok_or(ApiError::NotFound)?;
            if let Some(name) = &patch.name {
                tag.name = name.clone();
            }
            if let Some(color) = &patch.color {
                tag.color = Some(color.clone());
            }
            tag.clone()
        };

        for task in &mut state.tasks {
            for tag in &mut task.tags {
                if tag.id == id {
                    *tag = updated.clone();
                }
            }
        }

        Ok(updated)
    }

    async fn delete_tag(&self, id: Uuid) -> Result<(), ApiError> {
        self.log("delete_tag");
        let mut state = self.state.borrow_mut();
        state.tags.retain(|tag| tag.id != id);
        for task in &mut state.tasks {
            task.tags.retain(|tag| tag.id != id);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .map(|notice| notice.message.clone())
            .collect()
    }

    fn errors(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter(|notice| notice.level == Level::Error)
            .map(|notice| notice.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn task(content: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        content: content.to_string(),
        status: Status::Pending,
        priority: Priority::Medium,
        group_id: None,
        due_date: None,
        time_range: None,
        tags: vec![],
        created_at: None,
    }
}

fn group(name: &str) -> Group {
    Group {
        id: Uuid::new_v4(),
        name: name.to_string(),
        icon: "📁".to_string(),
        color: None,
    }
}

fn tag(name: &str) -> Tag {
    Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
        color: None,
    }
}

fn controller(
    gateway: &FakeGateway,
    notifier: &RecordingNotifier,
) -> Controller<FakeGateway, RecordingNotifier> {
    Controller::new(gateway.clone(), notifier.clone())
}

#[tokio::test]
async fn bootstrap_loads_collections_and_summary() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    gateway.seed_group(group("Work"));
    gateway.seed_tag(tag("home"));
    gateway.seed_task(task("Buy milk"));

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;

    let store = controller.store();
    assert_eq!(store.groups.len(), 1);
    assert_eq!(store.tags.len(), 1);
    assert_eq!(store.tasks.len(), 1);
    assert!(store.summary.is_some());
    assert!(store.full_counts.is_none());

    assert_eq!(
        gateway.calls(),
        vec![
            "fetch_groups",
            "fetch_tags",
            "fetch_tasks",
            "fetch_counts_summary"
        ]
    );
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn create_task_round_trips_tags() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let t1 = tag("errand");
    let t2 = tag("urgent");
    gateway.seed_tag(t1.clone());
    gateway.seed_tag(t2.clone());

    let mut controller = controller(&gateway, &notifier);
    controller
        .create_task(TaskDraft {
            content: "Buy milk".to_string(),
            group_id: None,
            priority: Priority::High,
            due_date: Some(date(2026, 8, 25)),
            time_range: None,
            tags: vec![t1.id, t2.id],
        })
        .await;

    let store = controller.store();
    assert_eq!(store.tasks.len(), 1);
    assert!(store.tasks[0].has_tag(t1.id));
    assert!(store.tasks[0].has_tag(t2.id));
    assert_eq!(
        notifier.messages(),
        vec!["Task created successfully!".to_string()]
    );
}

#[tokio::test]
async fn empty_content_short_circuits_before_network() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();

    let mut controller = controller(&gateway, &notifier);
    controller
        .create_task(TaskDraft {
            content: "   ".to_string(),
            group_id: None,
            priority: Priority::Medium,
            due_date: None,
            time_range: None,
            tags: vec![],
        })
        .await;

    assert!(gateway.calls().is_empty());
    assert_eq!(notifier.errors(), vec!["Please enter task content"]);
}

#[tokio::test]
async fn toggle_status_round_trips() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let seeded = task("Water plants");
    let id = seeded.id;
    gateway.seed_task(seeded);

    let mut controller = controller(&gateway, &notifier);
    controller.load_tasks().await;

    controller.toggle_status(id).await;
    assert_eq!(controller.store().tasks[0].status, Status::Done);
    assert!(
        notifier
            .messages()
            .contains(&"Task marked as done".to_string())
    );

    controller.toggle_status(id).await;
    assert_eq!(controller.store().tasks[0].status, Status::Pending);
    assert!(
        notifier
            .messages()
            .contains(&"Task marked as pending".to_string())
    );
}

#[tokio::test]
async fn duplicate_tag_name_surfaces_conflict() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    gateway.seed_tag(tag("home"));

    let mut controller = controller(&gateway, &notifier);
    controller.load_tags().await;
    controller
        .create_tag(TagDraft {
            name: "home".to_string(),
            color: None,
        })
        .await;

    assert_eq!(notifier.errors(), vec!["Tag already exists"]);
    assert_eq!(controller.store().tags.len(), 1);
}

#[tokio::test]
async fn tag_rename_conflict_is_distinct() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let home = tag("home");
    let work = tag("work");
    gateway.seed_tag(home.clone());
    gateway.seed_tag(work.clone());

    let mut controller = controller(&gateway, &notifier);
    controller
        .update_tag(
            work.id,
            TagPatch {
                name: Some("home".to_string()),
                color: None,
            },
        )
        .await;

    assert_eq!(notifier.errors(), vec!["Tag name already used"]);
}

#[tokio::test]
async fn delete_tag_reloads_tags_then_tasks() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let errand = tag("errand");
    let mut chore = task("Sweep");
    chore.tags = vec![errand.clone()];
    gateway.seed_tag(errand.clone());
    gateway.seed_task(chore);

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;
    controller.delete_tag(errand.id).await;

    let store = controller.store();
    assert!(store.tags.is_empty());
    assert!(store.tasks[0].tags.is_empty());

    // Ordering matters: tag membership changed, so tags reload before
    // the task list.
    let calls = gateway.calls();
    let tail = &calls[calls.len() - 4..];
    assert_eq!(
        tail,
        [
            "delete_tag",
            "fetch_tags",
            "fetch_tasks",
            "fetch_counts_summary"
        ]
    );
    assert!(
        notifier
            .messages()
            .contains(&"Tag deleted".to_string())
    );
}

#[tokio::test]
async fn tag_filter_toggles_and_scopes_fetch() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let errand = tag("errand");
    let mut tagged = task("Buy milk");
    tagged.tags = vec![errand.clone()];
    gateway.seed_tag(errand.clone());
    gateway.seed_task(tagged);
    gateway.seed_task(task("Untagged"));

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;

    controller.set_tag_filter(errand.id).await;
    assert_eq!(controller.store().filter.tag_filter, Some(errand.id));
    assert_eq!(controller.store().tasks.len(), 1);
    assert!(gateway.calls().contains(&"fetch_tasks_by_tag".to_string()));

    // Selecting the same tag again clears the filter and reloads all.
    controller.set_tag_filter(errand.id).await;
    assert_eq!(controller.store().filter.tag_filter, None);
    assert_eq!(controller.store().tasks.len(), 2);
}

#[tokio::test]
async fn pending_filter_uses_server_endpoint() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let mut done = task("Shipped");
    done.status = Status::Done;
    gateway.seed_task(task("Open"));
    gateway.seed_task(done);

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;
    controller.set_active_filter(ActiveFilter::Pending).await;

    assert!(
        gateway
            .calls()
            .contains(&"fetch_tasks_by_filter:pending".to_string())
    );
    let store = controller.store();
    assert_eq!(store.page_title, "Pending Tasks");
    assert_eq!(store.tasks.len(), 1);
    assert_eq!(store.tasks[0].content, "Open");
}

#[tokio::test]
async fn group_filter_takes_title_and_clears_tag_filter() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let work = group("Work");
    let errand = tag("errand");
    let mut in_work = task("Report");
    in_work.group_id = Some(work.id);
    gateway.seed_group(work.clone());
    gateway.seed_tag(errand.clone());
    gateway.seed_task(in_work);
    gateway.seed_task(task("Elsewhere"));

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;
    controller.set_tag_filter(errand.id).await;
    controller.set_group_filter(work.id).await;

    let store = controller.store();
    assert_eq!(store.filter.tag_filter, None);
    assert_eq!(store.filter.group_filter, Some(work.id));
    assert_eq!(store.page_title, "📁 Work");
    assert_eq!(store.tasks.len(), 1);
}

#[tokio::test]
async fn failed_reload_preserves_previous_state() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    gateway.seed_task(task("Keep me"));

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;
    assert_eq!(controller.store().tasks.len(), 1);

    gateway.state.borrow_mut().fail_tasks = true;
    controller.load_tasks().await;

    assert_eq!(controller.store().tasks.len(), 1);
    assert_eq!(controller.store().tasks[0].content, "Keep me");
    assert_eq!(notifier.errors(), vec!["Error loading tasks"]);
}

#[tokio::test]
async fn deleting_vanished_task_surfaces_error() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();

    let mut controller = controller(&gateway, &notifier);
    controller.delete_task(Uuid::new_v4()).await;

    assert_eq!(notifier.errors(), vec!["Error deleting task"]);
}

#[tokio::test]
async fn view_reports_best_effort_badges_until_full_counts_load() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let work = group("Work");
    let mut in_work = task("Report");
    in_work.group_id = Some(work.id);
    in_work.due_date = Some(date(2026, 8, 19));
    gateway.seed_group(work.clone());
    gateway.seed_task(in_work);
    gateway.state.borrow_mut().today = Some(date(2026, 8, 19));

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;

    let today = date(2026, 8, 19);
    let first = controller.view_at(today);
    assert!(first.needs_full_counts);
    assert_eq!(first.badges.len(), 1);
    assert_eq!(first.badges[0].count, 1);
    assert!(!first.board_empty);

    controller.ensure_full_counts().await;
    let second = controller.view_at(today);
    assert!(!second.needs_full_counts);
    assert_eq!(second.stats.total, 1);
    assert_eq!(second.stats.today, 1);
    assert_eq!(second.stats.upcoming, 0);
}

#[tokio::test]
async fn view_projects_board_week_and_title() {
    let gateway = FakeGateway::default();
    let notifier = RecordingNotifier::default();
    let work = group("Work");
    let mut report = task("Report");
    report.group_id = Some(work.id);
    report.due_date = Some(date(2026, 8, 17));
    report.time_range = Some("09:30".to_string());
    gateway.seed_group(work.clone());
    gateway.seed_task(report);
    gateway.seed_task(task("Loose end"));

    let mut controller = controller(&gateway, &notifier);
    controller.bootstrap().await;
    controller.set_search_term("report");

    // Wednesday of the same week; the Monday bucket gets the task.
    let view = controller.view_at(date(2026, 8, 19));
    assert_eq!(view.page_title, "All Tasks");
    assert_eq!(view.board.len(), 1);
    assert_eq!(view.board[0].header(), "📁 Work");

    // Week view ignores the search filter.
    assert_eq!(view.week.len(), 7);
    assert_eq!(view.week[0].entries.len(), 1);
    assert_eq!(view.week[0].entries[0].label, "9:30 AM — Report");

    controller.set_search_term("zzz");
    let empty = controller.view_at(date(2026, 8, 19));
    assert!(empty.board_empty);
}
