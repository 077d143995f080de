use taskdeck_core::filter::FilterState;
use taskdeck_core::task::{CountsSummary, FullCounts, Group, Tag, Task};
use tracing::debug;

/// Collection types fetched independently; each carries its own request
/// sequence so a stale response can never clobber a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Tasks,
    Groups,
    Tags,
    Summary,
    FullCounts,
}

impl Collection {
    fn as_key(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Groups => "groups",
            Self::Tags => "tags",
            Self::Summary => "summary",
            Self::FullCounts => "full_counts",
        }
    }
}

/// Monotonic request token per collection. Responses resume in arrival
/// order, not issue order, so a commit only lands when it carries the
/// newest issued token (last-requested-wins).
#[derive(Debug, Default, Clone, Copy)]
struct FetchSeq {
    issued: u64,
}

impl FetchSeq {
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_current(self, token: u64) -> bool {
        token == self.issued
    }
}

/// Last successful fetch of every collection plus the active filter state.
/// Initialized empty; replaced wholesale on each successful fetch; never
/// patched locally by mutations.
#[derive(Debug, Default)]
pub struct Store {
    pub tasks: Vec<Task>,
    pub groups: Vec<Group>,
    pub tags: Vec<Tag>,
    pub summary: Option<CountsSummary>,
    pub full_counts: Option<FullCounts>,
    pub filter: FilterState,
    pub page_title: String,

    tasks_seq: FetchSeq,
    groups_seq: FetchSeq,
    tags_seq: FetchSeq,
    summary_seq: FetchSeq,
    full_counts_seq: FetchSeq,
}

impl Store {
    pub fn new() -> Self {
        Self {
            page_title: taskdeck_core::ActiveFilter::All.title().to_string(),
            ..Self::default()
        }
    }

    /// Issue a request token for a collection fetch about to go out.
    pub fn begin_fetch(&mut self, collection: Collection) -> u64 {
        let token = self.seq_mut(collection).begin();
        debug!(collection = collection.as_key(), token, "fetch issued");
        token
    }

    pub fn commit_tasks(&mut self, token: u64, tasks: Vec<Task>) -> bool {
        if !self.accept(Collection::Tasks, token) {
            return false;
        }
        self.tasks = tasks;
        true
    }

    pub fn commit_groups(&mut self, token: u64, groups: Vec<Group>) -> bool {
        if !self.accept(Collection::Groups, token) {
            return false;
        }
        self.groups = groups;
        true
    }

    pub fn commit_tags(&mut self, token: u64, tags: Vec<Tag>) -> bool {
        if !self.accept(Collection::Tags, token) {
            return false;
        }
        self.tags = tags;
        true
    }

    pub fn commit_summary(&mut self, token: u64, summary: CountsSummary) -> bool {
        if !self.accept(Collection::Summary, token) {
            return false;
        }
        self.summary = Some(summary);
        true
    }

    pub fn commit_full_counts(&mut self, token: u64, counts: FullCounts) -> bool {
        if !self.accept(Collection::FullCounts, token) {
            return false;
        }
        self.full_counts = Some(counts);
        true
    }

    fn accept(&mut self, collection: Collection, token: u64) -> bool {
        let current = self.seq_mut(collection).is_current(token);
        if !current {
            debug!(
                collection = collection.as_key(),
                token, "discarding stale fetch response"
            );
        }
        current
    }

    fn seq_mut(&mut self, collection: Collection) -> &mut FetchSeq {
        match collection {
            Collection::Tasks => &mut self.tasks_seq,
            Collection::Groups => &mut self.groups_seq,
            Collection::Tags => &mut self.tags_seq,
            Collection::Summary => &mut self.summary_seq,
            Collection::FullCounts => &mut self.full_counts_seq,
        }
    }
}
