use super::types::{StageRecord, StageState, StageType};

impl StageRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stage_type: StageType::Stage,
            state: StageState::Unknown,
            children: Vec::new(),
            total_duration_millis: 0,
            start_time_millis: 0,
            pause_duration_millis: 0,
            complete_percent: 0.0,
            skeleton: false,
            agent: None,
            url: None,
        }
    }

    pub fn with_type(mut self, stage_type: StageType) -> Self {
        self.stage_type = stage_type;
        self
    }

    pub fn with_state(mut self, state: StageState) -> Self {
        self.state = state;
        self
    }

    pub fn with_duration(mut self, total_duration_millis: u64) -> Self {
        self.total_duration_millis = total_duration_millis;
        self
    }

    pub fn with_start(mut self, start_time_millis: u64) -> Self {
        self.start_time_millis = start_time_millis;
        self
    }

    pub fn with_children(mut self, children: Vec<StageRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_started(&self) -> bool {
        self.start_time_millis > 0
    }

    /// True when the first child is a parallel branch.
    ///
    /// Only the first child is inspected; mixed child types at one level are
    /// classified by whatever comes first.
    pub fn is_parallel_container(&self) -> bool {
        self.children
            .first()
            .is_some_and(|child| child.stage_type == StageType::Parallel)
    }

    /// Copy every field except `children`, which is replaced.
    pub fn with_replaced_children(&self, children: Vec<StageRecord>) -> StageRecord {
        StageRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            stage_type: self.stage_type,
            state: self.state,
            children,
            total_duration_millis: self.total_duration_millis,
            start_time_millis: self.start_time_millis,
            pause_duration_millis: self.pause_duration_millis,
            complete_percent: self.complete_percent,
            skeleton: self.skeleton,
            agent: self.agent.clone(),
            url: self.url.clone(),
        }
    }

    /// Provisional copy of this stage and all of its descendants.
    pub fn to_skeleton(&self) -> StageRecord {
        let children = self.children.iter().map(StageRecord::to_skeleton).collect();
        let mut marked = self.with_replaced_children(children);
        marked.skeleton = true;
        marked.complete_percent = 0.0;
        marked
    }
}

impl StageState {
    /// States that will not change any more.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            StageState::Success
                | StageState::Unstable
                | StageState::Failure
                | StageState::Unknown
                | StageState::Aborted
                | StageState::Skipped
                | StageState::NotBuilt
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, StageState::Running | StageState::Paused)
    }

    /// Rank used to pick the state that best describes a whole run.
    pub fn severity(&self) -> u8 {
        match self {
            StageState::Unknown | StageState::Unrecognized => 0,
            StageState::Skipped => 1,
            StageState::NotBuilt => 2,
            StageState::Success => 3,
            StageState::Queued => 4,
            StageState::Paused => 5,
            StageState::Running => 6,
            StageState::Unstable => 7,
            StageState::Aborted => 8,
            StageState::Failure => 9,
        }
    }

    /// Most severe state across a stage forest, `Unknown` when empty.
    pub fn most_severe<'a, I>(stages: I) -> StageState
    where
        I: IntoIterator<Item = &'a StageRecord>,
    {
        stages
            .into_iter()
            .flat_map(|stage| {
                std::iter::once(stage.state).chain(std::iter::once(StageState::most_severe(
                    &stage.children,
                )))
            })
            .max_by_key(StageState::severity)
            .unwrap_or_default()
    }
}
