//! Task use-case service.
//!
//! # Responsibility
//! - Run the listing flow: reset pass, filtering, ranking, segregation.
//! - Provide create/import/edit/get/delete entry points with ownership
//!   checks and validation-before-mutation.
//!
//! # Invariants
//! - The reset pass persists every expired task before any filtering or
//!   sorting happens.
//! - Deadlines always come from the deadline calculator, never from caller
//!   input raw.
//! - Tag replacement covers the whole set atomically.

use crate::clock::Clock;
use crate::model::tag::TagId;
use crate::model::task::{Frequency, Task, TaskDraft, TaskId, TaskValidationError, UserId};
use crate::model::template::{PredefinedTask, TemplateId};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRelation, TaskRepository};
use crate::schedule::deadline::{deadline_for, end_of_day, start_of_next_day};
use crate::schedule::priority::{rank, split_finished, SortMode, TaskFilter};
use crate::schedule::reset::{apply_reset, should_reset};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Referenced task does not exist.
    NotFound(TaskId),
    /// Referenced template does not exist.
    TemplateNotFound(TemplateId),
    /// A supplied tag does not exist or belongs to another user.
    TagNotFound(TagId),
    /// The task exists but the requesting user does not own it.
    Forbidden(TaskId),
    /// Malformed input, rejected before any mutation.
    Validation(TaskValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Forbidden(id) => write!(f, "task {id} belongs to a different user"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::NotFound(id),
            RepoError::TemplateNotFound(id) => Self::TemplateNotFound(id),
            RepoError::TagNotFound(id) => Self::TagNotFound(id),
            RepoError::OwnerMismatch(id) => Self::Forbidden(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Listing result: ranked active tasks plus segregated finished tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListing {
    pub active: Vec<Task>,
    pub finished: Vec<Task>,
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Lists one user's tasks for presentation.
    ///
    /// Runs the reset pass over the full task set first (persisting expired
    /// tasks), then applies the filter, ranks, and splits finished tasks
    /// out.
    pub fn list_tasks(
        &self,
        owner: UserId,
        mode: SortMode,
        filter: TaskFilter,
    ) -> Result<TaskListing, TaskServiceError> {
        let now = self.clock.now();
        let today = self.clock.today();

        let mut tasks = self.repo.list_by_owner(owner, Some(TaskRelation::Tags))?;

        let mut reset_count = 0usize;
        for task in &mut tasks {
            if should_reset(task, today) {
                apply_reset(task, now, today);
                self.repo.update_task(task)?;
                reset_count += 1;
            }
        }
        if reset_count > 0 {
            info!(
                "event=reset_pass module=schedule status=ok owner={owner} reset_count={reset_count}"
            );
        }

        tasks.retain(|task| filter.matches(task));
        rank(&mut tasks, mode, now);
        let (active, finished) = split_finished(tasks);

        Ok(TaskListing { active, finished })
    }

    /// Creates a task from caller-supplied fields.
    pub fn create_task(
        &mut self,
        owner: UserId,
        draft: &TaskDraft,
        tag_ids: &[TagId],
        custom_deadline: Option<NaiveDate>,
    ) -> Result<Task, TaskServiceError> {
        draft.validate()?;

        let now = self.clock.now();
        let deadline = deadline_for(draft.frequency, self.clock.today(), custom_deadline);
        let task = Task::from_draft(owner, draft, now, deadline);
        self.repo.create_task(&task)?;
        if !tag_ids.is_empty() {
            self.repo.set_task_tags(task.id, tag_ids)?;
        }

        info!(
            "event=task_create module=service status=ok task={} owner={owner} frequency={:?}",
            task.id, draft.frequency
        );
        self.read_back(task.id)
    }

    /// Creates a task by copying an unowned template.
    pub fn import_from_template(
        &mut self,
        template_id: TemplateId,
        owner: UserId,
    ) -> Result<Task, TaskServiceError> {
        let template = self
            .repo
            .get_template(template_id)?
            .ok_or(TaskServiceError::TemplateNotFound(template_id))?;

        let draft = TaskDraft {
            title: template.title,
            description: template.description,
            points_per_click: template.points_per_click,
            frequency: template.frequency,
            required_count: template.required_count,
        };
        draft.validate()?;

        let now = self.clock.now();
        let deadline = deadline_for(draft.frequency, self.clock.today(), None);
        let task = Task::from_draft(owner, &draft, now, deadline);
        self.repo.create_task(&task)?;

        info!(
            "event=task_import module=service status=ok task={} owner={owner} template={template_id}",
            task.id
        );
        self.read_back(task.id)
    }

    /// Edits descriptive and scheduling fields of an owned task.
    ///
    /// Deadline adjustments: a one-time task with a custom date moves to
    /// that day's end; switching away from one-time without a custom date
    /// falls back to start-of-tomorrow rather than keeping a stale one-time
    /// deadline.
    pub fn edit_task(
        &mut self,
        task_id: TaskId,
        owner: UserId,
        draft: &TaskDraft,
        tag_ids: &[TagId],
        custom_deadline: Option<NaiveDate>,
    ) -> Result<Task, TaskServiceError> {
        draft.validate()?;

        let mut task = self
            .repo
            .get_task(task_id, Some(TaskRelation::Tags))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        if task.user_id != owner {
            return Err(TaskServiceError::Forbidden(task_id));
        }

        let previous_frequency = task.frequency;
        task.title = draft.title.clone();
        task.description = draft.description.clone();
        task.points_per_click = draft.points_per_click;
        task.frequency = draft.frequency;
        task.required_count = draft.required_count;

        // An edit may move the target below the current progress; clamp and
        // keep the completion stamp consistent with the counter.
        if task.completed_count > task.required_count {
            task.completed_count = task.required_count;
        }
        if task.completed_count == task.required_count {
            if task.completed_at.is_none() {
                task.completed_at = Some(self.clock.now());
            }
        } else {
            task.completed_at = None;
        }

        match (draft.frequency, custom_deadline) {
            (Frequency::OneTime, Some(date)) => task.deadline = end_of_day(date),
            _ if draft.frequency != Frequency::OneTime
                && previous_frequency == Frequency::OneTime =>
            {
                task.deadline = start_of_next_day(self.clock.today());
            }
            _ => {}
        }

        self.repo.update_task(&task)?;
        self.repo.set_task_tags(task_id, tag_ids)?;

        info!("event=task_edit module=service status=ok task={task_id} owner={owner}");
        self.read_back(task_id)
    }

    /// Gets one owned task with its tags loaded.
    pub fn get_task(&self, task_id: TaskId, owner: UserId) -> Result<Task, TaskServiceError> {
        let task = self
            .repo
            .get_task(task_id, Some(TaskRelation::Tags))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        if task.user_id != owner {
            return Err(TaskServiceError::Forbidden(task_id));
        }
        Ok(task)
    }

    /// Deletes an owned task immediately and unconditionally.
    pub fn delete_task(&self, task_id: TaskId, owner: UserId) -> Result<(), TaskServiceError> {
        let task = self
            .repo
            .get_task(task_id, None)?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        if task.user_id != owner {
            return Err(TaskServiceError::Forbidden(task_id));
        }

        self.repo.delete_task(task_id)?;
        info!("event=task_delete module=service status=ok task={task_id} owner={owner}");
        Ok(())
    }

    /// Lists all known templates.
    pub fn list_templates(&self) -> RepoResult<Vec<PredefinedTask>> {
        self.repo.list_templates()
    }

    fn read_back(&self, task_id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(task_id, Some(TaskRelation::Tags))?
            .ok_or(TaskServiceError::InconsistentState(
                "written task missing in read-back",
            ))
    }
}
