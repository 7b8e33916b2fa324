/// In-memory store for tests and local demos
///
/// Mirrors the PostgreSQL constraints that matter to the handlers: unique
/// usernames and emails, and tasks that must reference an existing user.
/// IDs are assigned sequentially from 1 and never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    task::{Task, TaskInput},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict("username".to_string()));
        }
        if state.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict("email".to_string()));
        }

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            username: data.username,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            hashed_password: data.hashed_password,
            role: data.role,
            is_active: true,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_password(&self, id: i64, hashed_password: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        Ok(match state.users.get_mut(&id) {
            Some(user) => {
                user.hashed_password = hashed_password.to_string();
                true
            }
            None => false,
        })
    }

    async fn set_user_active(&self, id: i64, is_active: bool) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        Ok(match state.users.get_mut(&id) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, owner_id: i64, data: TaskInput) -> StoreResult<Task> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&owner_id) {
            return Err(StoreError::InvalidReference(format!("user {}", owner_id)));
        }

        state.last_task_id += 1;
        let task = Task {
            id: state.last_task_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            complete: data.complete,
            owner_id,
        };
        state.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn list_tasks_for_owner(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_all_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.state.read().await.tasks.values().cloned().collect())
    }

    async fn find_task_for_owner(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn update_task_for_owner(
        &self,
        id: i64,
        owner_id: i64,
        data: TaskInput,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;

        let Some(task) = state.tasks.get_mut(&id).filter(|t| t.owner_id == owner_id) else {
            return Ok(None);
        };

        task.title = data.title;
        task.description = data.description;
        task.priority = data.priority;
        task.complete = data.complete;

        Ok(Some(task.clone()))
    }

    async fn delete_task_for_owner(&self, id: i64, owner_id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        let owned = state.tasks.get(&id).is_some_and(|t| t.owner_id == owner_id);
        if owned {
            state.tasks.remove(&id);
        }

        Ok(owned)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
