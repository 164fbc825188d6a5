use std::sync::Arc;

use tokio::sync::Mutex;

use crate::repo::TodoRepository;
use crate::usecase::validation::FieldPolicy;

/// Shared state handed to every request handler.
///
/// All store operations go through the one mutex, so a request never sees
/// another request's mutation half-applied.
#[derive(Clone)]
pub struct App {
    repo: Arc<Mutex<Box<dyn TodoRepository>>>,
    pub policy: FieldPolicy,
}

impl App {
    pub fn new(repo: Box<dyn TodoRepository>, policy: FieldPolicy) -> Self {
        Self {
            repo: Arc::new(Mutex::new(repo)),
            policy,
        }
    }

    pub async fn with_repo<T>(&self, f: impl FnOnce(&mut dyn TodoRepository) -> T) -> T {
        let mut repo = self.repo.lock().await;
        f(&mut **repo)
    }
}
