//! Single-slot storage worker.
//!
//! [`CityStore`] is a cheap, cloneable handle. Every call becomes a request on an mpsc channel;
//! one dedicated task owns the [`CityRepository`] and serves requests strictly in submission
//! order, one at a time, answering over a oneshot channel. The update loop therefore never
//! runs database I/O itself and never has two store operations in flight.

use crate::city_repo::CityRepository;
use crate::error::StorageError;
use crate::models::SavedCity;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

const QUEUE_CAPACITY: usize = 32;

type Reply<T> = oneshot::Sender<Result<T, StorageError>>;

enum StoreRequest {
    AddCity {
        user_id: i64,
        name: String,
        reply: Reply<bool>,
    },
    ListCities {
        user_id: i64,
        reply: Reply<Vec<SavedCity>>,
    },
    GetCityById {
        user_id: i64,
        id: i64,
        reply: Reply<Option<String>>,
    },
}

#[derive(Clone)]
pub struct CityStore {
    tx: mpsc::Sender<StoreRequest>,
}

impl CityStore {
    /// Opens (and initializes) the database at `database_url` and starts the worker.
    #[instrument]
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let repo = CityRepository::new(database_url).await?;
        Ok(Self::spawn(repo))
    }

    /// Starts the worker task for an already opened repository. Must be called inside a tokio runtime.
    /// The worker stops once every handle has been dropped.
    pub fn spawn(repo: CityRepository) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_worker(repo, rx));
        Self { tx }
    }

    pub async fn add_city(&self, user_id: i64, name: &str) -> Result<bool, StorageError> {
        let name = name.to_string();
        self.request(|reply| StoreRequest::AddCity {
            user_id,
            name,
            reply,
        })
        .await
    }

    pub async fn list_cities(&self, user_id: i64) -> Result<Vec<SavedCity>, StorageError> {
        self.request(|reply| StoreRequest::ListCities { user_id, reply })
            .await
    }

    pub async fn get_city_by_id(
        &self,
        user_id: i64,
        id: i64,
    ) -> Result<Option<String>, StorageError> {
        self.request(|reply| StoreRequest::GetCityById { user_id, id, reply })
            .await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> StoreRequest,
    ) -> Result<T, StorageError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StorageError::WorkerClosed)?;
        reply_rx.await.map_err(|_| StorageError::WorkerClosed)?
    }
}

async fn run_worker(repo: CityRepository, mut rx: mpsc::Receiver<StoreRequest>) {
    info!("Storage worker started");

    while let Some(request) = rx.recv().await {
        // A dropped receiver means the caller gave up; nothing to report back.
        match request {
            StoreRequest::AddCity {
                user_id,
                name,
                reply,
            } => {
                debug!(user_id, "worker: add_city");
                let _ = reply.send(repo.add_city(user_id, &name).await);
            }
            StoreRequest::ListCities { user_id, reply } => {
                debug!(user_id, "worker: list_cities");
                let _ = reply.send(repo.list_cities(user_id).await);
            }
            StoreRequest::GetCityById { user_id, id, reply } => {
                debug!(user_id, id, "worker: get_city_by_id");
                let _ = reply.send(repo.get_city_by_id(user_id, id).await);
            }
        }
    }

    info!("Storage worker stopped");
}
