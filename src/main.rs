//! Demo server: an in-memory notes API described entirely as endpoint
//! values and served through the bridge.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use rest_bridge::{config::Config, logging, Endpoint, Fault, HandlerRequest, Reply, RestService};

#[derive(Debug, Clone, Serialize)]
struct Note {
    id: u64,
    title: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct NoteDraft {
    title: String,
    text: String,
}

#[derive(Default)]
struct NoteStore {
    next_id: AtomicU64,
    notes: Mutex<HashMap<u64, Note>>,
}

impl NoteStore {
    fn insert(&self, draft: NoteDraft) -> Note {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let note = Note {
            id,
            title: draft.title,
            text: draft.text,
        };
        self.lock().insert(id, note.clone());
        note
    }

    fn get(&self, id: u64) -> Option<Note> {
        self.lock().get(&id).cloned()
    }

    fn list(&self, title_contains: Option<&str>) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .lock()
            .values()
            .filter(|note| title_contains.map_or(true, |needle| note.title.contains(needle)))
            .cloned()
            .collect();
        notes.sort_by_key(|note| note.id);
        notes
    }

    fn update(&self, id: u64, draft: NoteDraft) -> Option<Note> {
        let mut notes = self.lock();
        let note = notes.get_mut(&id)?;
        note.title = draft.title;
        note.text = draft.text;
        Some(note.clone())
    }

    fn remove(&self, id: u64) -> bool {
        self.lock().remove(&id).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Note>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn note_id<B>(req: &HandlerRequest<B>) -> Result<u64, Fault> {
    let raw = req
        .path_param("id")
        .ok_or_else(|| Fault::new(StatusCode::BAD_REQUEST, "missing id path parameter"))?;
    raw.parse()
        .map_err(|_| Fault::new(StatusCode::BAD_REQUEST, "id must be a positive integer"))
}

fn endpoints(store: Arc<NoteStore>) -> Vec<Endpoint> {
    let list = {
        let store = Arc::clone(&store);
        Endpoint::new(Method::GET, "/notes", move |req: HandlerRequest<()>| {
            let store = Arc::clone(&store);
            async move {
                let notes = store.list(req.query_param("title_contains"));
                Reply::json(StatusCode::OK, notes)
            }
        })
    };

    let fetch = {
        let store = Arc::clone(&store);
        Endpoint::new(Method::GET, "/notes/{id}", move |req: HandlerRequest<()>| {
            let store = Arc::clone(&store);
            async move {
                let id = note_id(&req)?;
                match store.get(id) {
                    Some(note) => Reply::json(StatusCode::OK, note),
                    None => Err(Fault::new(
                        StatusCode::NOT_FOUND,
                        format!("no note with id {id}"),
                    )),
                }
            }
        })
    };

    let create = {
        let store = Arc::clone(&store);
        Endpoint::new(
            Method::POST,
            "/notes",
            move |req: HandlerRequest<NoteDraft>| {
                let store = Arc::clone(&store);
                async move {
                    let draft = req.into_body()?;
                    let note = store.insert(draft);
                    Reply::json(StatusCode::CREATED, note)
                }
            },
        )
    };

    let update = {
        let store = Arc::clone(&store);
        Endpoint::new(
            Method::PUT,
            "/notes/{id}",
            move |req: HandlerRequest<NoteDraft>| {
                let store = Arc::clone(&store);
                async move {
                    let id = note_id(&req)?;
                    let draft = req.into_body()?;
                    match store.update(id, draft) {
                        Some(note) => Reply::json(StatusCode::OK, note),
                        None => Err(Fault::new(
                            StatusCode::NOT_FOUND,
                            format!("no note with id {id}"),
                        )),
                    }
                }
            },
        )
    };

    let remove = {
        let store = Arc::clone(&store);
        Endpoint::new(
            Method::DELETE,
            "/notes/{id}",
            move |req: HandlerRequest<()>| {
                let store = Arc::clone(&store);
                async move {
                    let id = note_id(&req)?;
                    if store.remove(id) {
                        Ok(Reply::empty(StatusCode::NO_CONTENT))
                    } else {
                        Err(Fault::new(
                            StatusCode::NOT_FOUND,
                            format!("no note with id {id}"),
                        ))
                    }
                }
            },
        )
    };

    vec![list, fetch, create, update, remove]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let store = Arc::new(NoteStore::default());
    let service = RestService::new(endpoints(store))?;
    let addr = config.bind_socket()?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    service.serve(addr).await?;
    Ok(())
}
