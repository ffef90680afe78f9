//! Off-thread search requests.
//!
//! Each request runs on its own thread and reports back over a channel, so a
//! slow response never blocks the UI loop. Responses may arrive in any order;
//! the state machine's sequence check decides which one counts.

use crate::api::{ProfileApi, ResultItem};
use crate::error::Result;
use crate::logging;
use crate::search::state::SearchRequest;
use crate::text::normalize_query;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Answer to one [`SearchRequest`]
#[derive(Debug)]
pub struct SearchResponse {
    pub seq: u64,
    pub query: String,
    pub outcome: Result<Vec<ResultItem>>,
}

/// Run `request` against `api` on a background thread.
///
/// The response is converted into the caller's message type and sent on `tx`;
/// a closed channel just drops it.
pub fn spawn_search<M>(
    api: Arc<dyn ProfileApi>,
    request: SearchRequest,
    tx: Sender<M>,
) -> JoinHandle<()>
where
    M: From<SearchResponse> + Send + 'static,
{
    logging::log_search_request(request.seq, &request.query);

    thread::spawn(move || {
        let outcome = api.search(&request.query);
        if let Err(e) = &outcome {
            logging::log_search_failure(request.seq, &e.to_string());
        }
        let _ = tx.send(M::from(SearchResponse {
            seq: request.seq,
            query: request.query,
            outcome,
        }));
    })
}

/// Blocking one-shot search for scripted use.
///
/// Blank text answers with no results and sends nothing, like clearing the
/// widget's input.
pub fn search_blocking(api: &dyn ProfileApi, text: &str, limit: Option<usize>) -> Result<Vec<ResultItem>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let query = normalize_query(text);
    logging::log_search_request(0, &query);

    let mut results = api.search(&query)?;
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fold::Record;
    use crate::api::JoinQuery;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        queries: Mutex<Vec<String>>,
    }

    impl ProfileApi for RecordingApi {
        fn search(&self, query: &str) -> Result<Vec<ResultItem>> {
            self.queries.lock().push(query.to_string());
            Ok(vec![
                ResultItem::new("GH0101", "Keta"),
                ResultItem::new("GH0102", "Ketu South"),
            ])
        }

        fn attrs(&self, _kind: &str) -> Result<Vec<Record>> {
            Ok(Vec::new())
        }

        fn join(&self, _query: &JoinQuery) -> Result<Vec<Record>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn blank_text_sends_nothing() {
        let api = RecordingApi::default();
        assert!(search_blocking(&api, "", None).unwrap().is_empty());
        assert!(search_blocking(&api, "   ", None).unwrap().is_empty());
        assert!(api.queries.lock().is_empty());
    }

    #[test]
    fn blocking_search_normalizes_and_limits() {
        let api = RecordingApi::default();
        let results = search_blocking(&api, " Kéta ", Some(1)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(*api.queries.lock(), vec!["Keta".to_string()]);
    }
}
