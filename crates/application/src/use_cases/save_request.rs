//! Save request use case.

use std::sync::Arc;

use chrono::Utc;
use courier_domain::{DEFAULT_COLLECTION, RequestDraft, RequestItem};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::RequestStore;

/// Input for saving a request into a collection.
#[derive(Debug, Clone)]
pub struct SaveRequestInput {
    /// The draft as the user typed it, placeholders included.
    pub draft: RequestDraft,
    /// Target collection; `None` means [`DEFAULT_COLLECTION`].
    pub collection: Option<String>,
}

impl SaveRequestInput {
    /// Saves into the default collection.
    #[must_use]
    pub const fn new(draft: RequestDraft) -> Self {
        Self {
            draft,
            collection: None,
        }
    }
}

/// Use case for storing a draft in a collection.
///
/// The draft is stored unresolved, so `{{VAR}}` placeholders follow whatever
/// environment is active when the request is later sent.
pub struct SaveRequest<S: RequestStore> {
    store: Arc<S>,
}

impl<S: RequestStore> SaveRequest<S> {
    /// Creates a new `SaveRequest` use case.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores the draft, replacing any entry with the same URL and method.
    ///
    /// # Errors
    /// - Returns `InvalidRequest` if the URL is empty
    /// - Returns `Store` if the collections file cannot be written
    pub fn execute(&self, input: SaveRequestInput) -> ApplicationResult<RequestItem> {
        let SaveRequestInput { draft, collection } = input;
        if draft.url.trim().is_empty() {
            return Err(ApplicationError::InvalidRequest(
                "URL must not be empty".to_string(),
            ));
        }

        let collection = collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        let mut item = RequestItem::new(draft.method, draft.url.clone(), Utc::now())
            .with_name(draft.display_name())
            .with_headers(draft.headers())
            .with_body(draft.body);
        item.collections.push(collection.clone());

        self.store
            .upsert_collection_request(&collection, item.clone())?;
        Ok(item)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use courier_domain::{AppConfig, Environment, HttpMethod};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ports::StoreError;

    #[derive(Default)]
    struct Recorder {
        saved: Mutex<Vec<(String, RequestItem)>>,
    }

    impl RequestStore for Recorder {
        fn config(&self) -> AppConfig {
            AppConfig::default()
        }

        fn current_environment(&self) -> Environment {
            Environment::default()
        }

        fn record_history(&self, _: RequestItem) -> Result<(), StoreError> {
            Ok(())
        }

        fn upsert_collection_request(
            &self,
            collection: &str,
            item: RequestItem,
        ) -> Result<(), StoreError> {
            self.saved
                .lock()
                .unwrap()
                .push((collection.to_string(), item));
            Ok(())
        }
    }

    #[test]
    fn saves_unresolved_draft_to_default_collection() {
        let store = Arc::new(Recorder::default());
        let draft = RequestDraft::new(HttpMethod::Post, "{{BASE_URL}}/users")
            .with_headers_text("Authorization: Bearer {{API_KEY}}")
            .with_body(r#"{"name":"x"}"#);

        let item = SaveRequest::new(Arc::clone(&store))
            .execute(SaveRequestInput::new(draft))
            .unwrap();

        assert_eq!(item.name, "POST {{BASE_URL}}/users");
        assert_eq!(item.url, "{{BASE_URL}}/users");
        assert_eq!(item.headers["Authorization"], "Bearer {{API_KEY}}");
        assert_eq!(item.collections, vec![DEFAULT_COLLECTION.to_string()]);

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "Default");
    }

    #[test]
    fn named_collection_and_custom_name_are_used() {
        let store = Arc::new(Recorder::default());
        let input = SaveRequestInput {
            draft: RequestDraft::get("http://h/health").with_name("health check"),
            collection: Some("ops".to_string()),
        };

        let item = SaveRequest::new(Arc::clone(&store)).execute(input).unwrap();

        assert_eq!(item.name, "health check");
        assert_eq!(store.saved.lock().unwrap()[0].0, "ops");
    }

    #[test]
    fn empty_url_is_rejected() {
        let store = Arc::new(Recorder::default());
        let result = SaveRequest::new(Arc::clone(&store))
            .execute(SaveRequestInput::new(RequestDraft::get("  ")));

        assert!(matches!(result, Err(ApplicationError::InvalidRequest(_))));
        assert!(store.saved.lock().unwrap().is_empty());
    }
}
