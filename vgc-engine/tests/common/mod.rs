//! Shared test doubles: a scriptable content provider and operator I/O
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use vgc_common::{Candidate, CandidateKind, Error, Result};
use vgc_engine::provider::{ContentProvider, OperatorIo, ProviderPage, SearchPage};

/// Build a video candidate with the fields the scorer cares about.
pub fn video(id: &str, title: &str, channel: &str, views: u64) -> Candidate {
    Candidate {
        id: id.to_string(),
        kind: CandidateKind::Video {
            duration_minutes: Some(12),
            view_count: Some(views),
            like_count: None,
        },
        title: title.to_string(),
        channel_title: channel.to_string(),
        published_at: None,
        description: String::new(),
        url: format!("https://example.invalid/watch?v={id}"),
    }
}

/// Scriptable provider: each `search` call pops the next canned result
/// set; container listings and mutations are recorded for assertions.
#[derive(Default)]
pub struct StubProvider {
    pub search_responses: Mutex<VecDeque<Vec<Candidate>>>,
    pub search_queries: Mutex<Vec<String>>,
    pub container_items: Mutex<HashMap<String, Vec<Candidate>>>,
    pub my_containers: Mutex<Vec<Candidate>>,
    pub created: Mutex<Vec<(String, String)>>,
    pub inserted: Mutex<Vec<(String, String)>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one search response (served in call order).
    pub fn push_search(&self, items: Vec<Candidate>) {
        self.search_responses.lock().unwrap().push_back(items);
    }
}

#[async_trait]
impl ContentProvider for StubProvider {
    async fn search(&self, page: &SearchPage) -> Result<ProviderPage> {
        self.search_queries.lock().unwrap().push(page.query.clone());
        let items = self
            .search_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Ok(ProviderPage {
            items,
            next_cursor: None,
        })
    }

    async fn list_container_items(
        &self,
        container_id: &str,
        _page_size: u32,
        _cursor: Option<&str>,
    ) -> Result<ProviderPage> {
        let items = self
            .container_items
            .lock()
            .unwrap()
            .get(container_id)
            .cloned()
            .unwrap_or_default();
        Ok(ProviderPage {
            items,
            next_cursor: None,
        })
    }

    async fn list_my_containers(
        &self,
        _page_size: u32,
        _cursor: Option<&str>,
    ) -> Result<ProviderPage> {
        Ok(ProviderPage {
            items: self.my_containers.lock().unwrap().clone(),
            next_cursor: None,
        })
    }

    async fn get_item_details(&self, _id: &str) -> Result<Option<Candidate>> {
        Ok(None)
    }

    async fn create_container(&self, title: &str, description: &str) -> Result<String> {
        let mut created = self.created.lock().unwrap();
        created.push((title.to_string(), description.to_string()));
        Ok(format!("PL_NEW_{}", created.len()))
    }

    async fn delete_container(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    async fn insert_item(&self, container_id: &str, item_id: &str) -> Result<String> {
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push((container_id.to_string(), item_id.to_string()));
        Ok(format!("ITEM_{}", inserted.len()))
    }

    async fn remove_item(&self, _container_item_id: &str) -> Result<()> {
        Err(Error::Provider("not scripted".to_string()))
    }
}

/// Scripted operator: pops answers front-to-back, records everything said.
pub struct ScriptedIo {
    answers: Mutex<VecDeque<String>>,
    pub said: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedIo {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            said: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn said_contains(&self, needle: &str) -> bool {
        self.said.lock().unwrap().iter().any(|l| l.contains(needle))
    }
}

#[async_trait]
impl OperatorIo for ScriptedIo {
    fn say(&self, line: &str) {
        self.said.lock().unwrap().push(line.to_string());
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}
