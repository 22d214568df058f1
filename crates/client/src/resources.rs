use docflow_core::domain::approval::ApprovalRecord;
use docflow_core::domain::document::{approval_of, DocumentId, DocumentSummary, ResourceDescriptor};
use docflow_core::errors::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;

const LIST_KEYS: [&str; 5] = ["items", "Items", "data", "records", "results"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Server-side list parameters. Unset fields are omitted from the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub search_term: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page_number) = self.page_number {
            pairs.push(("pageNumber".to_string(), page_number.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(search_term) = self.search_term.as_deref().map(str::trim) {
            if !search_term.is_empty() {
                pairs.push(("searchTerm".to_string(), search_term.to_string()));
            }
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.clone()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), sort_order.as_str().to_string()));
        }
        pairs
    }
}

/// CRUD over one document collection.
#[derive(Clone)]
pub struct DocumentResource {
    client: ApiClient,
    descriptor: ResourceDescriptor,
}

impl DocumentResource {
    pub fn new(client: ApiClient, descriptor: ResourceDescriptor) -> Self {
        Self { client, descriptor }
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, ClientError> {
        let mut request = ApiRequest::get(self.descriptor.base_path.clone());
        for (key, value) in query.to_pairs() {
            request = request.with_query(key, value);
        }
        let data = self.client.data(request).await?;
        Ok(list_items(data))
    }

    /// Listed documents projected for a dashboard. Rows without an id are skipped.
    pub async fn list_summaries(&self, query: &ListQuery) -> Result<Vec<DocumentSummary>, ClientError> {
        let kind = self.descriptor.kind;
        let documents = self.list(query).await?;
        Ok(documents.iter().filter_map(|document| DocumentSummary::from_json(kind, document)).collect())
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Value, ClientError> {
        require_id(id)?;
        self.client
            .data(ApiRequest::get(self.descriptor.item_path(id)))
            .await?
            .ok_or_else(|| ClientError::Decode(format!("document `{id}` returned no data")))
    }

    /// The document together with its approval record (empty when none is stored yet).
    pub async fn get_with_approval(&self, id: &DocumentId) -> Result<(Value, ApprovalRecord), ClientError> {
        let document = self.get(id).await?;
        let record = approval_of(&document).unwrap_or_default();
        Ok((document, record))
    }

    pub async fn create(&self, body: Value) -> Result<Option<Value>, ClientError> {
        self.client.data(ApiRequest::post(self.descriptor.base_path.clone()).with_json(body)).await
    }

    pub async fn update(&self, id: &DocumentId, body: Value) -> Result<Option<Value>, ClientError> {
        require_id(id)?;
        self.client.data(ApiRequest::put(self.descriptor.item_path(id)).with_json(body)).await
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), ClientError> {
        require_id(id)?;
        self.client.data(ApiRequest::delete(self.descriptor.item_path(id))).await.map(|_| ())
    }
}

pub(crate) fn require_id(id: &DocumentId) -> Result<(), ClientError> {
    if id.is_blank() {
        return Err(ClientError::Validation(DomainError::MissingDocumentId));
    }
    Ok(())
}

fn list_items(data: Option<Value>) -> Vec<Value> {
    match data {
        Some(Value::Array(items)) => items,
        Some(Value::Object(object)) => LIST_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array).cloned())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
