//! Builders for content API payloads and trigger events.

use crate::core::SearchRequest;
use crate::storage::ObjectCreatedEvent;
use crate::streams::{StreamEvent, StreamRecord};

/// A search result item whose `apiUrl` points at `{base_uri}/{id}`.
#[must_use]
pub fn search_item(base_uri: &str, id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": "article",
        "sectionId": "info",
        "webPublicationDate": "2023-11-21T11:11:31Z",
        "webTitle": title,
        "webUrl": format!("https://www.theguardian.com/{id}"),
        "apiUrl": format!("{base_uri}/{id}"),
        "isHosted": false,
    })
}

/// A search response envelope around `items`.
#[must_use]
pub fn search_response(items: Vec<serde_json::Value>) -> serde_json::Value {
    let total = items.len();
    serde_json::json!({
        "response": {
            "status": "ok",
            "userTier": "developer",
            "total": total,
            "startIndex": 1,
            "pageSize": 10,
            "currentPage": 1,
            "pages": 1,
            "orderBy": "relevance",
            "results": items,
        }
    })
}

/// An article response envelope with the given body.
#[must_use]
pub fn article_response(body: &str) -> serde_json::Value {
    serde_json::json!({
        "response": {
            "status": "ok",
            "userTier": "developer",
            "total": 1,
            "content": {
                "type": "article",
                "fields": { "body": body },
            },
        }
    })
}

/// A search request encoded as the blob the ingestion stage stores.
#[must_use]
pub fn request_blob(search_term: &str, date_from: &str, reference: &str) -> Vec<u8> {
    serde_json::to_vec(&SearchRequest::new(search_term, date_from, reference)).unwrap_or_default()
}

/// A stream event carrying one record per payload.
#[must_use]
pub fn stream_event(payloads: &[&[u8]]) -> StreamEvent {
    StreamEvent {
        records: payloads
            .iter()
            .enumerate()
            .map(|(i, data)| StreamRecord::encode(format!("shardId-000000000000:{i}"), data))
            .collect(),
    }
}

/// An object-created event for one object.
#[must_use]
pub fn object_created(bucket: &str, key: &str) -> ObjectCreatedEvent {
    ObjectCreatedEvent::single(bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_item_shape() {
        let item = search_item("http://localhost:1234", "info/x", "X");
        assert_eq!(item["apiUrl"], "http://localhost:1234/info/x");
        assert_eq!(item["webTitle"], "X");
    }

    #[test]
    fn test_request_blob_decodes() {
        let blob = request_blob("rust", "2024-01-01", "r");
        let request = SearchRequest::from_json_bytes(&blob).unwrap();
        assert_eq!(request.search_term, "rust");
    }

    #[test]
    fn test_stream_event_encodes_each_payload() {
        let event = stream_event(&[b"a".as_slice(), b"b".as_slice()]);
        assert_eq!(event.records.len(), 2);
        assert_eq!(event.records[1].decode().unwrap(), "b");
    }
}
