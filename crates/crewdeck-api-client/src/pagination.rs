//! List response envelope
//!
//! List endpoints answer either with a bare JSON array or with the paginated
//! envelope `{count, next, previous, results}`. Callers pattern-match the
//! explicit shape instead of sniffing the payload at runtime.

use serde::{Deserialize, Serialize};

/// Payload of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// Paginated envelope
    Paginated {
        count: u64,
        next: Option<String>,
        previous: Option<String>,
        results: Vec<T>,
    },
    /// Bare array
    Plain(Vec<T>),
}

impl<T> ListPayload<T> {
    /// Items of this page (the full collection for bare arrays)
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Paginated { results, .. } => results,
            ListPayload::Plain(items) => items,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListPayload::Paginated { results, .. } => results,
            ListPayload::Plain(items) => items,
        }
    }

    /// Total collection size as reported by the server
    pub fn total(&self) -> u64 {
        match self {
            ListPayload::Paginated { count, .. } => *count,
            ListPayload::Plain(items) => items.len() as u64,
        }
    }

    /// URL of the next page, if the server paginated
    pub fn next_page(&self) -> Option<&str> {
        match self {
            ListPayload::Paginated { next, .. } => next.as_deref(),
            ListPayload::Plain(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_paginated_envelope() {
        let json = r#"{"count": 3, "next": "http://x/api/core/tasks/?page=2", "previous": null, "results": [1, 2]}"#;
        let payload: ListPayload<u64> = serde_json::from_str(json).unwrap();

        match &payload {
            ListPayload::Paginated { count, next, .. } => {
                assert_eq!(*count, 3);
                assert!(next.is_some());
            }
            ListPayload::Plain(_) => panic!("expected envelope"),
        }
        assert_eq!(payload.total(), 3);
        assert_eq!(payload.into_items(), vec![1, 2]);
    }

    #[test]
    fn test_parses_bare_array() {
        let payload: ListPayload<u64> = serde_json::from_str("[5, 6, 7]").unwrap();

        assert!(matches!(payload, ListPayload::Plain(_)));
        assert_eq!(payload.total(), 3);
        assert_eq!(payload.next_page(), None);
        assert_eq!(payload.into_items(), vec![5, 6, 7]);
    }

    #[test]
    fn test_empty_envelope() {
        let json = r#"{"count": 0, "next": null, "previous": null, "results": []}"#;
        let payload: ListPayload<u64> = serde_json::from_str(json).unwrap();
        assert!(payload.is_empty());
        assert_eq!(payload.total(), 0);
    }
}
