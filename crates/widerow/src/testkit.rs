//! Shared test support: a recording store client with canned responses.

use crate::{
    error::StoreError,
    store::{
        DeleteRowRequest, GetRowRequest, PutRowRequest, RangeRequest, RangeResponse, Row,
        SearchRequest, SearchResponse, StoreClient, UpdateRowRequest,
    },
    value::{Record, Value},
};
use std::cell::RefCell;

/// Build a record from name/value pairs.
pub fn rec<const N: usize>(pairs: [(&str, Value); N]) -> Record {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

///
/// MockStore
///
/// Records every request it receives and replays configured responses.
/// Interior mutability keeps the `StoreClient` receiver shared, matching
/// the single-threaded test model.
///

#[derive(Default)]
pub struct MockStore {
    pub scans: RefCell<Vec<RangeRequest>>,
    pub searches: RefCell<Vec<SearchRequest>>,
    pub gets: RefCell<Vec<GetRowRequest>>,
    pub puts: RefCell<Vec<PutRowRequest>>,
    pub updates: RefCell<Vec<UpdateRowRequest>>,
    pub deletes: RefCell<Vec<DeleteRowRequest>>,

    pub scan_response: RefCell<RangeResponse>,
    pub search_response: RefCell<SearchResponse>,
    pub get_response: RefCell<Option<Row>>,
}

impl MockStore {
    pub fn with_scan_response(response: RangeResponse) -> Self {
        let mock = Self::default();
        *mock.scan_response.borrow_mut() = response;
        mock
    }

    pub fn with_search_response(response: SearchResponse) -> Self {
        let mock = Self::default();
        *mock.search_response.borrow_mut() = response;
        mock
    }

    pub fn last_scan(&self) -> RangeRequest {
        self.scans.borrow().last().cloned().expect("no scan issued")
    }

    pub fn last_search(&self) -> SearchRequest {
        self.searches
            .borrow()
            .last()
            .cloned()
            .expect("no search issued")
    }
}

impl StoreClient for MockStore {
    async fn scan(&self, request: RangeRequest) -> Result<RangeResponse, StoreError> {
        self.scans.borrow_mut().push(request);
        Ok(self.scan_response.borrow().clone())
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, StoreError> {
        self.searches.borrow_mut().push(request);
        Ok(self.search_response.borrow().clone())
    }

    async fn get_row(&self, request: GetRowRequest) -> Result<Option<Row>, StoreError> {
        self.gets.borrow_mut().push(request);
        Ok(self.get_response.borrow().clone())
    }

    async fn put_row(&self, request: PutRowRequest) -> Result<(), StoreError> {
        self.puts.borrow_mut().push(request);
        Ok(())
    }

    async fn update_row(&self, request: UpdateRowRequest) -> Result<(), StoreError> {
        self.updates.borrow_mut().push(request);
        Ok(())
    }

    async fn delete_row(&self, request: DeleteRowRequest) -> Result<(), StoreError> {
        self.deletes.borrow_mut().push(request);
        Ok(())
    }
}
