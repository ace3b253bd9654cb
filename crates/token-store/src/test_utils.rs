//! Test helpers
//!
//! A scriptable in-memory [`SecureItemService`] that behaves like an OS
//! keychain (`add` rejects duplicates, `update` rejects missing items), records
//! every primitive call and can be told to fail a primitive with a given
//! status.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::{ItemLookup, ItemStatus, OsStatus, SecureItemService, STATUS_DUPLICATE_ITEM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Find,
    Add,
    Update,
    Delete,
}

#[derive(Default)]
pub struct MockItemService {
    items: Mutex<HashMap<String, Vec<u8>>>,
    failures: Mutex<HashMap<Primitive, OsStatus>>,
    calls: Mutex<Vec<Primitive>>,
    /// Item inserted right after the next `find`, simulating another writer
    pending_insert: Mutex<Option<(String, Vec<u8>)>>,
}

impl MockItemService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `primitive` report `code` until cleared
    pub fn fail(&self, primitive: Primitive, code: OsStatus) {
        self.failures.lock().unwrap().insert(primitive, code);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Primitive> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Store raw bytes, bypassing the primitives
    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
    }

    /// Raw bytes currently stored under `key`
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub fn insert_after_next_find(&self, key: &str, value: &[u8]) {
        *self.pending_insert.lock().unwrap() = Some((key.to_string(), value.to_vec()));
    }

    fn record(&self, primitive: Primitive) -> Option<OsStatus> {
        self.calls.lock().unwrap().push(primitive);
        self.failures.lock().unwrap().get(&primitive).copied()
    }
}

impl SecureItemService for MockItemService {
    fn find(&self, key: &str) -> ItemLookup {
        match self.record(Primitive::Find).map(ItemStatus::from_code) {
            Some(ItemStatus::ItemNotFound) => return ItemLookup::NotFound,
            Some(ItemStatus::Failure(code)) => return ItemLookup::Failure(code),
            Some(ItemStatus::Success) | None => {}
        }
        let found = self.raw(key);
        if let Some((k, v)) = self.pending_insert.lock().unwrap().take() {
            self.insert_raw(&k, &v);
        }
        match found {
            Some(bytes) => ItemLookup::Found(bytes),
            None => ItemLookup::NotFound,
        }
    }

    fn add(&self, key: &str, value: &[u8]) -> ItemStatus {
        if let Some(code) = self.record(Primitive::Add) {
            return ItemStatus::from_code(code);
        }
        let mut items = self.items.lock().unwrap();
        if items.contains_key(key) {
            return ItemStatus::Failure(STATUS_DUPLICATE_ITEM);
        }
        items.insert(key.to_string(), value.to_vec());
        ItemStatus::Success
    }

    fn update(&self, key: &str, value: &[u8]) -> ItemStatus {
        if let Some(code) = self.record(Primitive::Update) {
            return ItemStatus::from_code(code);
        }
        match self.items.lock().unwrap().get_mut(key) {
            Some(existing) => {
                *existing = value.to_vec();
                ItemStatus::Success
            }
            None => ItemStatus::ItemNotFound,
        }
    }

    fn delete(&self, key: &str) -> ItemStatus {
        if let Some(code) = self.record(Primitive::Delete) {
            return ItemStatus::from_code(code);
        }
        match self.items.lock().unwrap().remove(key) {
            Some(_) => ItemStatus::Success,
            None => ItemStatus::ItemNotFound,
        }
    }

    fn service_name(&self) -> &'static str {
        "Mock secure items"
    }
}
