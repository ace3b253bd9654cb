//! Capability interface over an OS secure-item service
//!
//! The service is modelled as four primitives that each report a status code.
//! `add` must fail when the item already exists and `update` must fail when it
//! does not, which is how OS keychains behave natively.

/// Raw status code reported by the OS service
pub type OsStatus = i32;

/// Status code for a successful primitive
pub const STATUS_SUCCESS: OsStatus = 0;

/// Status code for "no such item"
pub const STATUS_ITEM_NOT_FOUND: OsStatus = -25300;

/// Status code reported by `add` when the item already exists
pub const STATUS_DUPLICATE_ITEM: OsStatus = -25299;

/// Normalized status of a secure-item primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Success,
    ItemNotFound,
    Failure(OsStatus),
}

impl ItemStatus {
    /// Classify a raw status code
    pub fn from_code(code: OsStatus) -> Self {
        match code {
            STATUS_SUCCESS => ItemStatus::Success,
            STATUS_ITEM_NOT_FOUND => ItemStatus::ItemNotFound,
            other => ItemStatus::Failure(other),
        }
    }

    /// The raw status code
    pub fn code(self) -> OsStatus {
        match self {
            ItemStatus::Success => STATUS_SUCCESS,
            ItemStatus::ItemNotFound => STATUS_ITEM_NOT_FOUND,
            ItemStatus::Failure(code) => code,
        }
    }
}

/// Outcome of a `find` query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    /// The item exists; carries its opaque payload
    Found(Vec<u8>),
    NotFound,
    Failure(OsStatus),
}

/// The four primitives of an OS secure-item store
///
/// Implementations must make each single call atomic. Sequences of calls are
/// not atomic.
pub trait SecureItemService: Send + Sync {
    /// Look up at most one item stored under `key`
    fn find(&self, key: &str) -> ItemLookup;

    /// Create a new item; fails if one already exists
    fn add(&self, key: &str, value: &[u8]) -> ItemStatus;

    /// Overwrite the payload of an existing item; fails if none exists
    fn update(&self, key: &str, value: &[u8]) -> ItemStatus;

    /// Remove the item stored under `key`
    fn delete(&self, key: &str) -> ItemStatus;

    /// Get a human-readable name for the service
    fn service_name(&self) -> &'static str;
}
