pub mod store_client;

pub use store_client::{
    DocumentStore, InsertReceipt, MemoryStoreConnector, MongoStoreConnector, StoreConnector,
};
