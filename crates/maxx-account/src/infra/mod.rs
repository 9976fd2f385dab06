pub mod http_client;
pub mod local_storage;
