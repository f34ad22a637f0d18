pub mod db;
pub mod fetch;
pub mod replicate;
pub mod storage;
