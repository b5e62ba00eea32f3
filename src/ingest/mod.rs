//! Offline ingestion: structured profiles and unstructured bios
//!
//! Both loaders are destructive: each run replaces the previous contents
//! wholesale. Ingestion never runs concurrently with retrieval traffic.

pub mod bios;
pub mod profiles;

pub use bios::parse_bio_fragments;
pub use bios::read_bio_documents_jsonl;
pub use bios::write_bio_documents_jsonl;
pub use profiles::parse_users_csv;
