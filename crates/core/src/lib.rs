//! Core logic for SwiftMedia.
//!
//! Persists host media uploads to an OpenStack Swift object store.
//!
//! # Modules
//!
//! - `storage` - Keystone authentication and Swift object requests
//! - `provider` - Host-facing upload provider built on `storage`

pub mod provider;
pub mod storage;
