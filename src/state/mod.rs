/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures and the gallery padding rule (data.rs)
/// - Catalog synchronization with the remote collection (catalog.rs)
/// - The pick-and-upload state machine (upload.rs)

pub mod catalog;
pub mod data;
pub mod upload;
