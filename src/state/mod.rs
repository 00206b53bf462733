/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures for one listing row (data.rs)
/// - Loading and saving the record table (table.rs)
/// - The tagging workflow and its actions (session.rs)
/// - User settings persisted between runs (settings.rs)

pub mod data;
pub mod session;
pub mod settings;
pub mod table;
