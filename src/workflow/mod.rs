//! List/search/edit workflow, written against the store traits so it can be
//! driven by HTTP handlers or exercised directly in tests.

pub mod browser;
pub mod editor;
pub mod notification;
