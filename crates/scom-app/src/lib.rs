pub mod datasource;
pub mod error;
pub mod query_editor;
pub mod settings_editor;
pub mod table;
pub mod timer;
