pub mod alert;
pub mod column;
pub mod error;
pub mod ids;
pub mod notice;
pub mod query;
pub mod refresh;
pub mod resolution;
pub mod settings;
pub mod validation;
