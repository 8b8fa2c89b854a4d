//! Template engine and report renderer.

pub mod context;
mod output;
pub mod template;

pub use context::{Context, Value};
pub use output::{Outcome, Rendered, query_context, render};
pub use template::{Template, TemplateError};
