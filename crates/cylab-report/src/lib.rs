//! cylab-report: Display views and session reports.
//!
//! Turns a record store into plain, already-formatted view data, and renders
//! that data as Markdown or a self-contained HTML page.

pub mod html;
pub mod markdown;
pub mod view;

pub use view::SessionView;
