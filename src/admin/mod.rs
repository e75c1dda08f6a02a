//! Admin client: REST calls, the dashboard model and storefront snippets

pub mod client;
pub mod dashboard;
pub mod snippet;

pub use client::{AdminClient, AdminError};
pub use dashboard::{toggle_label, CreateForm, Dashboard, DashboardRow};
pub use snippet::install_snippet;
