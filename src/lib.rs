//! Upload-and-query form controller.
//!
//! The user picks an image, types a question and submits both to a backend
//! that answers with one markdown text per vision model (`llama` and `llava`).
//! The controller previews the image, posts the submission as
//! `multipart/form-data`, and renders either both answers or a single error
//! message into the page.
//!
//! The page itself is abstracted behind [`FormView`], and the network behind
//! [`QueryBackend`], so the same flow runs against a real DOM binding, a
//! terminal, or the in-memory [`MemoryView`].
//!
//! ```no_run
//! use upload_query::{FormConfig, FormController, HttpQueryBackend, MemoryView};
//!
//! # async fn run() -> Result<(), upload_query::FormError> {
//! let config = FormConfig::default();
//! let form = FormController::new(
//!     HttpQueryBackend::new(&config),
//!     MemoryView::new(&config.submit_label),
//!     config,
//! );
//!
//! form.select_path("cat.jpg").await?;
//! form.view().set_query("What is in this picture?");
//! let outcome = form.submit().await;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod image;
pub mod markdown;
pub mod submission;
pub mod view;

pub use backend::{ErrorBody, HttpQueryBackend, QueryBackend, QueryResponse};
pub use config::FormConfig;
pub use controller::{FormController, FormState, SubmitOutcome};
pub use error::FormError;
pub use image::SelectedImage;
pub use submission::QuerySubmission;
pub use view::{FormView, MemoryView, Model, Panel};
