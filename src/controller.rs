use crate::{
    backend::{QueryBackend, QueryResponse},
    config::FormConfig,
    error::FormError,
    image::SelectedImage,
    markdown,
    submission::QuerySubmission,
    view::{FormView, Model, Panel},
};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};

/// Whether a query is currently in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    /// Ready to accept a submission.
    Idle,
    /// Waiting for the backend; further submissions are ignored.
    Processing,
}

impl FormState {
    /// Returns the state as a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Processing => "processing",
        }
    }
}

/// What a call to [`FormController::submit`] ended up doing to the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Both responses were rendered.
    Rendered(QueryResponse),
    /// The error panel shows this message.
    Failed(String),
    /// Another submission was in flight, nothing happened.
    Ignored,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives the upload-and-query form: previews the chosen image, posts the
/// submission and renders whatever comes back.
///
/// The view is only locked for the duration of each mutation, never across an
/// await point, so callers can inspect it while a request is in flight.
pub struct FormController<B: QueryBackend, V: FormView> {
    backend: B,
    view: Mutex<V>,
    config: FormConfig,
    selected: Mutex<Option<SelectedImage>>,
    state: Mutex<FormState>,
}

impl<B: QueryBackend, V: FormView> FormController<B, V> {
    /// Binds a controller to a backend and an already loaded page.
    ///
    /// # Arguments
    /// * `backend` - Answers submitted queries
    /// * `view` - The page elements to read from and render into
    /// * `config` - Button labels and classes used while busy
    pub fn new(backend: B, view: V, config: FormConfig) -> Self {
        Self {
            backend,
            view: Mutex::new(view),
            config,
            selected: Mutex::new(None),
            state: Mutex::new(FormState::Idle),
        }
    }

    /// Returns whether a query is currently in flight.
    pub fn state(&self) -> FormState {
        *lock(&self.state)
    }

    /// Locks the page for reading or for simulating user input.
    ///
    /// Drop the guard before awaiting [`FormController::submit`] on the same task.
    pub fn view(&self) -> MutexGuard<'_, V> {
        lock(&self.view)
    }

    /// The file currently held by the file input, if any.
    pub fn selected_image(&self) -> Option<SelectedImage> {
        lock(&self.selected).clone()
    }

    /// Reacts to a change of the file input.
    ///
    /// An empty input clears the selection but leaves the last preview on screen.
    pub fn select_image(&self, image: Option<SelectedImage>) {
        let Some(image) = image else {
            log::debug!("File input cleared");
            lock(&self.selected).take();
            return;
        };

        let data_url = image.to_data_url();
        {
            let mut view = lock(&self.view);
            view.set_preview_source(&data_url);
            view.set_panel_visible(Panel::ImagePreview, true);
        }

        log::debug!("Previewing {} ({})", image.file_name(), image.mime_type());
        *lock(&self.selected) = Some(image);
    }

    /// Loads an image from disk and selects it.
    pub async fn select_path(&self, path: impl AsRef<Path>) -> Result<(), FormError> {
        let image = SelectedImage::load(path).await?;
        self.select_image(Some(image));
        Ok(())
    }

    /// Submits the selected image and the typed query.
    ///
    /// Every failure, local or remote, ends in the error panel. The submit button
    /// is restored on every exit path once the request has started.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.state() == FormState::Processing {
            log::warn!("Submission ignored, a query is already in flight");
            return SubmitOutcome::Ignored;
        }

        let query = lock(&self.view).query_value();
        let image = self.selected_image();

        let submission = match QuerySubmission::new(image.as_ref(), &query) {
            Ok(submission) => submission,
            Err(err) => return self.fail(err),
        };

        let Some(_busy) = BusyGuard::enter(self) else {
            log::warn!("Submission ignored, a query is already in flight");
            return SubmitOutcome::Ignored;
        };

        let start_time = Instant::now();
        match self.backend.query(&submission).await {
            Ok(response) => {
                log::info!("Query answered in {:?}", start_time.elapsed());
                self.render(&response);
                SubmitOutcome::Rendered(response)
            }
            Err(err) => {
                if err.is_unexpected() {
                    log::error!("Error: {err}");
                } else {
                    log::warn!("Query rejected: {err}");
                }
                self.fail(err)
            }
        }
    }

    fn render(&self, response: &QueryResponse) {
        let llama = markdown::render(&response.llama);
        let llava = markdown::render(&response.llava);

        let mut view = lock(&self.view);
        view.set_response_html(Model::Llama, &llama);
        view.set_panel_visible(Model::Llama.panel(), true);
        view.set_response_html(Model::Llava, &llava);
        view.set_panel_visible(Model::Llava.panel(), true);
        view.set_panel_visible(Panel::Error, false);
    }

    fn fail(&self, err: FormError) -> SubmitOutcome {
        let message = err.user_message();

        let mut view = lock(&self.view);
        view.set_error_text(&message);
        view.set_panel_visible(Panel::Error, true);
        view.set_panel_visible(Model::Llama.panel(), false);
        view.set_panel_visible(Model::Llava.panel(), false);

        SubmitOutcome::Failed(message)
    }
}

/// Holds the form in its busy state; dropping it restores the submit button.
struct BusyGuard<'a, V: FormView> {
    view: &'a Mutex<V>,
    state: &'a Mutex<FormState>,
    config: &'a FormConfig,
}

impl<'a, V: FormView> BusyGuard<'a, V> {
    fn enter<B: QueryBackend>(controller: &'a FormController<B, V>) -> Option<Self> {
        {
            let mut state = lock(&controller.state);
            if *state == FormState::Processing {
                return None;
            }
            *state = FormState::Processing;
            log::debug!("Form state: {}", state.as_str());
        }

        let config = &controller.config;
        let mut view = lock(&controller.view);
        view.set_submit_enabled(false);
        view.set_submit_label(&config.busy_label);
        view.set_submit_class(&config.busy_class, true);
        drop(view);

        Some(Self {
            view: &controller.view,
            state: &controller.state,
            config,
        })
    }
}

impl<V: FormView> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        {
            let mut view = lock(self.view);
            view.set_submit_enabled(true);
            view.set_submit_label(&self.config.submit_label);
            view.set_submit_class(&self.config.busy_class, false);
        }
        let mut state = lock(self.state);
        *state = FormState::Idle;
        log::debug!("Form state: {}", state.as_str());
    }
}
