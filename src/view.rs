use std::collections::{BTreeMap, BTreeSet};

/// Element ids the host page must provide.
pub mod ids {
    pub const IMAGE_UPLOAD: &str = "image-upload";
    pub const DISPLAY_IMAGE: &str = "display-image";
    pub const IMAGE_CONTAINER: &str = "image-container";
    pub const QUERY_INPUT: &str = "query-input";
    pub const SUBMIT_QUERY: &str = "submit-query";
    pub const RESPONSE_CONTAINER_LLAMA: &str = "response-container-llama";
    pub const RESPONSE_TEXT_LLAMA: &str = "response-text-llama";
    pub const RESPONSE_CONTAINER_LLAVA: &str = "response-container-llava";
    pub const RESPONSE_TEXT_LLAVA: &str = "response-text-llava";
    pub const ERROR_CONTAINER: &str = "error-container";
    pub const ERROR_TEXT: &str = "error-text";

    /// Every id the form binds to, in page order.
    pub const ALL: [&str; 11] = [
        IMAGE_UPLOAD,
        DISPLAY_IMAGE,
        IMAGE_CONTAINER,
        QUERY_INPUT,
        SUBMIT_QUERY,
        RESPONSE_CONTAINER_LLAMA,
        RESPONSE_TEXT_LLAMA,
        RESPONSE_CONTAINER_LLAVA,
        RESPONSE_TEXT_LLAVA,
        ERROR_CONTAINER,
        ERROR_TEXT,
    ];
}

/// Class that hides a container.
pub const HIDDEN_CLASS: &str = "hidden";

/// A container whose visibility the form toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Panel {
    /// Wraps the preview `<img>` of the selected file.
    ImagePreview,
    /// Holds the rendered `llama` answer.
    LlamaResponse,
    /// Holds the rendered `llava` answer.
    LlavaResponse,
    /// Holds the single error message.
    Error,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::ImagePreview,
        Panel::LlamaResponse,
        Panel::LlavaResponse,
        Panel::Error,
    ];

    /// Id of the container element this panel shows and hides.
    pub fn element_id(&self) -> &'static str {
        match self {
            Panel::ImagePreview => ids::IMAGE_CONTAINER,
            Panel::LlamaResponse => ids::RESPONSE_CONTAINER_LLAMA,
            Panel::LlavaResponse => ids::RESPONSE_CONTAINER_LLAVA,
            Panel::Error => ids::ERROR_CONTAINER,
        }
    }
}

/// The vision model a response panel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    /// Answer found under the `llama` key of a response.
    Llama,
    /// Answer found under the `llava` key of a response.
    Llava,
}

impl Model {
    /// The response key, also used in element ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Llama => "llama",
            Model::Llava => "llava",
        }
    }

    /// The container that shows this model's answer.
    pub fn panel(&self) -> Panel {
        match self {
            Model::Llama => Panel::LlamaResponse,
            Model::Llava => Panel::LlavaResponse,
        }
    }

    /// Id of the node whose inner HTML receives the rendered answer.
    pub fn text_element_id(&self) -> &'static str {
        match self {
            Model::Llama => ids::RESPONSE_TEXT_LLAMA,
            Model::Llava => ids::RESPONSE_TEXT_LLAVA,
        }
    }
}

/// Handles to the page elements the form reads and mutates.
///
/// Implementations bind once to an existing page; the form never creates or
/// removes elements.
pub trait FormView {
    /// Current contents of the query text box.
    fn query_value(&self) -> String;

    /// Points the preview `<img>` at `src`, usually a `data:` URL.
    fn set_preview_source(&mut self, src: &str);

    /// Shows or hides a container, i.e. removes or adds [`HIDDEN_CLASS`].
    fn set_panel_visible(&mut self, panel: Panel, visible: bool);

    /// Replaces the inner HTML of a model's response text node.
    fn set_response_html(&mut self, model: Model, html: &str);

    /// Replaces the plain text of the error node.
    fn set_error_text(&mut self, text: &str);

    /// Enables or disables the submit button.
    fn set_submit_enabled(&mut self, enabled: bool);

    /// Replaces the submit button's text.
    fn set_submit_label(&mut self, label: &str);

    /// Adds or removes a class on the submit button.
    fn set_submit_class(&mut self, class: &str, present: bool);
}

/// A page held entirely in memory.
///
/// Visibility is tracked the way the page does it: a container is hidden
/// while it carries [`HIDDEN_CLASS`].
#[derive(Clone, Debug)]
pub struct MemoryView {
    query: String,
    file_name: Option<String>,
    preview_source: Option<String>,
    llama_html: String,
    llava_html: String,
    error_text: String,
    submit_enabled: bool,
    submit_label: String,
    classes: BTreeMap<&'static str, BTreeSet<String>>,
}

impl MemoryView {
    /// A freshly loaded page: every panel hidden, submit button ready.
    pub fn new(submit_label: impl Into<String>) -> Self {
        let classes = Panel::ALL
            .iter()
            .map(|panel| (panel.element_id(), BTreeSet::from([HIDDEN_CLASS.to_string()])))
            .collect();

        Self {
            query: String::new(),
            file_name: None,
            preview_source: None,
            llama_html: String::new(),
            llava_html: String::new(),
            error_text: String::new(),
            submit_enabled: true,
            submit_label: submit_label.into(),
            classes,
        }
    }

    /// Types into the query text box.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Records which file the file input shows as chosen.
    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    /// Source of the preview `<img>`, unset until a file is chosen.
    pub fn preview_source(&self) -> Option<&str> {
        self.preview_source.as_deref()
    }

    /// A panel is visible while its container lacks [`HIDDEN_CLASS`].
    pub fn is_visible(&self, panel: Panel) -> bool {
        !self.has_class(panel.element_id(), HIDDEN_CLASS)
    }

    pub fn response_html(&self, model: Model) -> &str {
        match model {
            Model::Llama => &self.llama_html,
            Model::Llava => &self.llava_html,
        }
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    pub fn has_submit_class(&self, class: &str) -> bool {
        self.has_class(ids::SUBMIT_QUERY, class)
    }

    /// Whether the element with `id` currently carries `class`.
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.classes
            .get(id)
            .is_some_and(|classes| classes.contains(class))
    }

    /// The value, source, text or HTML of an element, looked up by id.
    ///
    /// # Returns
    /// `None` for ids outside the page contract, for containers (which have no
    /// content of their own) and for an image or file input with nothing set.
    pub fn element_content(&self, id: &str) -> Option<&str> {
        match id {
            ids::IMAGE_UPLOAD => self.file_name.as_deref(),
            ids::DISPLAY_IMAGE => self.preview_source.as_deref(),
            ids::QUERY_INPUT => Some(self.query.as_str()),
            ids::SUBMIT_QUERY => Some(self.submit_label.as_str()),
            ids::RESPONSE_TEXT_LLAMA => Some(self.llama_html.as_str()),
            ids::RESPONSE_TEXT_LLAVA => Some(self.llava_html.as_str()),
            ids::ERROR_TEXT => Some(self.error_text.as_str()),
            _ => None,
        }
    }

    fn toggle_class(&mut self, id: &'static str, class: &str, present: bool) {
        let classes = self.classes.entry(id).or_default();
        if present {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new("Submit Query")
    }
}

impl FormView for MemoryView {
    fn query_value(&self) -> String {
        self.query.clone()
    }

    fn set_preview_source(&mut self, src: &str) {
        self.preview_source = Some(src.to_string());
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        self.toggle_class(panel.element_id(), HIDDEN_CLASS, !visible);
    }

    fn set_response_html(&mut self, model: Model, html: &str) {
        match model {
            Model::Llama => self.llama_html = html.to_string(),
            Model::Llava => self.llava_html = html.to_string(),
        }
    }

    fn set_error_text(&mut self, text: &str) {
        self.error_text = text.to_string();
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_submit_label(&mut self, label: &str) {
        self.submit_label = label.to_string();
    }

    fn set_submit_class(&mut self, class: &str, present: bool) {
        self.toggle_class(ids::SUBMIT_QUERY, class, present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_hides_every_panel() {
        let view = MemoryView::default();
        for panel in Panel::ALL {
            assert!(!view.is_visible(panel), "{panel:?} should start hidden");
            assert!(view.has_class(panel.element_id(), HIDDEN_CLASS));
        }
        assert!(view.submit_enabled());
        assert_eq!(view.submit_label(), "Submit Query");
    }

    #[test]
    fn page_contract_lists_every_element() {
        assert_eq!(
            ids::ALL,
            [
                "image-upload",
                "display-image",
                "image-container",
                "query-input",
                "submit-query",
                "response-container-llama",
                "response-text-llama",
                "response-container-llava",
                "response-text-llava",
                "error-container",
                "error-text",
            ]
        );

        for panel in Panel::ALL {
            assert!(ids::ALL.contains(&panel.element_id()));
        }
        for model in [Model::Llama, Model::Llava] {
            assert!(ids::ALL.contains(&model.text_element_id()));
            assert!(model.text_element_id().ends_with(model.as_str()));
        }
    }

    #[test]
    fn panels_map_to_container_ids() {
        assert_eq!(Panel::ImagePreview.element_id(), "image-container");
        assert_eq!(Panel::Error.element_id(), "error-container");
        assert_eq!(Model::Llava.panel().element_id(), "response-container-llava");
        assert_eq!(Model::Llama.text_element_id(), "response-text-llama");
    }

    #[test]
    fn showing_a_panel_removes_hidden_class() {
        let mut view = MemoryView::default();
        view.set_panel_visible(Panel::Error, true);
        assert!(view.is_visible(Panel::Error));
        assert!(!view.has_class(ids::ERROR_CONTAINER, HIDDEN_CLASS));

        view.set_panel_visible(Panel::Error, false);
        assert!(view.has_class(ids::ERROR_CONTAINER, HIDDEN_CLASS));
    }

    #[test]
    fn content_is_reachable_by_element_id() {
        let mut view = MemoryView::default();
        view.set_query("what is this?");
        view.set_file_name(Some("cat.jpg".to_string()));
        view.set_preview_source("data:image/jpeg;base64,");
        view.set_error_text("oops");
        view.set_response_html(Model::Llava, "<p>b</p>");

        assert_eq!(view.element_content(ids::IMAGE_UPLOAD), Some("cat.jpg"));
        assert_eq!(
            view.element_content(ids::DISPLAY_IMAGE),
            Some("data:image/jpeg;base64,")
        );
        assert_eq!(view.element_content(ids::QUERY_INPUT), Some("what is this?"));
        assert_eq!(view.element_content(ids::SUBMIT_QUERY), Some("Submit Query"));
        assert_eq!(view.element_content(ids::ERROR_TEXT), Some("oops"));
        assert_eq!(view.element_content(ids::RESPONSE_TEXT_LLAVA), Some("<p>b</p>"));
        assert_eq!(view.element_content(ids::RESPONSE_TEXT_LLAMA), Some(""));
        assert_eq!(view.element_content(ids::ERROR_CONTAINER), None);
        assert_eq!(view.element_content("unknown"), None);
    }

    #[test]
    fn class_toggling_is_idempotent() {
        let mut view = MemoryView::default();
        view.set_submit_class("loading", true);
        view.set_submit_class("loading", true);
        assert!(view.has_submit_class("loading"));
        assert!(view.has_class(ids::SUBMIT_QUERY, "loading"));
        view.set_submit_class("loading", false);
        assert!(!view.has_submit_class("loading"));
    }
}
