use argh::FromArgs;
use std::path::PathBuf;
use upload_query::{
    FormConfig, FormController, HttpQueryBackend, MemoryView, Model, SubmitOutcome,
};

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;

#[derive(FromArgs)]
/// Submit an image and a question to an upload-and-query backend
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// the path to the image
    #[argh(option, short = 'i')]
    image_path: Option<PathBuf>,

    /// the question to ask about the image
    #[argh(option, short = 'q', default = "String::new()")]
    query: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ClientArgs = argh::from_env();

    let config = FormConfig::with_base_url(format!("http://{}:{}", args.host, args.port));
    let backend = HttpQueryBackend::new(&config);
    log::info!("Posting to {}", backend.url());

    let form = FormController::new(backend, MemoryView::new(&config.submit_label), config);

    if let Some(path) = &args.image_path {
        form.select_path(path).await?;
        let file_name = form.selected_image().map(|image| image.file_name().to_string());
        form.view().set_file_name(file_name);
    }
    form.view().set_query(args.query);

    match form.submit().await {
        SubmitOutcome::Rendered(_) => {
            let view = form.view();
            for model in [Model::Llama, Model::Llava] {
                println!("== {} ==", model.as_str());
                println!("{}", view.response_html(model));
            }
        }
        SubmitOutcome::Failed(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
        SubmitOutcome::Ignored => unreachable!("only one submission is ever made"),
    }

    Ok(())
}
