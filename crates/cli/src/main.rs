mod app;
mod args;
mod banner;
mod constants;
mod episode;
mod logger;
mod prompt;
mod utils;

use app::App;

#[tokio::main]
async fn main() {
    let app = App::new();
    let code = app.run().await;
    std::process::exit(code);
}
