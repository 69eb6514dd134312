use std::path::PathBuf;

use talksy::app::App;
use talksy::util::{config::ChatConfig, log};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = ChatConfig::load(std::env::args().nth(1).map(PathBuf::from))?;
    log::init(&config.log_dir)?;

    // Fail on a missing key before the terminal is taken over.
    let app = App::new(&config)?;

    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    result
}
