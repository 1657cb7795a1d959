use tokio::io::{self, BufReader};

use super::http_gateway;
use crate::config::Config;
use crate::console::Session;
use crate::dispatch::{Page, TextRenderer};
use crate::error::Result;
use crate::orchestrator::{LoadSettings, Orchestrator};
use crate::theme::ThemeStore;

/// Run the interactive console on stdin until `quit` or end of input.
pub async fn cmd_console(page: Page) -> Result<()> {
    let config = Config::load()?;
    let orchestrator = Orchestrator::new(http_gateway(&config)?, LoadSettings::from(&config));
    let mut session = Session::new(
        orchestrator,
        TextRenderer::stdout(),
        ThemeStore::default_location(),
        page,
    );
    session.start().await?;
    session.run(BufReader::new(io::stdin())).await
}
