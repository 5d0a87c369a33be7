use sign_core::{bridge, ConversionSession, SessionConfig};
use std::error::Error;
use std::path::PathBuf;
use tokio::io::{self, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = SessionConfig::load_or_default(config_path.as_deref())?;
    let mut session = ConversionSession::from_config(config);

    bridge::serve(&mut session, BufReader::new(io::stdin()), io::stdout()).await?;
    Ok(())
}
