use std::io;

use inference_server::ServerConfig;

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env()?;
    inference_server::run(config).await?;

    Ok(())
}
