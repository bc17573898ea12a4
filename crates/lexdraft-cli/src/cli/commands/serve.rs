//! Web server command.

use console::style;

use lexdraft::Config;

/// Start the HTTP API server.
pub async fn cmd_serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;
    let addr = format!("{}:{}", host, port);

    println!(
        "{} Starting lexdraft server at http://{} ({} / {})",
        style("→").cyan(),
        addr,
        config.llm.provider_name(),
        config.llm.model()
    );
    println!("  Press Ctrl+C to stop");

    lexdraft_server::serve(config, &addr).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        anyhow::bail!("Invalid port in bind address: {}", bind);
    }

    Ok((bind.to_string(), 3030))
}
