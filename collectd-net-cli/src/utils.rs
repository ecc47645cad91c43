use anyhow::Context;
use collectd_net_transport::ClientConfig;

pub fn load_config(path: Option<&String>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path)),
        None => Ok(ClientConfig::default()),
    }
}

pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|line| {
            line.iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
