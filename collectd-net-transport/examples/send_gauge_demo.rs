use std::net::UdpSocket;
use std::time::Duration;

use collectd_net_core::inspect::decode_sample;
use collectd_net_transport::{ClientConfig, CollectdClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Local stand-in for a collectd network plugin
    let collector = UdpSocket::bind("127.0.0.1:0")?;
    collector.set_read_timeout(Some(Duration::from_secs(2)))?;
    let port = collector.local_addr()?.port();

    let config = ClientConfig::new("127.0.0.1", port, 10);
    let client = CollectdClient::from_config(&config)?;
    println!("Sending to {}", client.destination());

    let sample = client
        .sample("load", vec![0.42, 0.37, 0.30])?
        .with_plugin_instance("demo")
        .with_type_instance("shortterm");
    let datagram = client.encode(&sample)?;
    println!("Datagram: {} bytes", datagram.len());
    client.send(&sample)?;

    let mut buffer = [0u8; 1500];
    let (n, from) = collector.recv_from(&mut buffer)?;
    let decoded = decode_sample(&buffer[..n])?;

    println!("Received {} bytes from {}", n, from);
    println!("  host:            {}", decoded.host);
    println!("  time:            {}", decoded.time);
    println!("  plugin:          {}/{}", decoded.plugin, decoded.plugin_instance);
    println!("  type:            {}/{}", decoded.type_name, decoded.type_instance);
    println!("  interval:        {}s", decoded.interval);
    println!("  values:          {:?}", decoded.values);

    Ok(())
}
