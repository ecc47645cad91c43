use anyhow::Context;
use clap::ArgMatches;
use collectd_net_core::inspect::decode_sample;
use collectd_net_core::{Datagram, Sample};
use collectd_net_transport::{AsyncCollectdClient, ClientConfig};
use log::info;

use crate::utils::{format_hex, load_config};

/// Apply command-line overrides on top of the configuration file
pub fn apply_overrides(config: &mut ClientConfig, matches: &ArgMatches) {
    if let Some(server) = matches.get_one::<String>("server") {
        config.server = server.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(interval) = matches.get_one::<u64>("interval") {
        config.interval_secs = *interval;
    }
    if let Some(plugin) = matches.get_one::<String>("plugin") {
        config.plugin = plugin.clone();
    }
    if let Some(host) = matches.get_one::<String>("host") {
        config.host = Some(host.clone());
    }
}

/// Build the sample described by the command-line flags
pub fn build_sample(config: &ClientConfig, matches: &ArgMatches) -> anyhow::Result<Sample> {
    let type_name = matches
        .get_one::<String>("type")
        .context("missing --type")?;
    let values: Vec<f64> = matches
        .get_many::<f64>("values")
        .map(|values| values.copied().collect())
        .unwrap_or_default();

    let mut sample = config.sample(type_name, values)?;
    if let Some(plugin_instance) = matches.get_one::<String>("plugin-instance") {
        sample = sample.with_plugin_instance(plugin_instance.as_str());
    }
    if let Some(type_instance) = matches.get_one::<String>("type-instance") {
        sample = sample.with_type_instance(type_instance.as_str());
    }
    if let Some(time) = matches.get_one::<i64>("time") {
        sample = sample.with_time(*time);
    }

    Ok(sample)
}

fn effective_config(global: &ArgMatches, matches: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let mut config = load_config(global.get_one::<String>("config"))?;
    apply_overrides(&mut config, matches);
    Ok(config)
}

pub async fn handle_send_command(global: &ArgMatches, matches: &ArgMatches) -> anyhow::Result<()> {
    let config = effective_config(global, matches)?;
    let sample = build_sample(&config, matches)?;

    let client = AsyncCollectdClient::from_config(&config)
        .await
        .with_context(|| format!("failed to set up client for {}:{}", config.server, config.port))?;
    client.send(&sample).await?;

    info!(
        "Sent {}/{} ({} value(s)) to {}",
        sample.plugin(),
        sample.type_name(),
        sample.values().len(),
        client.destination()
    );
    Ok(())
}

pub fn handle_encode_command(global: &ArgMatches, matches: &ArgMatches) -> anyhow::Result<()> {
    let config = effective_config(global, matches)?;
    let sample = build_sample(&config, matches)?;

    let datagram = Datagram::assemble(&sample, config.interval_secs)?;
    println!("{}", format_hex(datagram.as_bytes()));
    println!("{} bytes", datagram.len());

    if global.get_flag("verbose") {
        let decoded = decode_sample(datagram.as_bytes())?;
        println!("host            = {}", decoded.host);
        println!("time            = {}", decoded.time);
        println!("plugin          = {}", decoded.plugin);
        println!("plugin_instance = {}", decoded.plugin_instance);
        println!("type            = {}", decoded.type_name);
        println!("type_instance   = {}", decoded.type_instance);
        println!("interval        = {}", decoded.interval);
        println!("values          = {:?}", decoded.values);
    }
    Ok(())
}

pub fn handle_config_command(global: &ArgMatches, _matches: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(global.get_one::<String>("config"))?;
    print!("{}", config.to_toml()?);
    Ok(())
}
