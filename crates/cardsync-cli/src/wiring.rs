//! Adapter wiring
//!
//! Builds the executor's [`SyncContext`] from a loaded [`Config`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use cardsync_archive::{SleepHqArchive, SleepHqClient};
use cardsync_core::{
    config::Config,
    ports::INetworkSwitch,
    usecases::{SyncContext, SyncExecutor},
};
use cardsync_ezshare::{EzShareClient, EzShareListing};
use cardsync_local::{NmcliSwitch, NoopSwitch, StagingMirror};
use cardsync_store::{FileStateStore, JsonlHistoryLog, TextErrorLog};

pub fn network_switch(config: &Config) -> Arc<dyn INetworkSwitch> {
    if config.network.enabled {
        Arc::new(NmcliSwitch::new(Duration::from_secs(
            config.network.settle_delay_secs,
        )))
    } else {
        Arc::new(NoopSwitch)
    }
}

pub fn build_context(config: &Config) -> Result<SyncContext> {
    let device = EzShareClient::new(
        &config.device.base_url,
        Duration::from_secs(config.device.request_timeout_secs),
        Duration::from_secs(config.device.probe_timeout_secs),
    )
    .context("Failed to create device client")?;

    let archive_client = SleepHqClient::new(
        config.archive.base_url.clone(),
        Duration::from_secs(config.archive.request_timeout_secs),
        Duration::from_secs(config.archive.upload_timeout_secs),
    );

    let paths = &config.paths;
    Ok(SyncContext {
        listing: Arc::new(EzShareListing::new(device)),
        network: network_switch(config),
        archive: Arc::new(SleepHqArchive::new(
            archive_client,
            config.archive.credentials_file.clone(),
        )),
        mirror: Arc::new(StagingMirror::new(
            paths.staging_dir.clone(),
            paths.archive_file.clone(),
        )),
        state_store: Arc::new(FileStateStore::new(paths.state_file.clone())),
        history: Arc::new(JsonlHistoryLog::new(paths.history_file.clone())),
        error_log: Arc::new(TextErrorLog::new(paths.error_log.clone())),
    })
}

pub fn build_executor(config: &Config) -> Result<SyncExecutor> {
    let options = config
        .sync_options()
        .context("Invalid device configuration")?;
    Ok(SyncExecutor::new(build_context(config)?, options))
}
