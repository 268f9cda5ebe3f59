// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use enroll_app::ApplicationRecord;
use enroll_feed::Client;
use enroll_testkit::ApplicationFaker;
use enroll_tui::{AppRuntime, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

const DEMO_SEED: u64 = 2024;
const DEMO_RECORDS: usize = 37;

pub enum FeedRuntime {
    Remote(Client),
    Demo(Vec<ApplicationRecord>),
}

impl FeedRuntime {
    pub fn remote(client: Client) -> Self {
        Self::Remote(client)
    }

    pub fn demo() -> Self {
        Self::Demo(ApplicationFaker::new(DEMO_SEED).records(DEMO_RECORDS))
    }

    pub fn source(&self) -> String {
        match self {
            Self::Remote(client) => client.url().to_owned(),
            Self::Demo(_) => "demo data".to_owned(),
        }
    }
}

impl AppRuntime for FeedRuntime {
    fn load_applications(&mut self) -> Result<Vec<ApplicationRecord>> {
        match self {
            Self::Remote(client) => client.fetch_applications(),
            Self::Demo(records) => Ok(records.clone()),
        }
    }

    /// Remote loads run on a worker thread so the UI can draw the loading
    /// state. If the UI has already exited, the result is dropped.
    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let client = match self {
            Self::Remote(client) => client.clone(),
            Self::Demo(records) => {
                tx.send(InternalEvent::Loaded(Ok(records.clone())))
                    .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
                return Ok(());
            }
        };

        spawn_fetch(client, tx)?;
        Ok(())
    }
}

/// The worker yields `true` when the result reached the UI.
fn spawn_fetch(client: Client, tx: Sender<InternalEvent>) -> Result<JoinHandle<bool>> {
    thread::Builder::new()
        .name("feed-load".to_owned())
        .spawn(move || {
            let result = client
                .fetch_applications()
                .map_err(|error| format!("{error:#}"));
            if tx.send(InternalEvent::Loaded(result)).is_err() {
                tracing::debug!("load finished after the UI closed; result discarded");
                return false;
            }
            true
        })
        .context("spawn feed load thread")
}
