//! # Seed
//!
//! Provisions a moderator account and a couple of sample threads into the
//! configured JSON document store. Safe to re-run: an existing moderator
//! email short-circuits the whole pass.

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use auth_adapters::password;
use configs::AppConfig;
use domains::{Category, DocumentGateway, NewThread, User};
use services::{tags, Threads};
use storage_adapters::JsonDocStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppConfig::load().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cfg.log.filter.clone()))
        .init();

    let seed = cfg.seed.as_ref().context(
        "no seed account configured; set FORUM_SEED__MODERATOR_EMAIL, \
         FORUM_SEED__MODERATOR_NAME and FORUM_SEED__MODERATOR_PASSWORD",
    )?;

    let store: Arc<dyn DocumentGateway> = Arc::new(JsonDocStore::new(&cfg.data_dir));

    let already_seeded = store.list("users").await?.iter().any(|(_, doc)| {
        doc.get("email")
            .and_then(|email| email.as_str())
            .is_some_and(|email| email.eq_ignore_ascii_case(&seed.moderator_email))
    });
    if already_seeded {
        info!(email = %seed.moderator_email, "moderator account already present, nothing to do");
        return Ok(());
    }

    // 1. Moderator account, hashed the same way the identity adapter does it
    let moderator = User {
        id: Uuid::now_v7(),
        username: seed.moderator_name.clone(),
        name: seed.moderator_name.clone(),
        email: seed.moderator_email.clone(),
        is_moderator: true,
    };
    let mut doc = serde_json::to_value(&moderator)?;
    doc["password"] = json!(password::hash_password(seed.moderator_password.expose_secret())?);
    store.set("users", &moderator.id.to_string(), doc).await?;
    info!(user = %moderator.id, "moderator account seeded");

    // 2. Sample threads
    let threads = Threads::new(store.clone());
    threads
        .create(NewThread {
            title: "Welcome to the board".into(),
            description: "Introduce yourself and read the house rules before posting.".into(),
            category: Category::TechNewsTrends,
            is_qna: false,
            tags: tags::normalize(["welcome", "rules"]),
            creator: moderator.clone(),
        })
        .await?;
    threads
        .create(NewThread {
            title: "Which laptop handles local model inference well?".into(),
            description: "Budget around 2000, needs plenty of unified memory.".into(),
            category: Category::HardwareGadgets,
            is_qna: true,
            tags: tags::normalize(["laptops", "hardware"]),
            creator: moderator,
        })
        .await?;
    info!(data_dir = %cfg.data_dir.display(), "sample threads seeded");

    Ok(())
}
