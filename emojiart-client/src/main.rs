//! # emojiart
//!
//! Command-line front end: pick an emoji, a style and a strength, generate the
//! artwork, save it, and hand out share links.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use emojiart_client::{
    ArtworkSession, CliArgs, ClientConfig, HttpImageGenerator, ImageGenerator, ShareClient,
};
use emojiart_core::{
    favicon_svg, ArtworkRequestController, ControllerConfig, Emoji, Resolution,
    PRESETS,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emojiart=info,emojiart_client=info,emojiart_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    if args.list_styles {
        for preset in PRESETS {
            println!("{:<10} {}", preset.artist, preset.prompt);
        }
        return Ok(());
    }

    let config = ClientConfig::from(&args);
    let mut controller =
        ArtworkRequestController::from_share(args.share_key.as_deref(), ControllerConfig::default());

    if let Some(path) = args.favicon.clone() {
        controller.add_effect(Box::new(move |emoji: &str| {
            if let Err(err) = std::fs::write(&path, favicon_svg(emoji)) {
                tracing::warn!("Failed to write favicon {:?}: {}", path, err);
            }
        }));
    }

    apply_selection(&mut controller, &args)?;

    let option = controller.option();
    tracing::info!(
        "Option: {} \"{}\" style={} strength={} seed={}",
        option.emoji(),
        option.name(),
        option.preset().map_or("custom", |p| p.artist),
        option.strength(),
        option.seed()
    );

    let share_client = config
        .share_endpoint
        .as_deref()
        .map(ShareClient::new)
        .transpose()
        .context("invalid share endpoint")?;

    let Some(generator_url) = config.generator_url.as_deref() else {
        println!("{}", controller.share_url(&config.public_url)?);
        tracing::warn!("No generator configured; printed share link only");
        return Ok(());
    };
    let generator =
        Arc::new(HttpImageGenerator::new(generator_url).context("invalid generator URL")?);
    let mut session =
        ArtworkSession::new(controller, Arc::clone(&generator) as Arc<dyn ImageGenerator>);

    if let (Some(share), Some(_)) = (share_client.as_ref(), args.share_key.as_ref()) {
        session.prime_from_cache(share).await;
    }

    match session.run_until_idle().await {
        Some(Resolution::Failed) => {
            tracing::warn!("Generation failed; keeping the fallback image");
        }
        Some(_) | None => {}
    }
    println!("{}", session.controller().displayed_image());

    if let Some(frames) = args.sweep {
        run_sweep(&mut session, frames).await;
    }

    if let Some(path) = args.out.as_ref() {
        let image = session
            .controller()
            .current_image()
            .cloned()
            .context("no generated image to save")?;
        generator
            .save(&image, path)
            .await
            .with_context(|| format!("failed to save artwork to {}", path.display()))?;
        tracing::info!("Saved artwork to {:?}", path);
    }

    if args.share_link {
        let share = share_client
            .as_ref()
            .context("--share-link needs --share-endpoint")?;
        let link = session
            .share(share, &config.public_url)
            .await
            .context("failed to warm share cache")?;
        println!("{}", link.url);
        for (network, intent) in &link.intents {
            println!("{:<9} {}", network.label(), intent);
        }
    }

    Ok(())
}

/// Apply emoji, style, strength and seed flags on top of the restored option.
fn apply_selection(
    controller: &mut ArtworkRequestController,
    args: &CliArgs,
) -> anyhow::Result<()> {
    if let Some(query) = args.emoji.as_deref() {
        controller.select_emoji(&Emoji::lookup(query)?);
    }
    if let Some(style) = args.style.as_deref() {
        controller.select_style(style)?;
    }
    if let Some(strength) = args.strength {
        controller.set_strength(strength);
    }
    if let Some(seed) = args.seed {
        controller.set_seed(seed);
    } else if args.random_seed {
        let seed = controller.randomize_seed(&mut rand::thread_rng());
        tracing::info!("Rolled seed {}", seed);
    }
    Ok(())
}

/// Generate `frames` sweep steps, printing each image as it lands.
async fn run_sweep(session: &mut ArtworkSession, frames: usize) {
    session.controller_mut().play();
    for _ in 0..frames {
        let Some(strength) = session.controller_mut().tick() else {
            break;
        };
        if session.run_until_idle().await == Some(Resolution::Applied) {
            println!("{strength}\t{}", session.controller().displayed_image());
        }
    }
    session.controller_mut().pause();
}
