//! Async driver for the artwork request controller.
//!
//! [`ArtworkSession`] owns an [`ArtworkRequestController`] and runs its
//! generation requests on the Tokio runtime. Fetches run concurrently, but
//! every completion funnels back through one channel and is applied by the
//! session owner, so controller state is only ever touched from one place and
//! the controller's fingerprint check decides which result wins.

use std::sync::Arc;

use emojiart_core::{ArtworkRequestController, GeneratedImage, ImageRequest, Resolution};
use tokio::sync::mpsc;

use crate::error::ClientError;
use crate::generation::ImageGenerator;
use crate::share::{ShareClient, ShareLink};

type Completion = (ImageRequest, Result<GeneratedImage, ClientError>);

/// Drives generation for one user session.
pub struct ArtworkSession {
    controller: ArtworkRequestController,
    generator: Arc<dyn ImageGenerator>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    outstanding: usize,
}

impl ArtworkSession {
    /// Create a session around `controller`.
    #[must_use]
    pub fn new(controller: ArtworkRequestController, generator: Arc<dyn ImageGenerator>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            generator,
            completions_tx,
            completions_rx,
            outstanding: 0,
        }
    }

    /// The controller.
    #[must_use]
    pub fn controller(&self) -> &ArtworkRequestController {
        &self.controller
    }

    /// Mutable access to the controller for UI interactions.
    ///
    /// Call [`Self::refresh`] afterwards to start any generation the change
    /// requires.
    pub fn controller_mut(&mut self) -> &mut ArtworkRequestController {
        &mut self.controller
    }

    /// Number of fetches whose outcome has not been applied yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Start a fetch for the current option if it needs one.
    ///
    /// Returns the request id when a fetch was spawned.
    pub fn refresh(&mut self) -> Option<u64> {
        let request = self.controller.next_request()?;
        let id = request.id();
        let generator = Arc::clone(&self.generator);
        let tx = self.completions_tx.clone();
        self.outstanding += 1;

        tokio::spawn(async move {
            let option = request.option().clone();
            let task = tokio::spawn(async move { generator.generate(&option).await });
            // A panicking generator still reports back, so the request is
            // resolved and `outstanding` stays accurate.
            let outcome = task.await.unwrap_or_else(|err| {
                tracing::error!("Generation task for request {} failed: {}", request.id(), err);
                Err(ClientError::Task(err))
            });
            // Receiver lives as long as the session; a dropped session
            // discards the outcome.
            let _ = tx.send((request, outcome));
        });
        Some(id)
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is outstanding.
    pub async fn settle(&mut self) -> Option<Resolution> {
        if self.outstanding == 0 {
            return None;
        }
        let (request, outcome) = self.completions_rx.recv().await?;
        self.outstanding -= 1;
        Some(self.controller.resolve(&request, outcome))
    }

    /// Refresh, then settle until the current option is no longer loading.
    ///
    /// Returns how the current option's request ended, or `None` if no
    /// request was needed.
    pub async fn run_until_idle(&mut self) -> Option<Resolution> {
        self.refresh();
        let mut last = None;
        while self.controller.is_loading() {
            match self.settle().await {
                Some(Resolution::Stale) => {}
                Some(resolution) => last = Some(resolution),
                None => break,
            }
        }
        last
    }

    /// Install a cached image for the current option if the share endpoint
    /// has one. Lookup failures are logged and ignored.
    pub async fn prime_from_cache(&mut self, share: &ShareClient) -> bool {
        let key = self.controller.share_key().to_string();
        match share.lookup(&key).await {
            Ok(Some(image)) => {
                tracing::info!("Restored shared artwork from cache");
                self.controller.prime(image);
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!("Share cache lookup failed: {}", err);
                false
            }
        }
    }

    /// Warm the share cache with the current image, then build the link.
    ///
    /// The link is only returned once the warm call has completed, so the
    /// shared page can resolve the image immediately.
    ///
    /// # Errors
    ///
    /// Returns the warm call's error, or [`ClientError::Art`] if `base` is
    /// not an absolute URL.
    pub async fn share(&self, share: &ShareClient, base: &str) -> Result<ShareLink, ClientError> {
        let key = self.controller.share_key();
        let image = self
            .controller
            .current_image()
            .map_or("", GeneratedImage::as_str);
        share.warm(image, key).await?;
        let url = self.controller.share_url(base)?;
        Ok(ShareLink::new(url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use emojiart_core::{Emoji, RequestOption, DEFAULT_IMAGE};
    use tokio::sync::oneshot;

    /// Generator whose responses are released by the test, per emoji.
    #[derive(Default)]
    struct GatedGenerator {
        gates: Mutex<HashMap<String, oneshot::Receiver<Result<String, String>>>>,
    }

    impl GatedGenerator {
        fn gate(&self, emoji: &str) -> oneshot::Sender<Result<String, String>> {
            let (tx, rx) = oneshot::channel();
            self.gates
                .lock()
                .expect("lock")
                .insert(emoji.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl ImageGenerator for GatedGenerator {
        async fn generate(&self, option: &RequestOption) -> Result<GeneratedImage, ClientError> {
            let gate = self
                .gates
                .lock()
                .expect("lock")
                .remove(option.emoji())
                .expect("test registered a gate");
            match gate.await.expect("gate released") {
                Ok(image) => Ok(GeneratedImage::new(image)),
                Err(msg) => Err(ClientError::UnexpectedResponse(msg)),
            }
        }
    }

    struct PanickingGenerator;

    #[async_trait]
    impl ImageGenerator for PanickingGenerator {
        async fn generate(&self, _option: &RequestOption) -> Result<GeneratedImage, ClientError> {
            panic!("generator bug")
        }
    }

    fn pick(session: &mut ArtworkSession, query: &str) {
        session
            .controller_mut()
            .select_emoji(&Emoji::lookup(query).expect("emoji"));
    }

    #[tokio::test]
    async fn test_late_stale_response_does_not_clobber() {
        let generator = Arc::new(GatedGenerator::default());
        let cat = generator.gate("🐱");
        let fox = generator.gate("🦊");
        let mut session = ArtworkSession::new(
            ArtworkRequestController::default(),
            Arc::clone(&generator) as Arc<dyn ImageGenerator>,
        );

        pick(&mut session, "🐱");
        assert!(session.refresh().is_some());
        pick(&mut session, "🦊");
        assert!(session.refresh().is_some());
        assert_eq!(session.outstanding(), 2);

        fox.send(Ok("fox.png".into())).expect("send");
        assert_eq!(session.settle().await, Some(Resolution::Applied));
        cat.send(Ok("cat.png".into())).expect("send");
        assert_eq!(session.settle().await, Some(Resolution::Stale));

        assert_eq!(session.controller().displayed_image(), "fox.png");
        assert_eq!(session.settle().await, None);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_image() {
        let generator = Arc::new(GatedGenerator::default());
        let dog = generator.gate("🐶");
        let mut session = ArtworkSession::new(
            ArtworkRequestController::default(),
            Arc::clone(&generator) as Arc<dyn ImageGenerator>,
        );

        session.refresh();
        dog.send(Ok("dog.png".into())).expect("send");
        assert_eq!(session.settle().await, Some(Resolution::Applied));

        let panda = generator.gate("🐼");
        pick(&mut session, "🐼");
        panda.send(Err("boom".into())).expect("send");
        assert_eq!(session.run_until_idle().await, Some(Resolution::Failed));
        assert_eq!(session.controller().displayed_image(), "dog.png");
    }

    #[tokio::test]
    async fn test_run_until_idle_skips_stale_outcomes() {
        let generator = Arc::new(GatedGenerator::default());
        let cat = generator.gate("🐱");
        let frog = generator.gate("🐸");
        let mut session = ArtworkSession::new(
            ArtworkRequestController::default(),
            Arc::clone(&generator) as Arc<dyn ImageGenerator>,
        );

        pick(&mut session, "🐱");
        session.refresh();
        pick(&mut session, "🐸");
        cat.send(Ok("cat.png".into())).expect("send");
        frog.send(Ok("frog.png".into())).expect("send");

        assert_eq!(session.run_until_idle().await, Some(Resolution::Applied));
        assert_eq!(session.controller().displayed_image(), "frog.png");
    }

    #[tokio::test]
    async fn test_nothing_to_do_when_image_known() {
        let generator = Arc::new(GatedGenerator::default());
        let mut controller = ArtworkRequestController::default();
        controller.prime(GeneratedImage::new("cached.png"));
        let mut session =
            ArtworkSession::new(controller, Arc::clone(&generator) as Arc<dyn ImageGenerator>);

        assert!(session.refresh().is_none());
        assert_eq!(session.run_until_idle().await, None);
        assert_ne!(session.controller().displayed_image(), DEFAULT_IMAGE);
    }

    #[tokio::test]
    async fn test_panicking_generator_resolves_as_failure() {
        let mut session =
            ArtworkSession::new(ArtworkRequestController::default(), Arc::new(PanickingGenerator));

        assert!(session.refresh().is_some());
        assert_eq!(session.settle().await, Some(Resolution::Failed));
        assert_eq!(session.outstanding(), 0);
        assert!(!session.controller().is_loading());
        assert_eq!(session.controller().displayed_image(), DEFAULT_IMAGE);

        pick(&mut session, "🐱");
        assert_eq!(session.run_until_idle().await, Some(Resolution::Failed));
        assert_eq!(session.outstanding(), 0);
    }
}
