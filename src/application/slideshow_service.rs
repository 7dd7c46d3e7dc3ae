// Auto-rotate driver for the slide deck

use crate::domain::slideshow::SlideShow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct SlideshowService {
    slides: Arc<Mutex<SlideShow>>,
    period: Duration,
}

impl SlideshowService {
    pub fn new(slides: Arc<Mutex<SlideShow>>, period: Duration) -> Self {
        Self { slides, period }
    }

    /// Tick the deck on the fixed period. The tick is a no-op while
    /// auto-rotate is off; the timer itself never stops.
    pub fn spawn(&self) {
        let slides = self.slides.clone();
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut deck = slides.lock().await;
                if deck.tick() {
                    tracing::debug!("auto-rotate advanced to slide {}", deck.current());
                }
            }
        });
    }
}
