// Slide navigation state machine
//
// One state per slide index. Manual navigation always switches auto-rotate
// off; `resume` switches it back on and returns to the first slide. The
// auto-rotate driver calls `tick` on its period and only advances while the
// flag is set.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlideError {
    #[error("slide index {index} out of range, deck has {count} slides")]
    OutOfRange { index: usize, count: usize },
}

#[derive(Debug, Clone)]
pub struct SlideShow {
    current: usize,
    count: usize,
    auto_rotate: bool,
}

impl SlideShow {
    /// Starts on slide 0 with auto-rotate on.
    pub fn new(count: usize) -> Self {
        assert!(count > 0, "slide deck cannot be empty");
        Self {
            current: 0,
            count,
            auto_rotate: true,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Fraction of the deck covered, for the progress bar.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.count as f64
    }

    /// Manual forward navigation. Wraps past the last slide.
    pub fn next(&mut self) {
        self.auto_rotate = false;
        self.current = (self.current + 1) % self.count;
    }

    /// Manual backward navigation. Wraps before the first slide.
    pub fn prev(&mut self) {
        self.auto_rotate = false;
        self.current = (self.current + self.count - 1) % self.count;
    }

    /// Manual direct navigation. Out-of-range targets are rejected and
    /// leave the state untouched.
    pub fn goto(&mut self, index: usize) -> Result<(), SlideError> {
        if index >= self.count {
            return Err(SlideError::OutOfRange {
                index,
                count: self.count,
            });
        }
        self.auto_rotate = false;
        self.current = index;
        Ok(())
    }

    pub fn set_auto_rotate(&mut self, on: bool) {
        self.auto_rotate = on;
    }

    /// Auto-rotate on, back to the first slide.
    pub fn resume(&mut self) {
        self.auto_rotate = true;
        self.current = 0;
    }

    /// Timer callback. Advances exactly one slide per call while
    /// auto-rotate is on; reports whether an advance happened.
    pub fn tick(&mut self) -> bool {
        if !self.auto_rotate {
            return false;
        }
        self.current = (self.current + 1) % self.count;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let show = SlideShow::new(11);
        assert_eq!(show.current(), 0);
        assert!(show.auto_rotate());
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let mut show = SlideShow::new(3);
        show.goto(2).unwrap();
        show.next();
        assert_eq!(show.current(), 0);
        show.prev();
        assert_eq!(show.current(), 2);
        show.prev();
        assert_eq!(show.current(), 1);
    }

    #[test]
    fn test_goto_out_of_range_rejected() {
        let mut show = SlideShow::new(3);
        let err = show.goto(3).unwrap_err();
        assert_eq!(err, SlideError::OutOfRange { index: 3, count: 3 });
        assert_eq!(show.current(), 0);
        assert!(show.auto_rotate(), "rejected goto must not touch the mode");
    }

    #[test]
    fn test_manual_navigation_disables_auto_rotate() {
        let mut show = SlideShow::new(4);
        show.next();
        assert!(!show.auto_rotate());

        let mut show = SlideShow::new(4);
        show.prev();
        assert!(!show.auto_rotate());

        let mut show = SlideShow::new(4);
        show.goto(2).unwrap();
        assert!(!show.auto_rotate());
    }

    #[test]
    fn test_tick_only_advances_while_enabled() {
        let mut show = SlideShow::new(3);
        assert!(show.tick());
        assert_eq!(show.current(), 1);

        show.set_auto_rotate(false);
        assert!(!show.tick());
        assert!(!show.tick());
        assert_eq!(show.current(), 1);
    }

    #[test]
    fn test_resume_restarts_rotation_at_first_slide() {
        let mut show = SlideShow::new(5);
        show.goto(3).unwrap();
        assert!(!show.auto_rotate());
        show.resume();
        assert!(show.auto_rotate());
        assert_eq!(show.current(), 0);
    }

    #[test]
    fn test_progress() {
        let mut show = SlideShow::new(4);
        assert!((show.progress() - 0.25).abs() < 1e-9);
        show.next();
        assert!((show.progress() - 0.5).abs() < 1e-9);
    }
}
