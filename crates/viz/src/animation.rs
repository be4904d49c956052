//! Play/pause stepping through years.

use serde::Serialize;

/// Steps through an ordered list of years.
///
/// `play` always starts over from the first year; each `tick` advances
/// one year and stops at the last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearPlayer {
    years: Vec<i32>,
    index: usize,
    playing: bool,
}

impl YearPlayer {
    /// Years are sorted and deduplicated. Starts paused on the last year,
    /// the most recent data.
    #[must_use]
    pub fn new(mut years: Vec<i32>) -> Self {
        years.sort_unstable();
        years.dedup();
        let index = years.len().saturating_sub(1);
        Self {
            years,
            index,
            playing: false,
        }
    }

    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    #[must_use]
    pub fn current(&self) -> Option<i32> {
        self.years.get(self.index).copied()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn at_end(&self) -> bool {
        self.index + 1 >= self.years.len()
    }

    /// Start advancing from the first year. Does nothing while playing.
    pub fn play(&mut self) {
        if self.years.len() < 2 || self.playing {
            return;
        }
        self.index = 0;
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance one year while playing. Reaching the last year stops playback.
    ///
    /// Returns the year shown after the tick.
    pub fn tick(&mut self) -> Option<i32> {
        if self.playing && !self.at_end() {
            self.index += 1;
        }
        if self.at_end() {
            self.playing = false;
        }
        self.current()
    }

    /// Jump to `year`, pausing playback. Unknown years are ignored.
    pub fn select(&mut self, year: i32) -> bool {
        match self.years.iter().position(|y| *y == year) {
            Some(index) => {
                self.index = index;
                self.playing = false;
                true
            }
            None => false,
        }
    }

    /// Every year once, first to last, as a full playback would show them.
    pub fn frames(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }
}
