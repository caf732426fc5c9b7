use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub const MEMORY_PAIRS: usize = 8;

/// Identifier shared by a thumbnail card and its live-video counterpart.
pub type MatchId = usize;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCard {
    pub match_id: MatchId,
    pub video: VideoDescriptor,
    cleared: bool,
}

impl MatchCard {
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    NoneSelected,
    ThumbnailSelected(MatchId),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    /// A video was picked with no thumbnail selected; nothing happens.
    Ignored,
    Matched { victory: Option<Victory> },
    Mismatch,
}

/// Thumbnail to live-video matching over eight pairs per round.
#[derive(Clone, Debug)]
pub struct MemoryMatch {
    playlist: Playlist,
    rng: GameRng,
    cards: Vec<MatchCard>,
    thumbnail_order: Vec<MatchId>,
    selection: Selection,
    score: usize,
    tally: RoundTally,
}

impl MemoryMatch {
    pub fn start(playlist: Playlist, rng: GameRng) -> Result<Self> {
        if playlist.len() < MEMORY_PAIRS {
            return Err(GameError::NotEnoughVideos {
                required: MEMORY_PAIRS,
                found: playlist.len(),
            });
        }
        let mut game = Self {
            playlist,
            rng,
            cards: Vec::new(),
            thumbnail_order: Vec::new(),
            selection: Selection::NoneSelected,
            score: 0,
            tally: RoundTally::new(CountUnit::Clicks),
        };
        game.deal();
        Ok(game)
    }

    /// Starts a new round from a freshly shuffled master playlist.
    pub fn deal(&mut self) {
        fisher_yates(&mut self.playlist, &mut self.rng);
        self.cards = self
            .playlist
            .iter()
            .take(MEMORY_PAIRS)
            .cloned()
            .enumerate()
            .map(|(match_id, video)| MatchCard {
                match_id,
                video,
                cleared: false,
            })
            .collect();
        self.thumbnail_order = (0..self.cards.len()).collect();
        fisher_yates(&mut self.thumbnail_order, &mut self.rng);
        self.selection = Selection::NoneSelected;
        self.score = 0;
        self.tally = RoundTally::new(CountUnit::Clicks);
    }

    pub fn cards(&self) -> &[MatchCard] {
        &self.cards
    }

    /// Remaining thumbnails in their shuffled display order.
    pub fn thumbnails(&self) -> impl Iterator<Item = &MatchCard> {
        self.thumbnail_order
            .iter()
            .map(|&id| &self.cards[id])
            .filter(|card| !card.cleared)
    }

    /// Remaining live videos in deal order.
    pub fn videos(&self) -> impl Iterator<Item = &MatchCard> {
        self.cards.iter().filter(|card| !card.cleared)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn clicks(&self) -> Count {
        self.tally.count()
    }

    pub fn tally(&self) -> &RoundTally {
        &self.tally
    }

    pub fn live_pairs(&self) -> usize {
        self.cards.iter().filter(|card| !card.cleared).count()
    }

    pub fn select_thumbnail(&mut self, match_id: MatchId) -> Result<()> {
        self.tally.check_open()?;
        self.live_card(match_id)?;
        if let Selection::ThumbnailSelected(previous) = self.selection {
            log::trace!("thumbnail selection moves from {} to {}", previous, match_id);
        }
        self.selection = Selection::ThumbnailSelected(match_id);
        Ok(())
    }

    /// Compares the selected thumbnail with the picked video; counts one click.
    pub fn select_video(&mut self, match_id: MatchId) -> Result<MatchOutcome> {
        self.tally.check_open()?;
        self.live_card(match_id)?;
        let Selection::ThumbnailSelected(selected) = self.selection else {
            return Ok(MatchOutcome::Ignored);
        };

        self.tally.bump();
        self.selection = Selection::NoneSelected;
        if selected != match_id {
            return Ok(MatchOutcome::Mismatch);
        }

        self.cards[match_id].cleared = true;
        self.score += 1;
        log::debug!("pair {} matched, score {}", match_id, self.score);
        Ok(MatchOutcome::Matched {
            victory: self.tally.settle(self.score == MEMORY_PAIRS),
        })
    }

    fn live_card(&self, match_id: MatchId) -> Result<&MatchCard> {
        match self.cards.get(match_id) {
            Some(card) if !card.cleared => Ok(card),
            _ => Err(GameError::InvalidPiece),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn playlist(len: usize) -> Playlist {
        (0..len)
            .map(|i| VideoDescriptor::new(format!("v{}", i), format!("Video {}", i)))
            .collect()
    }

    fn game(len: usize, seed: u64) -> MemoryMatch {
        MemoryMatch::start(playlist(len), GameRng::from_seed(seed)).unwrap()
    }

    #[test]
    fn short_playlist_is_rejected() {
        assert_eq!(
            MemoryMatch::start(playlist(7), GameRng::from_seed(0)).err(),
            Some(GameError::NotEnoughVideos {
                required: 8,
                found: 7
            })
        );
    }

    #[test]
    fn round_draws_exactly_eight_pairs() {
        for len in [8, 9, 20] {
            let game = game(len, len as u64);
            assert_eq!(game.cards().len(), 8);
            assert_eq!(game.thumbnails().count(), 8);
            assert_eq!(game.videos().count(), 8);
            let video_ids: Vec<_> = game.videos().map(|card| card.match_id).collect();
            assert_eq!(video_ids, (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn matching_pair_is_removed_and_scores() {
        let mut game = game(10, 1);

        game.select_thumbnail(3).unwrap();
        let outcome = game.select_video(3).unwrap();

        assert_eq!(outcome, MatchOutcome::Matched { victory: None });
        assert_eq!(game.score(), 1);
        assert_eq!(game.live_pairs(), 7);
        assert!(game.thumbnails().all(|card| card.match_id != 3));
        assert!(game.videos().all(|card| card.match_id != 3));
        assert_eq!(game.selection(), Selection::NoneSelected);
        assert_eq!(game.select_thumbnail(3), Err(GameError::InvalidPiece));
    }

    #[test]
    fn mismatch_leaves_pool_and_score_unchanged() {
        let mut game = game(8, 2);

        game.select_thumbnail(0).unwrap();
        assert_eq!(game.select_video(1).unwrap(), MatchOutcome::Mismatch);

        assert_eq!(game.score(), 0);
        assert_eq!(game.live_pairs(), 8);
        assert_eq!(game.clicks(), 1);
        assert_eq!(game.selection(), Selection::NoneSelected);
    }

    #[test]
    fn reselecting_a_thumbnail_does_not_count() {
        let mut game = game(8, 3);

        game.select_thumbnail(0).unwrap();
        game.select_thumbnail(4).unwrap();
        assert_eq!(game.selection(), Selection::ThumbnailSelected(4));
        assert_eq!(game.clicks(), 0);

        assert_eq!(game.select_video(5).unwrap(), MatchOutcome::Mismatch);
        assert_eq!(game.select_video(5).unwrap(), MatchOutcome::Ignored);
        assert_eq!(game.clicks(), 1);
    }

    #[test]
    fn eighth_pair_wins_once() {
        let mut game = game(12, 4);
        game.select_thumbnail(0).unwrap();
        game.select_video(1).unwrap();

        for id in 0..MEMORY_PAIRS {
            game.select_thumbnail(id).unwrap();
            let outcome = game.select_video(id).unwrap();
            if id + 1 < MEMORY_PAIRS {
                assert_eq!(outcome, MatchOutcome::Matched { victory: None });
            } else {
                assert_eq!(
                    outcome,
                    MatchOutcome::Matched {
                        victory: Some(Victory {
                            count: 9,
                            unit: CountUnit::Clicks
                        })
                    }
                );
            }
        }
        assert_eq!(game.live_pairs(), 0);
        assert_eq!(game.select_video(0), Err(GameError::AlreadyFinished));
    }

    #[test]
    fn dealing_again_resets_the_round() {
        let mut game = game(16, 5);
        game.select_thumbnail(2).unwrap();
        game.select_video(2).unwrap();

        game.deal();
        assert_eq!(game.score(), 0);
        assert_eq!(game.clicks(), 0);
        assert_eq!(game.live_pairs(), 8);
    }
}
