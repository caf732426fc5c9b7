use aurorachrome_core::*;

fn playlist(len: usize) -> Playlist {
    (0..len)
        .map(|i| VideoDescriptor::new(format!("clip-{i}"), format!("Clip {i}")).with_window(0, 80))
        .collect()
}

fn load(name: &str, len: usize, seed: u64) -> Result<MountedCartridge> {
    CartridgeRegistry::with_builtin().load(
        name,
        playlist(len),
        GameRng::from_seed(seed),
        &StartOptions::default(),
    )
}

#[test]
fn unknown_script_is_a_load_error() {
    assert_eq!(
        load("missing.js", 3, 0).err(),
        Some(GameError::UnknownCartridge("missing.js".to_string()))
    );
}

#[test]
fn memory_match_needs_eight_videos() {
    assert_eq!(
        load("memory-match.js", 5, 0).err(),
        Some(GameError::NotEnoughVideos {
            required: 8,
            found: 5
        })
    );
    let game = load("memory-match.js", 8, 0).unwrap();
    assert_eq!(game.kind(), CartridgeKind::MemoryMatch);
}

#[test]
fn tile_jigsaw_round_through_the_registry() {
    let Ok(MountedCartridge::TileJigsaw(mut game)) = load("jigsaw.js", 2, 1) else {
        panic!("expected a tile jigsaw");
    };

    let mut victories = Vec::new();
    for piece in 0..TILE_PIECE_COUNT {
        let from = game.board().piece(piece).unwrap().current();
        let to = game.board().piece(piece).unwrap().correct();
        game.pointer_down(piece, from).unwrap();
        game.pointer_move(to + Point::new(-7.0, 14.0)).unwrap();
        victories.extend(game.pointer_up().unwrap().victory);
    }

    assert_eq!(
        victories,
        vec![Victory {
            count: 16,
            unit: CountUnit::Moves
        }]
    );
    assert_eq!(victories[0].message(), "You solved the puzzle in 16 moves!");
}

#[test]
fn sequence_round_through_the_registry() {
    let Ok(MountedCartridge::SequencePuzzle(mut game)) = load("sequence-puzzle.js", 1, 2) else {
        panic!("expected a sequence puzzle");
    };

    let mut victories = Vec::new();
    for segment in 0..SEGMENT_COUNT {
        let board = game.board().unwrap();
        let piece = board
            .pieces()
            .iter()
            .position(|piece| piece.segment().index == segment)
            .unwrap();
        let from = board.pieces()[piece].position();
        let slot = board.slot_origin(segment);
        game.pointer_down(piece, from).unwrap();
        game.pointer_move(slot).unwrap();
        let outcome = game.pointer_up().unwrap();
        assert_eq!(outcome.slot, Some(segment));
        victories.extend(outcome.victory);
    }

    assert_eq!(victories.len(), 1);
    assert_eq!(victories[0].unit, CountUnit::Clicks);
    assert!(game.board().unwrap().is_complete());

    game.rebuild();
    assert_eq!(game.board().unwrap().correct_count(), 0);
}

#[test]
fn thumbnail_jigsaw_uses_host_options() {
    let options = StartOptions {
        grid: GridPreset::Hard,
        board_size: Size::new(800.0, 400.0),
        ..StartOptions::default()
    };
    let Ok(MountedCartridge::ThumbnailJigsaw(game)) = CartridgeRegistry::with_builtin().load(
        "thumbnail-jigsaw.js",
        playlist(3),
        GameRng::from_seed(3),
        &options,
    ) else {
        panic!("expected a thumbnail jigsaw");
    };

    assert_eq!(game.board().piece_count(), 16);
    assert_eq!(game.board_size(), Size::new(400.0, 400.0));
    assert_eq!(game.piece_size(), Size::new(100.0, 100.0));
}

#[test]
fn memory_match_round_through_the_registry() {
    let Ok(MountedCartridge::MemoryMatch(mut game)) = load("memory-match.js", 12, 4) else {
        panic!("expected a memory match");
    };

    let order: Vec<MatchId> = game.thumbnails().map(|card| card.match_id).collect();
    let mut victories = Vec::new();
    for id in order {
        game.select_thumbnail(id).unwrap();
        if let MatchOutcome::Matched { victory } = game.select_video(id).unwrap() {
            victories.extend(victory);
        }
    }

    assert_eq!(
        victories,
        vec![Victory {
            count: 8,
            unit: CountUnit::Clicks
        }]
    );
    assert_eq!(
        MountedCartridge::MemoryMatch(game).tally().map(RoundTally::count),
        Some(8)
    );
}
