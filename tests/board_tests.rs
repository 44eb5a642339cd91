//! Board tests - render model placement, reset and snapshot override

use wordboard::core::{BoardModel, PlacedTile, PuzzleSnapshot};
use wordboard::types::{CellCategory, BOARD_SIZE};

#[test]
fn test_board_new_empty() {
    let board = BoardModel::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let cell = board.get(row, col).expect("cell in range");
            assert!(!cell.is_occupied(), "cell ({row}, {col}) should be empty");
        }
    }
    assert_eq!(board.cells().count(), 225);
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = BoardModel::new();
    assert_eq!(board.get(BOARD_SIZE, 0), None);
    assert_eq!(board.get(0, BOARD_SIZE), None);
    assert_eq!(board.category(15, 15), None);
}

#[test]
fn test_placement_keeps_category() {
    let mut board = BoardModel::new();
    assert!(board.apply_placement(0, 0, 'Z', 10, 1, 3));

    let cell = board.get(0, 0).unwrap();
    assert_eq!(cell.category, CellCategory::TripleWord);
    assert_eq!(cell.tile, Some(PlacedTile::new('Z', 10, 1, 3)));
    assert_eq!(cell.word_multiplier(), 3);
}

#[test]
fn test_placement_overwrites() {
    let mut board = BoardModel::new();
    board.apply_placement(7, 7, 'A', 1, 1, 2);
    board.apply_placement(7, 7, 'E', 1, 1, 2);
    assert_eq!(board.tile(7, 7).map(|t| t.letter), Some('E'));
    assert_eq!(board.occupied_count(), 1);
}

#[test]
fn test_invalid_placements_change_nothing() {
    let mut board = BoardModel::new();
    assert!(!board.apply_placement(15, 0, 'A', 1, 1, 1));
    assert!(!board.apply_placement(3, 3, 'A', 1, 4, 1));
    assert!(!board.apply_placement(3, 3, 'A', 1, 1, 0));
    assert_eq!(board, BoardModel::new());
}

#[test]
fn test_reset_is_idempotent() {
    let mut board = BoardModel::new();
    board.apply_placement(1, 1, 'Q', 10, 1, 2);
    board.apply_placement(2, 2, 'U', 1, 1, 2);

    board.reset();
    let once = board.clone();
    board.reset();
    assert_eq!(board, once);
    assert_eq!(board, BoardModel::new());
}

#[test]
fn test_snapshot_overrides_every_cell() {
    let mut board = BoardModel::new();
    // interim state that the snapshot does not contain
    board.apply_placement(0, 0, 'X', 8, 1, 3);
    board.apply_placement(7, 7, 'B', 3, 1, 2);

    let mut snapshot = PuzzleSnapshot::default();
    snapshot.cells[7][7] = Some(PlacedTile::new('C', 3, 1, 2));
    snapshot.cells[7][8] = Some(PlacedTile::new('A', 1, 1, 1));
    board.apply_snapshot(&snapshot);

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            assert_eq!(board.tile(row, col), snapshot.cell(row, col).flatten());
        }
    }
}

#[test]
fn test_snapshot_row_rejects_bad_width() {
    let mut board = BoardModel::new();
    let short = [Some(PlacedTile::new('A', 1, 1, 1)); 14];
    assert!(!board.apply_snapshot_row(0, &short));
    assert_eq!(board.occupied_count(), 0);

    let full = [Some(PlacedTile::new('A', 1, 1, 1)); 15];
    assert!(board.apply_snapshot_row(14, &full));
    assert_eq!(board.rows().nth(14).map(|r| r.iter().flatten().count()), Some(15));
}

#[test]
fn test_fingerprint_tracks_occupancy() {
    let mut a = BoardModel::new();
    let b = BoardModel::new();
    assert_eq!(a.fingerprint(), b.fingerprint());

    a.apply_placement(4, 4, 'K', 5, 1, 2);
    assert_ne!(a.fingerprint(), b.fingerprint());
    a.reset();
    assert_eq!(a.fingerprint(), b.fingerprint());
}
